use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One inventory document, exported by the collector for a single run.
///
/// Everything the checks evaluate is resident in this structure by the time
/// evaluation starts; the engine itself performs no I/O.
#[derive(Debug, Deserialize)]
pub struct Inventory {
    /// Where the inventory was collected from (shown in report footers).
    #[serde(default)]
    pub source: String,
    pub virtual_machines: Vec<VirtualMachine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VirtualMachine {
    pub name: String,
    pub moid: String,
    /// Absent when the machine has never been snapshotted.
    #[serde(default)]
    pub snapshot: Option<SnapshotInfo>,
    #[serde(default)]
    pub layout: FileLayout,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotInfo {
    /// MOID of the currently-active snapshot, if any.
    #[serde(default)]
    pub current_snapshot: Option<String>,
    #[serde(default)]
    pub root_snapshot_list: Vec<SnapshotTree>,
}

/// One node in a machine's snapshot forest. Parent linkage is positional:
/// children carry no back reference, the walker threads the parent through.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotTree {
    pub id: i32,
    pub moid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub child_snapshot_list: Vec<SnapshotTree>,
}

/// The machine's full file layout: every file it owns, the chains of every
/// currently-attached disk, and the per-snapshot disk layouts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileLayout {
    #[serde(default)]
    pub files: Vec<LayoutFile>,
    #[serde(default)]
    pub disks: Vec<LayoutDisk>,
    #[serde(default)]
    pub snapshots: Vec<LayoutSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutFile {
    pub key: i32,
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub kind: FileKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    DiskDescriptor,
    DiskExtent,
    SnapshotData,
    #[default]
    #[serde(other)]
    Other,
}

/// One virtual disk and its backing-file chain(s) at a given point in the
/// snapshot hierarchy.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutDisk {
    pub key: i32,
    #[serde(default)]
    pub chains: Vec<DiskChain>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskChain {
    #[serde(default)]
    pub file_keys: Vec<i32>,
}

/// Disk layout for one specific snapshot, matched to a tree node by MOID.
/// Some snapshot metadata entries never get a layout entry; that is normal.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSnapshot {
    pub key: String,
    pub data_key: i32,
    #[serde(default)]
    pub disks: Vec<LayoutDisk>,
}
