use chrono::{DateTime, Utc};
use indicatif::HumanBytes;

use crate::model::{SnapshotTree, VirtualMachine};
use crate::snapshot::attribution::walk_snapshot_forest;
use crate::snapshot::chains;
use crate::snapshot::file_index::FileIndex;
use crate::snapshot::thresholds::{exceeds_age, exceeds_size, SnapshotThresholds};
use crate::state::CheckState;

/// Summary of one snapshot node: identity, attributed size, and the four
/// independent threshold states evaluated at construction time.
#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    pub name: String,
    pub moid: String,
    pub id: i32,
    pub description: String,
    pub vm_name: String,
    /// Attributed size in bytes (exclusive data, plus drift when active).
    pub size: u64,
    create_time: DateTime<Utc>,
    age_warning_state: bool,
    age_critical_state: bool,
    size_warning_state: bool,
    size_critical_state: bool,
}

impl SnapshotSummary {
    pub fn from_node(
        node: &SnapshotTree,
        vm_name: &str,
        size: u64,
        thresholds: &SnapshotThresholds,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: node.name.clone(),
            moid: node.moid.clone(),
            id: node.id,
            description: node.description.clone(),
            vm_name: vm_name.to_string(),
            size,
            create_time: node.create_time,
            age_warning_state: exceeds_age(node.create_time, thresholds.age_warning_days, now),
            age_critical_state: exceeds_age(node.create_time, thresholds.age_critical_days, now),
            size_warning_state: exceeds_size(size, thresholds.size_warning_gb),
            size_critical_state: exceeds_size(size, thresholds.size_critical_gb),
        }
    }

    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    /// Fractional age in days as of `now`.
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.create_time).num_seconds() as f64 / 86_400.0
    }

    pub fn age(&self, now: DateTime<Utc>) -> String {
        format!("{:.2} days", self.age_days(now))
    }

    pub fn size_human(&self) -> String {
        HumanBytes(self.size).to_string()
    }

    pub fn is_age_exceeded(&self, days: u32, now: DateTime<Utc>) -> bool {
        exceeds_age(self.create_time, days, now)
    }

    pub fn is_size_exceeded(&self, size_gb: u64) -> bool {
        exceeds_size(self.size, size_gb)
    }

    pub fn is_age_warning_state(&self) -> bool {
        self.age_warning_state
    }

    pub fn is_age_critical_state(&self) -> bool {
        self.age_critical_state
    }

    pub fn is_size_warning_state(&self) -> bool {
        self.size_warning_state
    }

    pub fn is_size_critical_state(&self) -> bool {
        self.size_critical_state
    }

    pub fn is_warning_state(&self) -> bool {
        self.age_warning_state || self.size_warning_state
    }

    pub fn is_critical_state(&self) -> bool {
        self.age_critical_state || self.size_critical_state
    }
}

/// All snapshot summaries for one machine, plus the set-level size states
/// evaluated once against the cumulative attributed size.
///
/// The cumulative size always equals the sum of member sizes: attribution
/// works by set subtraction, so no file is counted under two snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotSummarySet {
    pub vm_moid: String,
    pub vm_name: String,
    pub snapshots: Vec<SnapshotSummary>,
    set_size_warning_state: bool,
    set_size_critical_state: bool,
}

impl SnapshotSummarySet {
    /// Evaluate every snapshot of `vm` against `thresholds`.
    ///
    /// Builds the machine's file index and attached-disk key set once, then
    /// walks the snapshot forest. A machine without snapshot data yields an
    /// empty set; callers filter those out before aggregation.
    pub fn new(vm: &VirtualMachine, thresholds: &SnapshotThresholds, now: DateTime<Utc>) -> Self {
        let index = FileIndex::build(&vm.layout.files);
        let all_disk_keys = chains::all_disk_keys(&vm.layout.disks);

        let snapshots = match &vm.snapshot {
            Some(info) => {
                walk_snapshot_forest(vm, info, &index, &all_disk_keys, thresholds, now)
            }
            None => Vec::new(),
        };

        let set_size: u64 = snapshots.iter().map(|s| s.size).sum();

        Self {
            vm_moid: vm.moid.clone(),
            vm_name: vm.name.clone(),
            snapshots,
            set_size_warning_state: exceeds_size(set_size, thresholds.size_warning_gb),
            set_size_critical_state: exceeds_size(set_size, thresholds.size_critical_gb),
        }
    }

    /// Cumulative attributed size of all snapshots in the set.
    pub fn size(&self) -> u64 {
        self.snapshots.iter().map(|s| s.size).sum()
    }

    pub fn size_human(&self) -> String {
        HumanBytes(self.size()).to_string()
    }

    /// Number of individual snapshots in the set older than `days`.
    pub fn exceeds_age(&self, days: u32, now: DateTime<Utc>) -> usize {
        self.snapshots
            .iter()
            .filter(|s| s.is_age_exceeded(days, now))
            .count()
    }

    /// Number of individual snapshots in the set larger than `size_gb`.
    pub fn exceeds_size(&self, size_gb: u64) -> usize {
        self.snapshots
            .iter()
            .filter(|s| s.is_size_exceeded(size_gb))
            .count()
    }

    pub fn is_age_warning_state(&self) -> bool {
        self.snapshots.iter().any(|s| s.is_age_warning_state())
    }

    pub fn is_age_critical_state(&self) -> bool {
        self.snapshots.iter().any(|s| s.is_age_critical_state())
    }

    pub fn is_size_warning_state(&self) -> bool {
        self.set_size_warning_state
    }

    pub fn is_size_critical_state(&self) -> bool {
        self.set_size_critical_state
    }

    pub fn is_warning_state(&self) -> bool {
        self.snapshots.iter().any(|s| s.is_warning_state()) || self.set_size_warning_state
    }

    pub fn is_critical_state(&self) -> bool {
        self.snapshots.iter().any(|s| s.is_critical_state()) || self.set_size_critical_state
    }
}

/// Ordered collection of summary sets, one per evaluated machine with at
/// least one snapshot. Bulk state queries short-circuit on first match.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSummarySets(pub Vec<SnapshotSummarySet>);

impl SnapshotSummarySets {
    pub fn iter(&self) -> std::slice::Iter<'_, SnapshotSummarySet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of snapshots across all sets.
    pub fn snapshots(&self) -> usize {
        self.0.iter().map(|set| set.snapshots.len()).sum()
    }

    /// How many sets, and how many snapshots across those sets, are older
    /// than `days`.
    pub fn exceeds_age(&self, days: u32, now: DateTime<Utc>) -> (usize, usize) {
        let mut sets_exceeded = 0;
        let mut snapshots_exceeded = 0;
        for set in &self.0 {
            let exceeded = set.exceeds_age(days, now);
            if exceeded >= 1 {
                sets_exceeded += 1;
                snapshots_exceeded += exceeded;
            }
        }
        (sets_exceeded, snapshots_exceeded)
    }

    /// How many sets have a cumulative size larger than `size_gb`, and how
    /// many snapshots those sets hold in total.
    pub fn exceeds_size(&self, size_gb: u64) -> (usize, usize) {
        let mut sets_exceeded = 0;
        let mut snapshots_exceeded = 0;
        for set in &self.0 {
            if exceeds_size(set.size(), size_gb) {
                sets_exceeded += 1;
                snapshots_exceeded += set.snapshots.len();
            }
        }
        (sets_exceeded, snapshots_exceeded)
    }

    /// Whether any individual snapshot has yet to exceed the age threshold.
    pub fn has_not_yet_exceeded_age(&self, days: u32, now: DateTime<Utc>) -> bool {
        self.0
            .iter()
            .flat_map(|set| set.snapshots.iter())
            .any(|s| !s.is_age_exceeded(days, now))
    }

    /// Whether any set's cumulative size has yet to exceed the threshold.
    pub fn has_not_yet_exceeded_size(&self, size_gb: u64) -> bool {
        self.0.iter().any(|set| !exceeds_size(set.size(), size_gb))
    }

    pub fn is_age_warning_state(&self) -> bool {
        self.0.iter().any(|set| set.is_age_warning_state())
    }

    pub fn is_age_critical_state(&self) -> bool {
        self.0.iter().any(|set| set.is_age_critical_state())
    }

    pub fn is_size_warning_state(&self) -> bool {
        self.0.iter().any(|set| set.is_size_warning_state())
    }

    pub fn is_size_critical_state(&self) -> bool {
        self.0.iter().any(|set| set.is_size_critical_state())
    }

    pub fn is_warning_state(&self) -> bool {
        self.0.iter().any(|set| set.is_warning_state())
    }

    pub fn is_critical_state(&self) -> bool {
        self.0.iter().any(|set| set.is_critical_state())
    }

    /// Verdict considering age thresholds only.
    pub fn overall_age_state(&self) -> CheckState {
        if self.is_age_critical_state() {
            CheckState::Critical
        } else if self.is_age_warning_state() {
            CheckState::Warning
        } else {
            CheckState::Ok
        }
    }

    /// Verdict considering size thresholds only.
    pub fn overall_size_state(&self) -> CheckState {
        if self.is_size_critical_state() {
            CheckState::Critical
        } else if self.is_size_warning_state() {
            CheckState::Warning
        } else {
            CheckState::Ok
        }
    }

    /// Verdict across both dimensions: critical over warning over ok.
    pub fn overall_state(&self) -> CheckState {
        if self.is_critical_state() {
            CheckState::Critical
        } else if self.is_warning_state() {
            CheckState::Warning
        } else {
            CheckState::Ok
        }
    }
}

impl<'a> IntoIterator for &'a SnapshotSummarySets {
    type Item = &'a SnapshotSummarySet;
    type IntoIter = std::slice::Iter<'a, SnapshotSummarySet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
