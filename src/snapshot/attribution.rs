use ahash::AHashSet;
use chrono::{DateTime, Utc};

use crate::model::{SnapshotInfo, SnapshotTree, VirtualMachine};
use crate::snapshot::chains;
use crate::snapshot::file_index::FileIndex;
use crate::snapshot::summary::SnapshotSummary;
use crate::snapshot::thresholds::SnapshotThresholds;

/// Incremental byte size owned exclusively by one snapshot node.
///
/// Children of the snapshot tree share backing files with their ancestors,
/// so summing raw chain sizes overcounts. A root node keeps only what is not
/// part of the currently-attached disk baseline; a child keeps only what its
/// parent's chains do not already cover. The active snapshot additionally
/// absorbs "drift": attached-disk files that belong to no snapshot layout,
/// i.e. growth since the last fixed snapshot point.
pub fn attributed_size(
    snapshot_keys: &AHashSet<i32>,
    parent_keys: &AHashSet<i32>,
    all_disk_keys: &AHashSet<i32>,
    index: &FileIndex,
    has_parent: bool,
    is_active: bool,
) -> u64 {
    let baseline = if has_parent { parent_keys } else { all_disk_keys };

    let mut size: u64 = snapshot_keys
        .difference(baseline)
        .map(|key| index.size_of(*key))
        .sum();

    if is_active {
        size += all_disk_keys
            .difference(snapshot_keys)
            .map(|key| index.size_of(*key))
            .sum::<u64>();
    }

    size
}

/// Depth-first, pre-order walk over a machine's snapshot forest, producing
/// one summary per node. Sibling order is the input order; parent context is
/// threaded through the recursion explicitly. Inputs are assumed to form a
/// proper forest.
pub fn walk_snapshot_forest(
    vm: &VirtualMachine,
    info: &SnapshotInfo,
    index: &FileIndex,
    all_disk_keys: &AHashSet<i32>,
    thresholds: &SnapshotThresholds,
    now: DateTime<Utc>,
) -> Vec<SnapshotSummary> {
    let mut summaries = Vec::new();
    walk_nodes(
        &info.root_snapshot_list,
        None,
        vm,
        info,
        index,
        all_disk_keys,
        thresholds,
        now,
        &mut summaries,
    );
    summaries
}

#[allow(clippy::too_many_arguments)]
fn walk_nodes(
    nodes: &[SnapshotTree],
    parent: Option<&SnapshotTree>,
    vm: &VirtualMachine,
    info: &SnapshotInfo,
    index: &FileIndex,
    all_disk_keys: &AHashSet<i32>,
    thresholds: &SnapshotThresholds,
    now: DateTime<Utc>,
    summaries: &mut Vec<SnapshotSummary>,
) {
    for node in nodes {
        let snapshot_keys = chains::snapshot_keys(&vm.layout.snapshots, node);
        let parent_keys = chains::parent_disk_keys(&vm.layout.snapshots, parent);

        let is_active = info.current_snapshot.as_deref() == Some(node.moid.as_str());

        let size = attributed_size(
            &snapshot_keys,
            &parent_keys,
            all_disk_keys,
            index,
            parent.is_some(),
            is_active,
        );

        summaries.push(SnapshotSummary::from_node(
            node, &vm.name, size, thresholds, now,
        ));

        if !node.child_snapshot_list.is_empty() {
            walk_nodes(
                &node.child_snapshot_list,
                Some(node),
                vm,
                info,
                index,
                all_disk_keys,
                thresholds,
                now,
                summaries,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileKind, LayoutFile};

    fn index(files: &[(i32, u64)]) -> FileIndex {
        let layout: Vec<LayoutFile> = files
            .iter()
            .map(|&(key, size)| LayoutFile {
                key,
                name: format!("file-{key}"),
                size,
                kind: FileKind::DiskExtent,
            })
            .collect();
        FileIndex::build(&layout)
    }

    fn keys(values: &[i32]) -> AHashSet<i32> {
        values.iter().copied().collect()
    }

    #[test]
    fn root_node_subtracts_attached_disk_baseline() {
        // Data file (key 10) is the only file outside the attached chains.
        let index = index(&[(4, 100), (5, 200), (10, 50)]);
        let size = attributed_size(
            &keys(&[10, 4, 5]),
            &keys(&[]),
            &keys(&[4, 5]),
            &index,
            false,
            false,
        );
        assert_eq!(size, 50);
    }

    #[test]
    fn root_with_chains_identical_to_attached_disks_attributes_zero() {
        let index = index(&[(4, 100), (5, 200), (10, 0)]);
        let size = attributed_size(
            &keys(&[10, 4, 5]),
            &keys(&[]),
            &keys(&[4, 5]),
            &index,
            false,
            false,
        );
        assert_eq!(size, 0);
    }

    #[test]
    fn child_node_subtracts_parent_chains_only() {
        let index = index(&[(4, 100), (5, 200), (6, 300), (11, 50)]);
        let size = attributed_size(
            &keys(&[11, 4, 5, 6]),
            &keys(&[4, 5]),
            &keys(&[4, 5, 6]),
            &index,
            true,
            false,
        );
        // Keeps the data file and the delta extent the parent lacks.
        assert_eq!(size, 350);
    }

    #[test]
    fn active_node_includes_live_drift() {
        // Key 12 is attached but belongs to no snapshot layout: live growth.
        let index = index(&[(4, 100), (5, 200), (11, 50), (12, 75)]);
        let inactive = attributed_size(
            &keys(&[11, 4, 5]),
            &keys(&[4, 5]),
            &keys(&[4, 5, 12]),
            &index,
            true,
            false,
        );
        let active = attributed_size(
            &keys(&[11, 4, 5]),
            &keys(&[4, 5]),
            &keys(&[4, 5, 12]),
            &index,
            true,
            true,
        );
        assert_eq!(inactive, 50);
        assert_eq!(active, 50 + 75);
    }

    #[test]
    fn node_without_layout_entry_contributes_zero_when_inactive() {
        let index = index(&[(4, 100)]);
        let size = attributed_size(&keys(&[]), &keys(&[]), &keys(&[4]), &index, false, false);
        assert_eq!(size, 0);
    }
}
