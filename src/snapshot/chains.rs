use ahash::AHashSet;

use crate::model::{LayoutDisk, LayoutSnapshot, SnapshotTree};

/// Every file key in every chain of every currently-attached disk.
///
/// Computed once per machine; the same set feeds the root-node subtraction
/// and the active-snapshot drift calculation for every node in the forest.
pub fn all_disk_keys(disks: &[LayoutDisk]) -> AHashSet<i32> {
    let mut keys = AHashSet::new();
    for disk in disks {
        for chain in &disk.chains {
            keys.extend(chain.file_keys.iter().copied());
        }
    }
    keys
}

/// The node's own snapshot-data key plus every key in every disk chain of
/// the layout entry matching the node.
///
/// A node without a matching layout entry contributes an empty set; some
/// snapshot metadata entries simply never get layout data.
pub fn snapshot_keys(layouts: &[LayoutSnapshot], node: &SnapshotTree) -> AHashSet<i32> {
    let mut keys = AHashSet::new();
    for layout in layouts {
        if layout.key != node.moid {
            continue;
        }
        keys.insert(layout.data_key);
        for disk in &layout.disks {
            for chain in &disk.chains {
                keys.extend(chain.file_keys.iter().copied());
            }
        }
    }
    keys
}

/// Disk-chain keys of the parent snapshot's layout entry. The parent's own
/// snapshot-data key is deliberately not included.
pub fn parent_disk_keys(
    layouts: &[LayoutSnapshot],
    parent: Option<&SnapshotTree>,
) -> AHashSet<i32> {
    let mut keys = AHashSet::new();
    let Some(parent) = parent else {
        return keys;
    };
    for layout in layouts {
        if layout.key != parent.moid {
            continue;
        }
        for disk in &layout.disks {
            for chain in &disk.chains {
                keys.extend(chain.file_keys.iter().copied());
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::model::DiskChain;

    fn disk(key: i32, file_keys: Vec<i32>) -> LayoutDisk {
        LayoutDisk {
            key,
            chains: vec![DiskChain { file_keys }],
        }
    }

    fn node(moid: &str) -> SnapshotTree {
        SnapshotTree {
            id: 1,
            moid: moid.to_string(),
            name: "snap".to_string(),
            description: String::new(),
            create_time: Utc::now(),
            child_snapshot_list: Vec::new(),
        }
    }

    fn layout(key: &str, data_key: i32, disks: Vec<LayoutDisk>) -> LayoutSnapshot {
        LayoutSnapshot {
            key: key.to_string(),
            data_key,
            disks,
        }
    }

    #[test]
    fn all_disk_keys_flattens_every_chain() {
        let disks = vec![disk(2000, vec![4, 5]), disk(2001, vec![6, 7])];
        let keys = all_disk_keys(&disks);
        assert_eq!(keys, AHashSet::from_iter([4, 5, 6, 7]));
    }

    #[test]
    fn snapshot_keys_include_data_key_and_chains() {
        let layouts = vec![
            layout("snap-1", 10, vec![disk(2000, vec![4, 5])]),
            layout("snap-2", 11, vec![disk(2000, vec![4, 5, 6])]),
        ];
        let keys = snapshot_keys(&layouts, &node("snap-2"));
        assert_eq!(keys, AHashSet::from_iter([11, 4, 5, 6]));
    }

    #[test]
    fn node_without_layout_entry_contributes_nothing() {
        let layouts = vec![layout("snap-1", 10, vec![disk(2000, vec![4])])];
        assert!(snapshot_keys(&layouts, &node("snap-9")).is_empty());
    }

    #[test]
    fn parent_keys_exclude_parent_data_file() {
        let layouts = vec![layout("snap-1", 10, vec![disk(2000, vec![4, 5])])];
        let parent = node("snap-1");
        let keys = parent_disk_keys(&layouts, Some(&parent));
        assert_eq!(keys, AHashSet::from_iter([4, 5]));
        assert!(!keys.contains(&10));
    }

    #[test]
    fn no_parent_means_empty_set() {
        let layouts = vec![layout("snap-1", 10, vec![disk(2000, vec![4])])];
        assert!(parent_disk_keys(&layouts, None).is_empty());
    }
}
