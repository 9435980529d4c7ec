use ahash::AHashMap;

use crate::model::{FileKind, LayoutFile};

/// Metadata for a single file in a machine's layout.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub key: i32,
    pub name: String,
    pub size: u64,
    pub kind: FileKind,
}

/// Lookup from file key to file metadata, built once per machine per run.
///
/// The index holds every file, not just disk files, because chain resolution
/// references keys generically. A duplicate key overwrites the prior entry.
#[derive(Debug, Default)]
pub struct FileIndex {
    records: AHashMap<i32, FileRecord>,
}

impl FileIndex {
    pub fn build(files: &[LayoutFile]) -> Self {
        let mut records = AHashMap::with_capacity(files.len());
        for file in files {
            records.insert(
                file.key,
                FileRecord {
                    key: file.key,
                    name: file.name.clone(),
                    size: file.size,
                    kind: file.kind,
                },
            );
        }
        Self { records }
    }

    pub fn get(&self, key: i32) -> Option<&FileRecord> {
        self.records.get(&key)
    }

    /// Size in bytes for a key; unknown keys contribute zero.
    pub fn size_of(&self, key: i32) -> u64 {
        self.records.get(&key).map_or(0, |r| r.size)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;

    fn layout_file(key: i32, size: u64) -> LayoutFile {
        LayoutFile {
            key,
            name: format!("vm-{key}.vmdk"),
            size,
            kind: FileKind::DiskExtent,
        }
    }

    #[test]
    fn indexes_every_file() {
        let files = vec![layout_file(1, 100), layout_file(2, 200)];
        let index = FileIndex::build(&files);

        assert_eq!(index.len(), 2);
        assert_eq!(index.size_of(1), 100);
        assert_eq!(index.size_of(2), 200);
    }

    #[test]
    fn unknown_key_is_zero_sized() {
        let index = FileIndex::build(&[layout_file(1, 100)]);
        assert_eq!(index.size_of(99), 0);
        assert!(index.get(99).is_none());
    }

    #[test]
    fn duplicate_key_last_write_wins() {
        let files = vec![layout_file(1, 100), layout_file(1, 500)];
        let index = FileIndex::build(&files);

        assert_eq!(index.len(), 1);
        assert_eq!(index.size_of(1), 500);
    }
}
