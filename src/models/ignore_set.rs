use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Whether a resolved entry should be written as a folder-level rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum IgnoreKind {
    Directory,
    File,
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct IgnoreEntry {
    /// Lowercase path relative to the resolution root, `/`-separated.
    pub path: String,
    /// The same path with the case found on disk, as written to the file.
    pub on_disk: String,
    pub kind: IgnoreKind,
}

impl IgnoreEntry {
    /// `on_disk` is the root-relative path as listed; the key is its
    /// lowercase form.
    pub fn directory(on_disk: impl Into<String>) -> Self {
        Self::new(on_disk.into(), IgnoreKind::Directory)
    }

    pub fn file(on_disk: impl Into<String>) -> Self {
        Self::new(on_disk.into(), IgnoreKind::File)
    }

    fn new(on_disk: String, kind: IgnoreKind) -> Self {
        Self {
            path: on_disk.to_lowercase(),
            on_disk,
            kind,
        }
    }
}

/// Accumulated ignore decisions for one subtree.
///
/// Keyed by lowercase path so a path is only ever recorded once, and iterated
/// in sorted order so the visiting order of a walk never leaks into the output.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IgnoreSet {
    entries: BTreeMap<String, IgnoreEntry>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the path was already present.
    pub fn insert(&mut self, entry: IgnoreEntry) -> bool {
        match self.entries.entry(entry.path.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn merge(&mut self, other: IgnoreSet) {
        for (path, entry) in other.entries {
            self.entries.entry(path).or_insert(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<IgnoreEntry> {
        self.entries.into_values().collect()
    }
}
