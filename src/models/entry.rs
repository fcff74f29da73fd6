use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    /// Symlinks and special files are never followed, so they classify as files.
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// A raw directory listing entry, as returned by a `FileSystem`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

/// A listing entry prepared for classification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathEntry {
    pub path: PathBuf,
    pub raw_name: String,
    /// Lowercase form used for every comparison.
    pub name: String,
    pub kind: EntryKind,
}

impl From<FsEntry> for PathEntry {
    fn from(entry: FsEntry) -> Self {
        // A single name: separators inside it are literal characters.
        let name = entry.name.to_lowercase();
        Self {
            path: entry.path,
            raw_name: entry.name,
            name,
            kind: entry.kind,
        }
    }
}
