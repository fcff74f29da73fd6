mod entry;
mod ignore_set;
mod pattern;

pub use entry::{EntryKind, FsEntry, PathEntry};
pub use ignore_set::{IgnoreEntry, IgnoreKind, IgnoreSet};
pub use pattern::Pattern;
