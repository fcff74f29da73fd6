use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a resolution before any entry is classified.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("the path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot list '{}': {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wishlist entry '{0}' is listed more than once")]
    DuplicateWishlistEntry(String),

    #[error("the ignore file name must not be empty")]
    EmptyIgnoreFilename,
}

/// Failures that stop a changelist sync before any depot command runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("branch '{branch}' does not exist, available: {}", .available.join(", "))]
    UnknownBranch {
        branch: String,
        available: Vec<String>,
    },

    #[error("trunk branch '{0}' does not exist in the repository")]
    UnknownTrunk(String),
}
