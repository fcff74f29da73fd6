mod git;
mod p4;
mod process;

pub use git::{GitCli, parse_branches, parse_name_status};
pub use p4::{P4Cli, parse_add_message, parse_delete_message, parse_edit_message};

use anyhow::Result;
use async_trait::async_trait;

/// Which commits contribute to a changelist.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeQuery {
    pub branch: String,
    pub trunk: String,
    pub remote: String,
    /// Include trunk commits not yet on the remote trunk.
    pub include_trunk: bool,
    /// Branches whose commits are excluded.
    pub ignored_branches: Vec<String>,
}

impl ChangeQuery {
    /// The revision changes are measured against.
    pub fn base(&self) -> String {
        if self.include_trunk {
            format!("{}/{}", self.remote, self.trunk)
        } else {
            self.trunk.clone()
        }
    }
}

/// Repository-relative paths touched by a branch, each in exactly one list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileChanges {
    pub add_or_edit: Vec<String>,
    pub delete: Vec<String>,
}

impl FileChanges {
    pub fn is_empty(&self) -> bool {
        self.add_or_edit.is_empty() && self.delete.is_empty()
    }
}

/// Distributed VCS the changes come from.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Local and remote branch names.
    async fn branches(&self) -> Result<Vec<String>>;

    async fn changed_files(&self, query: &ChangeQuery) -> Result<FileChanges>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditOutcome {
    Done,
    /// The depot does not know the file yet; it has to be added.
    NeedsAdd,
    Unknown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpOutcome {
    Done,
    Unknown,
}

/// Centralized VCS the changelist is opened in.
#[async_trait]
pub trait Depot: Send + Sync {
    async fn edit(&self, path: &str) -> Result<EditOutcome>;

    async fn add(&self, path: &str) -> Result<OpOutcome>;

    async fn delete(&self, path: &str) -> Result<OpOutcome>;

    /// Revert opened files whose content did not change.
    async fn revert_unchanged(&self) -> Result<()>;
}

/// Case-insensitive branch lookup that also accepts the remote-tracking
/// forms `<remote>/<name>` and `remotes/<remote>/<name>`.
pub fn branch_exists(name: &str, available: &[String], remote: &str) -> bool {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }
    let remote = remote.to_lowercase();
    let candidates = [
        name.clone(),
        format!("remotes/{name}"),
        format!("{remote}/{name}"),
        format!("remotes/{remote}/{name}"),
    ];

    available.iter().any(|branch| {
        let branch = branch.to_lowercase();
        candidates.iter().any(|candidate| *candidate == branch)
    })
}
