//! Offline changelist sync: open everything a branch changed in the depot.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::core::normalize::{NormalizeOptions, normalize};
use crate::error::SyncError;
use crate::vcs::{ChangeQuery, ChangeSource, Depot, EditOutcome, OpOutcome, branch_exists};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncRequest {
    pub branch: String,
    pub trunk: String,
    pub remote: String,
    pub include_trunk: bool,
    pub ignored_branches: Vec<String>,
}

/// Files opened in the depot, per operation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncReport {
    pub edited: Vec<String>,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub async fn execute_offline_sync<S, D>(
    source: &S,
    depot: &D,
    request: &SyncRequest,
    ignored_files: &[String],
) -> Result<SyncReport>
where
    S: ChangeSource,
    D: Depot,
{
    info!("Executing offline sync of branch '{}'", request.branch);

    let available = source.branches().await?;
    if !branch_exists(&request.branch, &available, &request.remote) {
        return Err(SyncError::UnknownBranch {
            branch: request.branch.clone(),
            available,
        }
        .into());
    }
    if !branch_exists(&request.trunk, &available, &request.remote) {
        return Err(SyncError::UnknownTrunk(request.trunk.clone()).into());
    }

    let ignored_branches = request
        .ignored_branches
        .iter()
        .filter(|branch| {
            let exists = branch_exists(branch, &available, &request.remote);
            if !exists {
                warn!("Ignored branch '{branch}' does not exist, skipping it");
            }
            exists
        })
        .map(|branch| branch.to_lowercase())
        .collect();

    let query = ChangeQuery {
        branch: request.branch.clone(),
        trunk: request.trunk.clone(),
        remote: request.remote.clone(),
        include_trunk: request.include_trunk,
        ignored_branches,
    };
    let mut changes = source.changed_files(&query).await?;

    let skipped: HashSet<String> = ignored_files
        .iter()
        .map(|path| normalize(path, NormalizeOptions::lowercase()))
        .collect();
    let keep = |path: &String| {
        let excluded = skipped.contains(&normalize(path, NormalizeOptions::lowercase()));
        if excluded {
            info!("Leaving '{path}' out of the changelist");
        }
        !excluded
    };
    changes.add_or_edit.retain(keep);
    changes.delete.retain(keep);

    let mut report = SyncReport::default();
    if changes.is_empty() {
        error!("The file list is empty.");
    }

    for path in changes.delete {
        match depot.delete(&path).await {
            Ok(OpOutcome::Done) => report.deleted.push(path),
            Ok(OpOutcome::Unknown) => {
                error!("Unexpected response deleting '{path}'");
                report.failed.push(path);
            }
            Err(err) => {
                error!("Failed to delete '{path}': {err:#}");
                report.failed.push(path);
            }
        }
    }

    let mut to_add = Vec::new();
    for path in changes.add_or_edit {
        match depot.edit(&path).await {
            Ok(EditOutcome::Done) => report.edited.push(path),
            Ok(EditOutcome::NeedsAdd) => to_add.push(path),
            Ok(EditOutcome::Unknown) => {
                error!("Unexpected response checking out '{path}'");
                report.failed.push(path);
            }
            Err(err) => {
                error!("Failed to check out '{path}': {err:#}");
                report.failed.push(path);
            }
        }
    }

    for path in to_add {
        match depot.add(&path).await {
            Ok(OpOutcome::Done) => report.added.push(path),
            Ok(OpOutcome::Unknown) => {
                error!("Unexpected response adding '{path}'");
                report.failed.push(path);
            }
            Err(err) => {
                error!("Failed to add '{path}': {err:#}");
                report.failed.push(path);
            }
        }
    }

    if let Err(err) = depot.revert_unchanged().await {
        error!("Encountered an error when reverting unchanged files: {err:#}");
    }

    info!(
        "Opened {} for edit, {} for add, {} for delete ({} failed)",
        report.edited.len(),
        report.added.len(),
        report.deleted.len(),
        report.failed.len()
    );
    Ok(report)
}
