use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::process::run;
use super::{ChangeQuery, ChangeSource, FileChanges};

/// [`ChangeSource`] backed by the `git` command line.
#[derive(Clone, Debug)]
pub struct GitCli {
    program: String,
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_owned(),
            repo: repo.into(),
        }
    }
}

#[async_trait]
impl ChangeSource for GitCli {
    async fn branches(&self) -> Result<Vec<String>> {
        let output = run(&self.program, &["branch", "-a"], &self.repo).await?;
        if !output.success {
            bail!("git branch failed: {}", output.first_line());
        }
        Ok(parse_branches(&output.stdout))
    }

    async fn changed_files(&self, query: &ChangeQuery) -> Result<FileChanges> {
        let base = query.base();
        let mut args = vec![
            "log",
            "--name-status",
            "-z",
            "--pretty=format:",
            "-M",
            query.branch.as_str(),
            "--not",
            base.as_str(),
        ];
        args.extend(query.ignored_branches.iter().map(String::as_str));

        let output = run(&self.program, &args, &self.repo).await?;
        if !output.success {
            bail!("git log failed: {}", output.first_line());
        }
        Ok(parse_name_status(&output.stdout))
    }
}

/// Branch names from `git branch -a`, without the current-branch marker,
/// symbolic refs or detached heads.
pub fn parse_branches(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .filter(|line| !line.is_empty() && !line.starts_with('(') && !line.contains(" -> "))
        .map(str::to_owned)
        .collect()
}

#[derive(Clone, Copy, Debug)]
enum Change {
    AddOrEdit,
    Delete,
}

/// Fold `git log --name-status -z` output (newest commit first) into the
/// final operation per path. Fields are NUL-separated and paths are raw.
pub fn parse_name_status(text: &str) -> FileChanges {
    let mut latest: BTreeMap<String, Change> = BTreeMap::new();
    let mut record = |path: Option<&str>, change: Change| {
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            latest.entry(path.to_owned()).or_insert(change);
        }
    };

    let mut fields = text.split('\0');
    while let Some(field) = fields.next() {
        let status = field.trim_matches('\n');
        if status.is_empty() {
            continue;
        }
        match status.chars().next().unwrap_or(' ') {
            'A' | 'M' | 'T' => record(fields.next(), Change::AddOrEdit),
            'D' => record(fields.next(), Change::Delete),
            'C' => {
                fields.next();
                record(fields.next(), Change::AddOrEdit);
            }
            'R' => {
                let old = fields.next();
                record(fields.next(), Change::AddOrEdit);
                record(old, Change::Delete);
            }
            _ => {
                let path = fields.next().unwrap_or("");
                warn!("Skipping change {status:?} on '{path}'");
            }
        }
    }

    let mut changes = FileChanges::default();
    for (path, change) in latest {
        match change {
            Change::AddOrEdit => changes.add_or_edit.push(path),
            Change::Delete => changes.delete.push(path),
        }
    }
    debug!(
        "Found {} added or edited and {} deleted files",
        changes.add_or_edit.len(),
        changes.delete.len()
    );
    changes
}
