use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::{DirEntry, FileType};
use std::path::Path;
use tokio::task;
use tracing::debug;

use crate::models::{EntryKind, FsEntry};

use super::FileSystem;

/// Lists the local disk. Symlinks are reported as such and never followed.
pub struct RealFileSystem;

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    async fn read_dir(&self, dir: &Path) -> Result<Vec<FsEntry>> {
        let dir = dir.to_path_buf();
        task::spawn_blocking(move || list(&dir)).await?
    }
}

fn list(dir: &Path) -> Result<Vec<FsEntry>> {
    let listing =
        std::fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;

    Ok(listing
        .filter_map(|entry| match entry {
            Ok(entry) => to_fs_entry(entry),
            Err(err) => {
                debug!("Skipping unreadable entry in '{}': {err}", dir.display());
                None
            }
        })
        .collect())
}

fn to_fs_entry(entry: DirEntry) -> Option<FsEntry> {
    let file_type = entry.file_type().ok()?;
    Some(FsEntry {
        path: entry.path(),
        name: entry.file_name().to_string_lossy().into_owned(),
        kind: kind_of(file_type),
    })
}

fn kind_of(file_type: FileType) -> EntryKind {
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}
