use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::{EntryKind, FsEntry};

use super::FileSystem;

#[derive(Clone, Debug)]
enum Response {
    Ok(Vec<FsEntry>),
    Err(String),
}

#[derive(Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<PathBuf, Response>,
    calls: Vec<PathBuf>,
}

impl Inner {
    fn ensure_dir(&mut self, dir: &Path) {
        self.responses
            .entry(dir.to_path_buf())
            .or_insert_with(|| Response::Ok(Vec::new()));
    }

    fn add_entry(&mut self, parent: &Path, entry: FsEntry) {
        if let Some(Response::Ok(entries)) = self.responses.get_mut(parent)
            && !entries.iter().any(|e| e.name == entry.name)
        {
            entries.push(entry);
        }
    }
}

impl MockFileSystem {
    /// Build listings under `root` from `/`-separated relative paths.
    /// A path ending in `/` is an empty directory, anything else a file.
    pub fn with_tree(root: impl Into<PathBuf>, paths: &[&str]) -> Self {
        let fs = Self::default();
        let root = root.into();
        {
            let mut inner = fs.inner.lock().expect("mock fs lock");
            inner.ensure_dir(&root);
            for path in paths {
                let is_dir = path.ends_with('/');
                let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
                let mut parent = root.clone();
                for (index, part) in parts.iter().enumerate() {
                    let child = parent.join(part);
                    let kind = if index + 1 < parts.len() || is_dir {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    };
                    inner.add_entry(
                        &parent,
                        FsEntry {
                            path: child.clone(),
                            name: (*part).to_owned(),
                            kind,
                        },
                    );
                    if kind == EntryKind::Directory {
                        inner.ensure_dir(&child);
                    }
                    parent = child;
                }
            }
        }
        fs
    }

    pub fn set_dir_entries(&self, dir: impl Into<PathBuf>, entries: Vec<FsEntry>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.responses.insert(dir.into(), Response::Ok(entries));
    }

    pub fn set_error(&self, dir: impl Into<PathBuf>, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner
            .responses
            .insert(dir.into(), Response::Err(message.into()));
    }

    /// Reverse the order of every listing.
    pub fn reverse_listings(&self) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        for response in inner.responses.values_mut() {
            if let Response::Ok(entries) = response {
                entries.reverse();
            }
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.calls.clone()
    }
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn is_dir(&self, path: &Path) -> bool {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.responses.contains_key(path)
    }

    async fn read_dir(&self, dir: &Path) -> Result<Vec<FsEntry>> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.calls.push(dir.to_path_buf());

        match inner.responses.get(dir) {
            Some(Response::Ok(entries)) => Ok(entries.clone()),
            Some(Response::Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("no mock response for {}", dir.display())),
        }
    }
}
