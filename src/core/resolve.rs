use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::core::normalize::join_relative;
use crate::core::translate::IgnoreRules;
use crate::core::wishlist::{Descent, Wishlist, WishlistFrame};
use crate::error::ResolveError;
use crate::fs::FileSystem;
use crate::models::{EntryKind, FsEntry, IgnoreEntry, IgnoreSet, PathEntry};

/// Which list wins when an entry is both wishlisted and globally ignored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Precedence {
    /// A consumed wishlist entry keeps its whole subtree, and a wishlisted
    /// file stays kept even when a global pattern matches it.
    #[default]
    WishlistFirst,
    /// Global ignore patterns always win, including inside kept subtrees.
    IgnoreFirst,
}

/// Configuration options for ignore-set resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub precedence: Precedence,
}

/// Resolve the entries under `root` that the ignore file must exclude.
///
/// Returns root-relative, `/`-separated entries keyed by their lowercase
/// path, sorted and free of duplicates. Each entry also carries the path with
/// its on-disk case.
pub async fn resolve<F, W, P>(
    fs: &F,
    root: &Path,
    wishlist: &[W],
    ignore_patterns: &[P],
    options: &ResolveOptions,
) -> Result<Vec<IgnoreEntry>, ResolveError>
where
    F: FileSystem,
    W: AsRef<str>,
    P: AsRef<str>,
{
    let wishlist = Wishlist::parse(wishlist);
    let rules = IgnoreRules::new(ignore_patterns);
    resolve_with(fs, root, &wishlist, &rules, options)
        .await
        .map(IgnoreSet::into_vec)
}

/// Same as [`resolve`] with the wishlist and rules already compiled.
pub async fn resolve_with<F: FileSystem>(
    fs: &F,
    root: &Path,
    wishlist: &Wishlist,
    rules: &IgnoreRules,
    options: &ResolveOptions,
) -> Result<IgnoreSet, ResolveError> {
    if !fs.is_dir(root).await {
        error!("The path '{}' is not a directory", root.display());
        return Err(ResolveError::NotADirectory(root.to_path_buf()));
    }

    info!(
        "Resolving ignored entries under '{}' ({} wishlist entries, {} ignore patterns)",
        root.display(),
        wishlist.entries().len(),
        rules.len()
    );
    for (depth, segments) in wishlist.build_depth_index() {
        debug!("Wishlist segments at depth {depth}: {segments:?}");
    }

    let entries = fs
        .read_dir(root)
        .await
        .map_err(|err| ResolveError::Unreadable {
            path: root.to_path_buf(),
            message: err.to_string(),
        })?;

    let resolver = Resolver { fs, rules, options };
    let ignored = resolver
        .classify(entries, "", &wishlist.root_frame())
        .await;

    if ignored.is_empty() {
        debug!("Nothing under '{}' needs ignoring", root.display());
    }
    info!("Resolved {} ignored entries", ignored.len());
    Ok(ignored)
}

struct Resolver<'a, F> {
    fs: &'a F,
    rules: &'a IgnoreRules,
    options: &'a ResolveOptions,
}

impl<F: FileSystem> Resolver<'_, F> {
    fn strict(&self) -> bool {
        self.options.precedence == Precedence::IgnoreFirst
    }

    /// Resolve one candidate directory. A listing failure ignores the whole
    /// directory instead of aborting the walk.
    async fn resolve_dir(
        &self,
        dir: &Path,
        relative: &str,
        frame: &WishlistFrame<'_>,
    ) -> IgnoreSet {
        match self.fs.read_dir(dir).await {
            Ok(entries) => self.classify(entries, relative, frame).await,
            Err(err) => {
                warn!("Cannot list '{relative}', ignoring it entirely: {err}");
                let mut ignored = IgnoreSet::new();
                ignored.insert(IgnoreEntry::directory(relative));
                ignored
            }
        }
    }

    /// Split one listing into keep and ignore. Directories are settled first
    /// since their fate decides whether anything below them is inspected.
    async fn classify(
        &self,
        entries: Vec<FsEntry>,
        relative: &str,
        frame: &WishlistFrame<'_>,
    ) -> IgnoreSet {
        let (directories, files) = sorted_entries(entries);
        debug!(
            "Checking the entries under '{relative}' against {:?}",
            frame.next_segments()
        );

        let mut ignored = IgnoreSet::new();

        for dir in directories {
            let on_disk = join_relative(relative, &dir.raw_name);
            let child = on_disk.to_lowercase();
            let rule = self
                .rules
                .matching(&dir.name, &child, EntryKind::Directory);

            if self.strict()
                && let Some(rule) = rule
            {
                debug!(
                    "Ignoring directory '{child}': matches {:?}",
                    rule.pattern.source()
                );
                ignored.insert(IgnoreEntry::directory(on_disk));
                continue;
            }

            match frame.descend(&dir.name) {
                Descent::Consumed => {
                    debug!("Keeping '{child}' and everything beneath it");
                    if self.strict() {
                        let subtree = Box::pin(self.collect_ignored(&dir.path, &on_disk)).await;
                        ignored.merge(subtree);
                    }
                }
                Descent::Continue(next) => {
                    let subtree = Box::pin(self.resolve_dir(&dir.path, &on_disk, &next)).await;
                    ignored.merge(subtree);
                }
                Descent::Rejected => {
                    match rule {
                        Some(rule) => debug!(
                            "Ignoring directory '{child}': matches {:?}",
                            rule.pattern.source()
                        ),
                        None => debug!("Ignoring directory '{child}': not on the wishlist"),
                    }
                    ignored.insert(IgnoreEntry::directory(on_disk));
                }
            }
        }

        for file in files {
            let on_disk = join_relative(relative, &file.raw_name);
            let child = on_disk.to_lowercase();
            let rule = self.rules.matching(&file.name, &child, file.kind);
            match (frame.keeping_file(&file.name), rule) {
                (Some(_), Some(rule)) if self.strict() => {
                    debug!(
                        "Ignoring wishlisted file '{child}': matches {:?}",
                        rule.pattern.source()
                    );
                    ignored.insert(IgnoreEntry::file(on_disk));
                }
                (Some(keep), _) => {
                    debug!("Keeping file '{child}': matches {:?}", keep.source());
                }
                (None, Some(rule)) => {
                    debug!(
                        "Ignoring file '{child}': matches {:?}",
                        rule.pattern.source()
                    );
                    ignored.insert(IgnoreEntry::file(on_disk));
                }
                (None, None) => {
                    debug!("Ignoring file '{child}': not on the wishlist");
                    ignored.insert(IgnoreEntry::file(on_disk));
                }
            }
        }

        ignored
    }

    /// Collect global-ignore matches inside a subtree the wishlist keeps.
    async fn collect_ignored(&self, dir: &Path, relative: &str) -> IgnoreSet {
        let mut ignored = IgnoreSet::new();
        let entries = match self.fs.read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Cannot list kept directory '{relative}': {err}");
                return ignored;
            }
        };

        let (directories, files) = sorted_entries(entries);
        for entry in directories.into_iter().chain(files) {
            let on_disk = join_relative(relative, &entry.raw_name);
            let child = on_disk.to_lowercase();
            if let Some(rule) = self.rules.matching(&entry.name, &child, entry.kind) {
                debug!(
                    "Ignoring kept entry '{child}': matches {:?}",
                    rule.pattern.source()
                );
                ignored.insert(if entry.kind.is_dir() {
                    IgnoreEntry::directory(on_disk)
                } else {
                    IgnoreEntry::file(on_disk)
                });
            } else if entry.kind.is_dir() {
                let subtree = Box::pin(self.collect_ignored(&entry.path, &on_disk)).await;
                ignored.merge(subtree);
            }
        }
        ignored
    }
}

/// Normalize a listing and split it into sorted directories and files.
fn sorted_entries(entries: Vec<FsEntry>) -> (Vec<PathEntry>, Vec<PathEntry>) {
    let mut entries: Vec<PathEntry> = entries.into_iter().map(PathEntry::from).collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.raw_name.cmp(&b.raw_name)));
    entries.into_iter().partition(|entry| entry.kind.is_dir())
}
