use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::core::normalize::{NormalizeOptions, normalize};
use crate::core::translate::translate;
use crate::models::Pattern;

/// Split a wishlist entry into lowercase path segments.
///
/// Leading `/` and `./` are dropped along with empty segments, so
/// `"./Bin//GitterDone/"` becomes `["bin", "gitterdone"]`. A trailing
/// segment made only of `*` is dropped too: `"docs/*"` and `"docs/**"` keep
/// `docs` whole, exactly like `"docs"`.
pub fn segments_for(pattern: &str) -> Vec<String> {
    let normalized = normalize(pattern, NormalizeOptions::lowercase());
    let relative = normalized.strip_prefix("./").unwrap_or(&normalized);
    let mut segments: Vec<String> = relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();

    let only_wildcards = NormalizeOptions {
        strip_wildcards: true,
        ..NormalizeOptions::default()
    };
    while segments.len() > 1
        && segments
            .last()
            .is_some_and(|last| normalize(last, only_wildcards).is_empty())
    {
        segments.pop();
    }
    segments
}

/// A single keep-list entry, split and translated once.
#[derive(Clone, Debug)]
pub struct WishlistEntry {
    /// Normalized form, segments joined with `/`.
    pub source: String,
    pub segments: Vec<Pattern>,
}

impl WishlistEntry {
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

/// The full keep-list, unique by normalized form.
#[derive(Clone, Debug, Default)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// Build from raw entries. Empty and malformed entries are skipped with a
    /// warning; repeated entries are kept once.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut seen = HashSet::new();
        let mut parsed = Vec::with_capacity(entries.len());

        for raw in entries {
            let raw = raw.as_ref();
            let segments = segments_for(raw);
            if segments.is_empty() {
                warn!("Skipping empty wishlist entry {raw:?}");
                continue;
            }
            if segments.iter().any(|s| s == "." || s == "..") {
                warn!("Skipping malformed wishlist entry {raw:?}: relative segments are not allowed");
                continue;
            }

            let source = segments.join("/");
            if !seen.insert(source.clone()) {
                debug!("Wishlist entry {raw:?} repeats {source:?}");
                continue;
            }

            parsed.push(WishlistEntry {
                segments: segments.iter().map(|s| translate(s)).collect(),
                source,
            });
        }

        Self { entries: parsed }
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Segment patterns grouped by the depth they apply at. Depth 0 holds the
    /// first segment of every entry.
    pub fn build_depth_index(&self) -> BTreeMap<usize, BTreeSet<String>> {
        let mut index: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for entry in &self.entries {
            for (depth, segment) in entry.segments.iter().enumerate() {
                index
                    .entry(depth)
                    .or_default()
                    .insert(segment.source().to_owned());
            }
        }
        index
    }

    /// Frame for the resolution root: every entry is alive.
    pub fn root_frame(&self) -> WishlistFrame<'_> {
        WishlistFrame {
            remaining: self
                .entries
                .iter()
                .map(|entry| entry.segments.as_slice())
                .collect(),
        }
    }
}

/// The outcome of entering a subdirectory.
#[derive(Clone, Debug)]
pub enum Descent<'a> {
    /// A literal entry ended on this directory: keep the whole subtree.
    Consumed,
    /// Some entries continue below this directory.
    Continue(WishlistFrame<'a>),
    /// No entry mentions this directory.
    Rejected,
}

/// Wishlist entries still alive at one directory, each reduced to its
/// unconsumed segments. Every slice is non-empty.
#[derive(Clone, Debug)]
pub struct WishlistFrame<'a> {
    remaining: Vec<&'a [Pattern]>,
}

impl<'a> WishlistFrame<'a> {
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Next unconsumed segment of every alive entry.
    pub fn next_segments(&self) -> Vec<&'a str> {
        self.remaining
            .iter()
            .copied()
            .filter_map(|segments| segments.first().map(Pattern::source))
            .collect()
    }

    /// Reduce the frame for a child directory whose lowercase name is `name`.
    ///
    /// A terminal glob segment never consumes a directory, so `"docs/*.md"`
    /// keeps matching files directly under `docs` but none of its folders.
    pub fn descend(&self, name: &str) -> Descent<'a> {
        let mut tails = Vec::new();
        for &segments in &self.remaining {
            let Some((head, tail)) = segments.split_first() else {
                continue;
            };
            if !head.matches(name) {
                continue;
            }
            if tail.is_empty() {
                if !head.is_glob() {
                    return Descent::Consumed;
                }
            } else {
                tails.push(tail);
            }
        }

        if tails.is_empty() {
            Descent::Rejected
        } else {
            Descent::Continue(WishlistFrame { remaining: tails })
        }
    }

    /// The terminal pattern keeping the file named `name`, if any.
    pub fn keeping_file(&self, name: &str) -> Option<&'a Pattern> {
        self.remaining
            .iter()
            .copied()
            .filter_map(|segments| match segments {
                [last] => Some(last),
                _ => None,
            })
            .find(|pattern| pattern.matches(name))
    }
}
