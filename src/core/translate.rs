use regex::RegexBuilder;
use tracing::warn;

use crate::core::normalize::{NormalizeOptions, normalize};
use crate::models::{EntryKind, Pattern};

/// Translate a wishlist or ignore entry into a tagged [`Pattern`].
///
/// Entries without `*`, `?` or `[` are literals. Everything else compiles to
/// an anchored, case-insensitive expression. Empty input, or input that does
/// not compile, yields [`Pattern::Never`].
pub fn translate(pattern: &str) -> Pattern {
    let normalized = normalize(pattern, NormalizeOptions::default());
    if normalized.is_empty() {
        warn!("Empty pattern {pattern:?} will match nothing");
        return Pattern::Never(normalized);
    }

    if !normalized.contains(['*', '?', '[']) {
        return Pattern::Literal(normalized.to_lowercase());
    }

    let expression = glob_to_regex(&normalized);
    match RegexBuilder::new(&expression)
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Pattern::Glob {
            source: normalized,
            regex,
        },
        Err(err) => {
            warn!("Pattern {normalized:?} is not a valid expression and will match nothing: {err}");
            Pattern::Never(normalized)
        }
    }
}

/// Convert a glob pattern to a regex string.
///
/// `**/` matches any number of leading directories, `*` and `**` match any
/// sequence, `?` a single character and `.` a literal dot. Other characters
/// pass through untouched, so `[Dd]ebug` keeps its character class.
fn glob_to_regex(pattern: &str) -> String {
    let mut regex_pattern = String::with_capacity(pattern.len() * 2 + 2);
    regex_pattern.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                let mut recursive = false;
                while chars.peek() == Some(&'*') {
                    chars.next();
                    recursive = true;
                }
                if recursive && chars.peek() == Some(&'/') {
                    chars.next();
                    regex_pattern.push_str("(?:.*/)?");
                } else {
                    regex_pattern.push_str(".*");
                }
            }
            '?' => regex_pattern.push('.'),
            '.' => regex_pattern.push_str("\\."),
            _ => regex_pattern.push(c),
        }
    }

    regex_pattern.push('$');
    regex_pattern
}

/// One entry of the always-ignore list.
#[derive(Clone, Debug)]
pub struct IgnorePattern {
    pub pattern: Pattern,
    /// Written with a trailing `/`.
    pub directory_only: bool,
    /// Written with a leading `/`: only the root-relative path is tested.
    pub anchored: bool,
}

impl IgnorePattern {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = normalize(raw, NormalizeOptions::default());
        let directory_only = trimmed.ends_with('/');
        let anchored = trimmed.starts_with('/');
        let body = trimmed.trim_matches('/');
        if body.is_empty() {
            return None;
        }

        Some(Self {
            pattern: translate(body),
            directory_only,
            anchored,
        })
    }

    /// `name` and `relative` must already be lowercase and `/`-separated.
    pub fn matches(&self, name: &str, relative: &str, kind: EntryKind) -> bool {
        if self.directory_only && !kind.is_dir() {
            return false;
        }
        if self.anchored {
            return self.pattern.matches(relative);
        }
        self.pattern.matches(name) || self.pattern.matches(relative)
    }
}

/// The global ignore list, compiled once and shared by every recursion level.
#[derive(Clone, Debug, Default)]
pub struct IgnoreRules {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreRules {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| {
                let parsed = IgnorePattern::parse(raw.as_ref());
                if parsed.is_none() {
                    warn!("Skipping empty ignore pattern {:?}", raw.as_ref());
                }
                parsed
            })
            .collect();
        Self { patterns }
    }

    /// First rule matching the entry, if any.
    pub fn matching(&self, name: &str, relative: &str, kind: EntryKind) -> Option<&IgnorePattern> {
        self.patterns
            .iter()
            .find(|rule| rule.matches(name, relative, kind))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_entries_are_tagged_and_lowercased() {
        let pattern = translate(" Bin/GitterDone ");
        assert_eq!(pattern, Pattern::Literal("bin/gitterdone".to_owned()));
        assert!(pattern.matches("bin/gitterdone"));
        assert!(!pattern.matches("bin/gitterdone2"));
    }

    #[test]
    fn empty_pattern_matches_nothing() {
        let pattern = translate("   ");
        assert!(matches!(pattern, Pattern::Never(_)));
        assert!(!pattern.matches(""));
        assert!(!pattern.matches("anything"));
    }

    #[test]
    fn invalid_expression_matches_nothing() {
        let pattern = translate("*(oops");
        assert!(matches!(pattern, Pattern::Never(_)));
        assert!(!pattern.matches("x(oops"));
    }

    #[test]
    fn extension_suffix_is_anchored_at_end() {
        let pattern = translate("*.log");
        assert!(pattern.is_glob());
        assert!(pattern.matches("a.log"));
        assert!(pattern.matches("dir/b.log"));
        assert!(!pattern.matches("a.log.bak"));
        assert!(!pattern.matches("alog"));
    }

    #[test]
    fn trailing_star_is_greedy() {
        let pattern = translate("*.config*");
        assert!(pattern.matches("app.config"));
        assert!(pattern.matches("app.config.bak"));
        assert!(!pattern.matches("appconfig"));
    }

    #[test]
    fn dots_are_literal() {
        let pattern = translate("test.t?t");
        assert!(pattern.matches("test.txt"));
        assert!(!pattern.matches("testxtxt"));
    }

    #[test]
    fn double_star_crosses_directories() {
        let pattern = translate("**/packages/*");
        assert!(pattern.matches("packages/a.nupkg"));
        assert!(pattern.matches("src/deep/packages/lib/a.dll"));
        assert!(!pattern.matches("src/packagesx/a"));
    }

    #[test]
    fn character_classes_pass_through() {
        let pattern = translate("[Dd]ebug");
        assert!(pattern.is_glob());
        assert!(pattern.matches("debug"));
        assert!(pattern.matches("Debug"));

        let pattern = translate("*.py[cod]");
        assert!(pattern.matches("mod.pyc"));
        assert!(!pattern.matches("mod.py"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let pattern = translate("*.Cache");
        assert!(pattern.matches("build.cache"));
        assert!(pattern.matches("BUILD.CACHE"));
    }

    #[test]
    fn directory_only_rules_skip_files() {
        let rule = IgnorePattern::parse("dist/").unwrap();
        assert!(rule.directory_only);
        assert!(rule.matches("dist", "dist", EntryKind::Directory));
        assert!(!rule.matches("dist", "dist", EntryKind::File));
    }

    #[test]
    fn anchored_rules_only_test_the_relative_path() {
        let rule = IgnorePattern::parse("/build*").unwrap();
        assert!(rule.anchored);
        assert!(rule.matches("build_x64", "build_x64", EntryKind::Directory));
        assert!(!rule.matches("build_x64", "src/build_x64", EntryKind::Directory));
    }

    #[test]
    fn rules_report_the_first_match() {
        let rules = IgnoreRules::new(&["", "*.tmp", "cache.*"]);
        assert_eq!(rules.len(), 2);
        let rule = rules
            .matching("cache.tmp", "project/cache.tmp", EntryKind::File)
            .unwrap();
        assert_eq!(rule.pattern.source(), "*.tmp");
        assert!(
            rules
                .matching("main.rs", "src/main.rs", EntryKind::File)
                .is_none()
        );
    }
}
