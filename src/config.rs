//! TOML configuration for ignore-file generation and depot sync.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::resolve::{Precedence, ResolveOptions};
use crate::core::wishlist::segments_for;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILENAME: &str = "gitterdone.toml";

/// Patterns that cover typical C#, C++ and Python projects.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/packages/*",
    "*.[Dd][Ss]_[Ss]tore",
    "*.a",
    "*.app",
    "*.aps",
    "*.bin",
    "*.Cache",
    "*.cachefile",
    "*.cover",
    "*.csproj.user",
    "*.dll",
    "*.dylib",
    "*.egg",
    "*.egg-info/",
    "*.exe",
    "*.gch",
    "*.ilk",
    "*.lastbuildstate",
    "*.lib",
    "*.log",
    "*.manifest",
    "*.ncb",
    "*.nupkg",
    "*.o",
    "*.obj",
    "*.opensdf",
    "*.orig",
    "*.pch",
    "*.pdb",
    "*.pfx",
    "*.pgc",
    "*.pgd",
    "*.pidb",
    "*.psess",
    "*.publishsettings",
    "*.py[cod]",
    "*.rsp",
    "*.sbr",
    "*.scc",
    "*.sdf",
    "*.so",
    "*.suo",
    "*.tlb",
    "*.tlh",
    "*.tli",
    "*.tmp",
    "*.tmp_proj",
    "*.user",
    "*.vs*",
    "*_i.c",
    "*_p.c",
    "*ipch/",
    "*~*",
    ".cache",
    ".coverage",
    ".eggs/",
    ".env",
    ".mypy_cache/",
    ".p4*",
    ".pytest_cache/",
    ".tox/",
    ".venv",
    ".vscode/",
    "[Dd]ebug/",
    "[Oo]bj/",
    "[Rr]elease/",
    "_ReSharper*/",
    "coverage.xml",
    "Desktop.ini",
    "dist/",
    "eggs/",
    "ehthumbs.db",
    "env/",
    "GitterDoneLogs",
    "htmlcov/",
    "lib64/",
    "nosetests.xml",
    "Thumbs.db",
    "venv/",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ignore: IgnoreSettings,
    pub depot: DepotSettings,
}

/// Inputs of ignore-file generation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IgnoreSettings {
    /// Name of the generated file, written at the root.
    pub filename: String,
    /// Paths that must never be ignored.
    pub wishlist: Vec<String>,
    /// Patterns that are always ignored, also written verbatim.
    pub patterns: Vec<String>,
    /// Let global patterns override the wishlist.
    pub strict: bool,
}

impl Default for IgnoreSettings {
    fn default() -> Self {
        Self {
            filename: ".gitignore".to_owned(),
            wishlist: Vec::new(),
            patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            strict: false,
        }
    }
}

impl IgnoreSettings {
    /// The wishlist plus the ignore file itself, so it never ignores itself.
    pub fn effective_wishlist(&self) -> Vec<String> {
        let mut wishlist = self.wishlist.clone();
        let filename = segments_for(&self.filename);
        if !wishlist.iter().any(|entry| segments_for(entry) == filename) {
            wishlist.push(self.filename.clone());
        }
        wishlist
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            precedence: if self.strict {
                Precedence::IgnoreFirst
            } else {
                Precedence::WishlistFirst
            },
        }
    }
}

/// Centralized-VCS settings used by changelist sync.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DepotSettings {
    /// Depot command-line executable.
    pub tool: String,
    /// Branch kept in sync with the depot.
    pub trunk_branch: String,
    pub remote: String,
    /// Files never opened in a changelist even when modified.
    pub ignored_files: Vec<String>,
}

impl Default for DepotSettings {
    fn default() -> Self {
        Self {
            tool: "p4".to_owned(),
            trunk_branch: "master".to_owned(),
            remote: "origin".to_owned(),
            ignored_files: vec![".gitignore".to_owned(), DEFAULT_CONFIG_FILENAME.to_owned()],
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit`, or `<root>/gitterdone.toml` when present, or the
    /// built-in defaults.
    pub async fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let (path, required): (PathBuf, bool) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (root.join(DEFAULT_CONFIG_FILENAME), false),
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                info!("Loading configuration from '{}'", path.display());
                Self::from_toml(&text)
                    .with_context(|| format!("Failed to load '{}'", path.display()))
            }
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                info!("No configuration at '{}', using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read '{}'", path.display()))
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ignore.filename.trim().is_empty() {
            return Err(ConfigError::EmptyIgnoreFilename);
        }

        let mut seen = HashSet::new();
        for entry in &self.ignore.wishlist {
            let key = segments_for(entry).join("/");
            if key.is_empty() {
                continue;
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateWishlistEntry(entry.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml(
            r#"
            [ignore]
            filename = ".hgignore"
            wishlist = ["bin/tool", "readme.md"]
            patterns = ["*.log"]
            strict = true

            [depot]
            trunk_branch = "main"
            ignored_files = ["local.cfg"]
            "#,
        )
        .unwrap();

        assert_eq!(config.ignore.filename, ".hgignore");
        assert_eq!(config.ignore.wishlist, vec!["bin/tool", "readme.md"]);
        assert_eq!(config.ignore.patterns, vec!["*.log"]);
        assert_eq!(
            config.ignore.resolve_options().precedence,
            Precedence::IgnoreFirst
        );
        assert_eq!(config.depot.trunk_branch, "main");
        assert_eq!(config.depot.tool, "p4");
        assert_eq!(config.depot.ignored_files, vec!["local.cfg"]);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ignore.filename, ".gitignore");
        assert!(config.ignore.patterns.contains(&"*.log".to_owned()));
        assert_eq!(
            config.ignore.resolve_options().precedence,
            Precedence::WishlistFirst
        );
    }

    #[test]
    fn duplicate_wishlist_entries_are_rejected() {
        let config = Config {
            ignore: IgnoreSettings {
                wishlist: vec!["Bin/Tool".to_owned(), "./bin/tool/".to_owned()],
                ..IgnoreSettings::default()
            },
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateWishlistEntry("./bin/tool/".to_owned()))
        );

        let err = Config::from_toml("[ignore]\nwishlist = [\"a\", \"A\"]").unwrap_err();
        assert!(format!("{err:#}").contains("more than once"));
    }

    #[test]
    fn empty_filename_is_rejected() {
        let err = Config::from_toml("[ignore]\nfilename = \" \"").unwrap_err();
        assert!(format!("{err:#}").contains("must not be empty"));
    }

    #[test]
    fn effective_wishlist_keeps_the_ignore_file() {
        let settings = IgnoreSettings {
            wishlist: vec!["src".to_owned()],
            ..IgnoreSettings::default()
        };
        assert_eq!(settings.effective_wishlist(), vec!["src", ".gitignore"]);

        let settings = IgnoreSettings {
            wishlist: vec!["/.GitIgnore".to_owned()],
            ..IgnoreSettings::default()
        };
        assert_eq!(settings.effective_wishlist(), vec!["/.GitIgnore"]);
    }

    #[tokio::test]
    async fn discover_prefers_explicit_then_root_file_then_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::discover(temp.path(), None).await.unwrap();
        assert_eq!(config, Config::default());

        std::fs::write(
            temp.path().join(DEFAULT_CONFIG_FILENAME),
            "[ignore]\nwishlist = [\"src\"]\n",
        )
        .unwrap();
        let config = Config::discover(temp.path(), None).await.unwrap();
        assert_eq!(config.ignore.wishlist, vec!["src"]);

        let missing = temp.path().join("missing.toml");
        let err = Config::discover(temp.path(), Some(&missing)).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
