use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::IgnoreSettings;
use crate::core::render::write_ignore_file;
use crate::core::resolve::resolve_with;
use crate::core::translate::IgnoreRules;
use crate::core::wishlist::Wishlist;
use crate::fs::FileSystem;

/// Resolve the ignore set under `root` and overwrite `<root>/<filename>`.
///
/// Returns false when the root is not a readable directory or the file
/// cannot be written. Failures are logged.
pub async fn generate_ignore_file<F: FileSystem>(
    fs: &F,
    root: &Path,
    settings: &IgnoreSettings,
) -> bool {
    match try_generate(fs, root, settings).await {
        Ok(count) => {
            info!(
                "Wrote '{}' with {count} resolved entries",
                root.join(&settings.filename).display()
            );
            true
        }
        Err(err) => {
            error!("Failed to generate '{}': {err:#}", settings.filename);
            false
        }
    }
}

async fn try_generate<F: FileSystem>(
    fs: &F,
    root: &Path,
    settings: &IgnoreSettings,
) -> Result<usize> {
    let wishlist = Wishlist::parse(&settings.effective_wishlist());
    let rules = IgnoreRules::new(&settings.patterns);

    let ignored = resolve_with(fs, root, &wishlist, &rules, &settings.resolve_options())
        .await?
        .into_vec();

    let mut contents = Vec::new();
    write_ignore_file(&mut contents, &settings.patterns, &ignored)?;

    let target = root.join(&settings.filename);
    tokio::fs::write(&target, contents)
        .await
        .with_context(|| format!("cannot write {}", target.display()))?;

    Ok(ignored.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::HEADER;
    use crate::fs::{MockFileSystem, RealFileSystem};
    use std::fs;
    use tempfile::TempDir;

    fn settings(wishlist: &[&str], patterns: &[&str]) -> IgnoreSettings {
        IgnoreSettings {
            wishlist: wishlist.iter().map(|s| (*s).to_owned()).collect(),
            patterns: patterns.iter().map(|s| (*s).to_owned()).collect(),
            ..IgnoreSettings::default()
        }
    }

    #[tokio::test]
    async fn writes_ignore_file_for_real_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("Project/Src")).unwrap();
        fs::create_dir_all(root.join("Other")).unwrap();
        fs::write(root.join("Project/Notes.md"), "notes").unwrap();
        fs::write(root.join("Project/Src/main.c"), "int main;").unwrap();
        fs::write(root.join("Project/Src/main.o"), "").unwrap();
        fs::write(root.join("readme.md"), "hi").unwrap();

        let ok = generate_ignore_file(
            &RealFileSystem,
            root,
            &settings(&["project/src"], &["*.o"]),
        )
        .await;
        assert!(ok);

        let written = fs::read_to_string(root.join(".gitignore")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                HEADER,
                "*.o",
                "",
                "# Resolved from wishlist",
                "/Other/",
                "/Project/Notes.md",
                "/readme.md",
            ]
        );
    }

    #[tokio::test]
    async fn ignore_file_never_ignores_itself() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join(".gitignore"), "stale").unwrap();
        fs::write(root.join("junk.txt"), "").unwrap();

        assert!(generate_ignore_file(&RealFileSystem, root, &settings(&[], &[])).await);

        let written = fs::read_to_string(root.join(".gitignore")).unwrap();
        assert!(written.contains("/junk.txt"));
        assert!(!written.contains("/.gitignore"));
        assert!(!written.contains("stale"));
    }

    #[tokio::test]
    async fn uses_mock_listing_and_configured_filename() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let mock = MockFileSystem::with_tree(root, &["keep/a.txt", "drop/b.txt"]);
        let settings = IgnoreSettings {
            filename: ".hgignore".to_owned(),
            ..settings(&["keep"], &[])
        };

        assert!(generate_ignore_file(&mock, root, &settings).await);

        let written = fs::read_to_string(root.join(".hgignore")).unwrap();
        assert!(written.ends_with("# Resolved from wishlist\n/drop/\n"));
        assert_eq!(mock.calls(), vec![root.to_path_buf()]);
    }

    #[tokio::test]
    async fn fails_for_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let ok = generate_ignore_file(&RealFileSystem, &missing, &settings(&[], &[])).await;
        assert!(!ok);
        assert!(!missing.join(".gitignore").exists());
    }
}
