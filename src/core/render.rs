use std::collections::HashSet;
use std::io::{self, Write};

use crate::models::{IgnoreEntry, IgnoreKind};

pub const HEADER: &str = "# Generated by gitterdone. Manual edits will be overwritten.";
pub const RESOLVED_SECTION: &str = "# Resolved from wishlist";

/// Write the ignore file: base patterns verbatim, then the resolved entries
/// anchored at the root with their on-disk case, directories with a
/// trailing `/`.
pub fn write_ignore_file<W: Write, S: AsRef<str>>(
    writer: &mut W,
    base_patterns: &[S],
    entries: &[IgnoreEntry],
) -> io::Result<()> {
    writeln!(writer, "{HEADER}")?;

    let mut written = HashSet::new();
    for pattern in base_patterns {
        let line = pattern.as_ref().trim();
        if line.is_empty() || !written.insert(line.to_owned()) {
            continue;
        }
        writeln!(writer, "{line}")?;
    }

    if entries.is_empty() {
        return Ok(());
    }

    write!(writer, "\n{RESOLVED_SECTION}\n")?;
    for entry in entries {
        let line = rendered_entry(entry);
        if written.insert(line.clone()) {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
    }

    Ok(())
}

fn rendered_entry(entry: &IgnoreEntry) -> String {
    let path = escape_path(&entry.on_disk);
    match entry.kind {
        IgnoreKind::Directory => format!("/{path}/"),
        IgnoreKind::File => format!("/{path}"),
    }
}

/// Backslash-escape characters git would read as pattern syntax, including
/// trailing spaces, so the line matches the path literally.
fn escape_path(path: &str) -> String {
    let body = path.trim_end_matches(' ');
    let trailing_spaces = path.len() - body.len();

    let mut escaped = String::with_capacity(path.len() + trailing_spaces);
    for c in body.chars() {
        if matches!(c, '[' | '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    for _ in 0..trailing_spaces {
        escaped.push_str("\\ ");
    }
    escaped
}
