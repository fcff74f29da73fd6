/// Flags for [`normalize`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NormalizeOptions {
    /// Trim leading and trailing spaces.
    pub strip_spaces: bool,
    /// Trim leading and trailing `*`.
    pub strip_wildcards: bool,
    pub lowercase: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_spaces: true,
            strip_wildcards: false,
            lowercase: false,
        }
    }
}

impl NormalizeOptions {
    pub fn lowercase() -> Self {
        Self {
            lowercase: true,
            ..Self::default()
        }
    }
}

/// Canonicalize a path string.
///
/// Stripping happens first, then every run of `/` or `\` collapses to a single
/// `/`, then the result is lowercased. Idempotent for any fixed set of options.
pub fn normalize(path: &str, options: NormalizeOptions) -> String {
    let trimmed = path.trim_matches(|c: char| {
        (options.strip_spaces && c == ' ') || (options.strip_wildcards && c == '*')
    });

    let mut fixed = String::with_capacity(trimmed.len());
    let mut last_was_separator = false;
    for c in trimmed.chars() {
        if c == '/' || c == '\\' {
            if !last_was_separator {
                fixed.push('/');
            }
            last_was_separator = true;
        } else {
            fixed.push(c);
            last_was_separator = false;
        }
    }

    if options.lowercase {
        fixed.to_lowercase()
    } else {
        fixed
    }
}

/// Join a relative parent and a child name with a single `/`.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}/{name}")
    }
}
