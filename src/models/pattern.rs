use regex::Regex;

/// A wishlist or ignore entry, tagged once at translation time.
#[derive(Clone, Debug)]
pub enum Pattern {
    /// Lowercase literal, compared by equality.
    Literal(String),
    /// Anchored, case-insensitive expression compiled from a glob.
    Glob { source: String, regex: Regex },
    /// Empty or uncompilable input. Matches nothing.
    Never(String),
}

impl Pattern {
    /// Test a lowercase, forward-slash candidate.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Pattern::Literal(literal) => literal == candidate,
            Pattern::Glob { regex, .. } => regex.is_match(candidate),
            Pattern::Never(_) => false,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Pattern::Literal(literal) => literal,
            Pattern::Glob { source, .. } => source,
            Pattern::Never(source) => source,
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, Pattern::Glob { .. })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Literal(a), Pattern::Literal(b)) => a == b,
            (Pattern::Glob { regex: a, .. }, Pattern::Glob { regex: b, .. }) => {
                a.as_str() == b.as_str()
            }
            (Pattern::Never(a), Pattern::Never(b)) => a == b,
            _ => false,
        }
    }
}
