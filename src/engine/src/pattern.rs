//! Wildcard pattern compilation
//!
//! Permission and scope strings use two wildcard tokens: `*` matches any
//! sequence (including the empty one) and `?` matches exactly one character.
//! Everything else is literal. Matching is case-insensitive and always
//! against the full candidate string, never a substring.

use dashmap::DashMap;
use regex::Regex;
use tracing::warn;

/// A compiled wildcard pattern.
///
/// A pattern that failed to compile fails closed: it matches nothing.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Option<Regex>,
}

impl CompiledPattern {
    /// Compile a wildcard string into a matchable pattern.
    ///
    /// All regex metacharacters are escaped except the two wildcard tokens.
    /// On compile failure the condition is logged and the returned pattern
    /// denies everything.
    pub fn compile(pattern: &str) -> Self {
        let mut body = String::with_capacity(pattern.len() * 2);
        let mut buf = [0u8; 4];
        for ch in pattern.chars() {
            match ch {
                '*' => body.push_str(".*"),
                '?' => body.push('.'),
                ch => body.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
            }
        }

        match Regex::new(&format!("(?i)^{}$", body)) {
            Ok(regex) => Self {
                source: pattern.to_string(),
                regex: Some(regex),
            },
            Err(err) => {
                warn!(pattern, %err, "wildcard pattern did not compile, failing closed");
                Self::match_nothing(pattern)
            }
        }
    }

    /// A pattern that matches no candidate at all.
    pub fn match_nothing(source: &str) -> Self {
        Self {
            source: source.to_string(),
            regex: None,
        }
    }

    /// Full-string match against a candidate action or scope string.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(candidate),
            None => false,
        }
    }

    /// The wildcard string this pattern was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Explicit compiled-pattern cache with a bounded lifetime.
///
/// Injected into corpus loading rather than held as ambient global state, so
/// every run (and every test) starts from a fresh cache. Purely a
/// performance optimization: compiling the same string twice is idempotent.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: DashMap<String, CompiledPattern>,
}

impl PatternCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Compile through the cache
    pub fn compile(&self, pattern: &str) -> CompiledPattern {
        if let Some(hit) = self.entries.get(pattern) {
            return hit.clone();
        }
        let compiled = CompiledPattern::compile(pattern);
        self.entries
            .insert(pattern.to_string(), compiled.clone());
        compiled
    }

    /// Number of distinct patterns compiled so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_star_matches_any_sequence() {
        let pattern = CompiledPattern::compile("iam:Create*");
        assert!(pattern.matches("iam:CreateRole"));
        assert!(pattern.matches("iam:Create"));
        assert!(!pattern.matches("iam:Delete"));
    }

    #[test]
    fn test_full_wildcard_matches_everything() {
        let pattern = CompiledPattern::compile("*");
        assert!(pattern.matches(""));
        assert!(pattern.matches("Sql/servers/read"));
        assert!(pattern.matches("/subscriptions/sub1/resourceGroups/rg1"));
    }

    #[test]
    fn test_question_mark_matches_exactly_one_character() {
        let pattern = CompiledPattern::compile("Sql/servers/r?ad");
        assert!(pattern.matches("Sql/servers/read"));
        assert!(!pattern.matches("Sql/servers/rad"));
        assert!(!pattern.matches("Sql/servers/rread"));
    }

    #[test]
    fn test_no_substring_matching() {
        let pattern = CompiledPattern::compile("Sql/servers/read");
        assert!(pattern.matches("Sql/servers/read"));
        assert!(!pattern.matches("Sql/servers/read/extra"));
        assert!(!pattern.matches("prefix/Sql/servers/read"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let pattern = CompiledPattern::compile("microsoft.sql/servers/READ");
        assert!(pattern.matches("Microsoft.Sql/servers/read"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let pattern = CompiledPattern::compile("a.b+c(d)");
        assert!(pattern.matches("a.b+c(d)"));
        assert!(!pattern.matches("aXb+c(d)"));
    }

    #[test]
    fn test_match_nothing_denies_everything() {
        let pattern = CompiledPattern::match_nothing("broken[");
        assert!(!pattern.matches(""));
        assert!(!pattern.matches("broken["));
        assert!(!pattern.matches("anything"));
        assert_eq!(pattern.source(), "broken[");
    }

    #[test]
    fn test_cache_deduplicates_and_is_equivalent() {
        let cache = PatternCache::new();
        let first = cache.compile("iam:Create*");
        let second = cache.compile("iam:Create*");
        assert_eq!(cache.len(), 1);
        assert_eq!(
            first.matches("iam:CreateRole"),
            second.matches("iam:CreateRole")
        );

        cache.compile("iam:Delete*");
        assert_eq!(cache.len(), 2);
    }

    proptest! {
        // A literal pattern (no wildcards) matches exactly itself, never an
        // extension of itself.
        #[test]
        fn literal_patterns_full_match_only(s in "[a-zA-Z0-9:/._-]{0,40}") {
            let pattern = CompiledPattern::compile(&s);
            prop_assert!(pattern.matches(&s));
            let extended = format!("{}x", s);
            prop_assert!(!pattern.matches(&extended));
        }
    }
}
