//! Pattern inference for near-identical strings
//!
//! Wildcard responses often differ only in an embedded random token
//! (`index-8f3a.html` vs `index-c21b.html`). [`infer_pattern`] keeps the
//! shared prefix and suffix literally and replaces the differing middle
//! with `.*`, producing an anchored regular expression that matches both
//! inputs and anything else of the same shape.

use std::fmt;

use regex::Regex;

use crate::error::DiffResult;

const WILDCARD: &str = ".*";

// =============================================================================
// MatchPattern
// =============================================================================

/// Anchored `^prefix(.*)?suffix$` expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchPattern {
    prefix: String,
    suffix: String,
    wildcard: bool,
    source: String,
}

impl MatchPattern {
    /// Pattern matching exactly `literal`.
    pub fn literal(literal: &str) -> Self {
        Self::build(literal, false, "")
    }

    fn build(prefix: &str, wildcard: bool, suffix: &str) -> Self {
        let mut source = String::with_capacity(prefix.len() + suffix.len() + 6);
        source.push('^');
        source.push_str(&regex::escape(prefix));
        if wildcard {
            source.push_str(WILDCARD);
            source.push_str(&regex::escape(suffix));
        }
        source.push('$');

        Self {
            prefix: prefix.to_owned(),
            suffix: if wildcard { suffix.to_owned() } else { String::new() },
            wildcard,
            source,
        }
    }

    /// Unescaped literal prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Unescaped literal suffix (empty without a wildcard)
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The regular expression source, e.g. `^a.*\.php$`
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compile into a [`Regex`].
    pub fn to_regex(&self) -> DiffResult<Regex> {
        Ok(Regex::new(&self.source)?)
    }

    /// Match without compiling a regex.
    pub fn is_match(&self, candidate: &str) -> bool {
        if !self.wildcard {
            return candidate == self.prefix;
        }
        candidate.len() >= self.prefix.len() + self.suffix.len()
            && candidate.starts_with(&self.prefix)
            && candidate.ends_with(&self.suffix)
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// =============================================================================
// Inference
// =============================================================================

/// Derive a pattern capturing the invariant prefix and suffix of `a` and `b`.
///
/// - identical strings give the anchored literal (`^same$`)
/// - otherwise the common prefix, a wildcard, then the common suffix
///
/// The suffix is bounded so it never overlaps the prefix inside the
/// shorter string. When one input is a strict prefix of the other the
/// result is that prefix with a trailing wildcard, not a literal:
/// `("abc", "abcd")` gives `^abc.*$`, which also matches `abcX`. The
/// result therefore always matches both inputs.
///
/// ```
/// use dyndiff::infer_pattern;
///
/// let pattern = infer_pattern("abc", "abcd");
/// assert_eq!(pattern.as_str(), "^abc.*$");
/// assert!(pattern.is_match("abc") && pattern.is_match("abcd"));
/// ```
pub fn infer_pattern(a: &str, b: &str) -> MatchPattern {
    if a == b {
        return MatchPattern::literal(a);
    }

    let prefix_len: usize = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    let prefix = &a[..prefix_len];

    // scanning only the remainders keeps the suffix clear of the prefix
    let suffix_len: usize = a[prefix_len..]
        .chars()
        .rev()
        .zip(b[prefix_len..].chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    let suffix = &a[a.len() - suffix_len..];

    MatchPattern::build(prefix, true, suffix)
}

// =============================================================================
// PatternSet
// =============================================================================

/// Reusable exclusion filter built from inferred patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<(MatchPattern, Regex)>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, pattern: &MatchPattern) -> Option<usize> {
        self.patterns.iter().position(|(p, _)| p == pattern)
    }

    /// Add a pattern. Returns false if it was already present.
    pub fn insert(&mut self, pattern: MatchPattern) -> DiffResult<bool> {
        if self.position(&pattern).is_some() {
            return Ok(false);
        }
        let regex = pattern.to_regex()?;
        self.patterns.push((pattern, regex));
        Ok(true)
    }

    /// Infer a pattern from two sample strings and add it.
    pub fn learn(&mut self, a: &str, b: &str) -> DiffResult<&MatchPattern> {
        let pattern = infer_pattern(a, b);
        let index = match self.position(&pattern) {
            Some(index) => index,
            None => {
                let regex = pattern.to_regex()?;
                self.patterns.push((pattern, regex));
                self.patterns.len() - 1
            }
        };
        Ok(&self.patterns[index].0)
    }

    /// True if any pattern matches `candidate`.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|(_, re)| re.is_match(candidate))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchPattern> {
        self.patterns.iter().map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_infer_shared_extension() {
        let pattern = infer_pattern("add.php", "abc.php");
        assert_eq!(pattern.as_str(), "^a.*\\.php$");
        assert_eq!(pattern.prefix(), "a");
        assert_eq!(pattern.suffix(), ".php");
        assert!(pattern.has_wildcard());
    }

    #[test]
    fn test_infer_identical() {
        let pattern = infer_pattern("same", "same");
        assert_eq!(pattern.as_str(), "^same$");
        assert!(!pattern.has_wildcard());
        assert_eq!(pattern.to_string(), "^same$");
    }

    #[test]
    fn test_infer_escapes_literals() {
        let pattern = infer_pattern("a+b(1).txt", "a+b(2).txt");
        assert_eq!(pattern.as_str(), "^a\\+b\\(.*\\)\\.txt$");
        let re = pattern.to_regex().unwrap();
        assert!(re.is_match("a+b(1).txt"));
        assert!(re.is_match("a+b(999).txt"));
        assert!(!re.is_match("aab(1).txt"));
    }

    #[test]
    fn test_infer_random_token() {
        let pattern = infer_pattern("index-8f3a2c.html", "index-c21b9e.html");
        assert_eq!(pattern.prefix(), "index-");
        assert_eq!(pattern.suffix(), ".html");
        assert!(pattern.is_match("index-000000.html"));
        assert!(!pattern.is_match("about-000000.html"));
    }

    #[test]
    fn test_infer_no_common_parts() {
        let pattern = infer_pattern("abc", "xyz");
        assert_eq!(pattern.as_str(), "^.*$");
    }

    #[test]
    fn test_infer_prefix_of_other() {
        let pattern = infer_pattern("abc", "abcd");
        assert_eq!(pattern.as_str(), "^abc.*$");
        assert!(pattern.is_match("abc"));
        assert!(pattern.is_match("abcd"));
        assert!(pattern.has_wildcard());
        assert_eq!(pattern.suffix(), "");
    }

    #[test]
    fn test_infer_suffix_does_not_overlap_prefix() {
        // naive backward scan would yield ^a.*ab$, which rejects "ab"
        let pattern = infer_pattern("aab", "ab");
        let re = pattern.to_regex().unwrap();
        assert!(re.is_match("aab"));
        assert!(re.is_match("ab"));

        let pattern = infer_pattern("ab", "abab");
        let re = pattern.to_regex().unwrap();
        assert!(re.is_match("ab"));
        assert!(re.is_match("abab"));
    }

    #[test]
    fn test_infer_multibyte() {
        let pattern = infer_pattern("café-1.txt", "café-22.txt");
        assert_eq!(pattern.prefix(), "café-");
        assert_eq!(pattern.suffix(), ".txt");
        assert!(pattern.is_match("café-333.txt"));
    }

    #[test]
    fn test_literal_pattern_matching() {
        let pattern = MatchPattern::literal("robots.txt");
        assert!(pattern.is_match("robots.txt"));
        assert!(!pattern.is_match("robots.txt.bak"));
        assert!(!pattern.to_regex().unwrap().is_match("robotsXtxt"));
    }

    proptest! {
        #[test]
        fn prop_infer_matches_both_inputs(a in "\\PC{0,20}", b in "\\PC{0,20}") {
            let pattern = infer_pattern(&a, &b);
            let re = pattern.to_regex().unwrap();
            prop_assert!(re.is_match(&a), "{} should match {:?}", pattern, a);
            prop_assert!(re.is_match(&b), "{} should match {:?}", pattern, b);
            prop_assert!(pattern.is_match(&a));
            prop_assert!(pattern.is_match(&b));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // PatternSet
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_pattern_set_learn_and_match() {
        let mut set = PatternSet::new();
        assert!(set.is_empty());

        let learned = set.learn("wc-1a2b.php", "wc-9z8y.php").unwrap().clone();
        assert_eq!(learned.prefix(), "wc-");
        assert_eq!(set.len(), 1);

        assert!(set.is_match("wc-anything.php"));
        assert!(!set.is_match("admin.php"));
    }

    #[test]
    fn test_pattern_set_deduplicates() {
        let mut set = PatternSet::new();
        assert!(set.insert(infer_pattern("add.php", "abc.php")).unwrap());
        assert!(!set.insert(infer_pattern("add.php", "abc.php")).unwrap());
        set.learn("add.php", "abc.php").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().count(), 1);
    }
}
