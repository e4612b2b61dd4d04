//! Similarity scoring for text, attribute sets and single elements
//!
//! Every score is a real number in `[0, 1]` where 1 means identical under
//! the metric. Scores are heuristics: they only need to be symmetric for
//! plain text, honor the identity/emptiness laws, and drop as content
//! diverges.
//!
//! # Text
//!
//! Text uses a quick ratio: the size of the character multiset
//! intersection, doubled and divided by the combined length. It is an
//! upper bound of the classic matching-blocks ratio and runs in linear
//! time, which matters when whole page bodies are compared.
//!
//! # Elements
//!
//! ```text
//! element = (w_text·text + w_name·name + w_attrs·attrs) / (w_text + w_name + w_attrs)
//! ```

use rustc_hash::FxHashMap;

use crate::attr::Attrs;
use crate::node::Element;

/// Default weight of the text score in [`element_similarity`]
pub const DEFAULT_TEXT_WEIGHT: u32 = 2;
/// Default weight of the tag name score in [`element_similarity`]
pub const DEFAULT_NAME_WEIGHT: u32 = 3;
/// Default weight of the attribute score in [`element_similarity`]
pub const DEFAULT_ATTRS_WEIGHT: u32 = 1;
/// Default amount subtracted for each key present on only one side
pub const DEFAULT_MISSING_KEY_PENALTY: f64 = 0.5;

// =============================================================================
// Configuration
// =============================================================================

/// Relative weights of the element sub-scores.
///
/// Tag name carries the strongest structural signal, attributes the most
/// per-request noise (nonces, generated ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub text: u32,
    pub name: u32,
    pub attrs: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_WEIGHT,
            name: DEFAULT_NAME_WEIGHT,
            attrs: DEFAULT_ATTRS_WEIGHT,
        }
    }
}

impl Weights {
    pub fn new(text: u32, name: u32, attrs: u32) -> Self {
        Self { text, name, attrs }
    }

    /// Sum of all weights, widened so that no combination overflows
    pub fn total(&self) -> u64 {
        u64::from(self.text) + u64::from(self.name) + u64::from(self.attrs)
    }
}

/// Scoring policy shared by the element and attribute scorers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreConfig {
    /// Weights for [`element_similarity`]
    pub weights: Weights,
    /// Penalty per key present in only one attribute set
    pub missing_key_penalty: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            missing_key_penalty: DEFAULT_MISSING_KEY_PENALTY,
        }
    }
}

impl ScoreConfig {
    /// Override the element weights.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    /// Override the missing-key penalty.
    pub fn with_missing_key_penalty(mut self, penalty: f64) -> Self {
        self.missing_key_penalty = penalty;
        self
    }
}

// =============================================================================
// Text
// =============================================================================

/// Quick approximate similarity of two texts.
///
/// Both empty gives 1, exactly one empty gives 0, equal texts give 1
/// without further work.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut available: FxHashMap<char, usize> = FxHashMap::default();
    let mut len_b = 0usize;
    for ch in b.chars() {
        *available.entry(ch).or_insert(0) += 1;
        len_b += 1;
    }

    let mut len_a = 0usize;
    let mut matches = 0usize;
    for ch in a.chars() {
        len_a += 1;
        if let Some(count) = available.get_mut(&ch) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    (2 * matches) as f64 / (len_a + len_b) as f64
}

// =============================================================================
// Attributes
// =============================================================================

/// Similarity of two attribute sets with the default penalty.
pub fn attrs_similarity(base: &Attrs, test: &Attrs) -> f64 {
    attrs_similarity_with(base, test, DEFAULT_MISSING_KEY_PENALTY)
}

/// Similarity of two attribute sets.
///
/// Shared keys add the text similarity of their values; keys present on
/// only one side subtract `penalty`. The sum is floored at 0 and divided
/// by the number of *baseline* keys, so the baseline defines the expected
/// shape and extra test keys can only lower the score. The result is
/// clamped to `[0, 1]` for any penalty.
pub fn attrs_similarity_with(base: &Attrs, test: &Attrs, penalty: f64) -> f64 {
    match (base.is_empty(), test.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let mut score = 0.0;
    for (key, base_value) in base.iter() {
        match test.get(key) {
            Some(test_value) => score += text_similarity(base_value, test_value),
            None => score -= penalty,
        }
    }
    let extra = test.keys().filter(|key| !base.contains(key)).count();
    score -= penalty * extra as f64;

    (score.max(0.0) / base.len() as f64).min(1.0)
}

// =============================================================================
// Elements
// =============================================================================

/// Similarity of two single elements with the default weights.
pub fn element_similarity(base: &Element, test: &Element) -> f64 {
    element_similarity_with(base, test, &ScoreConfig::default())
}

/// Weighted combination of text, tag name and attribute similarity.
///
/// Returns 0 when every weight is zero.
pub fn element_similarity_with(base: &Element, test: &Element, config: &ScoreConfig) -> f64 {
    element_similarity_texts(base, test, &base.text_content(), &test.text_content(), config)
}

/// [`element_similarity_with`] over already collected text content.
///
/// `base_text` and `test_text` must be the `text_content()` of `base` and
/// `test`.
pub(crate) fn element_similarity_texts(
    base: &Element,
    test: &Element,
    base_text: &str,
    test_text: &str,
    config: &ScoreConfig,
) -> f64 {
    let weights = config.weights;
    let total = weights.total();
    if total == 0 {
        return 0.0;
    }

    let text = text_similarity(base_text, test_text);
    let name = text_similarity(&base.tag, &test.tag);
    let attrs = attrs_similarity_with(&base.attrs, &test.attrs, config.missing_key_penalty);

    (weights.text as f64 * text + weights.name as f64 * name + weights.attrs as f64 * attrs)
        / total as f64
}

/// Similarity of the direct child tag sequences.
///
/// No children on either side gives 1; different child counts give 0;
/// otherwise the mean text similarity of the tag names taken pairwise.
pub fn children_similarity(base: &Element, test: &Element) -> f64 {
    let base_count = base.element_count();
    let test_count = test.element_count();
    if base_count != test_count {
        return 0.0;
    }
    if base_count == 0 {
        return 1.0;
    }

    let sum: f64 = base
        .child_tags()
        .zip(test.child_tags())
        .map(|(a, b)| text_similarity(a, b))
        .sum();
    sum / base_count as f64
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        pairs.iter().copied().collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_text_emptiness_laws() {
        assert_eq!(text_similarity("", ""), 1.0);
        assert_eq!(text_similarity("", "abc"), 0.0);
        assert_eq!(text_similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_text_quick_ratio_values() {
        // one shared char out of four
        assert!((text_similarity("x1", "x2") - 0.5).abs() < EPSILON);
        // 'i' only
        assert!((text_similarity("div", "section") - 0.2).abs() < EPSILON);
        // a . p h p shared, d/d vs b/c not
        assert!((text_similarity("add.php", "abc.php") - 10.0 / 14.0).abs() < EPSILON);
        // quick ratio ignores order
        assert_eq!(text_similarity("abc", "cba"), 1.0);
        assert_eq!(text_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_text_counts_chars_not_bytes() {
        assert!((text_similarity("héllo", "hello") - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_text_drops_with_more_edits() {
        let base = "The quick brown fox jumps over the lazy dog";
        let one = "The quick brown fox jumps over the lazy cat";
        let many = "A slow grey wolf creeps under some busy log";
        let s1 = text_similarity(base, one);
        let s2 = text_similarity(base, many);
        assert!(s1 < 1.0);
        assert!(s2 < s1);
    }

    proptest! {
        #[test]
        fn prop_text_identity(s in "\\PC{1,40}") {
            prop_assert_eq!(text_similarity(&s, &s), 1.0);
        }

        #[test]
        fn prop_text_symmetric_and_bounded(a in "\\PC{0,30}", b in "\\PC{0,30}") {
            let ab = text_similarity(&a, &b);
            let ba = text_similarity(&b, &a);
            prop_assert!((ab - ba).abs() < EPSILON);
            prop_assert!((0.0..=1.0).contains(&ab));
        }

        #[test]
        fn prop_text_one_empty_is_zero(s in "\\PC{1,30}") {
            prop_assert_eq!(text_similarity("", &s), 0.0);
            prop_assert_eq!(text_similarity(&s, ""), 0.0);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_attrs_empty_laws() {
        assert_eq!(attrs_similarity(&Attrs::new(), &Attrs::new()), 1.0);
        assert_eq!(attrs_similarity(&attrs(&[("a", "1")]), &Attrs::new()), 0.0);
        assert_eq!(attrs_similarity(&Attrs::new(), &attrs(&[("a", "1")])), 0.0);
    }

    #[test]
    fn test_attrs_identical() {
        let a = attrs(&[("id", "main"), ("class", "wide")]);
        assert_eq!(attrs_similarity(&a, &a.clone()), 1.0);
    }

    #[test]
    fn test_attrs_value_drift() {
        let base = attrs(&[("id", "x1"), ("class", "box")]);
        let test = attrs(&[("id", "x2"), ("class", "box")]);
        // (0.5 + 1.0) / 2
        assert!((attrs_similarity(&base, &test) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_attrs_extra_and_missing_keys_are_penalized() {
        let base = attrs(&[("id", "a"), ("class", "b")]);

        // extra key: (1 + 1 - 0.5) / 2
        let extra = attrs(&[("id", "a"), ("class", "b"), ("nonce", "z")]);
        assert!((attrs_similarity(&base, &extra) - 0.75).abs() < EPSILON);

        // missing key: (1 - 0.5) / 2
        let missing = attrs(&[("id", "a")]);
        assert!((attrs_similarity(&base, &missing) - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_attrs_floor_at_zero() {
        let base = attrs(&[("id", "a")]);
        let test = attrs(&[("x", "1"), ("y", "2"), ("z", "3")]);
        assert_eq!(attrs_similarity(&base, &test), 0.0);
    }

    #[test]
    fn test_attrs_normalized_by_base_size() {
        let base = attrs(&[("id", "a")]);
        let test = attrs(&[("id", "a"), ("class", "b")]);
        // (1 - 0.5) / 1, not divided by the union
        assert!((attrs_similarity(&base, &test) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_attrs_custom_penalty() {
        let base = attrs(&[("id", "a")]);
        let test = attrs(&[("id", "a"), ("class", "b")]);
        assert_eq!(attrs_similarity_with(&base, &test, 0.0), 1.0);
        assert_eq!(attrs_similarity_with(&base, &test, 1.0), 0.0);
    }

    #[test]
    fn test_attrs_negative_penalty_stays_bounded() {
        let base = attrs(&[("id", "a")]);
        let test = attrs(&[("id", "a"), ("x", "y")]);
        assert_eq!(attrs_similarity_with(&base, &test, -1.0), 1.0);

        let score = attrs_similarity_with(&base, &test, f64::NAN);
        assert!((0.0..=1.0).contains(&score), "score was {score}");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Elements
    // ─────────────────────────────────────────────────────────────────────────

    fn heading_block(id: &str) -> Element {
        Element::new("div")
            .attr("class", "section")
            .attr("id", format!("beautiful-soup-documentation-{id}"))
            .child(Element::new("span").attr("id", format!("documentation-{id}")))
            .child(
                Element::new("h1")
                    .text("Beautiful Soup Documentation ")
                    .child(
                        Element::new("a")
                            .attr("class", "headerlink")
                            .attr("href", "#beautiful-soup-documentation")
                            .text("*"),
                    ),
            )
    }

    #[test]
    fn test_element_identity() {
        let elem = heading_block("1");
        assert_eq!(element_similarity(&elem, &elem.clone()), 1.0);
    }

    #[test]
    fn test_element_nearly_identical() {
        let score = element_similarity(&heading_block("1"), &heading_block("2"));
        assert!(score > 0.98, "score was {score}");
        assert!(score < 1.0);
    }

    #[test]
    fn test_element_different_tag_and_text() {
        let base = Element::new("div").text("Hello world, this is page one");
        let test = Element::new("section").text("Completely different content here");
        let score = element_similarity(&base, &test);
        assert!(score < 0.5, "score was {score}");
    }

    #[test]
    fn test_element_weights_applied() {
        let base = Element::new("p").text("same");
        let test = Element::new("q").text("same");
        // name 0, text 1, attrs 1 -> (2 + 0 + 1) / 6
        assert!((element_similarity(&base, &test) - 0.5).abs() < EPSILON);

        let config = ScoreConfig::default().with_weights(Weights::new(1, 0, 0));
        assert_eq!(element_similarity_with(&base, &test, &config), 1.0);

        let zero = ScoreConfig::default().with_weights(Weights::new(0, 0, 0));
        assert_eq!(element_similarity_with(&base, &test, &zero), 0.0);
    }

    #[test]
    fn test_element_huge_weights_do_not_overflow() {
        let weights = Weights::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(weights.total(), 3 * u64::from(u32::MAX));

        let elem = Element::new("p").text("same");
        let config = ScoreConfig::default().with_weights(weights);
        assert!((element_similarity_with(&elem, &elem.clone(), &config) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_element_similarity_texts_matches_full_score() {
        let base = heading_block("1");
        let test = heading_block("2");
        let config = ScoreConfig::default();
        let full = element_similarity_with(&base, &test, &config);
        let cached = element_similarity_texts(
            &base,
            &test,
            &base.text_content(),
            &test.text_content(),
            &config,
        );
        assert_eq!(full, cached);
    }

    #[test]
    fn test_children_similarity() {
        let leaf = Element::new("p");
        assert_eq!(children_similarity(&leaf, &Element::new("p")), 1.0);

        let one = Element::new("div").child(Element::new("p"));
        let two = Element::new("div").child(Element::new("p")).child(Element::new("p"));
        assert_eq!(children_similarity(&one, &two), 0.0);
        assert_eq!(children_similarity(&leaf, &one), 0.0);

        let a = Element::new("div").child(Element::new("div")).child(Element::new("p"));
        let b = Element::new("div").child(Element::new("section")).child(Element::new("p"));
        // (0.2 + 1.0) / 2
        assert!((children_similarity(&a, &b) - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_children_similarity_ignores_text_runs() {
        let a = Element::new("div").text("x").child(Element::new("p"));
        let b = Element::new("div").child(Element::new("p")).text("y");
        assert_eq!(children_similarity(&a, &b), 1.0);
    }
}
