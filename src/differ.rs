//! Baseline differ for dynamic content
//!
//! Decides whether a candidate response is the same page as a captured
//! baseline once per-request noise (timestamps, nonces, rotating blocks)
//! is discounted.
//!
//! # Algorithm
//!
//! 1. Raw text identical to the baseline: match, nothing is parsed
//! 2. Parse the candidate
//! 3. Element counts differ: no match
//! 4. Pair elements by document order; skip structurally identical pairs,
//!    score the rest as `(element + children) / 2`
//! 5. The first pair scoring below the threshold decides "no match";
//!    if none does, the documents match
//!
//! Two documents without any elements have no pairs to compare and
//! therefore match.

use compact_str::CompactString;
use tracing::{debug, trace};

use crate::error::{DiffError, DiffResult};
use crate::node::{Document, Element};
use crate::parse::{HtmlParser, Parser};
use crate::similarity::{ScoreConfig, children_similarity, element_similarity_texts};

/// Minimum pair score for a candidate to count as the baseline page
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.98;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`DynamicContentDiffer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffConfig {
    /// Minimum per-pair score, in `(0, 1]`.
    /// Default: 0.98
    pub threshold: f64,
    /// Element scoring policy
    pub score: ScoreConfig,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            score: ScoreConfig::default(),
        }
    }
}

impl DiffConfig {
    /// Create config with a custom threshold and default scoring.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Config for mostly static targets (almost no drift tolerated).
    pub fn strict() -> Self {
        Self::new(0.99)
    }

    /// Config for heavily templated targets (ids, counters, ad slots).
    pub fn lenient() -> Self {
        Self::new(0.9)
    }

    /// Override the scoring policy.
    pub fn with_score(mut self, score: ScoreConfig) -> Self {
        self.score = score;
        self
    }

    /// Check that the threshold lies in `(0, 1]` and the scoring policy is
    /// usable: not all weights zero, penalty finite and non-negative.
    pub fn validate(&self) -> DiffResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(DiffError::InvalidThreshold(self.threshold));
        }
        if self.score.weights.total() == 0 {
            return Err(DiffError::InvalidWeights);
        }
        let penalty = self.score.missing_key_penalty;
        if !(penalty.is_finite() && penalty >= 0.0) {
            return Err(DiffError::InvalidPenalty(penalty));
        }
        Ok(())
    }
}

// =============================================================================
// Comparison results
// =============================================================================

/// Why a comparison ended the way it did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Raw text equal to the baseline; nothing was parsed
    Identical,
    /// Every element pair reached the threshold
    Similar,
    /// The documents have different element counts
    CountMismatch { baseline: usize, candidate: usize },
    /// The pair at `index` (document order) scored below the threshold
    BelowThreshold {
        index: usize,
        tag: CompactString,
        score: f64,
    },
}

/// Statistics from a comparison
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct CompareStats {
    /// Number of element pairs that needed scoring
    pub pairs_scored: usize,
    /// Number of structurally identical pairs that were skipped
    pub pairs_skipped: usize,
    /// Lowest pair score seen (1.0 when nothing was scored)
    pub min_score: f64,
}

impl Default for CompareStats {
    fn default() -> Self {
        Self {
            pairs_scored: 0,
            pairs_skipped: 0,
            min_score: 1.0,
        }
    }
}

/// Result of comparing one candidate against the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub outcome: Outcome,
    pub stats: CompareStats,
}

impl Comparison {
    fn identical() -> Self {
        Self {
            outcome: Outcome::Identical,
            stats: CompareStats::default(),
        }
    }

    /// True if the candidate counts as the baseline page
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, Outcome::Identical | Outcome::Similar)
    }
}

// =============================================================================
// DynamicContentDiffer
// =============================================================================

/// Compares candidate documents against a fixed baseline.
///
/// The baseline is parsed once at construction and never mutated, so a
/// differ can be shared by reference across threads.
#[derive(Debug)]
pub struct DynamicContentDiffer<P: Parser = HtmlParser> {
    parser: P,
    config: DiffConfig,
    baseline_raw: String,
    baseline: Document,
}

impl DynamicContentDiffer<HtmlParser> {
    /// Build a differ over HTML with the default configuration.
    pub fn new(baseline: impl Into<String>) -> DiffResult<Self> {
        Self::with_config(baseline, DiffConfig::default())
    }

    /// Build a differ over HTML with a custom configuration.
    pub fn with_config(baseline: impl Into<String>, config: DiffConfig) -> DiffResult<Self> {
        Self::with_parser(baseline, HtmlParser::new(), config)
    }
}

impl<P: Parser> DynamicContentDiffer<P> {
    /// Build a differ with a custom parser.
    ///
    /// Fails if the configuration is invalid or the baseline cannot be
    /// parsed.
    pub fn with_parser(baseline: impl Into<String>, parser: P, config: DiffConfig) -> DiffResult<Self> {
        config.validate()?;
        let baseline_raw = baseline.into();
        let baseline = parser.parse(&baseline_raw)?;
        debug!(elements = baseline.len(), "baseline captured");
        Ok(Self {
            parser,
            config,
            baseline_raw,
            baseline,
        })
    }

    pub fn baseline_raw(&self) -> &str {
        &self.baseline_raw
    }

    pub fn baseline(&self) -> &Document {
        &self.baseline
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// True if `candidate` is equivalent to the baseline.
    ///
    /// Only a parser failure is an error; a different page is `Ok(false)`.
    pub fn compare_to(&self, candidate: &str) -> DiffResult<bool> {
        self.compare(candidate).map(|c| c.is_match())
    }

    /// Compare raw candidate text and report how the verdict was reached.
    pub fn compare(&self, candidate: &str) -> DiffResult<Comparison> {
        if candidate == self.baseline_raw {
            return Ok(Comparison::identical());
        }
        let doc = self.parser.parse(candidate)?;
        Ok(self.compare_document(&doc))
    }

    /// Compare an already parsed candidate.
    pub fn compare_document(&self, candidate: &Document) -> Comparison {
        let mut stats = CompareStats::default();

        if candidate.len() != self.baseline.len() {
            debug!(
                baseline = self.baseline.len(),
                candidate = candidate.len(),
                "element count mismatch"
            );
            return Comparison {
                outcome: Outcome::CountMismatch {
                    baseline: self.baseline.len(),
                    candidate: candidate.len(),
                },
                stats,
            };
        }

        for (index, (base, test)) in self.baseline.elements().zip(candidate.elements()).enumerate() {
            // collected once per pair, shared by the skip check and the score
            let base_text = base.text_content();
            let test_text = test.text_content();
            if base_text == test_text && base.is_shape_equal(test) {
                stats.pairs_skipped += 1;
                continue;
            }

            let score = self.score_pair(base, test, &base_text, &test_text);
            stats.pairs_scored += 1;
            stats.min_score = stats.min_score.min(score);

            if score < self.config.threshold {
                debug!(
                    index,
                    tag = %base.tag,
                    score,
                    threshold = self.config.threshold,
                    "element pair below threshold"
                );
                return Comparison {
                    outcome: Outcome::BelowThreshold {
                        index,
                        tag: base.tag.clone(),
                        score,
                    },
                    stats,
                };
            }
        }

        Comparison {
            outcome: Outcome::Similar,
            stats,
        }
    }

    /// Score of one element pair: mean of element and children similarity.
    pub fn pair_score(&self, base: &Element, test: &Element) -> f64 {
        self.score_pair(base, test, &base.text_content(), &test.text_content())
    }

    fn score_pair(&self, base: &Element, test: &Element, base_text: &str, test_text: &str) -> f64 {
        let element = element_similarity_texts(base, test, base_text, test_text, &self.config.score);
        let children = children_similarity(base, test);
        trace!(tag = %base.tag, element, children, "scored element pair");
        (element + children) / 2.0
    }

    /// Compare many candidates in parallel; results keep input order.
    #[cfg(feature = "parallel")]
    pub fn compare_all<S>(&self, candidates: &[S]) -> Vec<DiffResult<bool>>
    where
        S: AsRef<str> + Sync,
    {
        use rayon::prelude::*;

        candidates
            .par_iter()
            .map(|candidate| self.compare_to(candidate.as_ref()))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
