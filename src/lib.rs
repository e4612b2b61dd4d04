//! dyndiff - Similarity oracle for dynamic HTML responses
//!
//! Content-discovery scans hit many paths that answer with the same
//! templated page ("not found", soft redirects, catch-all routes) whose
//! bytes change on every request. This crate tells those apart from
//! genuinely different pages.
//!
//! ## Core Concepts
//!
//! **Scoring**: text, attribute sets and single elements are scored in
//! `[0, 1]` with a weighted heuristic (`similarity`).
//!
//! **Baseline diffing**: a [`DynamicContentDiffer`] parses a baseline once
//! and compares candidates element by element against a threshold.
//!
//! **Pattern inference**: [`infer_pattern`] turns two near-identical names
//! into an anchored `prefix.*suffix` regex for exclusion filters.
//!
//! ## Modules
//! - `node`: Document/Element/Node/Text tree types
//! - `attr`: Attribute mapping
//! - `parse`: Parser seam and the default HTML parser
//! - `similarity`: Text, attribute and element scores
//! - `differ`: Baseline differ
//! - `pattern`: Pattern inference and pattern sets
//! - `rate`: Request-rate governor
//!
//! ## Usage
//!
//! ```
//! use dyndiff::{DiffConfig, DynamicContentDiffer, infer_pattern};
//!
//! let differ = DynamicContentDiffer::with_config(
//!     r#"<div id="x1"><p>Hello</p></div>"#,
//!     DiffConfig::new(0.8),
//! )?;
//! assert!(differ.compare_to(r#"<div id="x2"><p>Hello</p></div>"#)?);
//!
//! let pattern = infer_pattern("add.php", "abc.php");
//! assert_eq!(pattern.as_str(), r"^a.*\.php$");
//! # Ok::<(), dyndiff::DiffError>(())
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Attribute mapping
pub mod attr;

/// Node types: Document, Element, Node, Text
pub mod node;

/// Parser trait and HTML parser
pub mod parse;

/// Similarity scores
pub mod similarity;

/// Baseline differ
pub mod differ;

/// Pattern inference
pub mod pattern;

/// Request-rate governor
pub mod rate;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Element, Node, Text};

// Attributes
pub use attr::Attrs;

// Parsing
pub use parse::{HtmlParser, Parser};

// Scoring
pub use similarity::{
    ScoreConfig, Weights, attrs_similarity, children_similarity, element_similarity,
    text_similarity,
};

// Differ
pub use differ::{
    CompareStats, Comparison, DEFAULT_MATCH_THRESHOLD, DiffConfig, DynamicContentDiffer, Outcome,
};

// Patterns
pub use pattern::{MatchPattern, PatternSet, infer_pattern};

// Rate governor
pub use rate::{RateGovernor, SlidingWindowLimiter};

// Error types
pub use error::{DiffError, DiffResult, ParseError};
