//! Prelude module for common imports.
//!
//! ```
//! use dyndiff::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Document, Element, Node, Text};

// Attributes
pub use crate::attr::Attrs;

// Parsing
pub use crate::parse::{HtmlParser, Parser};

// Scoring
pub use crate::similarity::{
    ScoreConfig, Weights, attrs_similarity, attrs_similarity_with, children_similarity,
    element_similarity, element_similarity_with, text_similarity,
};

// Differ
pub use crate::differ::{CompareStats, Comparison, DiffConfig, DynamicContentDiffer, Outcome};

// Patterns
pub use crate::pattern::{MatchPattern, PatternSet, infer_pattern};

// Rate governor
pub use crate::rate::{RateGovernor, SlidingWindowLimiter};

// Error
pub use crate::error::{DiffError, DiffResult, ParseError};
