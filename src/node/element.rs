//! Element type - tagged tree nodes with attributes and children

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::Attrs;

use super::{Children, Node, Text};

// =============================================================================
// Element
// =============================================================================

/// Markup element with attributes and ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: CompactString,
    /// Element attributes
    pub attrs: Attrs,
    /// Child nodes in source order
    pub children: Children,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            children: SmallVec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder API
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an attribute (builder)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    /// Append a child element (builder)
    pub fn child(mut self, elem: Element) -> Self {
        self.push_elem(elem);
        self
    }

    /// Append a text run (builder)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.push_text(content);
        self
    }

    /// Append a child element
    pub fn push_elem(&mut self, elem: Element) {
        self.children.push(Node::Element(Box::new(elem)));
    }

    /// Append a text run
    pub fn push_text(&mut self, content: impl Into<String>) {
        self.children.push(Node::Text(Text::new(content)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct child elements (text runs excluded)
    pub fn element_count(&self) -> usize {
        self.children.iter().filter(|n| n.is_element()).count()
    }

    /// Iterate over child element references
    pub fn children_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| n.as_element())
    }

    /// Tag names of the direct child elements, in order
    pub fn child_tags(&self) -> impl Iterator<Item = &str> {
        self.children_elements().map(|e| e.tag.as_str())
    }

    /// Text value of this element: every descendant text run, concatenated
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }

    /// Shallow structural equality: same tag, text, attributes and child
    /// tag sequence. Grandchildren are left to their own comparison.
    pub fn is_structurally_equal(&self, other: &Element) -> bool {
        self.is_shape_equal(other) && self.text_content() == other.text_content()
    }

    /// [`is_structurally_equal`](Self::is_structurally_equal) without the
    /// text comparison, for callers that already hold both texts.
    pub(crate) fn is_shape_equal(&self, other: &Element) -> bool {
        self.tag == other.tag
            && self.attrs == other.attrs
            && self.child_tags().eq(other.child_tags())
    }
}
