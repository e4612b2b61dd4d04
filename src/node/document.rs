//! Document type and depth-first traversal
//!
//! The root container for a parsed tree. Element count is computed once
//! at construction; documents are immutable afterwards.

use super::{Children, Element, Node};

// =============================================================================
// Document
// =============================================================================

/// Parsed document: top-level nodes plus their element count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    roots: Children,
    len: usize,
}

impl Document {
    /// Create a document from its top-level nodes
    pub fn new(roots: impl IntoIterator<Item = Node>) -> Self {
        let roots: Children = roots.into_iter().collect();
        let len = roots
            .iter()
            .filter_map(Node::as_element)
            .map(Self::count_elements)
            .sum::<usize>();
        Self { roots, len }
    }

    /// Create a document with a single root element
    pub fn from_root(root: Element) -> Self {
        Self::new([Node::from(root)])
    }

    /// Document without any elements (plain text or empty body)
    pub fn empty() -> Self {
        Self::default()
    }

    fn count_elements(elem: &Element) -> usize {
        1 + elem
            .children_elements()
            .map(Self::count_elements)
            .sum::<usize>()
    }

    /// Top-level nodes
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Total number of elements at any depth
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all elements in document order (depth-first, pre-order)
    pub fn elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.roots)
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    fn new(roots: &'a [Node]) -> Self {
        let stack = roots.iter().rev().filter_map(Node::as_element).collect();
        Self { stack }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in elem.children.iter().rev() {
            if let Some(child_elem) = child.as_element() {
                self.stack.push(child_elem);
            }
        }
        Some(elem)
    }
}
