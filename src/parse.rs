//! Parsing raw markup into [`Document`]s
//!
//! The differ only consumes the [`Parser`] trait. [`HtmlParser`] is the
//! default implementation, backed by html5ever through `scraper`.

use scraper::{ElementRef, Html, Node as HtmlNode};

use crate::error::ParseError;
use crate::node::{Document, Element};

/// Turns raw text into a document tree.
///
/// Implementations must be shareable across threads: one parser serves
/// every comparison a differ performs.
pub trait Parser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Document, ParseError>;
}

impl<F> Parser for F
where
    F: Fn(&str) -> Result<Document, ParseError> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Result<Document, ParseError> {
        self(raw)
    }
}

// =============================================================================
// HtmlParser
// =============================================================================

/// HTML5 parser with browser-compatible error recovery.
///
/// Lenient by default: malformed markup is repaired the way a browser
/// would, so parsing never fails. In strict mode the first recovery the
/// tokenizer or tree builder had to make is reported as a [`ParseError`].
///
/// The tree always has the implied `html`/`head`/`body` skeleton, which is
/// the same for baseline and candidate and so does not skew comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser {
    strict: bool,
}

impl HtmlParser {
    /// Lenient parser (never fails).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that rejects input html5ever had to repair.
    ///
    /// Input is parsed as a full document, so a fragment without a leading
    /// `<!DOCTYPE html>` is rejected even when its markup is well formed.
    /// Use the lenient parser for fragments.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl Parser for HtmlParser {
    fn parse(&self, raw: &str) -> Result<Document, ParseError> {
        let html = Html::parse_document(raw);
        if self.strict {
            if let Some(err) = html.errors.first() {
                return Err(ParseError::new(err.to_string()));
            }
        }
        Ok(Document::from_root(convert_element(html.root_element())))
    }
}

/// Copy an html5ever element subtree into our node types.
///
/// Comments, doctypes and processing instructions carry no page content
/// and are dropped.
fn convert_element(source: ElementRef<'_>) -> Element {
    let value = source.value();
    let mut elem = Element::new(value.name());
    for (name, attr) in value.attrs() {
        elem.attrs.set(name, attr);
    }

    for child in source.children() {
        match child.value() {
            HtmlNode::Element(_) => {
                if let Some(child_elem) = ElementRef::wrap(child) {
                    elem.push_elem(convert_element(child_elem));
                }
            }
            HtmlNode::Text(text) => elem.push_text(&**text),
            _ => {}
        }
    }
    elem
}
