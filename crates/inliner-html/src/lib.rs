//! Inliner HTML
//!
//! HTML5 parsing built on html5ever, plus a serializer that writes the
//! arena DOM back out as markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, VOID_ELEMENTS};

use inliner_dom::DomTree;

/// Parse an HTML string into a DOM tree
pub fn parse(html: &str) -> Result<DomTree, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Serialize a whole DOM tree back to HTML
pub fn serialize(tree: &DomTree) -> String {
    HtmlSerializer::new().serialize_document(tree)
}

/// HTML parsing error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
