//! Inliner CSS - stylesheet parsing & cascade
//!
//! Parses raw stylesheets into ordered rules, computes CSS2.1 specificity
//! and folds every matching rule into each element's inline `style`
//! attribute, with the element's own inline declarations taking precedence.

mod declaration;
mod warnings;
mod parser;
mod specificity;
mod cascade;
mod document;

use std::fmt;
use std::sync::Arc;

pub use declaration::{decode, encode, Declarations};
pub use warnings::Warnings;
pub use parser::CssParser;
pub use specificity::{specificity, Specificity};
pub use cascade::{is_inlineable, MatchRecord, Resolution, ResolveOptions, StyleResolver};
pub use document::StyledDocument;

/// Parsed stylesheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// Qualified rules, one per selector, in source order
    pub rules: Vec<Rule>,
    /// At-rules, kept opaque
    pub at_rules: Vec<AtRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of qualified rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.at_rules.is_empty()
    }
}

/// A qualified rule with a single selector
///
/// Rules split from one selector group share their declaration map.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Arc<Declarations>,
    /// Ordinal of this rule in the stylesheet, strictly increasing
    pub source_position: usize,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.selector, encode(&self.declarations))
    }
}

/// An at-rule (`@media`, `@font-face`, `@import`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the leading `@`, lowercase
    pub name: String,
    pub prelude: String,
    /// Block contents without the outer braces; `None` for statements
    pub block: Option<String>,
    pub source_position: usize,
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.prelude.is_empty() {
            write!(f, " {}", self.prelude)?;
        }
        match &self.block {
            Some(block) => write!(f, " {{{}}}", block),
            None => write!(f, ";"),
        }
    }
}

/// CSS processing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    /// A warning raised while warnings are treated as errors
    #[error("{0}")]
    Strict(String),
}
