//! Inliner DOM - Document Object Model
//!
//! Arena-allocated DOM tree with CSS2.1 selector queries.

mod node;
mod tree;
mod query;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Descendants};
pub use query::{Selector, Compound, SimpleSelector, AttrOp, Combinator};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character '{found}' at offset {offset} in '{selector}'")]
    UnexpectedChar {
        selector: String,
        found: char,
        offset: usize,
    },

    #[error("unterminated attribute selector in '{selector}'")]
    UnterminatedAttribute { selector: String },

    #[error("unsupported pseudo-class ':{name}' in '{selector}'")]
    UnsupportedPseudo { selector: String, name: String },

    #[error("dangling combinator in '{selector}'")]
    DanglingCombinator { selector: String },
}
