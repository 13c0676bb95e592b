//! Document access needed by the cascade
//!
//! The resolver never walks a tree itself: it queries elements and reads
//! and writes their attributes through this trait.

use std::fmt;
use std::hash::Hash;

use inliner_dom::{DomTree, NodeId, SelectorError};

/// A mutable document the cascade can write inline styles into
pub trait StyledDocument {
    /// Stable element identity for the duration of one run
    type Handle: Copy + Eq + Hash + fmt::Debug;
    /// Selector query failure
    type Error: fmt::Display;

    /// All elements matching `selector`
    fn query(&self, selector: &str) -> Result<Vec<Self::Handle>, Self::Error>;

    fn get_attribute(&self, element: Self::Handle, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, element: Self::Handle, name: &str, value: String);

    fn remove_attribute(&mut self, element: Self::Handle, name: &str);

    /// Every element, in document order
    fn elements(&self) -> Vec<Self::Handle>;
}

impl StyledDocument for DomTree {
    type Handle = NodeId;
    type Error = SelectorError;

    fn query(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        DomTree::query(self, selector)
    }

    fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.element(element)?.get_attr(name)
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: String) {
        if let Some(elem) = self.element_mut(element) {
            elem.set_attr(name, value);
        }
    }

    fn remove_attribute(&mut self, element: NodeId, name: &str) {
        if let Some(elem) = self.element_mut(element) {
            elem.remove_attr(name);
        }
    }

    fn elements(&self) -> Vec<NodeId> {
        DomTree::elements(self).collect()
    }
}
