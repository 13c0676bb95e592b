//! DOM Node
//!
//! Nodes link to each other through `NodeId` indices instead of pointers,
//! so the whole tree lives in one `Vec` owned by `DomTree`.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(name: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(name)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::detached(NodeData::Text(content))
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::detached(NodeData::Comment(content))
    }

    /// Create a doctype node
    pub fn doctype(name: String, public_id: String, system_id: String) -> Self {
        Self::detached(NodeData::Doctype { name, public_id, system_id })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local tag name, lowercase for HTML elements
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    /// Get an attribute value (names compare ASCII case-insensitively)
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attr(&mut self, name: &str, value: String) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            attr.value = value;
            return;
        }
        self.attrs.push(Attribute { name: name.to_string(), value });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(idx).value)
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Whether the whitespace-separated `class` attribute contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|list| list.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Check the tag name (ASCII case-insensitive)
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
