//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to our arena DOM.

use crate::HtmlError;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use inliner_dom::{DomTree, NodeData, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a DOM tree
    ///
    /// Fragments are wrapped in `html`/`head`/`body` like any browser would.
    /// Every text node is kept, whitespace included.
    pub fn parse(&self, html: &str) -> Result<DomTree, HtmlError> {
        tracing::debug!("Parsing HTML document ({} bytes)", html.len());

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut tree = DomTree::new();
        self.convert_node(&dom.document, &mut tree, NodeId::ROOT);

        tracing::debug!("Parsed {} nodes", tree.len());
        Ok(tree)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                // Adjacent text merges, as the tokenizer may split runs
                let last = tree.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);
                if let Some(NodeData::Text(existing)) = tree.get_mut(last).map(|n| &mut n.data) {
                    existing.push_str(&text);
                    return;
                }
                let id = tree.create_text(&text);
                tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let id = tree.create_element(&name.local);
                tree.append_child(parent, id);

                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        let attr_name = match &attr.name.prefix {
                            Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        elem.set_attr(&attr_name, attr.value.to_string());
                    }
                }

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
                // <template> keeps its content in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id);
                    }
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
