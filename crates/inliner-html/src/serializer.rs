//! HTML Serialization
//!
//! Writes the DOM back out as markup. Output keeps every text node as-is,
//! so whitespace in the source document survives the round trip.

use inliner_dom::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (content is not escaped)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// HTML serializer
#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the whole document
    pub fn serialize_document(&self, tree: &DomTree) -> String {
        let mut output = String::new();
        self.serialize_children(tree, tree.root(), &mut output);
        output
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                self.serialize_children(tree, node_id, output);
            }
            NodeData::Element(elem) => {
                let tag = elem.name.as_str();

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        output.push_str("=\"");
                        escape_attribute(&attr.value, output);
                        output.push('"');
                    }
                }

                if VOID_ELEMENTS.contains(&tag) {
                    output.push_str(" />");
                    return;
                }
                output.push('>');

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    self.serialize_children_raw(tree, node_id, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => {
                escape_text(text, output);
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, public_id, system_id } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                if !public_id.is_empty() {
                    output.push_str(" PUBLIC \"");
                    output.push_str(public_id);
                    output.push('"');
                    if !system_id.is_empty() {
                        output.push_str(" \"");
                        output.push_str(system_id);
                        output.push('"');
                    }
                } else if !system_id.is_empty() {
                    output.push_str(" SYSTEM \"");
                    output.push_str(system_id);
                    output.push('"');
                }
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (_child_id, child) in tree.children(parent_id) {
            if let Some(text) = child.as_text() {
                output.push_str(text);
            }
        }
    }
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text("Hello <world> & \"friends\"", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; \"friends\"");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_attribute("font-family:\"Arial\" & co", &mut output);
        assert_eq!(output, "font-family:&quot;Arial&quot; &amp; co");
    }

    #[test]
    fn test_void_elements() {
        assert!(VOID_ELEMENTS.contains(&"br"));
        assert!(VOID_ELEMENTS.contains(&"img"));
        assert!(!VOID_ELEMENTS.contains(&"div"));
    }

    #[test]
    fn test_serialize_built_tree() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div);
        tree.element_mut(div).unwrap().set_attr("style", "color:red;".into());
        let br = tree.create_element("br");
        tree.append_child(div, br);
        let text = tree.create_text("a < b");
        tree.append_child(div, text);

        assert_eq!(
            HtmlSerializer::new().serialize_document(&tree),
            "<div style=\"color:red;\"><br />a &lt; b</div>"
        );
        assert_eq!(HtmlSerializer::new().serialize_inner(&tree, div), "<br />a &lt; b");
    }
}
