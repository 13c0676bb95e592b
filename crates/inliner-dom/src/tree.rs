//! DOM Tree (arena-based allocation)

use crate::{ElementData, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Detached nodes stay in the arena
/// but are unreachable from the root, so walks never see them.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of a node, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(name.to_string(), public_id.to_string(), system_id.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.index() >= self.nodes.len() || child.index() >= self.nodes.len() || parent == child {
            return;
        }
        self.detach(child);

        let prev_last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }
        if prev_last.is_valid() {
            self.nodes[prev_last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Unlink a node (and its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id.index()) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next: first }
    }

    /// Pre-order walk of every node below `id` (excluding `id` itself)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants { tree: self, start: id, next: first }
    }

    /// Every attached element in document order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(NodeId::ROOT)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
    }

    /// First attached element with the given tag name
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.elements().find(|&id| self.element(id).is_some_and(|e| e.is(tag)))
    }

    /// Element siblings preceding `id`, nearest first
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.prev_sibling;
        while cur.is_valid() {
            let node = self.get(cur)?;
            if node.is_element() {
                return Some(cur);
            }
            cur = node.prev_sibling;
        }
        None
    }

    /// Next element sibling after `id`
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.next_sibling;
        while cur.is_valid() {
            let node = self.get(cur)?;
            if node.is_element() {
                return Some(cur);
            }
            cur = node.next_sibling;
        }
        None
    }

    /// Parent element of `id` (None when the parent is the document)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        self.element(parent).map(|_| parent)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|(_, node)| node.as_text())
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator bounded to one subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    start: NodeId,
    next: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cur = id;
            loop {
                if cur == self.start {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cur) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cur = n.parent;
                if !cur.is_valid() {
                    break NodeId::NONE;
                }
            }
        };

        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        let text = tree.create_text("hi");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        tree.append_child(body, p);
        tree.append_child(p, text);
        (tree, html, body, p)
    }

    #[test]
    fn test_new_tree_has_document() {
        let tree = DomTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, html, body, p) = sample();
        let ids: Vec<_> = tree.elements().collect();
        assert_eq!(ids, vec![html, body, p]);
        assert_eq!(tree.text_content(html), "hi");
    }

    #[test]
    fn test_descendants_stay_in_subtree() {
        let (mut tree, _html, body, p) = sample();
        let aside = tree.create_element("aside");
        tree.append_child(body, aside);
        let below_p: Vec<_> = tree.descendants(p).map(|(id, _)| id).collect();
        assert_eq!(below_p.len(), 1);
        assert!(!below_p.contains(&aside));
    }

    #[test]
    fn test_detach_unlinks() {
        let (mut tree, html, body, p) = sample();
        tree.detach(p);
        assert_eq!(tree.children(body).count(), 0);
        assert_eq!(tree.elements().collect::<Vec<_>>(), vec![html, body]);
    }

    #[test]
    fn test_siblings() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), ul);
        let a = tree.create_element("li");
        let gap = tree.create_text(" ");
        let b = tree.create_element("li");
        tree.append_child(ul, a);
        tree.append_child(ul, gap);
        tree.append_child(ul, b);

        assert_eq!(tree.prev_element_sibling(b), Some(a));
        assert_eq!(tree.next_element_sibling(a), Some(b));
        assert_eq!(tree.prev_element_sibling(a), None);
        assert_eq!(tree.parent_element(a), Some(ul));
        assert_eq!(tree.parent_element(ul), None);
    }
}
