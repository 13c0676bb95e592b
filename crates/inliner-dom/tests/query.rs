//! Selector query tests for inliner-dom
//!
//! Builds small trees by hand and checks which elements each selector returns.

use inliner_dom::{DomTree, NodeId, SelectorError};

struct Fixture {
    tree: DomTree,
    ul: NodeId,
    first: NodeId,
    second: NodeId,
    third: NodeId,
    link: NodeId,
    para: NodeId,
}

/// <body>
///   <ul id="list" class="menu">
///     <li class="red item">one</li>
///     <li class="item"><a href="http://x.test/a.pdf" lang="en-GB">two</a></li>
///     <li></li>
///   </ul>
///   <p class="red">after</p>
/// </body>
fn fixture() -> Fixture {
    let mut tree = DomTree::new();
    let html = tree.create_element("html");
    let body = tree.create_element("body");
    tree.append_child(tree.root(), html);
    tree.append_child(html, body);

    let ul = tree.create_element("ul");
    tree.append_child(body, ul);
    tree.element_mut(ul).unwrap().set_attr("id", "list".into());
    tree.element_mut(ul).unwrap().set_attr("class", "menu".into());

    let first = tree.create_element("li");
    tree.append_child(ul, first);
    tree.element_mut(first).unwrap().set_attr("class", "red item".into());
    let t = tree.create_text("one");
    tree.append_child(first, t);

    let second = tree.create_element("li");
    tree.append_child(ul, second);
    tree.element_mut(second).unwrap().set_attr("class", "item".into());
    let link = tree.create_element("a");
    tree.append_child(second, link);
    tree.element_mut(link).unwrap().set_attr("href", "http://x.test/a.pdf".into());
    tree.element_mut(link).unwrap().set_attr("lang", "en-GB".into());

    let third = tree.create_element("li");
    tree.append_child(ul, third);

    let para = tree.create_element("p");
    tree.append_child(body, para);
    tree.element_mut(para).unwrap().set_attr("class", "red".into());

    Fixture { tree, ul, first, second, third, link, para }
}

// ============================================================================
// SIMPLE SELECTORS
// ============================================================================

#[test]
fn test_type_selector() {
    let f = fixture();
    assert_eq!(f.tree.query("li").unwrap(), vec![f.first, f.second, f.third]);
    assert_eq!(f.tree.query("LI").unwrap().len(), 3);
}

#[test]
fn test_class_and_id() {
    let f = fixture();
    assert_eq!(f.tree.query(".red").unwrap(), vec![f.first, f.para]);
    assert_eq!(f.tree.query("li.red").unwrap(), vec![f.first]);
    assert_eq!(f.tree.query("#list").unwrap(), vec![f.ul]);
    assert_eq!(f.tree.query("ul#list.menu").unwrap(), vec![f.ul]);
    assert!(f.tree.query("#List").unwrap().is_empty());
}

#[test]
fn test_universal_selector() {
    let f = fixture();
    // html, body, ul, 3 li, a, p
    assert_eq!(f.tree.query("*").unwrap().len(), 8);
}

#[test]
fn test_attribute_selectors() {
    let f = fixture();
    assert_eq!(f.tree.query("[href]").unwrap(), vec![f.link]);
    assert_eq!(f.tree.query("a[href$=\".pdf\"]").unwrap(), vec![f.link]);
    assert_eq!(f.tree.query("a[href^=http]").unwrap(), vec![f.link]);
    assert_eq!(f.tree.query("[lang|=en]").unwrap(), vec![f.link]);
    assert_eq!(f.tree.query("[class~=item]").unwrap(), vec![f.first, f.second]);
    assert!(f.tree.query("[class=item]").unwrap().contains(&f.second));
    assert!(f.tree.query("[class='red']").unwrap().contains(&f.para));
}

// ============================================================================
// COMBINATORS
// ============================================================================

#[test]
fn test_descendant_and_child() {
    let f = fixture();
    assert_eq!(f.tree.query("ul a").unwrap(), vec![f.link]);
    assert_eq!(f.tree.query("body a").unwrap(), vec![f.link]);
    assert!(f.tree.query("body > a").unwrap().is_empty());
    assert_eq!(f.tree.query("li>a").unwrap(), vec![f.link]);
}

#[test]
fn test_sibling_combinators() {
    let f = fixture();
    assert_eq!(f.tree.query("li + li").unwrap(), vec![f.second, f.third]);
    assert_eq!(f.tree.query(".red + li").unwrap(), vec![f.second]);
    assert_eq!(f.tree.query("ul ~ p").unwrap(), vec![f.para]);
    assert_eq!(f.tree.query(".red ~ li").unwrap(), vec![f.second, f.third]);
}

#[test]
fn test_structural_pseudo_classes() {
    let f = fixture();
    assert_eq!(f.tree.query("li:first-child").unwrap(), vec![f.first]);
    assert_eq!(f.tree.query("li:last-child").unwrap(), vec![f.third]);
    assert_eq!(f.tree.query("a:only-child").unwrap(), vec![f.link]);
    assert_eq!(f.tree.query("li:empty").unwrap(), vec![f.third]);
    assert_eq!(f.tree.query(":root").unwrap().len(), 1);
}

#[test]
fn test_selector_group_in_document_order() {
    let f = fixture();
    assert_eq!(f.tree.query("p, ul").unwrap(), vec![f.ul, f.para]);
    // Overlapping branches do not duplicate matches
    assert_eq!(f.tree.query(".red, li.red").unwrap(), vec![f.first, f.para]);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_query_errors() {
    let f = fixture();
    assert_eq!(f.tree.query(""), Err(SelectorError::Empty));
    assert!(matches!(f.tree.query("a:hover"), Err(SelectorError::UnsupportedPseudo { .. })));
    assert!(matches!(f.tree.query("a::before"), Err(SelectorError::UnsupportedPseudo { .. })));
    assert!(matches!(f.tree.query("li >"), Err(SelectorError::DanglingCombinator { .. })));
    assert!(f.tree.query("li }").is_err());
}

#[test]
fn test_detached_nodes_not_matched() {
    let mut f = fixture();
    f.tree.detach(f.ul);
    assert!(f.tree.query("li").unwrap().is_empty());
    assert_eq!(f.tree.query(".red").unwrap(), vec![f.para]);
}
