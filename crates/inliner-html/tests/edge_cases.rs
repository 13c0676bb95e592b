//! Edge case tests for inliner-html
//!
//! Malformed markup, raw text elements and parse/serialize round trips.

use inliner_html::{parse, serialize, HtmlParser, HtmlSerializer};

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_only_whitespace() {
    let tree = HtmlParser::new().parse("   \t\n\r\n   ").unwrap();
    assert!(tree.find_element("body").is_some());
}

#[test]
fn test_parse_only_doctype() {
    let tree = parse("<!DOCTYPE html>").unwrap();
    assert!(serialize(&tree).starts_with("<!DOCTYPE html>"));
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let tree = parse("<div><p><span>text").unwrap();
    let span = tree.find_element("span").unwrap();
    assert_eq!(tree.text_content(span), "text");
}

#[test]
fn test_parse_mismatched_tags() {
    let tree = parse("<div><p></div></p>").unwrap();
    assert!(tree.find_element("div").is_some());
    assert!(tree.find_element("p").is_some());
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_round_trip_keeps_whitespace_and_comments() {
    let html = "<!DOCTYPE html><html><head></head><body>\n  <p>One</p>\n  <!-- note -->\n</body></html>";
    let out = serialize(&parse(html).unwrap());
    assert_eq!(out, html);
}

#[test]
fn test_style_content_is_raw() {
    let html = "<html><head><style>a > b { content: \"&\"; }</style></head><body></body></html>";
    let out = serialize(&parse(html).unwrap());
    assert!(out.contains("<style>a > b { content: \"&\"; }</style>"), "{}", out);
}

#[test]
fn test_entities_re_escaped() {
    let tree = parse("<p title=\"a &amp; &quot;b&quot;\">1 &lt; 2&nbsp;</p>").unwrap();
    let p = tree.find_element("p").unwrap();
    let out = HtmlSerializer::new().serialize_outer(&tree, p);
    assert_eq!(out, "<p title=\"a &amp; &quot;b&quot;\">1 &lt; 2&nbsp;</p>");
}

#[test]
fn test_void_elements_have_no_end_tag() {
    let tree = parse("<p>a<br>b<img src=\"x.png\"></p>").unwrap();
    let p = tree.find_element("p").unwrap();
    let out = HtmlSerializer::new().serialize_inner(&tree, p);
    assert_eq!(out, "a<br />b<img src=\"x.png\" />");
}
