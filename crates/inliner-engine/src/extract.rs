//! `<style>` block extraction and re-insertion

use inliner_css::{AtRule, Rule};
use inliner_dom::{DomTree, NodeId};

use crate::Config;

/// Whether a `media` attribute targets screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    /// Absent, empty, `screen` or `all`
    Inlineable,
    /// Anything else (`print`, `speech`, ...)
    Other,
}

/// Classify a `<style media="...">` attribute
///
/// A media query list is inlineable when any of its queries starts with
/// `screen` or `all` (after an optional `only`).
pub fn classify_media(media: Option<&str>) -> MediaClass {
    let Some(media) = media.map(str::trim).filter(|m| !m.is_empty()) else {
        return MediaClass::Inlineable;
    };

    let inlineable = media.split(',').any(|query| {
        let mut words = query.split_whitespace().map(str::to_ascii_lowercase);
        let first = match words.next() {
            Some(word) if word == "only" => words.next(),
            other => other,
        };
        matches!(first.as_deref(), Some("screen" | "all"))
    });

    if inlineable {
        MediaClass::Inlineable
    } else {
        MediaClass::Other
    }
}

/// Collect the CSS of every inlineable `<style>` block in document order,
/// detaching the blocks unless `leave_style` is set.
pub(crate) fn extract_styles(tree: &mut DomTree, config: &Config) -> String {
    let blocks: Vec<NodeId> = tree
        .elements()
        .filter(|&id| tree.element(id).is_some_and(|e| e.is("style")))
        .collect();

    let mut css = String::new();
    let mut extracted = 0usize;
    for id in blocks {
        let Some(elem) = tree.element(id) else {
            continue;
        };

        let type_ok = config.ignore_style_type_attr
            || elem
                .get_attr("type")
                .map(str::trim)
                .is_none_or(|t| t.is_empty() || t.eq_ignore_ascii_case("text/css"));
        if !type_ok || classify_media(elem.get_attr("media")) == MediaClass::Other {
            tracing::debug!("leaving <style> block {:?} in place", id);
            continue;
        }

        if !css.is_empty() {
            css.push('\n');
        }
        css.push_str(&tree.text_content(id));
        extracted += 1;

        if !config.leave_style {
            tree.detach(id);
        }
    }

    tracing::debug!("Extracted {} <style> blocks ({} bytes)", extracted, css.len());
    css
}

/// Append a `<style>` block holding rules that could not be inlined,
/// in their original order.
pub(crate) fn insert_retained(tree: &mut DomTree, rules: &[Rule], at_rules: &[AtRule]) {
    let mut entries: Vec<(usize, String)> = rules
        .iter()
        .map(|r| (r.source_position, r.to_string()))
        .chain(at_rules.iter().map(|r| (r.source_position, r.to_string())))
        .collect();
    if entries.is_empty() {
        return;
    }
    entries.sort_by_key(|(position, _)| *position);

    let css = entries
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n");

    let parent = tree
        .find_element("head")
        .or_else(|| tree.find_element("html"))
        .unwrap_or(tree.root());

    let style = tree.create_element("style");
    if let Some(elem) = tree.element_mut(style) {
        elem.set_attr("type", "text/css".to_string());
    }
    let text = tree.create_text(&css);
    tree.append_child(style, text);
    tree.append_child(parent, style);
}
