//! Stylesheet parser
//!
//! A small state machine splits the stylesheet into rule chunks, each of
//! which becomes either an opaque at-rule or one qualified rule per
//! selector in its group.

use std::sync::Arc;

use crate::declaration::decode_block;
use crate::{AtRule, CssError, Rule, Stylesheet, Warnings};

/// Scanner state while splitting the stylesheet into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Between rules, skipping whitespace
    BeforeRule,
    /// Inside a selector group or at-rule prelude
    InPrelude,
    /// Inside a `{ ... }` block, at the given nesting depth
    InBlock(usize),
}

/// CSS Parser
#[derive(Debug, Clone, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a stylesheet into rules and at-rules
    ///
    /// Malformed chunks are skipped with a warning; errors only surface when
    /// `warnings` is strict.
    pub fn parse(&self, css: &str, warnings: &mut Warnings) -> Result<Stylesheet, CssError> {
        let text = strip_comments(&normalize_whitespace(css));
        let mut stylesheet = Stylesheet::new();
        let mut position = 0usize;

        for chunk in split_chunks(&text) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            if chunk.starts_with('@') {
                self.parse_at_rule(chunk, &mut position, &mut stylesheet, warnings)?;
            } else {
                self.parse_qualified_rule(chunk, &mut position, &mut stylesheet, warnings)?;
            }
        }

        tracing::debug!(
            "Parsed stylesheet: {} rules, {} at-rules",
            stylesheet.rules.len(),
            stylesheet.at_rules.len()
        );
        Ok(stylesheet)
    }

    fn parse_qualified_rule(
        &self,
        chunk: &str,
        position: &mut usize,
        stylesheet: &mut Stylesheet,
        warnings: &mut Warnings,
    ) -> Result<(), CssError> {
        let Some((group, body)) = split_block(chunk) else {
            return invalid_chunk(chunk, warnings);
        };
        let group = collapse_whitespace(group);
        let selectors = split_selector_group(&group);
        if selectors.is_empty() {
            return invalid_chunk(chunk, warnings);
        }

        let declarations = Arc::new(decode_block(body, true, warnings)?);
        for selector in selectors {
            stylesheet.rules.push(Rule {
                selector: selector.to_string(),
                declarations: Arc::clone(&declarations),
                source_position: *position,
            });
            *position += 1;
        }
        Ok(())
    }

    fn parse_at_rule(
        &self,
        chunk: &str,
        position: &mut usize,
        stylesheet: &mut Stylesheet,
        warnings: &mut Warnings,
    ) -> Result<(), CssError> {
        let rest = &chunk[1..];
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            return invalid_chunk(chunk, warnings);
        }
        let name = rest[..name_len].to_ascii_lowercase();
        let rest = &rest[name_len..];

        let (prelude, block) = if let Some((prelude, body)) = split_block(rest) {
            (prelude, Some(body.trim().to_string()))
        } else if let Some(prelude) = rest.strip_suffix(';') {
            (prelude, None)
        } else {
            return invalid_chunk(chunk, warnings);
        };

        stylesheet.at_rules.push(AtRule {
            name,
            prelude: collapse_whitespace(prelude),
            block,
            source_position: *position,
        });
        *position += 1;
        Ok(())
    }
}

fn invalid_chunk(chunk: &str, warnings: &mut Warnings) -> Result<(), CssError> {
    warnings.warn(format!("Invalid or unexpected style data '{}'", chunk))
}

/// `prelude { body }` → (prelude, body); the chunk must end with the
/// brace that closes its first `{`.
fn split_block(chunk: &str) -> Option<(&str, &str)> {
    let open = chunk.find('{')?;
    let body = chunk[open + 1..].strip_suffix('}')?;
    Some((&chunk[..open], body))
}

fn normalize_whitespace(css: &str) -> String {
    css.replace(['\t', '\r', '\n'], " ")
}

/// Remove `/* ... */` comments (non-nested, shortest match)
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// HTML comment markers allowed between rules of an embedded stylesheet
const CDO_CDC: [&str; 2] = ["<!--", "-->"];

/// Split the stylesheet into rule chunks
///
/// A chunk ends at the `}` closing its outermost block, at a top-level `;`
/// (statement at-rules, or garbage before a rule), or at a stray `}`.
/// `<!--` and `-->` between rules are dropped.
fn split_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut state = ScanState::BeforeRule;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut skip_until = 0;

    for (i, c) in text.char_indices() {
        if i < skip_until {
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match state {
            ScanState::BeforeRule => {
                if c.is_whitespace() {
                    continue;
                }
                if let Some(marker) = CDO_CDC.iter().find(|m| text[i..].starts_with(**m)) {
                    skip_until = i + marker.len();
                    continue;
                }
                start = i;
                state = ScanState::InPrelude;
                match c {
                    '"' | '\'' => quote = Some(c),
                    '{' => state = ScanState::InBlock(1),
                    ';' | '}' => {
                        chunks.push(&text[start..=i]);
                        state = ScanState::BeforeRule;
                    }
                    _ => {}
                }
            }
            ScanState::InPrelude => match c {
                '"' | '\'' => quote = Some(c),
                '{' => state = ScanState::InBlock(1),
                ';' | '}' => {
                    chunks.push(&text[start..=i]);
                    state = ScanState::BeforeRule;
                }
                _ => {}
            },
            ScanState::InBlock(depth) => match c {
                '"' | '\'' => quote = Some(c),
                '{' => state = ScanState::InBlock(depth + 1),
                '}' if depth == 1 => {
                    chunks.push(&text[start..=i]);
                    state = ScanState::BeforeRule;
                }
                '}' => state = ScanState::InBlock(depth - 1),
                _ => {}
            },
        }
    }

    if state != ScanState::BeforeRule {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Split a selector group on commas outside brackets, parentheses and quotes
fn split_selector_group(group: &str) -> Vec<&str> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in group.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                selectors.push(group[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    selectors.push(group[start..].trim());
    selectors.retain(|s| !s.is_empty());
    selectors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(css: &str) -> (Stylesheet, Warnings) {
        let mut warnings = Warnings::new(false);
        let sheet = CssParser::new().parse(css, &mut warnings).unwrap();
        (sheet, warnings)
    }

    #[test]
    fn test_parse_simple() {
        let (sheet, warnings) = parse(".foo { display: block; }\n#bar { color: red; }");
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.rules[0].selector, ".foo");
        assert_eq!(sheet.rules[1].declarations["color"], "red");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a/* x */b/**/c"), "abc");
        assert_eq!(strip_comments("a /* open"), "a ");
        assert_eq!(strip_comments("/* a */ b /* c */"), " b ");
    }

    #[test]
    fn test_split_chunks_nested_and_statements() {
        let chunks = split_chunks("@import url(a.css); @media print { h1 { x:y } } p { a:b }");
        assert_eq!(
            chunks,
            vec!["@import url(a.css);", "@media print { h1 { x:y } }", "p { a:b }"]
        );
    }

    #[test]
    fn test_split_chunks_brace_in_string() {
        let chunks = split_chunks("a { content: \"}\" } b { c:d }");
        assert_eq!(chunks, vec!["a { content: \"}\" }", "b { c:d }"]);
    }

    #[test]
    fn test_html_comment_markers_between_rules() {
        let chunks = split_chunks("<!-- h1 { a:b } --> <!--p{c:d}-->");
        assert_eq!(chunks, vec!["h1 { a:b }", "p{c:d}"]);

        let (sheet, warnings) = parse("<!--\n h1 { color: red }\n a { content: \"-->\" }\n-->");
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.rules[0].selector, "h1");
        assert_eq!(sheet.rules[1].declarations["content"], "\"-->\"");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_split_selector_group() {
        assert_eq!(split_selector_group("h1, h2 ,h3"), vec!["h1", "h2", "h3"]);
        assert_eq!(split_selector_group("a[title=\"x,y\"],b"), vec!["a[title=\"x,y\"]", "b"]);
        assert_eq!(split_selector_group(" , "), Vec::<&str>::new());
    }

    #[test]
    fn test_group_shares_declarations() {
        let (sheet, _) = parse("h1,\n\th2 { color: red }");
        assert_eq!(sheet.len(), 2);
        assert!(Arc::ptr_eq(&sheet.rules[0].declarations, &sheet.rules[1].declarations));
        assert_eq!(sheet.rules[0].source_position, 0);
        assert_eq!(sheet.rules[1].source_position, 1);
    }

    #[test]
    fn test_selector_whitespace_collapsed() {
        let (sheet, _) = parse("ul    li\n>\ta { color: red }");
        assert_eq!(sheet.rules[0].selector, "ul li > a");
    }

    #[test]
    fn test_at_rules_are_opaque() {
        let (sheet, warnings) = parse(
            "@charset \"utf-8\"; @media screen and (max-width: 600px) { .x { width: 100% } } h1 { color: red }",
        );
        assert_eq!(sheet.at_rules.len(), 2);
        assert_eq!(sheet.at_rules[0].name, "charset");
        assert_eq!(sheet.at_rules[0].prelude, "\"utf-8\"");
        assert_eq!(sheet.at_rules[0].block, None);
        assert_eq!(sheet.at_rules[1].name, "media");
        assert_eq!(sheet.at_rules[1].prelude, "screen and (max-width: 600px)");
        assert_eq!(sheet.at_rules[1].block.as_deref(), Some(".x { width: 100% }"));
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rules[0].source_position, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_chunks_warn() {
        let (sheet, warnings) = parse("garbage; h1 { color: red } } @ { }");
        assert_eq!(sheet.len(), 1);
        assert!(warnings.contains("Invalid or unexpected style data 'garbage;'"));
        assert!(warnings.contains("Invalid or unexpected style data '}'"));
        assert!(warnings.contains("Invalid or unexpected style data '@ { }'"));
    }

    #[test]
    fn test_unterminated_block_warns() {
        let (sheet, warnings) = parse("h1 { color: red");
        assert!(sheet.rules.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_strict_mode_aborts() {
        let mut warnings = Warnings::new(true);
        let result = CssParser::new().parse("h1 { color red }", &mut warnings);
        assert!(matches!(result, Err(CssError::Strict(_))));
    }
}
