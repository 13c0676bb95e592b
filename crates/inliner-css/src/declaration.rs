//! Declaration codec
//!
//! Converts between `prop:value;prop2:value2` strings and property maps.

use std::collections::BTreeMap;

use crate::{CssError, Warnings};

/// Property → value map. Keys are lowercase and iterate in lexicographic
/// order, which makes every encoding deterministic.
pub type Declarations = BTreeMap<String, String>;

/// Decode a style attribute or declaration block
///
/// Malformed fragments are dropped with a warning; a later duplicate
/// property overwrites an earlier one.
pub fn decode(style: &str, warnings: &mut Warnings) -> Result<Declarations, CssError> {
    decode_block(style, false, warnings)
}

/// Encode declarations as `key:value;` pairs
pub fn encode(declarations: &Declarations) -> String {
    let mut out = String::with_capacity(declarations.len() * 16);
    for (property, value) in declarations {
        out.push_str(property);
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Decode, optionally skipping vendor and legacy hack declarations
/// (`*prop`, `-prop`, `_prop`, or values containing `\`) without a warning.
pub(crate) fn decode_block(
    style: &str,
    skip_hacks: bool,
    warnings: &mut Warnings,
) -> Result<Declarations, CssError> {
    let mut declarations = Declarations::new();

    for fragment in split_declarations(style) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        if skip_hacks && is_hack(fragment) {
            tracing::trace!("skipping hack declaration '{}'", fragment);
            continue;
        }

        match parse_declaration(fragment) {
            Some((property, value)) => {
                declarations.insert(property.to_ascii_lowercase(), value.to_string());
            }
            None => {
                warnings.warn(format!(
                    "Invalid or unexpected property '{}' in style '{}'",
                    fragment, style
                ))?;
            }
        }
    }

    Ok(declarations)
}

fn is_hack(fragment: &str) -> bool {
    if fragment.starts_with(['*', '-', '_']) {
        return true;
    }
    match fragment.split_once(':') {
        Some((_, value)) => value.contains('\\'),
        None => false,
    }
}

/// `ident ws* ':' ws* value`, fragment already trimmed
fn parse_declaration(fragment: &str) -> Option<(&str, &str)> {
    let (property, value) = fragment.split_once(':')?;
    let property = property.trim_end();
    if property.is_empty() || !property.chars().all(is_property_char) {
        return None;
    }
    Some((property, value.trim()))
}

fn is_property_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Split on `;`, except inside quotes or parentheses
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ok(style: &str) -> (Declarations, Warnings) {
        let mut warnings = Warnings::new(false);
        let decls = decode(style, &mut warnings).unwrap();
        (decls, warnings)
    }

    #[test]
    fn test_decode_basic() {
        let (decls, warnings) = decode_ok(" color : red ;font-size:20px;;  ");
        assert_eq!(decls.get("color").map(String::as_str), Some("red"));
        assert_eq!(decls.get("font-size").map(String::as_str), Some("20px"));
        assert_eq!(decls.len(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_decode_lowercases_and_last_wins() {
        let (decls, _) = decode_ok("COLOR:red;color:blue");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls["color"], "blue");
    }

    #[test]
    fn test_decode_invalid_fragment_warns() {
        let (decls, warnings) = decode_ok("color red;margin:0");
        assert_eq!(decls.len(), 1);
        assert_eq!(
            warnings.to_vec(),
            vec!["Invalid or unexpected property 'color red' in style 'color red;margin:0'".to_string()]
        );
    }

    #[test]
    fn test_decode_strict_fails() {
        let mut warnings = Warnings::new(true);
        let err = decode("!!!", &mut warnings).unwrap_err();
        assert!(matches!(err, CssError::Strict(msg) if msg.contains("'!!!'")));
    }

    #[test]
    fn test_semicolon_inside_url_does_not_split() {
        let (decls, _) = decode_ok("background:url(data:image/png;base64,AAA=) no-repeat;color:red");
        assert_eq!(decls["background"], "url(data:image/png;base64,AAA=) no-repeat");
        assert_eq!(decls["color"], "red");
    }

    #[test]
    fn test_encode_sorted() {
        let (decls, _) = decode_ok("z-index:1;color:red;background:blue");
        assert_eq!(encode(&decls), "background:blue;color:red;z-index:1;");
        assert_eq!(encode(&Declarations::new()), "");
    }

    #[test]
    fn test_round_trip() {
        let mut map = Declarations::new();
        map.insert("font-family".into(), "\"Helvetica Neue\", Arial".into());
        map.insert("margin".into(), "0 auto".into());
        let (decoded, warnings) = decode_ok(&encode(&map));
        assert_eq!(decoded, map);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_hacks_skipped_silently() {
        let mut warnings = Warnings::new(true);
        let decls = decode_block(
            "*zoom:1;_height:1px;-webkit-border-radius:2px;font:x\\9;color:red",
            true,
            &mut warnings,
        )
        .unwrap();
        assert_eq!(decls.len(), 1);
        assert!(decls.contains_key("color"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_vendor_property_kept_in_plain_decode() {
        let (decls, warnings) = decode_ok("-webkit-text-size-adjust:none");
        assert_eq!(decls["-webkit-text-size-adjust"], "none");
        assert!(warnings.is_empty());
    }
}
