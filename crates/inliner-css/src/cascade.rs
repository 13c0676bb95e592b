//! Style Cascade & Resolver
//!
//! Writes stylesheet rules into inline `style` attributes by:
//! 1. Skipping selectors that cannot be represented inline
//! 2. Querying the document for each remaining rule
//! 3. Sorting each element's matches by specificity and source order
//! 4. Folding declarations, with the element's own inline style last
//! 5. Normalizing every style attribute in a final pass

use std::collections::HashMap;
use std::sync::Arc;

use crate::declaration::{decode, encode};
use crate::{AtRule, CssError, CssParser, Declarations, Rule, Specificity, Stylesheet, StyledDocument, Warnings};

/// Pseudo-classes and pseudo-elements that have no inline equivalent
const NON_INLINEABLE_PSEUDOS: &[&str] = &[
    "active", "focus", "hover", "link", "visited", "after", "before", "selection",
    "target", "first-line", "first-letter", "first-child",
];

/// Whether a selector can be represented as an inline style
pub fn is_inlineable(selector: &str) -> bool {
    let selector = selector.trim_start();
    if selector.starts_with('@') {
        return false;
    }

    // Colons inside attribute brackets or quoted values are not pseudos
    let lower = selector.to_ascii_lowercase();
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;
    for (i, c) in lower.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => brackets += 1,
            (None, ']') => brackets = brackets.saturating_sub(1),
            (None, ':') if brackets == 0 => {
                let rest = lower[i..].trim_start_matches(':');
                let name_len = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                    .unwrap_or(rest.len());
                if NON_INLINEABLE_PSEUDOS.contains(&&rest[..name_len]) {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Resolver configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Raise the first warning as an error
    pub strict: bool,
    /// Remove `id` and `class` attributes from every element
    pub strip_attrs: bool,
    /// Hand non-inlineable rules and at-rules back instead of warning
    pub retain_non_inlineable: bool,
}

/// One rule matching one element
#[derive(Debug, Clone)]
pub struct MatchRecord<H> {
    pub element: H,
    pub specificity: Specificity,
    pub source_position: usize,
    pub declarations: Arc<Declarations>,
}

/// Outcome of a resolution run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Elements whose style attribute was written from stylesheet rules
    pub styled: usize,
    /// Non-inlineable rules, when retained
    pub retained_rules: Vec<Rule>,
    /// At-rules, when retained
    pub retained_at_rules: Vec<AtRule>,
}

/// Style resolver - inlines a stylesheet into a document
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    options: ResolveOptions,
    warnings: Warnings,
}

impl StyleResolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            warnings: Warnings::new(options.strict),
        }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Warnings from the most recent run
    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Parse `css` and inline it into `doc`
    ///
    /// Parse warnings and cascade warnings land in the same set, which is
    /// cleared first.
    pub fn inlinify<D: StyledDocument>(&mut self, doc: &mut D, css: &str) -> Result<Resolution, CssError> {
        self.warnings.clear();
        let stylesheet = CssParser::new().parse(css, &mut self.warnings)?;
        self.run(doc, &stylesheet)
    }

    /// Inline an already parsed stylesheet into `doc`
    pub fn resolve<D: StyledDocument>(&mut self, doc: &mut D, stylesheet: &Stylesheet) -> Result<Resolution, CssError> {
        self.warnings.clear();
        self.run(doc, stylesheet)
    }

    fn run<D: StyledDocument>(&mut self, doc: &mut D, stylesheet: &Stylesheet) -> Result<Resolution, CssError> {
        let mut resolution = Resolution::default();

        for at_rule in &stylesheet.at_rules {
            if self.options.retain_non_inlineable {
                resolution.retained_at_rules.push(at_rule.clone());
            } else {
                self.warnings.warn(format!("Unable to inline at-rule '@{}'", at_rule.name))?;
            }
        }

        // Element -> pending matches; `order` remembers first-match order
        let mut pending: HashMap<D::Handle, Vec<MatchRecord<D::Handle>>> = HashMap::new();
        let mut order: Vec<D::Handle> = Vec::new();

        for rule in &stylesheet.rules {
            if !is_inlineable(&rule.selector) {
                if self.options.retain_non_inlineable {
                    resolution.retained_rules.push(rule.clone());
                } else {
                    self.warnings.warn(format!(
                        "Unable to inline selector '{}': pseudo selectors are not inlineable",
                        rule.selector
                    ))?;
                }
                continue;
            }

            let matched = match doc.query(&rule.selector) {
                Ok(matched) => matched,
                Err(err) => {
                    self.warnings.warn(format!("Unable to match selector '{}': {}", rule.selector, err))?;
                    continue;
                }
            };
            if matched.is_empty() {
                continue;
            }

            let specificity = Specificity::of(&rule.selector);
            tracing::trace!(
                "rule '{}' ({:?}) matched {} elements",
                rule.selector,
                specificity,
                matched.len()
            );

            for element in matched {
                pending
                    .entry(element)
                    .or_insert_with(|| {
                        order.push(element);
                        Vec::new()
                    })
                    .push(MatchRecord {
                        element,
                        specificity,
                        source_position: rule.source_position,
                        declarations: Arc::clone(&rule.declarations),
                    });
            }
        }

        for element in order {
            let Some(mut records) = pending.remove(&element) else {
                continue;
            };
            records.sort_by_key(|r| (r.specificity, r.source_position));

            let mut merged = Declarations::new();
            for record in &records {
                for (property, value) in record.declarations.iter() {
                    merged.insert(property.clone(), value.clone());
                }
            }

            if let Some(inline) = doc.get_attribute(element, "style").map(str::to_owned) {
                merged.extend(decode(&inline, &mut self.warnings)?);
            }

            doc.set_attribute(element, "style", encode(&merged));
            resolution.styled += 1;
        }

        self.collapse(doc)?;

        tracing::debug!(
            "Inlined styles into {} elements ({} warnings)",
            resolution.styled,
            self.warnings.len()
        );
        Ok(resolution)
    }

    /// Re-encode every style attribute with sorted, unique properties and
    /// strip `id`/`class` when configured.
    fn collapse<D: StyledDocument>(&mut self, doc: &mut D) -> Result<(), CssError> {
        for element in doc.elements() {
            if let Some(style) = doc.get_attribute(element, "style").map(str::to_owned) {
                let declarations = decode(&style, &mut self.warnings)?;
                if declarations.is_empty() {
                    doc.remove_attribute(element, "style");
                } else {
                    doc.set_attribute(element, "style", encode(&declarations));
                }
            }

            if self.options.strip_attrs {
                doc.remove_attribute(element, "id");
                doc.remove_attribute(element, "class");
            }
        }
        Ok(())
    }
}
