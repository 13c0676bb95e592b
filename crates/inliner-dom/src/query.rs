//! CSS2.1 selector queries
//!
//! Parses selectors into compound selectors joined by combinators and
//! matches them right-to-left against the tree.

use crate::{DomTree, ElementData, NodeId, SelectorError};

/// Combinator between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

/// Attribute selector operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// [attr]
    Exists,
    /// [attr=value]
    Equals,
    /// [attr~=value]
    Includes,
    /// [attr|=value]
    DashMatch,
    /// [attr^=value]
    Prefix,
    /// [attr$=value]
    Suffix,
    /// [attr*=value]
    Substring,
}

/// A simple selector inside a compound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attribute {
        name: String,
        op: AttrOp,
        value: String,
    },
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    Root,
}

/// Sequence of simple selectors that all apply to one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub parts: Vec<SimpleSelector>,
}

/// A complex selector: `compounds[i]` and `compounds[i + 1]` are joined
/// by `combinators[i]`, reading left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

impl Selector {
    /// Parse a single complex selector (no commas)
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(text).parse_complex()
    }

    /// Parse a comma-separated selector group
    pub fn parse_list(text: &str) -> Result<Vec<Self>, SelectorError> {
        let mut out = Vec::new();
        for part in split_top_level_commas(text) {
            out.push(Self::parse(part)?);
        }
        if out.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(out)
    }

    /// Whether this selector matches the element `id`
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(tree, id, n - 1),
        }
    }

    fn matches_at(&self, tree: &DomTree, id: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(tree, id) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match self.combinators[idx - 1] {
            Combinator::Child => tree
                .parent_element(id)
                .is_some_and(|p| self.matches_at(tree, p, idx - 1)),
            Combinator::Descendant => {
                let mut cur = tree.parent_element(id);
                while let Some(ancestor) = cur {
                    if self.matches_at(tree, ancestor, idx - 1) {
                        return true;
                    }
                    cur = tree.parent_element(ancestor);
                }
                false
            }
            Combinator::NextSibling => tree
                .prev_element_sibling(id)
                .is_some_and(|s| self.matches_at(tree, s, idx - 1)),
            Combinator::SubsequentSibling => {
                let mut cur = tree.prev_element_sibling(id);
                while let Some(sibling) = cur {
                    if self.matches_at(tree, sibling, idx - 1) {
                        return true;
                    }
                    cur = tree.prev_element_sibling(sibling);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(elem) = tree.element(id) else {
            return false;
        };
        self.parts.iter().all(|part| part.matches(tree, id, elem))
    }
}

impl SimpleSelector {
    fn matches(&self, tree: &DomTree, id: NodeId, elem: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(tag) => elem.is(tag),
            Self::Id(want) => elem.id() == Some(want.as_str()),
            Self::Class(class) => elem.has_class(class),
            Self::Attribute { name, op, value } => match elem.get_attr(name) {
                Some(actual) => matches_attribute(actual, *op, value),
                None => false,
            },
            Self::FirstChild => tree.prev_element_sibling(id).is_none(),
            Self::LastChild => tree.next_element_sibling(id).is_none(),
            Self::OnlyChild => {
                tree.prev_element_sibling(id).is_none() && tree.next_element_sibling(id).is_none()
            }
            Self::Empty => tree
                .children(id)
                .all(|(_, child)| !child.is_element() && child.as_text().is_none_or(str::is_empty)),
            Self::Root => tree.get(id).is_some_and(|n| n.parent == NodeId::ROOT),
        }
    }
}

fn matches_attribute(actual: &str, op: AttrOp, expected: &str) -> bool {
    match op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => {
            !expected.is_empty() && actual.split_ascii_whitespace().any(|w| w == expected)
        }
        AttrOp::DashMatch => {
            actual == expected
                || (actual.starts_with(expected) && actual[expected.len()..].starts_with('-'))
        }
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
    }
}

impl DomTree {
    /// All attached elements matching a selector group, in document order
    pub fn query(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selectors = Selector::parse_list(selector)?;
        let found: Vec<NodeId> = self
            .elements()
            .filter(|&id| selectors.iter().any(|s| s.matches(self, id)))
            .collect();
        tracing::trace!("query '{}' matched {} elements", selector, found.len());
        Ok(found)
    }
}

/// Split on commas that are not inside brackets, parentheses or quotes
pub(crate) fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

struct SelectorParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let before = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != before
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::UnexpectedChar {
                selector: self.text.to_string(),
                found,
                offset: self.pos,
            },
            None => SelectorError::DanglingCombinator { selector: self.text.to_string() },
        }
    }

    fn parse_complex(mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            if self.peek().is_none() {
                return Err(SelectorError::DanglingCombinator { selector: self.text.to_string() });
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(Selector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => {
                self.bump();
                compound.parts.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_start(c) => {
                let name = self.parse_ident();
                compound.parts.push(SimpleSelector::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    let id = self.parse_ident();
                    if id.is_empty() {
                        return Err(self.unexpected());
                    }
                    compound.parts.push(SimpleSelector::Id(id));
                }
                Some('.') => {
                    self.bump();
                    let class = self.parse_ident();
                    if class.is_empty() {
                        return Err(self.unexpected());
                    }
                    compound.parts.push(SimpleSelector::Class(class));
                }
                Some('[') => {
                    self.bump();
                    compound.parts.push(self.parse_attribute()?);
                }
                Some(':') => {
                    self.bump();
                    compound.parts.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }

        if compound.parts.is_empty() {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                if let Some(escaped) = self.bump() {
                    out.push(escaped);
                }
            } else if is_ident_char(c) {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn parse_attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        let text = self.text;
        let unterminated = move || SelectorError::UnterminatedAttribute { selector: text.to_string() };

        self.skip_whitespace();
        let name = self.parse_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(SimpleSelector::Attribute { name, op: AttrOp::Exists, value: String::new() });
            }
            Some('=') => AttrOp::Equals,
            Some('~') => AttrOp::Includes,
            Some('|') => AttrOp::DashMatch,
            Some('^') => AttrOp::Prefix,
            Some('$') => AttrOp::Suffix,
            Some('*') => AttrOp::Substring,
            None => return Err(unterminated()),
            Some(_) => return Err(self.unexpected()),
        };
        self.bump();
        if op != AttrOp::Equals {
            if self.peek() != Some('=') {
                return Err(self.unexpected());
            }
            self.bump();
        }
        self.skip_whitespace();

        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == q => break,
                        Some('\\') => {
                            if let Some(escaped) = self.bump() {
                                value.push(escaped);
                            }
                        }
                        Some(c) => value.push(c),
                        None => return Err(unterminated()),
                    }
                }
                value
            }
            _ => self.parse_ident(),
        };

        self.skip_whitespace();
        // Case-sensitivity flags are accepted and ignored
        if matches!(self.peek(), Some('i' | 'I' | 's' | 'S')) {
            self.bump();
            self.skip_whitespace();
        }
        match self.bump() {
            Some(']') => Ok(SimpleSelector::Attribute { name, op, value }),
            None => Err(unterminated()),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_pseudo(&mut self) -> Result<SimpleSelector, SelectorError> {
        if self.peek() == Some(':') {
            self.bump();
        }
        let name = self.parse_ident().to_ascii_lowercase();
        match name.as_str() {
            "first-child" => Ok(SimpleSelector::FirstChild),
            "last-child" => Ok(SimpleSelector::LastChild),
            "only-child" => Ok(SimpleSelector::OnlyChild),
            "empty" => Ok(SimpleSelector::Empty),
            "root" => Ok(SimpleSelector::Root),
            _ => Err(SelectorError::UnsupportedPseudo {
                selector: self.text.to_string(),
                name,
            }),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
