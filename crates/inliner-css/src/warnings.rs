//! Warning collection
//!
//! Warnings are deduplicated. In strict mode the first warning becomes an
//! error instead.

use std::collections::BTreeSet;

use crate::CssError;

/// Deduplicated set of warnings raised during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    strict: bool,
    messages: BTreeSet<String>,
}

impl Warnings {
    pub fn new(strict: bool) -> Self {
        Self { strict, messages: BTreeSet::new() }
    }

    /// Record a warning, or fail with it in strict mode
    pub fn warn(&mut self, message: impl Into<String>) -> Result<(), CssError> {
        let message = message.into();
        if self.strict {
            return Err(CssError::Strict(message));
        }
        if !self.messages.contains(&message) {
            tracing::warn!("{}", message);
            self.messages.insert(message);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.contains(message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Sorted copy of all messages
    pub fn to_vec(&self) -> Vec<String> {
        self.messages.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let mut warnings = Warnings::new(false);
        warnings.warn("b").unwrap();
        warnings.warn("a").unwrap();
        warnings.warn("b").unwrap();
        assert_eq!(warnings.to_vec(), vec!["a", "b"]);
        warnings.clear();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_strict_raises() {
        let mut warnings = Warnings::new(true);
        assert_eq!(warnings.warn("oops"), Err(CssError::Strict("oops".into())));
        assert!(warnings.is_empty());
    }
}
