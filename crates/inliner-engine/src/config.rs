//! Inliner configuration

use serde::{Deserialize, Serialize};

/// Inliner configuration
///
/// Every option defaults to off; missing fields deserialize to their
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remove `id` and `class` attributes after inlining
    pub strip_attrs: bool,
    /// Keep the original `<style>` blocks in the output
    pub leave_style: bool,
    /// Preserve non-inlineable rules and at-rules in a new `<style>` block
    pub relaxed: bool,
    /// Fail on the first warning instead of collecting it
    pub warnings_as_errors: bool,
    /// Inline `<style>` blocks regardless of their `type` attribute
    pub ignore_style_type_attr: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_attrs(mut self, value: bool) -> Self {
        self.strip_attrs = value;
        self
    }

    pub fn with_leave_style(mut self, value: bool) -> Self {
        self.leave_style = value;
        self
    }

    pub fn with_relaxed(mut self, value: bool) -> Self {
        self.relaxed = value;
        self
    }

    pub fn with_warnings_as_errors(mut self, value: bool) -> Self {
        self.warnings_as_errors = value;
        self
    }

    pub fn with_ignore_style_type_attr(mut self, value: bool) -> Self {
        self.ignore_style_type_attr = value;
        self
    }

    pub fn strip_attrs(&self) -> bool {
        self.strip_attrs
    }

    pub fn leave_style(&self) -> bool {
        self.leave_style
    }

    pub fn relaxed(&self) -> bool {
        self.relaxed
    }

    pub fn warnings_as_errors(&self) -> bool {
        self.warnings_as_errors
    }

    pub fn ignore_style_type_attr(&self) -> bool {
        self.ignore_style_type_attr
    }
}
