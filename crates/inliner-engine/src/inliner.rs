//! Inliner - loads a document and inlines its stylesheets

use inliner_css::{ResolveOptions, StyleResolver};
use inliner_dom::DomTree;

use crate::extract::{extract_styles, insert_retained};
use crate::{Config, InlinerError};

/// CSS inliner
///
/// One instance holds one document. `read` loads it and pulls out its
/// stylesheets; `inlinify` applies them and returns the resulting HTML.
pub struct Inliner {
    config: Config,
    document: Option<DomTree>,
    css: String,
    /// Set once the CSS has been written into the document
    applied: bool,
    warnings: Vec<String>,
}

impl Inliner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            document: None,
            css: String::new(),
            applied: false,
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load an HTML document and extract its inlineable `<style>` blocks
    pub fn read(&mut self, html: &str) -> Result<(), InlinerError> {
        if html.trim().is_empty() {
            return Err(InlinerError::EmptyDocument);
        }

        let mut tree = inliner_html::parse(html)?;
        self.css = extract_styles(&mut tree, &self.config);
        self.document = Some(tree);
        self.applied = false;
        self.warnings.clear();
        Ok(())
    }

    /// CSS collected from the loaded document
    pub fn css(&self) -> &str {
        &self.css
    }

    /// The loaded document, if any
    pub fn document(&self) -> Option<&DomTree> {
        self.document.as_ref()
    }

    /// Warnings from the last `inlinify` run, sorted and deduplicated
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Inline the collected CSS into the document and serialize it
    ///
    /// Calling it again only re-normalizes the already inlined document.
    pub fn inlinify(&mut self) -> Result<String, InlinerError> {
        let tree = self.document.as_mut().ok_or(InlinerError::NotLoaded)?;

        let mut resolver = StyleResolver::new(ResolveOptions {
            strict: self.config.warnings_as_errors,
            strip_attrs: self.config.strip_attrs,
            retain_non_inlineable: self.config.relaxed,
        });
        let css = if self.applied { "" } else { self.css.as_str() };
        let result = resolver.inlinify(tree, css);
        self.warnings = resolver.warnings().to_vec();
        let resolution = result?;

        if self.config.relaxed {
            insert_retained(tree, &resolution.retained_rules, &resolution.retained_at_rules);
        }
        self.applied = true;

        tracing::debug!(
            "Inlined {} elements with {} warnings",
            resolution.styled,
            self.warnings.len()
        );
        Ok(inliner_html::serialize(tree))
    }
}
