//! Inliner Engine
//!
//! Moves the rules of a document's `<style>` blocks onto the `style`
//! attribute of every element they match, for delivery channels (e-mail
//! clients) that ignore top-level stylesheets.
//!
//! # Example
//! ```rust,ignore
//! use inliner_engine::{Config, Inliner};
//!
//! let mut inliner = Inliner::new(Config::default());
//! inliner.read("<style>h1 { color: red }</style><h1>Hi</h1>")?;
//! let html = inliner.inlinify()?;
//! ```

mod config;
mod inliner;
mod extract;

pub use config::Config;
pub use inliner::Inliner;
pub use extract::{classify_media, MediaClass};

// Re-export sub-crates for advanced usage
pub use inliner_css as css;
pub use inliner_dom as dom;
pub use inliner_html as html;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Inline a document with the default configuration
pub fn inline(html: &str) -> Result<String, InlinerError> {
    let mut inliner = Inliner::new(Config::default());
    inliner.read(html)?;
    inliner.inlinify()
}

/// Inliner error
#[derive(Debug, thiserror::Error)]
pub enum InlinerError {
    #[error("no document loaded, call read() before inlinify()")]
    NotLoaded,

    #[error("cannot inline an empty document")]
    EmptyDocument,

    #[error(transparent)]
    Html(#[from] inliner_html::HtmlError),

    #[error(transparent)]
    Css(#[from] inliner_css::CssError),
}
