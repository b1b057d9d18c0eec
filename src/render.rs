//! HTML rendering for the index page.
//!
//! The page is a handlebars template compiled once at startup and rendered
//! per request with the serialized `SystemInfo` as its context.

use crate::core::SystemInfo;
use handlebars::{Handlebars, RenderError, TemplateError};

const INDEX_NAME: &str = "index";

/// The page served at `/`.
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Holds the compiled index template.
pub struct IndexPage {
    handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for IndexPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexPage").finish_non_exhaustive()
    }
}

impl IndexPage {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        // A field missing from the context is a bug, not an empty cell.
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(INDEX_NAME, INDEX_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Renders the page for one reading. Values are HTML-escaped.
    pub fn render(&self, info: &SystemInfo) -> Result<String, RenderError> {
        self.handlebars.render(INDEX_NAME, info)
    }
}
