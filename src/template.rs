use crate::{
    config::Config,
    document::DocumentContext,
    error::{Error, Result},
    sanitize::escape_latex,
};
use std::collections::HashMap;
use std::fs;
use tera::{Context, Tera, Value};

/// Name the document skeleton is registered under.
///
/// The `.tex` suffix keeps Tera's HTML autoescaping away from it.
pub(crate) const DOCUMENT_TEMPLATE: &str = "resume.tex";

const BUILTIN_SKELETON: &str = include_str!("../templates/resume.tex.tera");

/// Template engine rendering the document skeleton.
pub(crate) struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Creates a new template engine from configuration.
    ///
    /// Loads the custom skeleton when one is configured, the built-in one
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the skeleton cannot be read or does not parse.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());

        match config.template_path {
            Some(ref path) => {
                let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                tracing::debug!("Using custom skeleton {}", path.display());
                tera.add_raw_template(DOCUMENT_TEMPLATE, &source)
                    .map_err(|e| Error::template(path.display().to_string(), e))?;
            }
            None => Self::register_builtin_template(&mut tera)?,
        }

        Self::register_filters(&mut tera);

        Ok(Self { tera })
    }

    fn register_builtin_template(tera: &mut Tera) -> Result<()> {
        tera.add_raw_template(DOCUMENT_TEMPLATE, BUILTIN_SKELETON)
            .map_err(|e| Error::template(DOCUMENT_TEMPLATE, e))
    }

    fn register_filters(tera: &mut Tera) {
        tera.register_filter("latex_escape", Self::latex_escape_filter);
    }

    /// Escapes a string value for literal typesetting.
    ///
    /// Every value in the document context is already escaped; this is for
    /// custom skeletons that print their own extras.
    fn latex_escape_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(escape_latex(s))),
            Value::Null => Ok(Value::String(String::new())),
            other => Ok(Value::String(escape_latex(&other.to_string()))),
        }
    }

    /// Renders the document skeleton with the assembled sections.
    ///
    /// Values are inserted in a single pass; inserted text is never
    /// re-read as template syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub(crate) fn render(&self, document: &DocumentContext) -> Result<String> {
        let mut tera_context = Context::new();
        tera_context.insert("ctx", document);

        self.tera
            .render(DOCUMENT_TEMPLATE, &tera_context)
            .map_err(|e| Error::template(DOCUMENT_TEMPLATE, e))
    }
}
