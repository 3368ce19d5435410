use crate::compile::CompileError;
use crate::validate::ValidationIssue;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the resume-latex library.
///
/// Rendering itself has no error kind: missing profile data always degrades
/// to empty text. Errors come from configuration, custom skeletons,
/// validation, file output and the remote compiler.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Template rendering error.
    #[error("Failed to render template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Error message
        message: String,
    },

    /// A custom document skeleton was rejected.
    #[error("Invalid template '{path}': {reason}")]
    TemplateValidation {
        /// Path of the rejected template
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// The profile failed field validation.
    #[error("Profile is invalid ({count} problems): {}", summarize(.issues))]
    InvalidProfile {
        /// Number of blocking issues
        count: usize,
        /// The blocking issues
        issues: Vec<ValidationIssue>,
    },

    /// System time error.
    #[error("System time error: {message}")]
    SystemTime {
        /// Error message
        message: String,
    },

    /// The remote compilation service failed.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a template error.
    #[must_use]
    pub fn template(template: impl Into<String>, source: tera::Error) -> Self {
        Self::Template {
            template: template.into(),
            message: render_chain(&source),
        }
    }

    /// Creates a template validation error.
    #[must_use]
    pub fn template_validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateValidation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wraps blocking validation issues.
    #[must_use]
    pub fn invalid_profile(issues: Vec<ValidationIssue>) -> Self {
        let count = issues.len();
        Self::InvalidProfile { count, issues }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if the profile was rejected by validation.
    #[must_use]
    pub const fn is_invalid_profile(&self) -> bool {
        matches!(self, Self::InvalidProfile { .. })
    }
}

// tera hides the useful part of parse errors in the source chain
fn render_chain(err: &tera::Error) -> String {
    use std::error::Error as _;

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

impl From<std::time::SystemTimeError> for Error {
    fn from(e: std::time::SystemTimeError) -> Self {
        Self::SystemTime {
            message: e.to_string(),
        }
    }
}

impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Self::Template {
            template: "unknown".to_string(),
            message: render_chain(&e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
