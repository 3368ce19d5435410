//! # resume-latex
//!
//! Turns a structured resume profile into a LaTeX document and compiles it
//! to PDF through a remote LaTeX build service.
//!
//! ## Features
//!
//! - LaTeX escaping of every piece of user text
//! - Per-section renderers with fixed truncation limits
//! - Optional sections that vanish, heading included, when empty
//! - Tera document skeleton, replaceable with a custom one
//! - Remote compilation with typed failures
//! - Atomic artifact writes with automatic backups
//!
//! ## Quick Start
//!
//! ```no_run
//! use resume_latex::{Config, Pipeline, Profile};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let profile = Profile::from_json(&std::fs::read_to_string("profile.json")?)?;
//! let config = Config::builder().output_dir("./out").build()?;
//!
//! let report = Pipeline::new(config)?.run(&profile).await?;
//! report.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Validator**: Checks field rules and reports issues
//! 2. **Sections**: Render escaped LaTeX fragments per resume section
//! 3. **Assembler**: Fills the document skeleton with the fragments
//! 4. **Compiler**: Submits the document to the build service
//! 5. **Writer**: Persists the source, the PDF and a manifest

#![warn(
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

mod config;
mod document;
mod error;
mod pipeline;
mod template;
mod template_validator;
mod writer;

pub mod compile;
pub mod format;
pub mod profile;
pub mod sanitize;
pub mod sections;
pub mod validate;

pub use compile::{CompileError, Compiler, RemoteCompiler};
pub use config::{
    CompileSettings, Config, ConfigBuilder, Institution, SectionPolicy, DEFAULT_COMPILER,
    DEFAULT_ENDPOINT,
};
pub use document::{Assembler, DocumentContext, SectionsView};
pub use error::{Error, Result};
pub use pipeline::{BuildReport, Pipeline, DEFAULT_BASENAME};
pub use profile::Profile;
pub use validate::{validate_profile, Severity, ValidationIssue};
pub use writer::{ArtifactSummary, CompileStatus};

/// Renders a profile with the default configuration.
///
/// Empty optional sections are suppressed and the built-in skeleton is used.
/// Nothing is validated, written or compiled.
///
/// # Errors
///
/// Returns an error only if the built-in skeleton fails to render.
///
/// # Examples
///
/// ```
/// use resume_latex::{render_latex, Profile};
///
/// let profile = Profile::from_json(r#"{"first_name": "anita", "last_name": "rao"}"#).unwrap();
/// let latex = render_latex(&profile).unwrap();
/// assert!(latex.contains("Anita Rao"));
/// ```
pub fn render_latex(profile: &Profile) -> Result<String> {
    Assembler::new(&Config::default())?.assemble(profile)
}
