use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint of the public LaTeX build service.
pub const DEFAULT_ENDPOINT: &str = "https://latex.ytotech.com/builds/sync";
/// Compiler requested from the build service.
pub const DEFAULT_COMPILER: &str = "pdflatex";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_OUTPUT_DIR: &str = "out";

/// What to do with the optional sections when they have no content.
///
/// Applies to course projects and awards alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionPolicy {
    /// Drop the section, heading included.
    #[default]
    Suppress,
    /// Keep the heading and show a placeholder item.
    Placeholder,
}

impl SectionPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suppress => "suppress",
            Self::Placeholder => "placeholder",
        }
    }
}

/// Fixed institutional text printed on every resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    /// Programme shown when the profile leaves it blank.
    pub program: String,
    /// Third line of the header table.
    pub institute_line: String,
    /// University of the post-graduation row.
    pub pg_university: String,
    /// Institute of the post-graduation row.
    pub pg_institute: String,
}

impl Default for Institution {
    fn default() -> Self {
        Self {
            program: "Applied Economics".to_string(),
            institute_line: "Centre For Development Studies, JNU".to_string(),
            pg_university: "JNU, New Delhi".to_string(),
            pg_institute: "Centre for Development Studies".to_string(),
        }
    }
}

/// Connection settings for the remote compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSettings {
    pub endpoint: String,
    pub compiler: String,
    pub timeout: Duration,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the resume build pipeline.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Directory receiving the `.tex`, `.pdf` and manifest files
    pub output_dir: PathBuf,

    /// Handling of empty course project and award sections
    pub section_policy: SectionPolicy,

    /// Institution-specific header and education text
    pub institution: Institution,

    /// Remote compiler settings
    pub compile: CompileSettings,

    /// Write the LaTeX source only
    pub skip_compile: bool,

    /// Dry run mode (no file writes, no network)
    pub dry_run: bool,

    /// Abort on profile validation errors instead of logging them
    pub strict_validation: bool,

    /// Create backups of existing files
    pub backup_existing: bool,

    /// Path to a custom document skeleton
    pub template_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use resume_latex::{Config, SectionPolicy};
    ///
    /// let config = Config::builder()
    ///     .output_dir("./resumes")
    ///     .section_policy(SectionPolicy::Placeholder)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint is not an http(s) URL
    /// - The compiler name is empty or the timeout is zero
    /// - The custom template is missing or rejected by the validator
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.compile.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::config(format!(
                "Compile endpoint must be an http(s) URL: '{}'",
                self.compile.endpoint
            )));
        }

        if self.compile.compiler.trim().is_empty() {
            return Err(Error::config("compiler must not be empty"));
        }

        if self.compile.timeout.is_zero() {
            return Err(Error::config("timeout must be greater than 0"));
        }

        if let Some(ref template_path) = self.template_path {
            if !template_path.exists() {
                return Err(Error::config(format!(
                    "Template file does not exist: {}",
                    template_path.display()
                )));
            }

            if !template_path.is_file() {
                return Err(Error::config(format!(
                    "Template path is not a file: {}",
                    template_path.display()
                )));
            }

            crate::template_validator::TemplateValidator::validate_template(template_path)?;
        }

        if self.dry_run && self.skip_compile {
            tracing::debug!("skip_compile has no effect in dry run mode");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            section_policy: SectionPolicy::default(),
            institution: Institution::default(),
            compile: CompileSettings::default(),
            skip_compile: false,
            dry_run: false,
            strict_validation: true,
            backup_existing: true,
            template_path: None,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    output_dir: Option<PathBuf>,
    section_policy: Option<SectionPolicy>,
    institution: Option<Institution>,
    endpoint: Option<String>,
    compiler: Option<String>,
    timeout: Option<Duration>,
    skip_compile: bool,
    dry_run: bool,
    strict_validation: Option<bool>,
    backup_existing: Option<bool>,
    template_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Sets the output directory for generated files.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets how empty optional sections are rendered.
    #[must_use]
    pub fn section_policy(mut self, policy: SectionPolicy) -> Self {
        self.section_policy = Some(policy);
        self
    }

    /// Replaces the institutional header and education text.
    #[must_use]
    pub fn institution(mut self, institution: Institution) -> Self {
        self.institution = Some(institution);
        self
    }

    /// Sets the compile service endpoint.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the compiler requested from the service.
    #[must_use]
    pub fn compiler(mut self, name: impl Into<String>) -> Self {
        self.compiler = Some(name.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Writes the LaTeX source without compiling it.
    #[must_use]
    pub fn skip_compile(mut self, enabled: bool) -> Self {
        self.skip_compile = enabled;
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables or disables aborting on validation errors.
    #[must_use]
    pub fn strict_validation(mut self, enabled: bool) -> Self {
        self.strict_validation = Some(enabled);
        self
    }

    /// Enables or disables backup creation.
    #[must_use]
    pub fn backup_existing(mut self, enabled: bool) -> Self {
        self.backup_existing = Some(enabled);
        self
    }

    /// Sets the path to a custom document skeleton.
    ///
    /// The file replaces the built-in skeleton. It must be a Tera template
    /// that uses the `ctx.header`, `ctx.education` and `ctx.sections` values.
    #[must_use]
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let defaults = CompileSettings::default();
        let config = Config {
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            section_policy: self.section_policy.unwrap_or_default(),
            institution: self.institution.unwrap_or_default(),
            compile: CompileSettings {
                endpoint: self.endpoint.unwrap_or(defaults.endpoint),
                compiler: self.compiler.unwrap_or(defaults.compiler),
                timeout: self.timeout.unwrap_or(defaults.timeout),
            },
            skip_compile: self.skip_compile,
            dry_run: self.dry_run,
            strict_validation: self.strict_validation.unwrap_or(true),
            backup_existing: self.backup_existing.unwrap_or(true),
            template_path: self.template_path,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_default_config() {
        let config = Config::builder().build().unwrap();

        assert_eq!(config.section_policy, SectionPolicy::Suppress);
        assert_eq!(config.compile.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.compile.compiler, "pdflatex");
        assert_eq!(config.compile.timeout, Duration::from_secs(60));
        assert!(config.strict_validation);
        assert!(config.backup_existing);
        assert_eq!(config.institution.pg_university, "JNU, New Delhi");
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = Config::builder().endpoint("ftp://example.com").build();
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_zero_timeout() {
        let result = Config::builder().timeout(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_compiler() {
        let result = Config::builder().compiler("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_template() {
        let result = Config::builder()
            .template_path("/nonexistent/skeleton.tex.tera")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_custom_template() {
        let temp = assert_fs::TempDir::new().unwrap();
        let skeleton = temp.child("skeleton.tex.tera");
        skeleton
            .write_str("{{ ctx.header.full_name }} {{ ctx.education.ug.grade }} {{ ctx.sections.academic_work }}")
            .unwrap();

        let config = Config::builder().template_path(skeleton.path()).build().unwrap();
        assert_eq!(config.template_path.as_deref(), Some(skeleton.path()));
    }
}
