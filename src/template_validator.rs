use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tera::Tera;

/// Maximum skeleton file size (1MB)
const MAX_TEMPLATE_SIZE: u64 = 1024 * 1024;

/// Insertion points every skeleton has to use
const REQUIRED_VARIABLES: &[&str] = &["header", "education", "sections"];

/// Values a complete resume normally shows
const OPTIONAL_VARIABLES: &[&str] = &[
    "skills",
    "sections.academic_work",
    "sections.course_projects",
    "sections.experience",
    "sections.awards",
];

/// Validates custom document skeletons
pub(crate) struct TemplateValidator;

impl TemplateValidator {
    /// Validates a skeleton file before it replaces the built-in one
    ///
    /// Performs the following checks:
    /// 1. File exists and is a regular file
    /// 2. File size is within limits
    /// 3. Template syntax is valid (can be compiled by Tera)
    /// 4. Template references the header, education and section values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File doesn't exist or can't be read
    /// - File is too large or empty
    /// - Template has syntax errors
    /// - Template is missing required insertion points
    pub(crate) fn validate_template(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "Template file not found"),
            ));
        }

        let display = path.to_string_lossy().to_string();

        if !path.is_file() {
            return Err(Error::template_validation(display, "Path is not a file"));
        }

        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if metadata.len() > MAX_TEMPLATE_SIZE {
            return Err(Error::template_validation(
                display,
                format!(
                    "Template file too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    MAX_TEMPLATE_SIZE
                ),
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        if content.trim().is_empty() {
            return Err(Error::template_validation(display, "Template file is empty"));
        }

        let mut temp_tera = Tera::default();
        temp_tera
            .add_raw_template("validation", &content)
            .map_err(|e| {
                Error::template_validation(display.clone(), format!("Template syntax error: {e}"))
            })?;

        Self::check_required_variables(&content, &display)?;
        Self::check_optional_variables(&content);

        Ok(())
    }

    /// Every required value must show up as `ctx.<name>` somewhere.
    fn check_required_variables(content: &str, display: &str) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_VARIABLES
            .iter()
            .filter(|var| !content.contains(&format!("ctx.{var}")))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(Error::template_validation(
                display,
                format!(
                    "Template may be missing required variables: {}. \n\
                    Skeletons should use ctx.header, ctx.education and ctx.sections.",
                    missing.join(", ")
                ),
            ));
        }

        Ok(())
    }

    fn check_optional_variables(content: &str) {
        for var in OPTIONAL_VARIABLES {
            if !content.contains(&format!("ctx.{var}")) {
                tracing::debug!("Template does not use optional variable: {}", var);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_validate_valid_template() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("skeleton.tex.tera");
        template_file
            .write_str(
                "\\section*{ {{ ctx.header.full_name }} }\n\
                {{ ctx.education.ug.university }}\n\
                {% if ctx.sections.awards %}{{ ctx.sections.awards }}{% endif %}",
            )
            .unwrap();

        let result = TemplateValidator::validate_template(template_file.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_builtin_skeleton_passes() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("resume.tex.tera");
        template_file
            .write_str(include_str!("../templates/resume.tex.tera"))
            .unwrap();

        assert!(TemplateValidator::validate_template(template_file.path()).is_ok());
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let result = TemplateValidator::validate_template(Path::new("/nonexistent/template.tera"));
        assert!(result.is_err());
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_validate_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = TemplateValidator::validate_template(temp.path());
        assert!(result.unwrap_err().to_string().contains("not a file"));
    }

    #[test]
    fn test_validate_empty_template() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("empty.tera");
        template_file.write_str("   \n  \n  ").unwrap();

        let result = TemplateValidator::validate_template(template_file.path());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_syntax_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("invalid.tera");
        template_file
            .write_str("{% if ctx.sections.awards %}\nUnclosed if {{ ctx.header.email }}")
            .unwrap();

        let result = TemplateValidator::validate_template(template_file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Template syntax error"));
    }

    #[test]
    fn test_unescaped_latex_braces_are_a_syntax_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("braces.tera");
        template_file
            .write_str("\\newcommand{\\x}[1]{{\\small #1}} {{ ctx.header.email }}")
            .unwrap();

        assert!(TemplateValidator::validate_template(template_file.path()).is_err());
    }

    #[test]
    fn test_validate_missing_required_vars() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("incomplete.tera");
        template_file
            .write_str("Hello {{ ctx.header.full_name }}")
            .unwrap();

        let err_msg = TemplateValidator::validate_template(template_file.path())
            .unwrap_err()
            .to_string();
        assert!(err_msg.contains("missing required variables"));
        assert!(err_msg.contains("education, sections"));
    }

    #[test]
    fn test_validate_file_too_large() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("large.tera");

        let large_content = "x".repeat((MAX_TEMPLATE_SIZE + 1) as usize);
        template_file.write_str(&large_content).unwrap();

        let result = TemplateValidator::validate_template(template_file.path());
        assert!(result.unwrap_err().to_string().contains("too large"));
    }
}
