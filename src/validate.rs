//! Field-level checks performed before a profile is rendered.
//!
//! Validation never changes the profile and never blocks rendering by
//! itself; the pipeline decides what to do with the issues.

use crate::profile::Profile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Maximum length of first and last names.
pub const MAX_NAME_CHARS: usize = 40;

/// Maximum length of an institute's short name.
pub const MAX_INSTITUTE_CHARS: usize = 35;

/// Maximum length of any single descriptive line.
pub const MAX_LINE_CHARS: usize = 120;

/// Term papers rendered at most.
pub const MAX_TERM_PAPERS: usize = 2;

/// Description lines rendered per term paper at most.
pub const MAX_PAPER_LINES: usize = 3;

/// Current/future work lines rendered per dissertation list at most.
pub const MAX_WORK_LINES: usize = 2;

/// Responsibility bullets rendered per experience entry at most.
pub const MAX_BULLETS: usize = 4;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static COURSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^AE-[0-9]{3}$").expect("valid course code pattern"));

/// Returns true if `email` looks like a deliverable address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Returns true for course codes of the form `AE-` plus three digits.
#[must_use]
pub fn is_valid_course_code(code: &str) -> bool {
    COURSE_CODE.is_match(code)
}

/// Admission batches offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    Y2024,
    Y2025,
    Y2026,
}

impl Batch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Y2024 => "2024-26",
            Self::Y2025 => "2025-27",
            Self::Y2026 => "2026-28",
        }
    }
}

impl FromStr for Batch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "2024-26" => Ok(Self::Y2024),
            "2025-27" => Ok(Self::Y2025),
            "2026-28" => Ok(Self::Y2026),
            other => Err(format!("Unknown batch '{other}'")),
        }
    }
}

/// Gender options offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
    Undisclosed,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::Undisclosed => "Prefer not to say",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            "Prefer not to say" => Ok(Self::Undisclosed),
            other => Err(format!("Unknown gender option '{other}'")),
        }
    }
}

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks generation under strict validation.
    Error,
    /// Content will be truncated or dropped; generation continues.
    Warning,
}

/// One problem found in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `course_projects[0].course_code`
    pub field: String,
    /// Human-readable description
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collects issues while walking a profile.
#[derive(Default)]
struct Checker {
    issues: Vec<ValidationIssue>,
}

impl Checker {
    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues
            .push(ValidationIssue::new(field, message, Severity::Error));
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues
            .push(ValidationIssue::new(field, message, Severity::Warning));
    }

    fn required(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.error(field, format!("{label} is required"));
        }
    }

    fn max_chars(&mut self, field: impl Into<String>, value: &str, limit: usize) {
        let len = value.chars().count();
        if len > limit {
            self.error(field, format!("Maximum {limit} characters (got {len})"));
        }
    }

    fn lines(&mut self, field: &str, lines: &[String], cap: usize) {
        if lines.len() > cap {
            self.warn(
                field,
                format!("Only the first {cap} of {} entries are rendered", lines.len()),
            );
        }
        for (idx, line) in lines.iter().enumerate() {
            self.max_chars(format!("{field}[{idx}]"), line, MAX_LINE_CHARS);
        }
    }
}

/// Checks a profile against the form's field rules.
///
/// Returns every issue found, errors and warnings alike, in document order.
#[must_use]
pub fn validate_profile(profile: &Profile) -> Vec<ValidationIssue> {
    let mut check = Checker::default();

    check.required("first_name", &profile.first_name, "First name");
    check.required("last_name", &profile.last_name, "Last name");
    check.max_chars("first_name", &profile.first_name, MAX_NAME_CHARS);
    check.max_chars("last_name", &profile.last_name, MAX_NAME_CHARS);

    if profile.email.trim().is_empty() {
        check.error("email", "Email is required");
    } else if !is_valid_email(&profile.email) {
        check.error("email", "Invalid email format");
    }

    if !profile.batch.is_empty() {
        if let Err(message) = profile.batch.parse::<Batch>() {
            check.error("batch", message);
        }
    }
    if !profile.gender.is_empty() {
        if let Err(message) = profile.gender.parse::<Gender>() {
            check.error("gender", message);
        }
    }

    for (key, record) in [
        ("ssc", &profile.ssc),
        ("hsc", &profile.hsc),
        ("ug", &profile.ug),
        ("pg", &profile.pg),
    ] {
        check.max_chars(
            format!("{key}.institute_short"),
            &record.institute_short,
            MAX_INSTITUTE_CHARS,
        );
    }

    if profile.dissertation_selected {
        let diss = &profile.dissertation;
        check.lines(
            "dissertation.current_work_lines",
            &diss.current_work_lines,
            MAX_WORK_LINES,
        );
        check.lines(
            "dissertation.future_work_lines",
            &diss.future_work_lines,
            MAX_WORK_LINES,
        );
    } else {
        if profile.term_papers.len() > MAX_TERM_PAPERS {
            check.warn(
                "term_papers",
                format!(
                    "Only the first {MAX_TERM_PAPERS} of {} term papers are rendered",
                    profile.term_papers.len()
                ),
            );
        }
        for (idx, paper) in profile.term_papers.iter().enumerate() {
            check.lines(
                &format!("term_papers[{idx}].description_lines"),
                &paper.description_lines,
                MAX_PAPER_LINES,
            );
        }
    }

    for (idx, project) in profile.course_projects.iter().enumerate() {
        let code = &project.course_code;
        if !code.is_empty() && !is_valid_course_code(code) {
            check.error(
                format!("course_projects[{idx}].course_code"),
                format!("Invalid course code: {code}. Must be AE-XXX format"),
            );
        }
        check.max_chars(
            format!("course_projects[{idx}].one_line_description"),
            &project.one_line_description,
            MAX_LINE_CHARS,
        );
    }

    for (idx, exp) in profile.experience.iter().enumerate() {
        check.lines(&format!("experience[{idx}].bullets"), &exp.bullets, MAX_BULLETS);
    }

    for (idx, award) in profile.awards.iter().enumerate() {
        check.max_chars(format!("awards[{idx}]"), award, MAX_LINE_CHARS);
    }

    check.issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CourseProject, Experience, TermPaper};

    fn valid_profile() -> Profile {
        Profile {
            first_name: "Anita".to_string(),
            last_name: "Rao".to_string(),
            email: "anita.rao@example.org".to_string(),
            batch: "2024-26".to_string(),
            gender: "Female".to_string(),
            ..Profile::default()
        }
    }

    fn errors(profile: &Profile) -> Vec<String> {
        validate_profile(profile)
            .into_iter()
            .filter(ValidationIssue::is_error)
            .map(|issue| issue.field)
            .collect()
    }

    #[test]
    fn test_valid_profile_has_no_issues() {
        assert!(validate_profile(&valid_profile()).is_empty());
    }

    #[test]
    fn test_course_codes() {
        assert!(is_valid_course_code("AE-201"));
        assert!(!is_valid_course_code("AE-20"));
        assert!(!is_valid_course_code("ae-201"));
        assert!(!is_valid_course_code("AE-2011"));
        assert!(!is_valid_course_code(" AE-201"));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.in"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@domain.c"));
    }

    #[test]
    fn test_required_identity_fields() {
        let profile = Profile::default();
        assert_eq!(errors(&profile), vec!["first_name", "last_name", "email"]);
    }

    #[test]
    fn test_name_length_limit() {
        let mut profile = valid_profile();
        profile.first_name = "x".repeat(MAX_NAME_CHARS + 1);
        assert_eq!(errors(&profile), vec!["first_name"]);
    }

    #[test]
    fn test_unknown_batch_and_gender() {
        let mut profile = valid_profile();
        profile.batch = "2030-32".to_string();
        profile.gender = "?".to_string();
        assert_eq!(errors(&profile), vec!["batch", "gender"]);
    }

    #[test]
    fn test_enum_options_round_trip() {
        for batch in [Batch::Y2024, Batch::Y2025, Batch::Y2026] {
            assert_eq!(batch.as_str().parse::<Batch>(), Ok(batch));
        }
        assert_eq!("Prefer not to say".parse::<Gender>(), Ok(Gender::Undisclosed));
    }

    #[test]
    fn test_invalid_course_code_reported() {
        let mut profile = valid_profile();
        profile.course_projects = vec![
            CourseProject {
                course_code: "AE-201".to_string(),
                ..CourseProject::default()
            },
            CourseProject {
                course_code: "AE-20".to_string(),
                ..CourseProject::default()
            },
            CourseProject::default(),
        ];

        let issues = validate_profile(&profile);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "course_projects[1].course_code");
        assert!(issues[0].message.contains("AE-XXX"));
    }

    #[test]
    fn test_truncation_is_a_warning() {
        let mut profile = valid_profile();
        profile.term_papers = vec![TermPaper::default(); 5];
        profile.experience = vec![Experience {
            bullets: vec!["did things".to_string(); 6],
            ..Experience::default()
        }];

        let issues = validate_profile(&profile);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|issue| !issue.is_error()));
        assert_eq!(issues[0].field, "term_papers");
        assert_eq!(issues[1].field, "experience[0].bullets");
    }

    #[test]
    fn test_long_award_line() {
        let mut profile = valid_profile();
        profile.awards = vec!["é".repeat(MAX_LINE_CHARS), "a".repeat(MAX_LINE_CHARS + 1)];
        assert_eq!(errors(&profile), vec!["awards[1]"]);
    }
}
