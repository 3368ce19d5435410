//! The candidate profile collected by the form wizard.
//!
//! The JSON shape follows the form's field names. Every field is optional
//! on input: absent values, `null`s and scalar numbers all deserialize into
//! plain strings so that rendering never has to deal with missing data.

use crate::format::{format_duration, format_year_range};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete resume content for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "text")]
    pub first_name: String,
    #[serde(deserialize_with = "text")]
    pub last_name: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    /// Programme name; the institution default is used when blank.
    #[serde(deserialize_with = "text")]
    pub program: String,
    #[serde(deserialize_with = "text")]
    pub batch: String,
    #[serde(deserialize_with = "text")]
    pub gender: String,

    pub ssc: EducationRecord,
    pub hsc: EducationRecord,
    pub ug: EducationRecord,
    pub pg: EducationRecord,

    /// Chooses the dissertation over the term papers.
    #[serde(deserialize_with = "flag")]
    pub dissertation_selected: bool,
    pub dissertation: Dissertation,
    pub term_papers: Vec<TermPaper>,

    pub course_projects: Vec<CourseProject>,

    pub skills: Skills,
    #[serde(alias = "otherSkills")]
    pub other_skills: OtherSkills,

    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "lines")]
    pub awards: Vec<String>,
}

/// One row of the education table.
///
/// SSC and HSC name a board, UG and PG a university; both land in `board`.
/// The year is either given directly or derived from the start/end years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationRecord {
    #[serde(alias = "university", deserialize_with = "text")]
    pub board: String,
    #[serde(deserialize_with = "text")]
    pub institute_short: String,
    #[serde(alias = "year_range", deserialize_with = "text")]
    pub year: String,
    #[serde(alias = "startYear", deserialize_with = "text")]
    pub start_year: String,
    #[serde(alias = "endYear", deserialize_with = "text")]
    pub end_year: String,
    #[serde(deserialize_with = "text")]
    pub grade_x: String,
    #[serde(deserialize_with = "text")]
    pub grade_y: String,
    /// Only consulted for the post-graduation row.
    #[serde(deserialize_with = "flag")]
    pub show_grade: bool,
}

impl EducationRecord {
    /// The year text shown in the table.
    #[must_use]
    pub fn year_text(&self) -> String {
        if self.year.trim().is_empty() {
            format_year_range(&self.start_year, &self.end_year)
        } else {
            self.year.clone()
        }
    }
}

/// Raw month/year picker values behind a duration string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateSpan {
    #[serde(alias = "startMonth", deserialize_with = "text")]
    pub start_month: String,
    #[serde(alias = "startYear", deserialize_with = "text")]
    pub start_year: String,
    #[serde(alias = "endMonth", deserialize_with = "text")]
    pub end_month: String,
    #[serde(alias = "endYear", deserialize_with = "text")]
    pub end_year: String,
    #[serde(alias = "isPresent", deserialize_with = "flag")]
    pub is_present: bool,
}

impl DateSpan {
    /// Formats the span, e.g. `Aug'24–Nov'24`.
    #[must_use]
    pub fn format(&self) -> String {
        format_duration(
            &self.start_month,
            &self.start_year,
            &self.end_month,
            &self.end_year,
            self.is_present,
        )
    }
}

/// Prefers an explicit duration string, deriving one from the span otherwise.
fn effective_duration(explicit: &str, span: &DateSpan) -> String {
    if explicit.trim().is_empty() {
        span.format()
    } else {
        explicit.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dissertation {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub guide_name: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(flatten)]
    pub span: DateSpan,
    #[serde(deserialize_with = "lines")]
    pub current_work_lines: Vec<String>,
    #[serde(deserialize_with = "lines")]
    pub future_work_lines: Vec<String>,
}

impl Dissertation {
    #[must_use]
    pub fn duration_text(&self) -> String {
        effective_duration(&self.duration, &self.span)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermPaper {
    #[serde(deserialize_with = "text")]
    pub title: String,
    /// Whether the paper had a guide; gates `guide_name`.
    #[serde(deserialize_with = "flag")]
    pub guided: bool,
    #[serde(deserialize_with = "text")]
    pub guide_name: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(flatten)]
    pub span: DateSpan,
    #[serde(deserialize_with = "text")]
    pub grade: String,
    #[serde(deserialize_with = "lines")]
    pub description_lines: Vec<String>,
}

impl TermPaper {
    #[must_use]
    pub fn duration_text(&self) -> String {
        effective_duration(&self.duration, &self.span)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseProject {
    #[serde(deserialize_with = "text")]
    pub title: String,
    /// Expected as `AE-` followed by three digits.
    #[serde(deserialize_with = "text")]
    pub course_code: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(flatten)]
    pub span: DateSpan,
    #[serde(deserialize_with = "text")]
    pub one_line_description: String,
}

impl CourseProject {
    #[must_use]
    pub fn duration_text(&self) -> String {
        effective_duration(&self.duration, &self.span)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "text")]
    pub role: String,
    #[serde(deserialize_with = "text")]
    pub org: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(flatten)]
    pub span: DateSpan,
    #[serde(deserialize_with = "lines")]
    pub bullets: Vec<String>,
}

impl Experience {
    #[must_use]
    pub fn duration_text(&self) -> String {
        effective_duration(&self.duration, &self.span)
    }
}

/// The fixed skill categories, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillCategory {
    Econometrics,
    MachineLearning,
    Business,
    Programming,
    Research,
}

impl SkillCategory {
    /// All categories in the order they appear on the resume.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Econometrics,
            Self::MachineLearning,
            Self::Business,
            Self::Programming,
            Self::Research,
        ]
    }

    /// The JSON key of this category.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Econometrics => "econometrics",
            Self::MachineLearning => "ml",
            Self::Business => "business",
            Self::Programming => "programming",
            Self::Research => "research",
        }
    }
}

/// Predefined skill labels chosen per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    #[serde(deserialize_with = "lines")]
    pub econometrics: Vec<String>,
    #[serde(deserialize_with = "lines")]
    pub ml: Vec<String>,
    #[serde(deserialize_with = "lines")]
    pub business: Vec<String>,
    #[serde(deserialize_with = "lines")]
    pub programming: Vec<String>,
    #[serde(deserialize_with = "lines")]
    pub research: Vec<String>,
}

impl Skills {
    #[must_use]
    pub fn get(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Econometrics => &self.econometrics,
            SkillCategory::MachineLearning => &self.ml,
            SkillCategory::Business => &self.business,
            SkillCategory::Programming => &self.programming,
            SkillCategory::Research => &self.research,
        }
    }
}

/// Free-text, comma-separated extra skills per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherSkills {
    #[serde(deserialize_with = "text")]
    pub econometrics: String,
    #[serde(deserialize_with = "text")]
    pub ml: String,
    #[serde(deserialize_with = "text")]
    pub business: String,
    #[serde(deserialize_with = "text")]
    pub programming: String,
    #[serde(deserialize_with = "text")]
    pub research: String,
}

impl OtherSkills {
    #[must_use]
    pub fn get(&self, category: SkillCategory) -> &str {
        match category {
            SkillCategory::Econometrics => &self.econometrics,
            SkillCategory::MachineLearning => &self.ml,
            SkillCategory::Business => &self.business,
            SkillCategory::Programming => &self.programming,
            SkillCategory::Research => &self.research,
        }
    }
}

impl Profile {
    /// Parses a profile from the form's JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object of the expected
    /// shape. Missing or `null` fields are not errors.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Accepts strings, numbers, booleans and `null` for a text field.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A list of text lines; `null` entries become empty lines.
fn lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default_profile() {
        let profile = Profile::from_json("{}").unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_nulls_and_numbers_become_text() {
        let profile = Profile::from_json(
            r#"{
                "first_name": null,
                "ssc": { "board": "CBSE", "year": 2018, "grade_x": 95.5, "grade_y": null },
                "awards": ["Best paper", null]
            }"#,
        )
        .unwrap();

        assert_eq!(profile.first_name, "");
        assert_eq!(profile.ssc.year, "2018");
        assert_eq!(profile.ssc.grade_x, "95.5");
        assert_eq!(profile.ssc.grade_y, "");
        assert_eq!(profile.awards, vec!["Best paper".to_string(), String::new()]);
    }

    #[test]
    fn test_university_and_year_range_aliases() {
        let profile = Profile::from_json(
            r#"{ "ug": { "university": "DU", "year_range": "2020--23", "grade_x": "8.5" } }"#,
        )
        .unwrap();

        assert_eq!(profile.ug.board, "DU");
        assert_eq!(profile.ug.year_text(), "2020--23");
    }

    #[test]
    fn test_year_derived_from_picker_values() {
        let profile = Profile::from_json(
            r#"{ "hsc": { "startYear": "2018", "endYear": "2020" } }"#,
        )
        .unwrap();

        assert_eq!(profile.hsc.year_text(), "2018--20");
    }

    #[test]
    fn test_duration_derived_from_span() {
        let profile = Profile::from_json(
            r#"{
                "experience": [
                    { "role": "Intern", "startMonth": "Aug", "startYear": "2025", "isPresent": true },
                    { "role": "Analyst", "duration": "Summer 2023" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(profile.experience[0].duration_text(), "Aug'25\u{2013}Present");
        assert_eq!(profile.experience[1].duration_text(), "Summer 2023");
    }

    #[test]
    fn test_other_skills_camel_case_alias() {
        let profile =
            Profile::from_json(r#"{ "otherSkills": { "programming": "Julia, Stata" } }"#).unwrap();
        assert_eq!(profile.other_skills.get(SkillCategory::Programming), "Julia, Stata");
    }

    #[test]
    fn test_structured_value_in_text_field_is_rejected() {
        let result = Profile::from_json(r#"{ "email": { "nested": true } }"#);
        assert!(result.is_err());
    }
}
