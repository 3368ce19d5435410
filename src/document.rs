//! Assembly of the complete LaTeX document.
//!
//! The section renderers produce escaped fragments; [`DocumentContext`]
//! collects them, resolves the empty optional sections against the
//! configured [`SectionPolicy`], and the template engine substitutes the
//! result into the skeleton.

use crate::config::{Config, Institution, SectionPolicy};
use crate::error::Result;
use crate::profile::Profile;
use crate::sections::{
    self, EducationView, Fragment, HeaderView, SkillsView, NO_AWARDS, NO_COURSE_PROJECTS,
};
use crate::template::TemplateEngine;
use serde::Serialize;

/// Rendered section bodies.
///
/// `None` for an optional section means it is left out of the document
/// together with its heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionsView {
    pub dissertation_selected: bool,
    pub academic_work: String,
    pub course_projects: Option<String>,
    pub experience: String,
    pub awards: Option<String>,
}

/// Everything the skeleton can insert, available as `ctx` in templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContext {
    pub header: HeaderView,
    pub education: EducationView,
    pub skills: SkillsView,
    pub sections: SectionsView,
}

fn resolve(fragment: Fragment, placeholder: &str, policy: SectionPolicy) -> Option<String> {
    match (fragment, policy) {
        (Fragment::Content(block), _) => Some(block),
        (Fragment::Empty, SectionPolicy::Suppress) => None,
        (Fragment::Empty, SectionPolicy::Placeholder) => Some(placeholder.to_string()),
    }
}

impl DocumentContext {
    /// Renders every section of `profile`.
    #[must_use]
    pub fn build(profile: &Profile, institution: &Institution, policy: SectionPolicy) -> Self {
        Self {
            header: sections::header(profile, institution),
            education: sections::education(profile, institution),
            skills: sections::skills(&profile.skills, &profile.other_skills),
            sections: SectionsView {
                dissertation_selected: profile.dissertation_selected,
                academic_work: sections::academic_work(profile),
                course_projects: resolve(
                    sections::course_projects(&profile.course_projects),
                    NO_COURSE_PROJECTS,
                    policy,
                ),
                experience: sections::experience(&profile.experience),
                awards: resolve(sections::awards(&profile.awards), NO_AWARDS, policy),
            },
        }
    }
}

/// Turns profiles into complete LaTeX documents.
pub struct Assembler {
    engine: TemplateEngine,
    institution: Institution,
    policy: SectionPolicy,
}

impl Assembler {
    /// Creates an assembler using the configured skeleton and policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the skeleton cannot be loaded.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new(config)?,
            institution: config.institution.clone(),
            policy: config.section_policy,
        })
    }

    /// Produces the complete document for `profile`.
    ///
    /// Missing profile data never causes an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the skeleton itself fails to render.
    pub fn assemble(&self, profile: &Profile) -> Result<String> {
        let document = DocumentContext::build(profile, &self.institution, self.policy);
        self.engine.render(&document)
    }

    #[must_use]
    pub const fn policy(&self) -> SectionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CourseProject, Dissertation, Experience, TermPaper};

    fn assembler(policy: SectionPolicy) -> Assembler {
        let config = Config::builder().section_policy(policy).build().unwrap();
        Assembler::new(&config).unwrap()
    }

    fn render(profile: &Profile, policy: SectionPolicy) -> String {
        assembler(policy).assemble(profile).unwrap()
    }

    fn complete_profile() -> Profile {
        Profile::from_json(
            r#"{
                "first_name": "anita",
                "last_name": "rao",
                "email": "anita.rao@example.com",
                "batch": "2024-26",
                "gender": "Female",
                "ssc": { "board": "CBSE", "institute_short": "KV Delhi", "year": "2017", "grade_x": "95", "grade_y": "" },
                "hsc": { "board": "CBSE", "institute_short": "KV Delhi", "year": "2019", "grade_x": "93.2" },
                "ug": { "university": "DU", "institute_short": "SRCC", "year_range": "2019--22", "grade_x": "8.4", "grade_y": "10" },
                "pg": { "year_range": "2024--26", "grade_x": "7.5", "grade_y": "9", "show_grade": true },
                "dissertation_selected": false,
                "term_papers": [
                    { "title": "Monsoon Shocks", "guided": true, "guide_name": "Dr. Iyer", "duration": "Jan'25", "grade": "A", "description_lines": ["Panel data study"] }
                ],
                "course_projects": [
                    { "title": "Input-Output Tables", "course_code": "AE-104", "duration": "Nov'24", "one_line_description": "Leontief inverse for Kerala" }
                ],
                "skills": { "programming": ["Python", "R"] },
                "other_skills": { "programming": "Stata" },
                "experience": [
                    { "role": "Intern", "org": "NCAER", "duration": "May'23", "bullets": ["Survey cleaning"] }
                ],
                "awards": ["Merit scholarship"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_complete_document() {
        let doc = render(&complete_profile(), SectionPolicy::Suppress);

        assert!(doc.contains(
            "            \\textbf{\\Large{ Anita Rao }}  &  anita.rao@example.com \\\\\n"
        ));
        assert!(doc.contains("            \\textbf{ Applied Economics } & \\textbf{ M.A. (2024-26) } \\\\\n"));
        assert!(doc.contains("            Centre For Development Studies, JNU &  Female\\\\\n"));
        assert!(doc.contains(
            "Post Graduation & JNU, New Delhi    & Centre for Development Studies    & 2024--26   & 7.5/9 \\\\\n"
        ));
        assert!(doc.contains("Graduation  & DU & SRCC  & 2019--22   & 8.4/10 \\\\\n"));
        assert!(doc.contains("Matriculation   & CBSE   & KV Delhi    & 2017          & 95   \\\\\n"));
        assert!(doc.contains(
            "\\noindent \\resheading{\\textbf{COURSE PROJECTS}}\\\\[-0.3cm]\n\\begin{itemize}[noitemsep,nolistsep]\n\\item \\textbf{Input-Output Tables}, \\emph{(AE-104)}"
        ));
        assert!(doc.contains("\\item \\textbf{Programming \\& Tools}: Python, R, Stata\\\\[-0.5cm]\n"));
        assert!(doc.contains("WORK EXPERIENCE \\& INTERNSHIPS"));
        assert!(doc.contains(
            "\\begin{itemize}\n\\item \\textbf{Merit scholarship}\n\n\\end{itemize}\n\n\\end{document}\n"
        ));
    }

    #[test]
    fn test_dissertation_excludes_term_papers() {
        let mut profile = complete_profile();
        profile.dissertation_selected = true;
        profile.dissertation = Dissertation {
            title: "Fiscal Federalism".to_string(),
            guide_name: "Prof. Nair".to_string(),
            ..Dissertation::default()
        };

        let doc = render(&profile, SectionPolicy::Suppress);
        assert!(doc.contains("Dissertation Title: Fiscal Federalism"));
        assert!(doc.contains("M.A. Dissertation | Guide:"));
        assert!(!doc.contains("\\emph{(Term Paper"));
        assert!(!doc.contains("Monsoon Shocks"));
        assert!(!doc.contains("No term papers listed"));
    }

    #[test]
    fn test_term_papers_exclude_dissertation() {
        let mut profile = complete_profile();
        profile.dissertation.title = "Never shown".to_string();

        let doc = render(&profile, SectionPolicy::Suppress);
        assert!(doc.contains("\\emph{(Term Paper | Guide: \\textbf{Dr. Iyer} | Grade: A)}"));
        assert!(!doc.contains("Dissertation Title:"));
        assert!(!doc.contains("Never shown"));
    }

    #[test]
    fn test_no_term_papers_placeholder_in_document() {
        let doc = render(&Profile::default(), SectionPolicy::Suppress);
        assert!(doc.contains(
            "\\begin{itemize}[noitemsep,nolistsep]\n\\item \\textit{(No term papers listed)}\n\n\\end{itemize}\n"
        ));
    }

    #[test]
    fn test_suppress_drops_both_empty_sections() {
        let doc = render(&Profile::default(), SectionPolicy::Suppress);

        assert!(!doc.contains("COURSE PROJECTS}}"));
        assert!(!doc.contains("AWARDS \\& ACHIEVEMENTS"));
        assert!(!doc.contains("No course projects listed"));
        assert!(!doc.contains("Add achievements here"));
        assert!(doc.contains(
            "% ================= COURSE PROJECTS ===================\n\n\n% ================= SKILLS"
        ));
        assert!(doc.ends_with("% ================= Awards ===================\n\n\n\\end{document}\n"));
    }

    #[test]
    fn test_placeholder_keeps_both_empty_sections() {
        let doc = render(&Profile::default(), SectionPolicy::Placeholder);

        assert!(doc.contains(
            "\\noindent \\resheading{\\textbf{COURSE PROJECTS}}\\\\[-0.3cm]\n\\begin{itemize}[noitemsep,nolistsep]\n\\item \\textit{(No course projects listed)}\n\n\\end{itemize}\n"
        ));
        assert!(doc.contains(
            "\\noindent \\resheading{\\textbf{AWARDS \\& ACHIEVEMENTS / EXTRA-CURRICULAR}}\\\\[-0.3cm]\n\\begin{itemize}\n\\item \\textit{(Add achievements here --- teaching, presentations, or conferences are valid.)}\n\n\\end{itemize}\n"
        ));
    }

    #[test]
    fn test_policy_applies_to_each_section_independently() {
        let mut profile = Profile::default();
        profile.awards = vec!["Dean's list".to_string()];

        let doc = render(&profile, SectionPolicy::Suppress);
        assert!(doc.contains("AWARDS \\& ACHIEVEMENTS"));
        assert!(!doc.contains("COURSE PROJECTS}}"));

        profile.awards = vec!["   ".to_string()];
        profile.course_projects = vec![CourseProject::default()];
        let doc = render(&profile, SectionPolicy::Suppress);
        assert!(!doc.contains("AWARDS \\& ACHIEVEMENTS"));
        assert!(doc.contains("COURSE PROJECTS}}"));
    }

    #[test]
    fn test_experience_section_collapses() {
        let doc = render(&Profile::default(), SectionPolicy::Placeholder);
        assert!(!doc.contains("WORK EXPERIENCE"));
        assert!(doc.contains("% ================= EXPERIENCE ===================\n\n\n"));
    }

    #[test]
    fn test_truncation_in_document() {
        let mut profile = Profile::default();
        profile.term_papers = (1..=5)
            .map(|i| TermPaper {
                title: format!("Paper {i}"),
                ..TermPaper::default()
            })
            .collect();
        profile.experience = vec![Experience {
            role: "Analyst".to_string(),
            bullets: (1..=6).map(|i| format!("Task {i}")).collect(),
            ..Experience::default()
        }];

        let doc = render(&profile, SectionPolicy::Suppress);
        assert_eq!(doc.matches("\\emph{(Term Paper").count(), 2);
        assert!(!doc.contains("Paper 3"));
        assert_eq!(doc.matches("    \\item Task").count(), 4);
    }

    #[test]
    fn test_header_injection_is_escaped() {
        let profile = Profile {
            first_name: "O'Brien & Sons_{Inc}".to_string(),
            ..Profile::default()
        };
        let doc = render(&profile, SectionPolicy::Suppress);
        let baseline = render(&Profile::default(), SectionPolicy::Suppress);

        let header_line = doc
            .lines()
            .find(|line| line.contains("\\Large"))
            .unwrap();
        assert_eq!(
            header_line,
            "            \\textbf{\\Large{ O'Brien \\& Sons\\_\\{Inc\\}  }}  &   \\\\"
        );

        // Only the name differs from an empty profile.
        let changed: Vec<_> = doc
            .lines()
            .zip(baseline.lines())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(doc.lines().count(), baseline.lines().count());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let assembler = assembler(SectionPolicy::Suppress);
        let profile = complete_profile();
        assert_eq!(
            assembler.assemble(&profile).unwrap(),
            assembler.assemble(&profile).unwrap()
        );
    }
}
