//! Renderers for the individual resume sections.
//!
//! Each renderer receives the raw profile sub-tree, escapes every piece of
//! user text it emits, and returns a LaTeX fragment. None of them can fail:
//! blank or missing values simply render as empty text.

use crate::config::Institution;
use crate::format::format_grade;
use crate::profile::{
    CourseProject, Dissertation, EducationRecord, Experience, OtherSkills, Profile,
    SkillCategory, Skills, TermPaper,
};
use crate::sanitize::{capitalize_words, escape_latex};
use crate::validate::{MAX_BULLETS, MAX_PAPER_LINES, MAX_TERM_PAPERS, MAX_WORK_LINES};
use serde::Serialize;

/// Placeholder item shown for an empty course project list.
pub const NO_COURSE_PROJECTS: &str = "\\item \\textit{(No course projects listed)}\n";

/// Placeholder item shown for an empty awards list.
pub const NO_AWARDS: &str =
    "\\item \\textit{(Add achievements here --- teaching, presentations, or conferences are valid.)}\n";

/// Placeholder item shown when no term papers were entered.
pub const NO_TERM_PAPERS: &str = "\\item \\textit{(No term papers listed)}\n";

const ITEMIZE_TIGHT: &str = "\\begin{itemize}[noitemsep,nolistsep]\n";

/// Output of a section whose body may be absent.
///
/// `Empty` is distinct from any real content so the assembler can drop the
/// whole section, heading included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Rendered list items.
    Content(String),
    /// Nothing to show.
    Empty,
}

impl Fragment {
    fn from_block(block: String) -> Self {
        if block.is_empty() {
            Self::Empty
        } else {
            Self::Content(block)
        }
    }

    /// Returns true for the empty marker.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Escaped values for the header table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub full_name: String,
    pub email: String,
    pub program: String,
    pub batch: String,
    pub gender: String,
    pub institute_line: String,
}

/// One escaped row of the education table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EducationRow {
    pub university: String,
    pub institute: String,
    pub year: String,
    pub grade: String,
}

/// The four rows of the education table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationView {
    pub pg: EducationRow,
    pub ug: EducationRow,
    pub hsc: EducationRow,
    pub ssc: EducationRow,
}

/// One escaped, comma-joined line per skill category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillsView {
    pub econometrics: String,
    pub ml: String,
    pub business: String,
    pub programming: String,
    pub research: String,
}

/// Renders the identity header values.
#[must_use]
pub fn header(profile: &Profile, institution: &Institution) -> HeaderView {
    let full_name = capitalize_words(&format!("{} {}", profile.first_name, profile.last_name));
    let program = if profile.program.trim().is_empty() {
        institution.program.as_str()
    } else {
        profile.program.as_str()
    };

    HeaderView {
        full_name: escape_latex(&full_name),
        email: escape_latex(&profile.email),
        program: escape_latex(program),
        batch: escape_latex(&profile.batch),
        gender: escape_latex(&profile.gender),
        institute_line: escape_latex(&institution.institute_line),
    }
}

fn grade(record: &EducationRecord) -> String {
    format_grade(
        &escape_latex(&record.grade_x),
        Some(&escape_latex(&record.grade_y)),
    )
}

fn education_row(record: &EducationRecord) -> EducationRow {
    EducationRow {
        university: escape_latex(&record.board),
        institute: escape_latex(&record.institute_short),
        year: escape_latex(&record.year_text()),
        grade: grade(record),
    }
}

/// Renders the education table rows.
///
/// The post-graduation row always names the host institution; its grade is
/// only shown when the candidate opted in.
#[must_use]
pub fn education(profile: &Profile, institution: &Institution) -> EducationView {
    let pg = &profile.pg;
    EducationView {
        pg: EducationRow {
            university: escape_latex(&institution.pg_university),
            institute: escape_latex(&institution.pg_institute),
            year: escape_latex(&pg.year_text()),
            grade: if pg.show_grade { grade(pg) } else { String::new() },
        },
        ug: education_row(&profile.ug),
        hsc: education_row(&profile.hsc),
        ssc: education_row(&profile.ssc),
    }
}

/// Appends one `\item` per non-blank line among the first `cap` lines.
fn push_items(out: &mut String, lines: &[String], cap: usize, indent: &str) {
    for line in lines.iter().take(cap) {
        if !line.trim().is_empty() {
            out.push_str(&format!("{indent}\\item {}\n", escape_latex(line)));
        }
    }
}

/// Renders the dissertation or the term papers, whichever is selected.
#[must_use]
pub fn academic_work(profile: &Profile) -> String {
    if profile.dissertation_selected {
        dissertation(&profile.dissertation)
    } else {
        term_papers(&profile.term_papers)
    }
}

/// Renders the dissertation title line and its work lists.
#[must_use]
pub fn dissertation(diss: &Dissertation) -> String {
    let title = escape_latex(&diss.title);
    let guide = escape_latex(&diss.guide_name);
    let duration = escape_latex(&diss.duration_text());

    let mut block = String::new();
    block.push_str(&format!(
        "\\item \\textbf{{Dissertation Title: {title}}} \\\\ \n"
    ));
    block.push_str(&format!(
        "\\emph{{(M.A. Dissertation | Guide: \\textbf{{{guide}}})}} \\hfill \\emph{{({duration})}}   \n"
    ));
    block.push_str("\\textbf{Current Work:}\\\\[-0.4cm]\n");
    block.push_str(ITEMIZE_TIGHT);
    push_items(&mut block, &diss.current_work_lines, MAX_WORK_LINES, "  ");
    block.push_str("\\end{itemize}\n");
    block.push_str("\\textbf{Future Work:}\\\\[-0.4cm]\n");
    block.push_str(ITEMIZE_TIGHT);
    push_items(&mut block, &diss.future_work_lines, MAX_WORK_LINES, "  ");
    block.push_str("\\end{itemize}\n");
    block
}

/// Renders at most two term papers, or a placeholder item when none exist.
#[must_use]
pub fn term_papers(papers: &[TermPaper]) -> String {
    if papers.is_empty() {
        return NO_TERM_PAPERS.to_string();
    }

    let mut block = String::new();
    for paper in papers.iter().take(MAX_TERM_PAPERS) {
        let title = escape_latex(&paper.title);
        let duration = escape_latex(&paper.duration_text());

        let guide_text = if paper.guided {
            format!(" | Guide: \\textbf{{{}}}", escape_latex(&paper.guide_name))
        } else {
            String::new()
        };
        let grade_text = if paper.grade.trim().is_empty() {
            String::new()
        } else {
            format!(" | Grade: {}", escape_latex(&paper.grade))
        };

        block.push_str(&format!("\\item \\textbf{{{title}}} \\\\\n"));
        block.push_str(&format!(
            "\\emph{{(Term Paper{guide_text}{grade_text})}} \\hfill \\emph{{({duration})}}\\\\\n"
        ));
        block.push_str(ITEMIZE_TIGHT);
        push_items(&mut block, &paper.description_lines, MAX_PAPER_LINES, "  ");
        block.push_str("\\end{itemize}\n");
    }
    block
}

/// Renders the course project items, or [`Fragment::Empty`] for none.
#[must_use]
pub fn course_projects(projects: &[CourseProject]) -> Fragment {
    let mut block = String::new();
    for project in projects {
        let title = escape_latex(&project.title);
        let code = escape_latex(&project.course_code);
        let duration = escape_latex(&project.duration_text());
        let desc = escape_latex(&project.one_line_description);

        block.push_str(&format!(
            "\\item \\textbf{{{title}}}, \\emph{{({code})}} \\hfill \\emph{{({duration})}}\n"
        ));
        block.push_str(ITEMIZE_TIGHT);
        block.push_str(&format!("  \\item {desc}\n"));
        block.push_str("\\end{itemize}\n");
    }
    Fragment::from_block(block)
}

/// Merges predefined labels with the free-text extras of one category.
///
/// Extras are comma-separated; blanks and exact repeats are skipped.
fn merged_skills(selected: &[String], other: &str) -> Vec<String> {
    let mut merged: Vec<String> = selected.to_vec();
    for extra in other.split(',').map(str::trim) {
        if !extra.is_empty() && !merged.iter().any(|existing| existing == extra) {
            merged.push(extra.to_string());
        }
    }
    merged
}

/// Renders the five skill lines.
#[must_use]
pub fn skills(selected: &Skills, other: &OtherSkills) -> SkillsView {
    let line = |category: SkillCategory| {
        escape_latex(&merged_skills(selected.get(category), other.get(category)).join(", "))
    };

    SkillsView {
        econometrics: line(SkillCategory::Econometrics),
        ml: line(SkillCategory::MachineLearning),
        business: line(SkillCategory::Business),
        programming: line(SkillCategory::Programming),
        research: line(SkillCategory::Research),
    }
}

/// Renders the whole experience section, heading included.
///
/// Returns an empty string when there is no experience, so the section
/// disappears from the document.
#[must_use]
pub fn experience(entries: &[Experience]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut block = String::new();
    block.push_str(
        "\\noindent \\resheading{\\textbf{WORK EXPERIENCE \\& INTERNSHIPS}}\\\\[-0.3cm]\n",
    );
    block.push_str(ITEMIZE_TIGHT);

    for exp in entries {
        let role = escape_latex(&exp.role);
        let org = escape_latex(&exp.org);
        let duration = escape_latex(&exp.duration_text());

        block.push_str(&format!(
            "  \\item \\textbf{{{role}}} | \\textbf{{\\emph{{{org}}}}} \\hfill \\emph{{({duration})}}\\\\[-0.4cm]\n"
        ));
        block.push_str("  ");
        block.push_str(ITEMIZE_TIGHT);
        push_items(&mut block, &exp.bullets, MAX_BULLETS, "    ");
        block.push_str("  \\end{itemize}\n");
    }

    block.push_str("\\end{itemize}\n");
    block
}

/// Renders one bold item per non-blank award, or [`Fragment::Empty`].
#[must_use]
pub fn awards(awards: &[String]) -> Fragment {
    let block: String = awards
        .iter()
        .filter(|award| !award.trim().is_empty())
        .map(|award| format!("\\item \\textbf{{{}}}\n", escape_latex(award)))
        .collect();
    Fragment::from_block(block)
}
