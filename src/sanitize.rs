//! Escaping of user text for LaTeX and for artifact file names.

use once_cell::sync::Lazy;
use regex::Regex;

/// Reserved LaTeX characters and the sequences that typeset them literally.
///
/// Backslash comes first: every later replacement introduces backslashes of
/// its own, which must not be escaped a second time.
const LATEX_ESCAPES: &[(char, &str)] = &[
    ('\\', r"\textbackslash{}"),
    ('&', r"\&"),
    ('%', r"\%"),
    ('$', r"\$"),
    ('#', r"\#"),
    ('_', r"\_"),
    ('{', r"\{"),
    ('}', r"\}"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
];

static FILENAME_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid filename strip pattern"));

static FILENAME_COLLAPSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid filename collapse pattern"));

/// Escapes `text` so that it typesets literally inside a LaTeX document.
///
/// The replacements are applied in a single left-to-right pass, which gives
/// the same result as applying them one after another in the order of
/// [`LATEX_ESCAPES`] while never re-reading already produced output.
#[must_use]
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match LATEX_ESCAPES.iter().find(|(reserved, _)| *reserved == ch) {
            Some((_, replacement)) => escaped.push_str(replacement),
            None => escaped.push(ch),
        }
    }
    escaped
}

/// Null-tolerant variant of [`escape_latex`]: absent text becomes empty.
#[must_use]
pub fn escape_opt(text: Option<&str>) -> String {
    text.map(escape_latex).unwrap_or_default()
}

/// Turns a person's name into a lowercase, filesystem-safe token.
///
/// Drops everything except word characters, whitespace and hyphens, then
/// collapses runs of hyphens/whitespace into one underscore.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let stripped = FILENAME_STRIP.replace_all(name, "");
    FILENAME_COLLAPSE
        .replace_all(&stripped, "_")
        .to_lowercase()
}

/// Base name (without extension) for downloaded artifacts.
///
/// Joins the sanitized first and last names with an underscore, falls back
/// to whichever one is present, and finally to `default`.
#[must_use]
pub fn artifact_basename(first_name: &str, last_name: &str, default: &str) -> String {
    let first = sanitize_filename(first_name);
    let last = sanitize_filename(last_name);

    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first}_{last}"),
        (false, true) => first,
        (true, false) => last,
        (true, true) => default.to_string(),
    }
}

/// Upper-cases the first character of every word.
///
/// A word starts at a letter, digit or underscore that follows any other
/// character (or the start of the text); the rest of the word is untouched.
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && !in_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        in_word = is_word;
    }
    out
}
