//! Presentation strings derived from structured profile values.

/// Separator between the start and end of a duration.
pub const DURATION_SEPARATOR: char = '\u{2013}';

/// Marker used instead of an end date for ongoing work.
pub const PRESENT: &str = "Present";

/// Formats a grade as `X/Y`, or just `X` when the denominator is blank.
///
/// Neither part is checked for being numeric.
#[must_use]
pub fn format_grade(numerator: &str, denominator: Option<&str>) -> String {
    match denominator {
        Some(den) if !den.trim().is_empty() => format!("{numerator}/{den}"),
        _ => numerator.to_string(),
    }
}

/// Formats a year range like `2021--24`.
///
/// An empty start yields an empty string; a missing end yields the bare
/// start year.
#[must_use]
pub fn format_year_range(start_year: &str, end_year: &str) -> String {
    if start_year.is_empty() {
        return String::new();
    }
    if end_year.is_empty() {
        return start_year.to_string();
    }
    format!("{start_year}--{}", last_two(end_year))
}

/// Formats a month/year span like `Aug'24–Nov'24` or `Aug'25–Present`.
///
/// Returns an empty string until both start month and start year are set.
#[must_use]
pub fn format_duration(
    start_month: &str,
    start_year: &str,
    end_month: &str,
    end_year: &str,
    is_present: bool,
) -> String {
    if start_month.is_empty() || start_year.is_empty() {
        return String::new();
    }

    let start = month_year(start_month, start_year);
    if is_present {
        return format!("{start}{DURATION_SEPARATOR}{PRESENT}");
    }
    if end_month.is_empty() || end_year.is_empty() {
        return start;
    }
    format!("{start}{DURATION_SEPARATOR}{}", month_year(end_month, end_year))
}

fn month_year(month: &str, year: &str) -> String {
    format!("{month}'{}", last_two(year))
}

fn last_two(year: &str) -> &str {
    let cut = year
        .char_indices()
        .rev()
        .nth(1)
        .map_or(0, |(idx, _)| idx);
    &year[cut..]
}
