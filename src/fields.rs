//! Parsers for the portal's positional text micro-formats.
//!
//! Search results encode everything as labeled text lines (`"Room: 205 LAWRN"`)
//! and a handful of packed tokens (`"1030-LEC (27815)"`, `"MoWe 3:00PM - 4:15PM"`).
//! The portal controls these formats and has drifted before, so each field gets
//! its own small parser that fails with a value-carrying error instead of
//! guessing.

use chrono::NaiveDate;

use crate::error::{CatalogError, Result};
use crate::models::{DateRange, TimeRange};

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Subject and course number lifted from a course heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CourseHeading {
    pub subject: String,
    pub number: String,
}

/// Section identifier, type, and class number from a section line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionIdentity {
    pub section: String,
    pub section_type: String,
    pub number: String,
}

/// Strip a `"<label>: "` prefix, returning the text after the first `": "`.
///
/// `"Room: 205 LAWRN"` -> `"205 LAWRN"`. Later occurrences stay intact:
/// `"Instructor: Hoffman, Barry: Adjunct"` -> `"Hoffman, Barry: Adjunct"`.
pub(crate) fn label_value(line: &str) -> Result<&str> {
    match line.split_once(": ") {
        Some((_, value)) => Ok(value),
        None => Err(CatalogError::MalformedDocument(format!(
            "line has no label separator: {line:?}"
        ))),
    }
}

/// Parse a course heading such as `"CS 0007 - INTRO TO COMPUTER PROGRAMMING"`.
///
/// Only the part before the first `" - "` matters: token 0 is the subject,
/// token 1 the course number. Headings without both tokens are malformed.
pub(crate) fn parse_course_heading(text: &str) -> Result<CourseHeading> {
    let head = match text.split_once(" - ") {
        Some((head, _)) => head,
        None => text,
    };
    let mut tokens = head.split_whitespace();
    let (Some(subject), Some(number)) = (tokens.next(), tokens.next()) else {
        return Err(CatalogError::MalformedDocument(format!(
            "course heading is missing subject or number: {text:?}"
        )));
    };
    Ok(CourseHeading {
        subject: subject.to_string(),
        number: number.to_string(),
    })
}

/// Parse a section line value such as `"1030-LEC (27815)"`.
///
/// The first token splits on `-` into section identifier and type; the
/// class number is characters 1..6 of the second token, dropping the
/// opening parenthesis. The token must be at least the full `"(NNNNN)"`
/// width. Trailing tokens are ignored.
pub(crate) fn parse_section_identity(value: &str) -> Result<SectionIdentity> {
    let mut tokens = value.split_whitespace();
    let (Some(pair), Some(number_token)) = (tokens.next(), tokens.next()) else {
        return Err(CatalogError::MalformedDocument(format!(
            "section line is missing tokens: {value:?}"
        )));
    };
    let Some((section, section_type)) = pair.split_once('-') else {
        return Err(CatalogError::MalformedDocument(format!(
            "section token has no type separator: {pair:?}"
        )));
    };
    let number = match number_token.get(1..6) {
        Some(number) if number_token.len() >= 7 => number,
        _ => {
            return Err(CatalogError::MalformedDocument(format!(
                "class number token is too short: {number_token:?}"
            )));
        }
    };
    Ok(SectionIdentity {
        section: section.to_string(),
        section_type: section_type.to_string(),
        number: number.to_string(),
    })
}

/// Split a concatenated day-string into two-character day codes.
///
/// `"MoWe"` -> `["Mo", "We"]`, `"TuTh"` -> `["Tu", "Th"]`. An odd trailing
/// character is dropped, matching the fixed-width chunk count.
pub(crate) fn chunk_days(days: &str) -> Vec<String> {
    let chars: Vec<char> = days.chars().collect();
    chars
        .chunks_exact(2)
        .map(|pair| pair.iter().collect())
        .collect()
}

/// Parse a meeting field value: either `"TBA"` or `"<days><start> - <end>"`.
///
/// `"MoWe 3:00PM - 4:15PM"` -> days `["Mo", "We"]`, times `3:00PM`..`4:15PM`.
/// `"TBA"` -> no days, no times. The day-string and start time share one
/// space-separated token pair, so the first half splits at its last space.
pub(crate) fn parse_meeting(value: &str) -> Result<(Option<Vec<String>>, Option<TimeRange>)> {
    if value == "TBA" {
        return Ok((None, None));
    }
    let Some((first, end)) = value.split_once(" - ") else {
        return Err(CatalogError::MalformedDocument(format!(
            "meeting field has no time separator: {value:?}"
        )));
    };
    let Some((days, start)) = first.rsplit_once(' ') else {
        return Err(CatalogError::MalformedDocument(format!(
            "meeting field has no day/time boundary: {value:?}"
        )));
    };
    let times = TimeRange {
        start: start.to_string(),
        end: end.to_string(),
    };
    Ok((Some(chunk_days(days)), Some(times)))
}

/// Parse a meeting-dates value such as `"08/26/2019 - 12/06/2019"`.
pub(crate) fn parse_date_range(value: &str) -> Result<DateRange> {
    let Some((start, end)) = value.split_once(" - ") else {
        return Err(CatalogError::MalformedDocument(format!(
            "date range has no separator: {value:?}"
        )));
    };
    let start = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT).map_err(|_| {
        CatalogError::MalformedDocument(format!("unparseable start date: {start:?}"))
    })?;
    let end = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT)
        .map_err(|_| CatalogError::MalformedDocument(format!("unparseable end date: {end:?}")))?;
    Ok(DateRange { start, end })
}
