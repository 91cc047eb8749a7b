//! Input validation for the three query parameters.
//!
//! All checks run before any network call, so a bad subject, term, or course
//! number fails fast with a typed error instead of an empty results page.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CatalogError, Result};
use crate::subjects;

/// Uppercase `subject` and check it against the subject whitelist.
///
/// `"cs"` -> `"CS"`, `"Math"` -> `"MATH"`.
pub(crate) fn validate_subject(subject: &str) -> Result<String> {
    let subject = subject.to_uppercase();
    if subjects::is_valid(&subject) {
        Ok(subject)
    } else {
        Err(CatalogError::InvalidSubject(subject))
    }
}

/// Check that `term` is a 4-character catalog term code.
///
/// Term codes start with the century digit `2`, carry two year digits, and
/// end in a session digit: 1 (fall), 4 (spring), or 7 (summer). `"2194"` is
/// valid; `"2190"`, `"219"`, and `"21941"` are not.
pub(crate) fn validate_term(term: &str) -> Result<String> {
    static TERM_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^2\d{2}[147]$").unwrap());

    if TERM_PATTERN.is_match(term) {
        Ok(term.to_string())
    } else {
        Err(CatalogError::InvalidTerm(term.to_string()))
    }
}

/// Normalize `course` to the 4-character course-number form.
///
/// Shorter values are left-padded with zeros (`"5"` -> `"0005"`, `"101"` ->
/// `"0101"`); anything longer than 4 characters is rejected.
pub(crate) fn validate_course_number(course: &str) -> Result<String> {
    if course.len() > 4 {
        return Err(CatalogError::InvalidCourseNumber(course.to_string()));
    }
    Ok(zero_pad(course))
}

/// Left-pad a course number with zeros to 4 characters. Longer values pass
/// through unchanged; rejecting them is [`validate_course_number`]'s job.
pub(crate) fn zero_pad(course: &str) -> String {
    format!("{course:0>4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_uppercased() {
        assert_eq!(validate_subject("cs").unwrap(), "CS");
        assert_eq!(validate_subject("Math").unwrap(), "MATH");
        assert_eq!(validate_subject("CHEM").unwrap(), "CHEM");
    }

    #[test]
    fn subject_unknown() {
        assert!(matches!(
            validate_subject("BOGUS"),
            Err(CatalogError::InvalidSubject(s)) if s == "BOGUS"
        ));
    }

    #[test]
    fn subject_empty() {
        assert!(matches!(
            validate_subject(""),
            Err(CatalogError::InvalidSubject(_))
        ));
    }

    #[test]
    fn term_valid_sessions() {
        assert_eq!(validate_term("2194").unwrap(), "2194");
        assert_eq!(validate_term("2201").unwrap(), "2201");
        assert_eq!(validate_term("2187").unwrap(), "2187");
    }

    #[test]
    fn term_bad_session_digit() {
        assert!(matches!(
            validate_term("2190"),
            Err(CatalogError::InvalidTerm(_))
        ));
        assert!(matches!(
            validate_term("2195"),
            Err(CatalogError::InvalidTerm(_))
        ));
    }

    #[test]
    fn term_wrong_length() {
        // A valid code with trailing garbage is not a term code.
        assert!(matches!(
            validate_term("21941"),
            Err(CatalogError::InvalidTerm(_))
        ));
        assert!(matches!(
            validate_term("219"),
            Err(CatalogError::InvalidTerm(_))
        ));
    }

    #[test]
    fn term_wrong_century() {
        assert!(matches!(
            validate_term("1194"),
            Err(CatalogError::InvalidTerm(_))
        ));
    }

    #[test]
    fn term_non_numeric() {
        assert!(matches!(
            validate_term("2a94"),
            Err(CatalogError::InvalidTerm(_))
        ));
        assert!(matches!(
            validate_term("fall"),
            Err(CatalogError::InvalidTerm(_))
        ));
    }

    #[test]
    fn course_number_padded() {
        assert_eq!(validate_course_number("5").unwrap(), "0005");
        assert_eq!(validate_course_number("101").unwrap(), "0101");
        assert_eq!(validate_course_number("1020").unwrap(), "1020");
    }

    #[test]
    fn course_number_too_long() {
        assert!(matches!(
            validate_course_number("12345"),
            Err(CatalogError::InvalidCourseNumber(s)) if s == "12345"
        ));
    }

    #[test]
    fn course_number_empty_pads_to_zeros() {
        assert_eq!(validate_course_number("").unwrap(), "0000");
    }

    #[test]
    fn zero_pad_leaves_long_values() {
        assert_eq!(zero_pad("12345"), "12345");
    }
}
