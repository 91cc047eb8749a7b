//! Typed client for the PeopleSoft mobile course catalog at
//! `psmobile.pitt.edu`.
//!
//! Queries come in three granularities, each a narrower slice of the
//! catalog for one term:
//!
//! - [`get_term_courses`]: every course a subject offers
//! - [`get_course_sections`]: every scheduled section of one course
//! - [`get_section_details`]: a single section looked up by class number
//!
//! Inputs are validated before anything touches the network: subjects
//! against the catalog's subject table, terms against the term-code
//! pattern, course numbers zero-padded to the four digits the catalog
//! stores. Each query primes a CSRF-guarded search session, submits the
//! form, and walks the returned markup into [`Subject`], [`Course`], and
//! [`Section`] values.
//!
//! ```no_run
//! let subject = psmobile::get_term_courses("2194", "CS")?;
//! for number in subject.courses() {
//!     println!("CS {number}");
//! }
//!
//! let mut section = psmobile::get_section_details("2194", "27815")?;
//! let details = section.fetch_extra_details()?;
//! println!("{}", details.description);
//! # Ok::<(), psmobile::CatalogError>(())
//! ```

mod error;
mod extract;
mod fields;
mod models;
mod session;
mod subjects;
mod validate;

pub use error::{CatalogError, Result};
pub use models::{Course, DateRange, ExtraDetails, Section, Subject, TimeRange};

use scraper::Html;
use tracing::debug;

use session::{ClassSearch, Filters};

/// Fetch every course a subject offers in a term, with all scheduled
/// sections grouped under each course.
pub fn get_term_courses(term: &str, subject: &str) -> Result<Subject> {
    let term = validate::validate_term(term)?;
    let subject = validate::validate_subject(subject)?;
    debug!(term, subject, "requesting term courses");

    let filters = Filters {
        subject: subject.clone(),
        ..Filters::default()
    };
    let page = ClassSearch::open(&term, &filters)?.submit()?;

    let mut results = Subject::new(term, subject);
    extract::parse_subject(&Html::parse_document(&page), &mut results)?;
    Ok(results)
}

/// Fetch every scheduled section of one course in a term.
pub fn get_course_sections(term: &str, subject: &str, course: &str) -> Result<Course> {
    let term = validate::validate_term(term)?;
    let subject = validate::validate_subject(subject)?;
    let course = validate::validate_course_number(course)?;
    debug!(term, subject, course, "requesting course sections");

    let filters = Filters {
        subject: subject.clone(),
        course: course.clone(),
        ..Filters::default()
    };
    let page = ClassSearch::open(&term, &filters)?.submit()?;

    let mut results = Course::standalone(term, subject, course);
    extract::parse_course(&Html::parse_document(&page), &mut results)?;
    Ok(results)
}

/// Fetch a single section by its 5-digit class number. The number is passed
/// through to the catalog untouched; only the term is validated.
pub fn get_section_details(term: &str, section_number: &str) -> Result<Section> {
    let term = validate::validate_term(term)?;
    debug!(term, section_number, "requesting section details");

    let filters = Filters {
        section: section_number.to_string(),
        ..Filters::default()
    };
    let page = ClassSearch::open(&term, &filters)?.submit()?;

    extract::parse_section(&Html::parse_document(&page), term)
}
