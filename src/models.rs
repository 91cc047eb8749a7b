//! The subject / course / section entity tree.
//!
//! Query results form a three-level hierarchy: a [`Subject`] owns courses in
//! document order, a [`Course`] owns its sections, and a [`Section`] is the
//! leaf with the schedule fields. A course or section fetched on its own has
//! no parent to read the term or subject from, so each level carries a tagged
//! origin: either a shared scope borrowed from the parent or direct values,
//! never both.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use scraper::Html;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::extract;
use crate::session;
use crate::validate;

/// Term and subject shared by every course parsed under one subject query.
#[derive(Debug)]
pub(crate) struct SubjectScope {
    pub term: String,
    pub subject: String,
}

#[derive(Debug)]
pub(crate) enum CourseOrigin {
    /// Attached to a parent subject; term and subject read through it.
    Subject(Arc<SubjectScope>),
    /// Fetched on its own; carries the values directly.
    Standalone { term: String, subject: String },
}

/// Course identity shared with every section parsed under it.
#[derive(Debug)]
pub(crate) struct CourseScope {
    pub origin: CourseOrigin,
    pub number: String,
}

impl CourseScope {
    pub fn term(&self) -> &str {
        match &self.origin {
            CourseOrigin::Subject(scope) => &scope.term,
            CourseOrigin::Standalone { term, .. } => term,
        }
    }

    pub fn subject(&self) -> &str {
        match &self.origin {
            CourseOrigin::Subject(scope) => &scope.subject,
            CourseOrigin::Standalone { subject, .. } => subject,
        }
    }
}

#[derive(Debug)]
pub(crate) enum SectionOrigin {
    /// Attached to a parent course; term, subject, and number read through it.
    Course(Arc<CourseScope>),
    /// Fetched by class number. Subject and course number stay empty unless
    /// the results page carried a heading to back-fill them from.
    Standalone {
        term: String,
        subject: Option<String>,
        course_number: Option<String>,
    },
}

/// Raw start and end meeting times as the portal prints them, e.g. `3:00PM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl Serialize for TimeRange {
    /// Serializes as a `[start, end]` pair.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.start, &self.end).serialize(serializer)
    }
}

/// First and last meeting dates of a section, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Detail-page fields fetched lazily by [`Section::fetch_extra_details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraDetails {
    pub units: String,
    pub description: String,
    pub prerequisites: String,
    /// Only present when the detail page lists class attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_attributes: Option<String>,
}

/// All courses offered for one subject in one term.
#[derive(Debug)]
pub struct Subject {
    scope: Arc<SubjectScope>,
    courses: IndexMap<String, Course>,
}

impl Subject {
    pub(crate) fn new(term: String, subject: String) -> Self {
        Self {
            scope: Arc::new(SubjectScope { term, subject }),
            courses: IndexMap::new(),
        }
    }

    pub fn term(&self) -> &str {
        &self.scope.term
    }

    pub fn subject(&self) -> &str {
        &self.scope.subject
    }

    /// Course numbers offered this term, in document order.
    pub fn courses(&self) -> Vec<&str> {
        self.courses.keys().map(String::as_str).collect()
    }

    /// Look up a course by number. Accepts unpadded input, so `"7"` finds
    /// course `"0007"`.
    pub fn course(&self, number: &str) -> Result<&Course> {
        let number = validate::validate_course_number(number)?;
        match self.courses.get(&number) {
            Some(course) => Ok(course),
            None => Err(CatalogError::CourseNotFound {
                subject: self.scope.subject.clone(),
                number,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Insert-or-get the course for `number`, keeping document order.
    pub(crate) fn entry(&mut self, number: &str) -> &mut Course {
        let scope = Arc::clone(&self.scope);
        self.courses
            .entry(number.to_string())
            .or_insert_with(|| Course::attached(scope, number.to_string()))
    }

    /// Serialize as a course-number to section-list mapping, in document
    /// order. `include_extra` adds each section's cached extra details; it
    /// never triggers a fetch.
    pub fn to_value(&self, include_extra: bool) -> Value {
        let mut map = serde_json::Map::new();
        for (number, course) in &self.courses {
            map.insert(number.clone(), course.to_value(include_extra));
        }
        Value::Object(map)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "< Subject | {} | {} | {} courses >",
            self.scope.term,
            self.scope.subject,
            self.courses.len()
        )
    }
}

/// One course and its scheduled sections.
#[derive(Debug)]
pub struct Course {
    scope: Arc<CourseScope>,
    sections: Vec<Section>,
}

impl Course {
    fn attached(subject: Arc<SubjectScope>, number: String) -> Self {
        Self {
            scope: Arc::new(CourseScope {
                origin: CourseOrigin::Subject(subject),
                number,
            }),
            sections: Vec::new(),
        }
    }

    pub(crate) fn standalone(term: String, subject: String, number: String) -> Self {
        Self {
            scope: Arc::new(CourseScope {
                origin: CourseOrigin::Standalone { term, subject },
                number,
            }),
            sections: Vec::new(),
        }
    }

    pub(crate) fn scope_arc(&self) -> Arc<CourseScope> {
        Arc::clone(&self.scope)
    }

    pub(crate) fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn term(&self) -> &str {
        self.scope.term()
    }

    pub fn subject(&self) -> &str {
        self.scope.subject()
    }

    pub fn number(&self) -> &str {
        &self.scope.number
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Serialize as an array of section objects, in document order.
    pub fn to_value(&self, include_extra: bool) -> Value {
        Value::Array(
            self.sections
                .iter()
                .map(|section| section.to_value(include_extra))
                .collect(),
        )
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "< Course | {} | {} {} >",
            self.term(),
            self.subject(),
            self.number()
        )
    }
}

/// One scheduled section of a course.
#[derive(Debug)]
pub struct Section {
    /// Section identifier within the course, e.g. `"1030"`.
    pub section: String,
    /// Meeting format, e.g. `"LEC"` or `"REC"`.
    pub section_type: String,
    /// The registrar's 5-digit class number.
    pub number: String,
    /// Two-character meeting day codes; `None` when the schedule is TBA.
    pub days: Option<Vec<String>>,
    /// Meeting times; `None` when the schedule is TBA.
    pub times: Option<TimeRange>,
    pub room: String,
    pub instructor: String,
    pub dates: DateRange,
    /// Detail-page URL, also used by [`Section::fetch_extra_details`].
    pub url: String,
    pub(crate) origin: SectionOrigin,
    pub(crate) extra: Option<ExtraDetails>,
}

impl Section {
    pub fn term(&self) -> &str {
        match &self.origin {
            SectionOrigin::Course(scope) => scope.term(),
            SectionOrigin::Standalone { term, .. } => term,
        }
    }

    /// Subject code, resolved through the parent course when attached. A
    /// standalone section has none until the results page supplies a heading.
    pub fn subject(&self) -> Option<&str> {
        match &self.origin {
            SectionOrigin::Course(scope) => Some(scope.subject()),
            SectionOrigin::Standalone { subject, .. } => subject.as_deref(),
        }
    }

    /// Course number, resolved like [`Section::subject`].
    pub fn course_number(&self) -> Option<&str> {
        match &self.origin {
            SectionOrigin::Course(scope) => Some(scope.number.as_str()),
            SectionOrigin::Standalone { course_number, .. } => course_number.as_deref(),
        }
    }

    /// Cached extra details, if already fetched.
    pub fn extra_details(&self) -> Option<&ExtraDetails> {
        self.extra.as_ref()
    }

    /// Fetch and cache the detail page behind [`Section::url`] on first call.
    /// Later calls return the cache without touching the network.
    pub fn fetch_extra_details(&mut self) -> Result<&ExtraDetails> {
        let details = match self.extra.take() {
            Some(details) => details,
            None => {
                debug!(url = %self.url, "fetching section detail page");
                let body = session::fetch_page(&self.url)?;
                let html = Html::parse_document(&body);
                extract::parse_extra_details(&html)?
            }
        };
        Ok(self.extra.insert(details))
    }

    pub(crate) fn set_backrefs(&mut self, subject: String, course_number: String) {
        if let SectionOrigin::Standalone {
            subject: slot_subject,
            course_number: slot_number,
            ..
        } = &mut self.origin
        {
            *slot_subject = Some(subject);
            *slot_number = Some(course_number);
        }
    }

    /// Serialize to an object with the schedule fields. `include_extra` adds
    /// the cached extra details; it never triggers a fetch.
    pub fn to_value(&self, include_extra: bool) -> Value {
        let mut data = json!({
            "subject": self.subject(),
            "term": self.term(),
            "days": self.days,
            "times": self.times,
            "room": self.room,
            "instructor": self.instructor,
            "start_date": self.dates.start,
            "end_date": self.dates.end,
            "section": self.section,
            "section_type": self.section_type,
            "number": self.number,
        });
        if include_extra {
            if let Some(extra) = &self.extra {
                if let Some(map) = data.as_object_mut() {
                    map.insert("extra".to_string(), json!(extra));
                }
            }
        }
        data
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "< Section | {} {} | {} {} | {} >",
            self.subject().unwrap_or("-"),
            self.course_number().unwrap_or("-"),
            self.section_type,
            self.number,
            self.instructor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dates() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2019, 8, 26).unwrap(),
            end: NaiveDate::from_ymd_opt(2019, 12, 6).unwrap(),
        }
    }

    fn sample_section(origin: SectionOrigin) -> Section {
        Section {
            section: "1030".to_string(),
            section_type: "LEC".to_string(),
            number: "27815".to_string(),
            days: Some(vec!["Mo".to_string(), "We".to_string()]),
            times: Some(TimeRange {
                start: "3:00PM".to_string(),
                end: "4:15PM".to_string(),
            }),
            room: "205 LAWRN".to_string(),
            instructor: "Ramirez, Johnathan".to_string(),
            dates: sample_dates(),
            url: "https://example.edu/section/27815".to_string(),
            origin,
            extra: None,
        }
    }

    fn sample_subject() -> Subject {
        let mut subject = Subject::new("2194".to_string(), "CS".to_string());
        for number in ["0007", "0401"] {
            let course = subject.entry(number);
            let origin = SectionOrigin::Course(course.scope_arc());
            course.push(sample_section(origin));
        }
        subject
    }

    #[test]
    fn attached_section_resolves_through_parents() {
        let subject = sample_subject();
        let course = subject.course("0007").unwrap();
        let section = &course.sections()[0];
        assert_eq!(section.term(), "2194");
        assert_eq!(section.subject(), Some("CS"));
        assert_eq!(section.course_number(), Some("0007"));
    }

    #[test]
    fn standalone_section_backref_fill() {
        let mut section = sample_section(SectionOrigin::Standalone {
            term: "2194".to_string(),
            subject: None,
            course_number: None,
        });
        assert_eq!(section.subject(), None);
        assert_eq!(section.course_number(), None);

        section.set_backrefs("CS".to_string(), "0007".to_string());
        assert_eq!(section.term(), "2194");
        assert_eq!(section.subject(), Some("CS"));
        assert_eq!(section.course_number(), Some("0007"));
    }

    #[test]
    fn standalone_course_carries_direct_values() {
        let course = Course::standalone(
            "2201".to_string(),
            "MATH".to_string(),
            "0220".to_string(),
        );
        assert_eq!(course.term(), "2201");
        assert_eq!(course.subject(), "MATH");
        assert_eq!(course.number(), "0220");
    }

    #[test]
    fn course_lookup_pads_input() {
        let subject = sample_subject();
        assert_eq!(subject.course("7").unwrap().number(), "0007");
        assert_eq!(subject.course("401").unwrap().number(), "0401");
    }

    #[test]
    fn course_lookup_missing() {
        let subject = sample_subject();
        assert!(matches!(
            subject.course("9999"),
            Err(CatalogError::CourseNotFound { subject, number })
                if subject == "CS" && number == "9999"
        ));
    }

    #[test]
    fn course_lookup_invalid_number() {
        let subject = sample_subject();
        assert!(matches!(
            subject.course("12345"),
            Err(CatalogError::InvalidCourseNumber(_))
        ));
    }

    #[test]
    fn subject_round_trip_keys_match_courses() {
        let subject = sample_subject();
        let value = subject.to_value(false);
        let map = value.as_object().unwrap();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, subject.courses());

        for number in subject.courses() {
            assert_eq!(map[number], subject.course(number).unwrap().to_value(false));
        }
    }

    #[test]
    fn section_value_key_order() {
        let subject = sample_subject();
        let value = subject.course("0007").unwrap().to_value(false);
        let sections = value.as_array().unwrap();
        assert_eq!(sections.len(), 1);

        let keys: Vec<&str> = sections[0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            [
                "subject",
                "term",
                "days",
                "times",
                "room",
                "instructor",
                "start_date",
                "end_date",
                "section",
                "section_type",
                "number"
            ]
        );
    }

    #[test]
    fn section_value_fields() {
        let subject = sample_subject();
        let value = subject.course("0007").unwrap().to_value(false);
        let section = &value.as_array().unwrap()[0];

        assert_eq!(section["subject"], "CS");
        assert_eq!(section["term"], "2194");
        assert_eq!(section["days"], json!(["Mo", "We"]));
        assert_eq!(section["times"], json!(["3:00PM", "4:15PM"]));
        assert_eq!(section["start_date"], "2019-08-26");
        assert_eq!(section["end_date"], "2019-12-06");
        assert_eq!(section["number"], "27815");
    }

    #[test]
    fn tba_section_serializes_nulls() {
        let mut section = sample_section(SectionOrigin::Standalone {
            term: "2194".to_string(),
            subject: Some("CS".to_string()),
            course_number: Some("0007".to_string()),
        });
        section.days = None;
        section.times = None;

        let value = section.to_value(false);
        assert_eq!(value["days"], Value::Null);
        assert_eq!(value["times"], Value::Null);
    }

    #[test]
    fn extra_included_only_when_cached_and_requested() {
        let mut section = sample_section(SectionOrigin::Standalone {
            term: "2194".to_string(),
            subject: Some("CS".to_string()),
            course_number: Some("0007".to_string()),
        });

        // Not cached: include_extra is a no-op.
        assert!(section.to_value(true).get("extra").is_none());

        section.extra = Some(ExtraDetails {
            units: "3 units".to_string(),
            description: "Introductory programming.".to_string(),
            prerequisites: "None".to_string(),
            class_attributes: None,
        });
        assert!(section.to_value(false).get("extra").is_none());

        let value = section.to_value(true);
        assert_eq!(value["extra"]["units"], "3 units");
        assert!(value["extra"].get("class_attributes").is_none());
    }

    #[test]
    fn cached_extra_details_skip_the_network() {
        let mut section = sample_section(SectionOrigin::Standalone {
            term: "2194".to_string(),
            subject: Some("CS".to_string()),
            course_number: Some("0007".to_string()),
        });
        // An unroutable URL: any fetch attempt would error out.
        section.url = "http://127.0.0.1:1/detail".to_string();
        section.extra = Some(ExtraDetails {
            units: "3 units".to_string(),
            description: "Cached.".to_string(),
            prerequisites: "None".to_string(),
            class_attributes: Some("Online".to_string()),
        });

        let details = section.fetch_extra_details().unwrap();
        assert_eq!(details.description, "Cached.");
        assert_eq!(details.class_attributes.as_deref(), Some("Online"));
    }

    #[test]
    fn display_formats() {
        let subject = sample_subject();
        assert_eq!(subject.to_string(), "< Subject | 2194 | CS | 2 courses >");
        assert_eq!(
            subject.course("0007").unwrap().to_string(),
            "< Course | 2194 | CS 0007 >"
        );
        let section = &subject.course("0007").unwrap().sections()[0];
        assert_eq!(
            section.to_string(),
            "< Section | CS 0007 | LEC 27815 | Ramirez, Johnathan >"
        );
    }
}
