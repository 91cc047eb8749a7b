//! Extraction of structured records from results and detail pages.
//!
//! A results page is a flat run of sibling nodes: `primary-head` divs
//! announcing a course (`"CS 0007 - INTRO TO COMPUTER PROGRAMMING"`) followed
//! by unclassed anchors, one per scheduled section, whose text is a fixed
//! 6-line record. The same walk drives all three query granularities; only
//! what happens to each recognized node differs. Detail pages are a second,
//! simpler positional layout handled by [`parse_extra_details`].

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::fields;
use crate::models::{Course, ExtraDetails, Section, SectionOrigin, Subject};
use crate::validate;

/// All descendant text of `el`, concatenated and trimmed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// An anchor's text split into trimmed, non-empty lines.
fn link_lines(el: ElementRef<'_>) -> Vec<String> {
    let text: String = el.text().collect();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn link_href(el: ElementRef<'_>) -> Result<&str> {
    el.attr("href").ok_or_else(|| {
        CatalogError::MalformedDocument("section link has no href".to_string())
    })
}

/// Locate the sibling run holding the results: the parent of the first
/// `primary-head` heading. The heading itself is re-visited by the walk as
/// the first course heading.
fn results_container(html: &Html) -> Result<ElementRef<'_>> {
    let heading = Selector::parse("div.primary-head").unwrap();
    let first = html.select(&heading).next().ok_or_else(|| {
        CatalogError::MalformedDocument("results page has no primary-head heading".to_string())
    })?;
    first.parent().and_then(ElementRef::wrap).ok_or_else(|| {
        CatalogError::MalformedDocument("primary-head heading has no parent element".to_string())
    })
}

/// Parse one link node's 6-line record plus `href` into a section.
fn section_from_link(el: ElementRef<'_>, href: &str, origin: SectionOrigin) -> Result<Section> {
    let lines = link_lines(el);
    if lines.len() < 6 {
        return Err(CatalogError::MalformedDocument(format!(
            "section link has {} text lines, expected 6",
            lines.len()
        )));
    }

    let identity = fields::parse_section_identity(fields::label_value(&lines[0])?)?;
    let (days, times) = fields::parse_meeting(fields::label_value(&lines[2])?)?;
    let room = fields::label_value(&lines[3])?.to_string();
    let instructor = fields::label_value(&lines[4])?.to_string();
    let dates = fields::parse_date_range(fields::label_value(&lines[5])?)?;

    Ok(Section {
        section: identity.section,
        section_type: identity.section_type,
        number: identity.number,
        days,
        times,
        room,
        instructor,
        dates,
        url: href.to_string(),
        origin,
        extra: None,
    })
}

/// Subject-level pass: each heading opens (or re-opens) a course, each link
/// appends a section to the course opened most recently.
pub(crate) fn parse_subject(html: &Html, subject: &mut Subject) -> Result<()> {
    let container = results_container(html)?;
    let mut current: Option<String> = None;

    for node in container.children() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.attr("class").is_some() {
            let text = element_text(el);
            if text.is_empty() {
                continue;
            }
            let heading = fields::parse_course_heading(&text)?;
            let number = validate::zero_pad(&heading.number);
            subject.entry(&number);
            current = Some(number);
        } else {
            let href = link_href(el)?;
            let Some(number) = current.as_deref() else {
                return Err(CatalogError::MalformedDocument(
                    "section link appears before any course heading".to_string(),
                ));
            };
            let course = subject.entry(number);
            let section =
                section_from_link(el, href, SectionOrigin::Course(course.scope_arc()))?;
            course.push(section);
        }
    }

    debug!(
        subject = subject.subject(),
        courses = subject.len(),
        "parsed subject results"
    );
    Ok(())
}

/// Course-level pass: the course is already known, so headings only delimit
/// and every link appends to it.
pub(crate) fn parse_course(html: &Html, course: &mut Course) -> Result<()> {
    let container = results_container(html)?;

    for node in container.children() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.attr("class").is_some() {
            continue;
        }
        let href = link_href(el)?;
        let section = section_from_link(el, href, SectionOrigin::Course(course.scope_arc()))?;
        course.push(section);
    }

    debug!(
        subject = course.subject(),
        number = course.number(),
        sections = course.sections().len(),
        "parsed course results"
    );
    Ok(())
}

/// Section-level pass: the first link supplies the section itself; headings
/// supply the subject and course number the standalone section lacks.
pub(crate) fn parse_section(html: &Html, term: String) -> Result<Section> {
    let container = results_container(html)?;
    let mut section: Option<Section> = None;
    let mut heading: Option<fields::CourseHeading> = None;

    for node in container.children() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.attr("class").is_some() {
            let text = element_text(el);
            if text.is_empty() {
                continue;
            }
            heading = Some(fields::parse_course_heading(&text)?);
        } else if section.is_none() {
            let href = link_href(el)?;
            let origin = SectionOrigin::Standalone {
                term: term.clone(),
                subject: None,
                course_number: None,
            };
            section = Some(section_from_link(el, href, origin)?);
        }
    }

    let Some(mut section) = section else {
        return Err(CatalogError::MalformedDocument(
            "results page has no section link".to_string(),
        ));
    };
    if let Some(heading) = heading {
        section.set_backrefs(heading.subject, validate::zero_pad(&heading.number));
    }
    Ok(section)
}

/// Extract the lazily-fetched detail fields from a section detail page.
///
/// The page is a run of `section-content` rows after the first one: units at
/// index 2, description at index 4, prerequisites at index 5, and class
/// attributes at index 6 when that row exists and names them. Row values sit
/// in a `pull-right` div.
pub(crate) fn parse_extra_details(html: &Html) -> Result<ExtraDetails> {
    let marker = Selector::parse("div.section-content.clearfix").unwrap();
    let first = html.select(&marker).next().ok_or_else(|| {
        CatalogError::MalformedDocument("detail page has no section-content rows".to_string())
    })?;

    let blocks: Vec<ElementRef<'_>> = first.next_siblings().filter_map(ElementRef::wrap).collect();
    if blocks.len() < 6 {
        return Err(CatalogError::MalformedDocument(format!(
            "detail page has {} content rows, expected at least 6",
            blocks.len()
        )));
    }

    let units = pull_right_text(blocks[2])?;
    let description = pull_right_text(blocks[4])?;
    let prerequisites = fields::label_value(&pull_right_text(blocks[5])?)?.to_string();
    let class_attributes = match blocks.get(6) {
        Some(block) if element_text(*block).contains("Class Attributes") => {
            Some(pull_right_text(*block)?)
        }
        _ => None,
    };

    Ok(ExtraDetails {
        units,
        description,
        prerequisites,
        class_attributes,
    })
}

fn pull_right_text(block: ElementRef<'_>) -> Result<String> {
    let value = Selector::parse("div.pull-right").unwrap();
    match block.select(&value).next() {
        Some(el) => Ok(element_text(el)),
        None => Err(CatalogError::MalformedDocument(
            "detail row has no pull-right value".to_string(),
        )),
    }
}
