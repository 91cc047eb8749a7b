//! HTTP plumbing for the catalog's search flow.
//!
//! The search API refuses posts that do not echo back the `CSRFCookie` value
//! issued by the entry page, so every query opens a cookie-holding session,
//! loads the entry page once, and submits the form with the token inlined.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use tracing::debug;

use crate::error::{CatalogError, Result};

const CLASS_SEARCH_URL: &str = "https://psmobile.pitt.edu/app/catalog/classSearch";
const CLASS_SEARCH_API_URL: &str = "https://psmobile.pitt.edu/app/catalog/getClassSearch";

const USER_AGENT: &str = concat!("psmobile/", env!("CARGO_PKG_VERSION"));
const CSRF_COOKIE: &str = "CSRFCookie";
const CAMPUS: &str = "PIT";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search narrowing fields. Empty strings are sent as-is; the API treats
/// them as "no filter".
#[derive(Debug, Clone, Default)]
pub(crate) struct Filters {
    pub subject: String,
    pub course: String,
    pub section: String,
}

/// A primed search: entry page visited, CSRF token captured, form ready.
pub(crate) struct ClassSearch {
    http: Client,
    payload: Vec<(&'static str, String)>,
}

impl ClassSearch {
    /// Visit the search entry page and capture the CSRF token it sets.
    ///
    /// The token is read back from the session's cookie jar, so a cookie set
    /// on an intermediate redirect hop still counts.
    pub(crate) fn open(term: &str, filters: &Filters) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        debug!(term, url = CLASS_SEARCH_URL, "opening catalog search session");
        let response = http.get(CLASS_SEARCH_URL).send()?.error_for_status()?;
        let token = stored_cookie(&jar, response.url(), CSRF_COOKIE).ok_or_else(|| {
            CatalogError::InvalidSession(format!(
                "search entry page set no {CSRF_COOKIE} cookie"
            ))
        })?;

        Ok(Self {
            http,
            payload: build_payload(token, term, filters),
        })
    }

    /// Post the search form and hand back the raw results page.
    pub(crate) fn submit(self) -> Result<String> {
        debug!(url = CLASS_SEARCH_API_URL, "submitting catalog search");
        let response = self
            .http
            .post(CLASS_SEARCH_API_URL)
            .form(&self.payload)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

/// The form body the search API expects, in the order the portal sends it.
fn build_payload(token: String, term: &str, filters: &Filters) -> Vec<(&'static str, String)> {
    vec![
        ("CSRFToken", token),
        ("term", term.to_string()),
        ("campus", CAMPUS.to_string()),
        ("subject", filters.subject.clone()),
        ("acad_career", String::new()),
        ("catalog_nbr", filters.course.clone()),
        ("class_nbr", filters.section.clone()),
    ]
}

/// Look up one cookie's value in the jar's `Cookie:` line for `url`.
fn stored_cookie(jar: &Jar, url: &Url, name: &str) -> Option<String> {
    let header = jar.cookies(url)?;
    header
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Plain GET for pages reachable without the search session, such as the
/// per-section detail page.
pub(crate) fn fetch_page(url: &str) -> Result<String> {
    let http = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let response = http.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}
