//! HTTP client for the research-information-management projects API.
//!
//! Queries `https://{domain}/ws/api/projects/{uuid}`:
//! - `GET` fetches the project record
//! - `PUT` writes the `period` with a computed end date
//! - `PUT /notes` attaches an explanatory note
//!
//! Calls are one-shot. Only HTTP 200 counts as success.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_KEY_HEADER: &str = "api-key";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure before a status code was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}")]
    Status { status: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("API key contains characters that are not valid in a header")]
    InvalidApiKey,
}

impl ApiError {
    /// What to print where the log expects a status code.
    pub fn status_text(&self) -> String {
        match self {
            ApiError::Status { status } => status.to_string(),
            other => other.to_string(),
        }
    }
}

/// Operator-supplied session values, held in memory for one run.
#[derive(Clone)]
pub struct Credentials {
    pub base_domain: String,
    pub api_key: String,
    pub username: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_domain", &self.base_domain)
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default)]
    pub start_date: Option<String>,
    /// `None` when the key is missing, `Some(None)` for `"endDate": null`.
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// The parts of a project record this tool looks at. Unknown fields are
/// ignored.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    #[serde(default)]
    pub period: Option<Period>,
}

impl ProjectRecord {
    pub fn start_date(&self) -> Option<&str> {
        self.period.as_ref()?.start_date.as_deref()
    }

    pub fn end_date(&self) -> Option<&str> {
        self.period.as_ref()?.end_date.as_ref()?.as_deref()
    }

    /// True when the record carries an `endDate` key, even a null one.
    pub fn has_end_date(&self) -> bool {
        self.period
            .as_ref()
            .is_some_and(|period| period.end_date.is_some())
    }
}

#[derive(Serialize, Debug)]
struct PeriodUpdate<'a> {
    period: PeriodDates<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PeriodDates<'a> {
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Serialize, Debug)]
struct Note<'a> {
    username: &'a str,
    text: &'a str,
}

/// Operations the orchestrator needs from the remote API.
#[allow(async_fn_in_trait)]
pub trait ProjectApi {
    async fn fetch_project(&self, id: &str) -> Result<ProjectRecord, ApiError>;

    async fn write_end_date(&self, id: &str, start_date: &str, end_date: &str)
        -> Result<(), ApiError>;

    async fn add_note(&self, id: &str, text: &str, username: &str) -> Result<(), ApiError>;
}

pub struct PureClient {
    http: Client,
    base_url: String,
}

impl PureClient {
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let mut api_key =
            HeaderValue::from_str(&credentials.api_key).map_err(|_| ApiError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: base_url(&credentials.base_domain),
        })
    }

    fn project_url(&self, id: &str) -> String {
        format!("{}/ws/api/projects/{}", self.base_url, id)
    }

    fn notes_url(&self, id: &str) -> String {
        format!("{}/notes", self.project_url(id))
    }
}

impl ProjectApi for PureClient {
    async fn fetch_project(&self, id: &str) -> Result<ProjectRecord, ApiError> {
        let response = self.http.get(self.project_url(id)).send().await?;
        let body = check_status(response)?.text().await?;
        parse_record(&body)
    }

    async fn write_end_date(
        &self,
        id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<(), ApiError> {
        let payload = PeriodUpdate {
            period: PeriodDates {
                start_date,
                end_date,
            },
        };
        let response = self
            .http
            .put(self.project_url(id))
            .json(&payload)
            .send()
            .await?;
        check_status(response).map(drop)
    }

    async fn add_note(&self, id: &str, text: &str, username: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.notes_url(id))
            .json(&Note { username, text })
            .send()
            .await?;
        check_status(response).map(drop)
    }
}

/// Normalizes an operator-typed domain into `https://host`.
fn base_url(domain: &str) -> String {
    let host = domain.trim();
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    format!("https://{}", host.trim_end_matches('/'))
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if response.status() != StatusCode::OK {
        return Err(ApiError::Status {
            status: response.status().as_u16(),
        });
    }
    Ok(response)
}

fn parse_record(body: &str) -> Result<ProjectRecord, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}
