//! Profile Source — the one-shot acquisition boundary for a session's profile.
//!
//! `acquire_profile` is called exactly once per session, before any turn can run.
//! Every failure is terminal for session start: callers never see a partially
//! populated `ProfileRecord`. No retry happens here; the caller re-invokes.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::profile::models::{EducationEntry, ExperienceEntry, ProfileRecord};

/// Providers run a scrape per request; allow them a generous window.
const ACQUISITION_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("invalid profile URL: {0}")]
    InvalidUrl(String),

    #[error("profile source unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("profile is private or access was denied")]
    Private,

    #[error("profile not found")]
    NotFound,

    #[error("profile source unavailable (status {status})")]
    Unavailable { status: u16 },

    #[error("malformed profile record: {0}")]
    Malformed(String),

    #[error("profile record is missing required field '{0}'")]
    Incomplete(&'static str),
}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn acquire_profile(&self, profile_url: &str) -> Result<ProfileRecord, AcquisitionError>;
}

/// Fetches profiles from an HTTP profile-provider endpoint.
///
/// Request: `GET {endpoint}?url={cleaned_profile_url}` with an optional bearer token.
/// The response is a JSON object (or an array whose first item is the profile)
/// using any of the common provider field spellings; see `sanitize_profile`.
#[derive(Clone)]
pub struct HttpProfileSource {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpProfileSource {
    pub fn new(endpoint: String, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(ACQUISITION_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn acquire_profile(&self, profile_url: &str) -> Result<ProfileRecord, AcquisitionError> {
        let cleaned = clean_profile_url(profile_url)?;
        info!("Acquiring profile {cleaned}");

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("url", cleaned.as_str())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(AcquisitionError::Unreachable)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AcquisitionError::Private),
            StatusCode::NOT_FOUND => return Err(AcquisitionError::NotFound),
            status if !status.is_success() => {
                warn!("Profile source returned {status} for {cleaned}");
                return Err(AcquisitionError::Unavailable {
                    status: status.as_u16(),
                });
            }
            _ => {}
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| AcquisitionError::Malformed(e.to_string()))?;

        let raw = match raw {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };

        let mut record = sanitize_profile(&raw)?;
        record.profile_url = cleaned;

        info!(
            "Profile acquired: {} experience entries, {} skills",
            record.experience.len(),
            record.skills.len()
        );
        Ok(record)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// URL handling
// ────────────────────────────────────────────────────────────────────────────

/// Validates a public profile URL and normalises it to `https://<host>/in/<handle>/`.
///
/// Accepts `linkedin.com` and its subdomains, `https` only, with a non-empty
/// handle of ASCII alphanumerics, `-`, `_` or `%`. Query, fragment and any
/// path after the handle are dropped.
pub fn clean_profile_url(raw: &str) -> Result<String, AcquisitionError> {
    let invalid = || AcquisitionError::InvalidUrl(raw.trim().to_string());

    let parsed = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if parsed.scheme() != "https" {
        return Err(invalid());
    }

    let host = parsed.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
    if host != "linkedin.com" && !host.ends_with(".linkedin.com") {
        return Err(invalid());
    }

    let mut segments = parsed.path_segments().ok_or_else(invalid)?;
    match (segments.next(), segments.next()) {
        (Some("in"), Some(handle)) if is_valid_handle(handle) => {
            Ok(format!("https://{host}/in/{handle}/"))
        }
        _ => Err(invalid()),
    }
}

fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '%'))
}

// ────────────────────────────────────────────────────────────────────────────
// Record sanitisation
// ────────────────────────────────────────────────────────────────────────────

/// Maps a provider's raw JSON record onto `ProfileRecord`.
///
/// Providers disagree on field names, so each target field is read from the
/// first non-empty of several candidates. A record without a name is rejected.
pub fn sanitize_profile(raw: &Value) -> Result<ProfileRecord, AcquisitionError> {
    if !raw.is_object() {
        return Err(AcquisitionError::Malformed(
            "expected a JSON object".to_string(),
        ));
    }

    let name = first_text(raw, &["fullName", "name"])
        .or_else(|| {
            let first = first_text(raw, &["firstName"]).unwrap_or_default();
            let last = first_text(raw, &["lastName"]).unwrap_or_default();
            let joined = format!("{first} {last}").trim().to_string();
            (!joined.is_empty()).then_some(joined)
        })
        .ok_or(AcquisitionError::Incomplete("name"))?;

    let experience = first_array(raw, &["experience", "positions", "workExperience"])
        .iter()
        .filter_map(|item| match item {
            Value::String(title) => Some(ExperienceEntry {
                title: title.trim().to_string(),
                organization: String::new(),
                description: String::new(),
            }),
            Value::Object(_) => {
                let entry = ExperienceEntry {
                    title: first_text(item, &["title", "position", "role"]).unwrap_or_default(),
                    organization: first_text(item, &["companyName", "company", "organization"])
                        .unwrap_or_default(),
                    description: first_text(item, &["description", "summary"]).unwrap_or_default(),
                };
                (!entry.title.is_empty() || !entry.organization.is_empty()).then_some(entry)
            }
            _ => None,
        })
        .collect();

    let education = first_array(raw, &["education", "schools"])
        .iter()
        .filter_map(|item| {
            let institution =
                first_text(item, &["schoolName", "school", "institution"]).unwrap_or_default();
            let degree = first_text(item, &["degreeName", "degree"]).unwrap_or_default();
            if institution.is_empty() && degree.is_empty() {
                return None;
            }
            Some(EducationEntry {
                institution,
                degree,
                field: first_text(item, &["fieldOfStudy", "field"]),
            })
        })
        .collect();

    let skills: BTreeSet<String> = first_array(raw, &["skills", "skillsAndEndorsements"])
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(_) => first_text(item, &["name", "title"]),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    Ok(ProfileRecord {
        name,
        headline: first_text(raw, &["headline", "title"]).unwrap_or_default(),
        summary: first_text(raw, &["about", "summary", "description"]).unwrap_or_default(),
        experience,
        skills,
        education,
        location: first_text(raw, &["location", "locationName"]).unwrap_or_default(),
        profile_url: first_text(raw, &["profileUrl", "url", "linkedinUrl"]).unwrap_or_default(),
    })
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_array<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_array))
        .find(|items| !items.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
