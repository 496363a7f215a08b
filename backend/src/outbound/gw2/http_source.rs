//! Reqwest-backed profile source adapter.
//!
//! This adapter owns transport details only: request construction, timeout
//! and HTTP error mapping, and JSON decoding into a profile snapshot. The
//! provider's field map is passed through untouched; the domain decides
//! what a requester may see.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde_json::Value;

use crate::domain::character::CharacterName;
use crate::domain::ports::{ProfileSource, ProfileSourceError};
use crate::domain::snapshot::ProfileSnapshot;

/// Profile source adapter performing GET requests against one endpoint.
pub struct Gw2HttpSource {
    client: Client,
    base_url: Url,
}

impl Gw2HttpSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn character_url(&self, name: &CharacterName) -> Result<Url, ProfileSourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProfileSourceError::transport("profile source URL cannot be a base"))?
            .extend(["v2", "characters", name.as_ref()]);
        Ok(url)
    }
}

#[async_trait]
impl ProfileSource for Gw2HttpSource {
    async fn fetch_character(
        &self,
        token: &str,
        name: &CharacterName,
    ) -> Result<ProfileSnapshot, ProfileSourceError> {
        let url = self.character_url(name)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_snapshot(body.as_ref())
    }
}

fn parse_snapshot(body: &[u8]) -> Result<ProfileSnapshot, ProfileSourceError> {
    let decoded: Value = serde_json::from_slice(body).map_err(|error| {
        ProfileSourceError::decode(format!("invalid profile JSON payload: {error}"))
    })?;
    match decoded {
        Value::Object(fields) => Ok(ProfileSnapshot::available(fields)),
        other => Err(ProfileSourceError::decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn map_transport_error(error: reqwest::Error) -> ProfileSourceError {
    if error.is_timeout() {
        ProfileSourceError::timeout(error.to_string())
    } else {
        ProfileSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ProfileSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProfileSourceError::invalid_token(message)
        }
        StatusCode::TOO_MANY_REQUESTS => ProfileSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProfileSourceError::timeout(message)
        }
        _ => ProfileSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
