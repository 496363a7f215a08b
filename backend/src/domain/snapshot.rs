//! Transient profile snapshot fetched from the external account API.

use serde_json::{Map, Value};

/// Point-in-time provider data for one character.
///
/// A snapshot is constructed fresh for each read request and discarded once
/// the response is assembled. `api_token_available` records whether the
/// external fetch succeeded in the current request; it is never a persisted
/// fact about the credential.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileSnapshot {
    fields: Map<String, Value>,
    api_token_available: bool,
}

impl ProfileSnapshot {
    /// Snapshot for a successful fetch carrying the provider's field map.
    pub fn available(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            api_token_available: true,
        }
    }

    /// Empty snapshot standing in for a failed fetch.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Provider field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether the external fetch succeeded in the current request.
    pub fn api_token_available(&self) -> bool {
        self.api_token_available
    }

    /// Consume the snapshot, returning its field map.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}
