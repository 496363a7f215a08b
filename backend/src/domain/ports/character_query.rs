//! Driving port for character read operations.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch aggregated
//! character data without importing the service's repository generics.

use async_trait::async_trait;

use crate::domain::character::{CharacterFilter, CharacterName, CharacterSummary, CharacterView};
use crate::domain::Error;

/// Aggregated character reads exposed to inbound adapters.
///
/// `requester_email` identifies the caller; an empty string means
/// anonymous and never matches an owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterQuery: Send + Sync {
    /// Assemble the merged, redacted view of one character.
    async fn read(
        &self,
        name: &CharacterName,
        requester_email: &str,
    ) -> Result<CharacterView, Error>;

    /// List character summaries matching the filter.
    async fn list(&self, filter: &CharacterFilter) -> Result<Vec<CharacterSummary>, Error>;
}
