//! Driven port for the record store holding character authorization state.
//!
//! The store behind this trait is an external collaborator; adapters decide
//! where records actually live. The domain only depends on these lookups
//! and mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::character::{
    CharacterFilter, CharacterName, CharacterRecord, CharacterSummary, GuildRecord,
    UpdateCharacterFields,
};
use crate::domain::privacy::PrivacyField;

/// Persistence errors raised by character store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterStoreError {
    /// Store connection could not be established.
    #[error("character store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("character store query failed: {message}")]
    Query { message: String },
}

impl CharacterStoreError {
    /// Construct a [`CharacterStoreError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`CharacterStoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Record store operations the domain depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Fetch a character record by its unique name.
    async fn find_by_name(
        &self,
        name: &CharacterName,
    ) -> Result<Option<CharacterRecord>, CharacterStoreError>;

    /// Fetch a character record restricted to those owned by `email`.
    ///
    /// Returns `None` both when the character does not exist and when it is
    /// owned by someone else; callers must not distinguish the two.
    async fn find_owned(
        &self,
        email: &str,
        name: &CharacterName,
    ) -> Result<Option<CharacterRecord>, CharacterStoreError>;

    /// List character summaries matching the filter, ordered by name.
    async fn list(
        &self,
        filter: &CharacterFilter,
    ) -> Result<Vec<CharacterSummary>, CharacterStoreError>;

    /// Names of all characters eligible for public sampling.
    async fn list_public(&self) -> Result<Vec<String>, CharacterStoreError>;

    /// Fetch a guild record by identifier.
    async fn find_guild(&self, id: Uuid) -> Result<Option<GuildRecord>, CharacterStoreError>;

    /// Apply authorization-flag updates to a record.
    async fn update(
        &self,
        id: Uuid,
        fields: UpdateCharacterFields,
    ) -> Result<CharacterRecord, CharacterStoreError>;

    /// Add a field to a character's stored privacy selection.
    async fn set_privacy(
        &self,
        name: &CharacterName,
        field: &PrivacyField,
    ) -> Result<(), CharacterStoreError>;

    /// Remove a field from a character's stored privacy selection.
    async fn remove_privacy(
        &self,
        name: &CharacterName,
        field: &PrivacyField,
    ) -> Result<(), CharacterStoreError>;

    /// Best-effort cache-warm hint for the given credential.
    ///
    /// Adapters must return immediately and swallow any failure; the hint
    /// carries no correctness weight for the calling request.
    fn warm_hint(&self, credential_id: Uuid);
}
