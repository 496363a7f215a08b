//! Character aggregation and ownership-gated mutation service.
//!
//! This module implements the driving ports for character reads and
//! mutations. Reads merge the local authorization record with a live
//! snapshot from the external profile source; a failed fetch degrades the
//! response rather than failing it. Mutations pass the ownership gate
//! before any store call, so a rejected requester leaves records
//! untouched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::character::{
    AuthorizationFlags, CharacterFilter, CharacterName, CharacterRecord, CharacterSummary,
    CharacterView, GuildRecord, UpdateCharacterFields,
};
use crate::domain::ports::{
    CharacterCommand, CharacterQuery, CharacterRepository, CharacterStoreError, ProfileSource,
};
use crate::domain::privacy::{redact, split_privacy, PrivacyField};
use crate::domain::snapshot::ProfileSnapshot;
use crate::domain::Error;

/// Uniform gate rejection; deliberately silent about whether the
/// character exists at all.
const NOT_YOUR_CHARACTER: &str = "not your character";

/// Character service implementing the driving ports over the record store
/// and the external profile source.
pub struct CharacterService<R, P> {
    records: Arc<R>,
    profiles: Arc<P>,
}

impl<R, P> CharacterService<R, P> {
    /// Create a new service over the given adapters.
    pub fn new(records: Arc<R>, profiles: Arc<P>) -> Self {
        Self { records, profiles }
    }
}

impl<R, P> CharacterService<R, P>
where
    R: CharacterRepository,
    P: ProfileSource,
{
    fn map_store_error(error: CharacterStoreError) -> Error {
        match error {
            CharacterStoreError::Connection { message } => {
                Error::service_unavailable(format!("character store unavailable: {message}"))
            }
            CharacterStoreError::Query { message } => {
                Error::internal(format!("character store error: {message}"))
            }
        }
    }

    fn is_owner(requester_email: &str, record: &CharacterRecord) -> bool {
        !requester_email.is_empty() && requester_email == record.credential.owner.email
    }

    /// Fetch the live snapshot, degrading to an empty one on any failure.
    async fn fetch_snapshot(&self, record: &CharacterRecord) -> ProfileSnapshot {
        match self
            .profiles
            .fetch_character(&record.credential.token, &record.name)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(error) => {
                debug!(
                    character = %record.name,
                    error = %error,
                    "profile source unavailable, serving degraded read"
                );
                ProfileSnapshot::unavailable()
            }
        }
    }

    /// Resolve the record's guild, treating lookup failure as absence.
    async fn resolve_guild(&self, record: &CharacterRecord) -> Option<GuildRecord> {
        let id = record.guild_id?;
        match self.records.find_guild(id).await {
            Ok(guild) => guild,
            Err(error) => {
                warn!(
                    character = %record.name,
                    error = %error,
                    "guild lookup failed, returning view without guild"
                );
                None
            }
        }
    }

    /// Ownership gate: resolve the record only if `requester_email` owns it.
    async fn assert_owner(
        &self,
        requester_email: &str,
        name: &CharacterName,
    ) -> Result<CharacterRecord, Error> {
        if requester_email.is_empty() {
            return Err(Error::forbidden(NOT_YOUR_CHARACTER));
        }
        self.records
            .find_owned(requester_email, name)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::forbidden(NOT_YOUR_CHARACTER))
    }
}

#[async_trait]
impl<R, P> CharacterQuery for CharacterService<R, P>
where
    R: CharacterRepository,
    P: ProfileSource,
{
    async fn read(
        &self,
        name: &CharacterName,
        requester_email: &str,
    ) -> Result<CharacterView, Error> {
        let record = self
            .records
            .find_by_name(name)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("character not found"))?;

        // Caching hint only; the adapter swallows failures and never blocks.
        self.records.warm_hint(record.credential.id);

        let snapshot = self.fetch_snapshot(&record).await;
        let privacy = split_privacy(&record.privacy);
        let is_owner = Self::is_owner(requester_email, &record);
        let redacted = redact(&snapshot, &privacy, is_owner);
        let guild = self.resolve_guild(&record).await;

        let api_token_available = redacted.api_token_available();
        Ok(CharacterView {
            fields: redacted.into_fields(),
            api_token_available,
            privacy,
            account_name: record.credential.account_name,
            alias: record.credential.owner.alias,
            authorization: AuthorizationFlags {
                show_public: record.show_public,
                show_guild: record.show_guild,
            },
            guild_tag: guild.as_ref().map(|guild| guild.tag.clone()),
            guild_name: guild.map(|guild| guild.name),
        })
    }

    async fn list(&self, filter: &CharacterFilter) -> Result<Vec<CharacterSummary>, Error> {
        self.records
            .list(filter)
            .await
            .map_err(Self::map_store_error)
    }
}

#[async_trait]
impl<R, P> CharacterCommand for CharacterService<R, P>
where
    R: CharacterRepository,
    P: ProfileSource,
{
    async fn update(
        &self,
        requester_email: &str,
        name: &CharacterName,
        fields: UpdateCharacterFields,
    ) -> Result<CharacterRecord, Error> {
        let record = self.assert_owner(requester_email, name).await?;
        self.records
            .update(record.id, fields)
            .await
            .map_err(Self::map_store_error)
    }

    async fn set_privacy(
        &self,
        name: &CharacterName,
        requester_email: &str,
        field: &PrivacyField,
    ) -> Result<(), Error> {
        self.assert_owner(requester_email, name).await?;
        self.records
            .set_privacy(name, field)
            .await
            .map_err(Self::map_store_error)
    }

    async fn remove_privacy(
        &self,
        name: &CharacterName,
        requester_email: &str,
        field: &PrivacyField,
    ) -> Result<(), Error> {
        self.assert_owner(requester_email, name).await?;
        self.records
            .remove_privacy(name, field)
            .await
            .map_err(Self::map_store_error)
    }
}

#[cfg(test)]
#[path = "character_service_tests.rs"]
mod tests;
