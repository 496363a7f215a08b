//! In-memory record store adapter.
//!
//! The production record store is an external collaborator behind the
//! [`CharacterRepository`] port; this adapter backs local runs and
//! integration tests with the same semantics: name-unique records,
//! visibility-aware public listing, and `|`-joined privacy storage.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::trace;
use uuid::Uuid;

use crate::domain::character::{
    CharacterFilter, CharacterName, CharacterRecord, CharacterSummary, GuildRecord,
    UpdateCharacterFields,
};
use crate::domain::ports::{CharacterRepository, CharacterStoreError};
use crate::domain::privacy::{join_privacy, split_privacy, PrivacyField};

#[derive(Default)]
struct Inner {
    characters: Vec<CharacterRecord>,
    guilds: HashMap<Uuid, GuildRecord>,
}

/// Record store keeping everything in process memory.
#[derive(Default)]
pub struct InMemoryCharacterStore {
    inner: RwLock<Inner>,
}

impl InMemoryCharacterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records and guilds.
    pub fn with_data(characters: Vec<CharacterRecord>, guilds: Vec<GuildRecord>) -> Self {
        let guilds = guilds.into_iter().map(|guild| (guild.id, guild)).collect();
        Self {
            inner: RwLock::new(Inner { characters, guilds }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn summary(record: &CharacterRecord) -> CharacterSummary {
    CharacterSummary {
        name: record.name.to_string(),
        account_name: record.credential.account_name.clone(),
        alias: record.credential.owner.alias.clone(),
        show_public: record.show_public,
    }
}

#[async_trait]
impl CharacterRepository for InMemoryCharacterStore {
    async fn find_by_name(
        &self,
        name: &CharacterName,
    ) -> Result<Option<CharacterRecord>, CharacterStoreError> {
        Ok(self
            .read()
            .characters
            .iter()
            .find(|record| record.name == *name)
            .cloned())
    }

    async fn find_owned(
        &self,
        email: &str,
        name: &CharacterName,
    ) -> Result<Option<CharacterRecord>, CharacterStoreError> {
        Ok(self
            .read()
            .characters
            .iter()
            .find(|record| record.name == *name && record.credential.owner.email == email)
            .cloned())
    }

    async fn list(
        &self,
        filter: &CharacterFilter,
    ) -> Result<Vec<CharacterSummary>, CharacterStoreError> {
        let inner = self.read();
        let mut rows: Vec<CharacterSummary> = inner
            .characters
            .iter()
            .filter(|record| {
                filter
                    .email
                    .as_deref()
                    .is_none_or(|email| record.credential.owner.email == email)
            })
            .filter(|record| {
                filter
                    .alias
                    .as_deref()
                    .is_none_or(|alias| record.credential.owner.alias == alias)
            })
            .map(summary)
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_public(&self) -> Result<Vec<String>, CharacterStoreError> {
        Ok(self
            .read()
            .characters
            .iter()
            .filter(|record| record.show_public)
            .map(|record| record.name.to_string())
            .collect())
    }

    async fn find_guild(&self, id: Uuid) -> Result<Option<GuildRecord>, CharacterStoreError> {
        Ok(self.read().guilds.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        fields: UpdateCharacterFields,
    ) -> Result<CharacterRecord, CharacterStoreError> {
        let mut inner = self.write();
        let record = inner
            .characters
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| CharacterStoreError::query(format!("no character with id {id}")))?;
        if let Some(show_public) = fields.show_public {
            record.show_public = show_public;
        }
        if let Some(show_guild) = fields.show_guild {
            record.show_guild = show_guild;
        }
        Ok(record.clone())
    }

    async fn set_privacy(
        &self,
        name: &CharacterName,
        field: &PrivacyField,
    ) -> Result<(), CharacterStoreError> {
        let mut inner = self.write();
        let record = inner
            .characters
            .iter_mut()
            .find(|record| record.name == *name)
            .ok_or_else(|| CharacterStoreError::query(format!("no character named {name}")))?;
        let mut fields = split_privacy(&record.privacy);
        if !fields.iter().any(|existing| existing == field.as_ref()) {
            fields.push(field.as_ref().to_owned());
        }
        record.privacy = join_privacy(&fields);
        Ok(())
    }

    async fn remove_privacy(
        &self,
        name: &CharacterName,
        field: &PrivacyField,
    ) -> Result<(), CharacterStoreError> {
        let mut inner = self.write();
        let record = inner
            .characters
            .iter_mut()
            .find(|record| record.name == *name)
            .ok_or_else(|| CharacterStoreError::query(format!("no character named {name}")))?;
        let mut fields = split_privacy(&record.privacy);
        fields.retain(|existing| existing != field.as_ref());
        record.privacy = join_privacy(&fields);
        Ok(())
    }

    fn warm_hint(&self, credential_id: Uuid) {
        // Nothing to warm in memory; keep the trace for parity with real
        // store adapters.
        trace!(%credential_id, "warm hint received");
    }
}
