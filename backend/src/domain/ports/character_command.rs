//! Driving port for ownership-gated character mutations.

use async_trait::async_trait;

use crate::domain::character::{CharacterName, CharacterRecord, UpdateCharacterFields};
use crate::domain::privacy::PrivacyField;
use crate::domain::Error;

/// Mutations exposed to inbound adapters.
///
/// Every operation authorizes through the ownership gate before touching
/// the record store; a rejected gate leaves the record untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterCommand: Send + Sync {
    /// Update authorization flags on an owned character.
    async fn update(
        &self,
        requester_email: &str,
        name: &CharacterName,
        fields: UpdateCharacterFields,
    ) -> Result<CharacterRecord, Error>;

    /// Hide a profile field from non-owners.
    async fn set_privacy(
        &self,
        name: &CharacterName,
        requester_email: &str,
        field: &PrivacyField,
    ) -> Result<(), Error>;

    /// Stop hiding a profile field from non-owners.
    async fn remove_privacy(
        &self,
        name: &CharacterName,
        requester_email: &str,
        field: &PrivacyField,
    ) -> Result<(), Error>;
}
