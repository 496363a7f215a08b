//! Character data model.
//!
//! A character couples a locally stored authorization/privacy record with
//! transient profile data fetched from the external account API. The local
//! record owns who may mutate the character and which profile fields are
//! hidden from non-owners; everything else about a character is provider
//! data that never persists here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by [`CharacterName::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterValidationError {
    EmptyName,
    UntrimmedName,
}

impl fmt::Display for CharacterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "character name must not be empty"),
            Self::UntrimmedName => {
                write!(f, "character name must not have leading or trailing whitespace")
            }
        }
    }
}

impl std::error::Error for CharacterValidationError {}

/// Character name as registered with the external account API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Validate and construct a [`CharacterName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, CharacterValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CharacterValidationError::EmptyName);
        }
        if name.trim() != name {
            return Err(CharacterValidationError::UntrimmedName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for CharacterName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CharacterName> for String {
    fn from(value: CharacterName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CharacterName {
    type Error = CharacterValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered account owning one or more credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerAccount {
    /// Stable account identifier.
    pub id: Uuid,
    /// Login email; the requester identity mutations are checked against.
    pub email: String,
    /// Public alias shown alongside the account's characters.
    pub alias: String,
}

/// Link between a local account and an external-API token.
///
/// The token is a secret; it travels to the external profile source and
/// nowhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredential {
    /// Stable credential identifier.
    pub id: Uuid,
    /// Secret token presented to the external account API.
    pub token: String,
    /// Provider-side account name the token belongs to.
    pub account_name: String,
    /// Account owning this credential.
    pub owner: OwnerAccount,
}

/// Local authorization and privacy state for one character.
///
/// ## Invariants
/// - `privacy` is the stored delimiter-joined form; split it with
///   [`crate::domain::privacy::split_privacy`] before interpreting it.
/// - `name` is unique within the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
    /// Stable record identifier.
    pub id: Uuid,
    /// Unique character name.
    pub name: CharacterName,
    /// Credential used to fetch this character's profile.
    pub credential: ApiCredential,
    /// Guild the character belongs to, when any.
    pub guild_id: Option<Uuid>,
    /// Stored privacy field list, `|`-joined.
    pub privacy: String,
    /// Whether the character is eligible for public sampling.
    pub show_public: bool,
    /// Whether guild details may be shown on the character.
    pub show_guild: bool,
}

/// Guild a character may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildRecord {
    /// Stable guild identifier.
    pub id: Uuid,
    /// Short guild tag.
    pub tag: String,
    /// Full guild name.
    pub name: String,
}

/// Row returned by character list queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    /// Character name.
    pub name: String,
    /// Provider-side account name.
    pub account_name: String,
    /// Owner's public alias.
    pub alias: String,
    /// Whether the character is eligible for public sampling.
    pub show_public: bool,
}

/// Mutable authorization flags accepted by the update operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterFields {
    /// New public-sampling eligibility, when present.
    pub show_public: Option<bool>,
    /// New guild visibility, when present.
    pub show_guild: Option<bool>,
}

/// Filter for character list queries. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFilter {
    /// Restrict to characters owned by this email.
    pub email: Option<String>,
    /// Restrict to characters owned by this alias.
    pub alias: Option<String>,
}

/// Authorization flags echoed back to clients on reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationFlags {
    /// Whether the character is eligible for public sampling.
    pub show_public: bool,
    /// Whether guild details may be shown on the character.
    pub show_guild: bool,
}

/// Aggregated character view assembled by the read pipeline.
///
/// Provider profile fields are flattened to the top level of the JSON
/// object, already redacted for the requester. `api_token_available`
/// reflects whether the external fetch succeeded for this request only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CharacterView {
    /// Redacted provider profile fields.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
    /// True when the external profile fetch succeeded in this request.
    pub api_token_available: bool,
    /// Field names the owner marked private.
    pub privacy: Vec<String>,
    /// Provider-side account name.
    pub account_name: String,
    /// Owner's public alias.
    pub alias: String,
    /// Authorization flags stored on the record.
    pub authorization: AuthorizationFlags,
    /// Guild tag, when the record references a resolvable guild.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_tag: Option<String>,
    /// Guild name, when the record references a resolvable guild.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_name: Option<String>,
}
