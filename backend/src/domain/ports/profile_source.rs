//! Driven port for the external account API serving character profiles.

use async_trait::async_trait;

use crate::domain::character::CharacterName;
use crate::domain::snapshot::ProfileSnapshot;

/// Failures surfaced by profile source adapters.
///
/// The aggregator absorbs all of these into a degraded read; the taxonomy
/// exists so adapters can log and map transport detail faithfully.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileSourceError {
    /// Network-level failure reaching the provider.
    #[error("profile source transport failure: {message}")]
    Transport { message: String },
    /// The provider did not answer within the configured deadline.
    #[error("profile source timed out: {message}")]
    Timeout { message: String },
    /// The provider rejected the credential token.
    #[error("profile source rejected the token: {message}")]
    InvalidToken { message: String },
    /// The provider throttled the request.
    #[error("profile source rate limited the request: {message}")]
    RateLimited { message: String },
    /// The provider answered with a payload that could not be decoded.
    #[error("profile source payload could not be decoded: {message}")]
    Decode { message: String },
}

impl ProfileSourceError {
    /// Construct a [`ProfileSourceError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Construct a [`ProfileSourceError::Timeout`].
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Construct a [`ProfileSourceError::InvalidToken`].
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Construct a [`ProfileSourceError::RateLimited`].
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Construct a [`ProfileSourceError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Black-box fetch of a character's live profile data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the provider snapshot for `name` using the credential token.
    async fn fetch_character(
        &self,
        token: &str,
        name: &CharacterName,
    ) -> Result<ProfileSnapshot, ProfileSourceError>;
}
