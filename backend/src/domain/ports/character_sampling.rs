//! Driving port for randomized selections from the public character set.

use async_trait::async_trait;

use crate::domain::Error;

/// Randomized sampling over the cached public character list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterSampling: Send + Sync {
    /// Draw distinct character names without replacement.
    ///
    /// `n` defaults to the configured sample size and is clamped to the
    /// configured hard cap before sampling.
    async fn random(&self, n: Option<usize>) -> Result<Vec<String>, Error>;

    /// The current "characters of the day" selection.
    async fn characters_of_the_day(&self) -> Result<Vec<String>, Error>;
}
