//! Domain ports and supporting types for the hexagonal boundary.

mod character_command;
mod character_query;
mod character_repository;
mod character_sampling;
mod profile_source;

#[cfg(test)]
pub use character_command::MockCharacterCommand;
pub use character_command::CharacterCommand;
#[cfg(test)]
pub use character_query::MockCharacterQuery;
pub use character_query::CharacterQuery;
#[cfg(test)]
pub use character_repository::MockCharacterRepository;
pub use character_repository::{CharacterRepository, CharacterStoreError};
#[cfg(test)]
pub use character_sampling::MockCharacterSampling;
pub use character_sampling::CharacterSampling;
#[cfg(test)]
pub use profile_source::MockProfileSource;
pub use profile_source::{ProfileSource, ProfileSourceError};
