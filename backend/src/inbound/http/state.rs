//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CharacterCommand, CharacterQuery, CharacterSampling};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Aggregated character reads.
    pub characters: Arc<dyn CharacterQuery>,
    /// Ownership-gated character mutations.
    pub character_commands: Arc<dyn CharacterCommand>,
    /// Randomized sampling over the public character list.
    pub sampling: Arc<dyn CharacterSampling>,
}

impl HttpState {
    /// Construct state from the three driving ports.
    pub fn new(
        characters: Arc<dyn CharacterQuery>,
        character_commands: Arc<dyn CharacterCommand>,
        sampling: Arc<dyn CharacterSampling>,
    ) -> Self {
        Self {
            characters,
            character_commands,
            sampling,
        }
    }
}
