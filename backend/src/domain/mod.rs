//! Domain core: entities, services, and the ports they depend on.
//!
//! Everything in this module is transport agnostic. Inbound adapters call
//! the driving ports in [`ports`]; outbound adapters implement the driven
//! ports. The services in [`character_service`] and [`sampling_cache`]
//! contain the aggregation, authorization, and caching behaviour.

pub mod character;
pub mod character_service;
pub mod error;
pub mod ports;
pub mod privacy;
pub mod sampling_cache;
pub mod snapshot;

pub use self::error::{Error, ErrorCode};
