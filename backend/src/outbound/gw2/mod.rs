//! Adapters for the external account API.

mod http_source;

pub use http_source::Gw2HttpSource;
