//! Outbound adapters implementing domain ports for external
//! infrastructure: the account API profile source and the record store.

pub mod gw2;
pub mod memory;
