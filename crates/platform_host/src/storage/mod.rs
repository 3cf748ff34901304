//! Key-value persistence contracts, adapters, and error types.

pub mod error;
pub mod prefs;
