//! OAuth2 utilities for Google services
//!
//! Wire types and the form POST helper used by the JWT bearer exchange.

pub mod helpers;
pub mod types;
