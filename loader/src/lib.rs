//! # Holocron loader
//!
//! Loads a character record and its homeworld from a SWAPI-compatible REST API
//! and exposes the result as a watched tri-state [`LoadState`].
//!
//! The detail view depends on two fetches: the character, then the homeworld its
//! record points at. [`DetailLoader`] runs them in order, merges them into a
//! [`CharacterDetail`], and guarantees that a superseded load never overwrites the
//! state of a newer one. [`view_model`] turns the loaded state into display fields.

mod catalog;
mod config;
pub mod constants;
mod detail;
mod error;
mod identifier;
mod records;
#[cfg(test)]
mod testing;
mod transport;
pub mod view_model;

pub use catalog::{CatalogClient, CatalogEntry};
pub use config::ApiConfig;
pub use detail::{DetailLoader, LoadFailure, LoadOutcome, LoadSnapshot, LoadState, LoadStatus};
pub use error::{Error, FailureKind, Result, Subject};
pub use identifier::CharacterId;
pub use records::{Character, CharacterDetail, Homeworld};
pub use transport::{FetchResponse, HttpTransport, Transport, TransportError, TransportResult};
