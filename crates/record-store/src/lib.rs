//! # Record Store
//!
//! The immutable, ordered substrate that every downstream engine reads.
//! Ingestion coerces raw (stringly-typed) rows into typed `Record`s and
//! validates them against the configured parameter domain; after `load`
//! returns, the store never changes and concurrent reads need no locking.
//!
//! Parsing files is a collaborator's job — this crate only sees rows that
//! have already been split into named fields.

pub mod error;
pub mod store;

// Re-export the core types to provide a clean public API.
pub use error::StoreError;
pub use store::{RawRecord, RecordStore};
