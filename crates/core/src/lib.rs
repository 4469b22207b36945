//! Depotbook Core - Domain entities, services, and traits.
//!
//! This crate contains the depot valuation and projection engine.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod depot;
pub mod errors;
pub mod portfolio;
pub mod utils;

// Re-export the depot entry store and ledger types
pub use depot::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
