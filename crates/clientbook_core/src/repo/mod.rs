//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the fixed set of client lookup operations as a typed contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce client validation before persistence.
//! - Sequence-returning lookups yield an empty vec for "no match", never an
//!   error; only the required single-record path raises not-found.

pub mod client_repo;
