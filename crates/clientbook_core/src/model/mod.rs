//! Domain model for client records.
//!
//! # Responsibility
//! - Define the canonical client record and its insert shape.
//! - Validate field-level invariants before anything touches storage.
//!
//! # Invariants
//! - Every persisted client has a store-assigned, immutable integer id.
//! - `name` is never empty; `income` is always a finite double.

pub mod client;
