//! Client domain model.
//!
//! # Responsibility
//! - Define the canonical record held by the client store.
//! - Provide validation shared by insert and update paths.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never reused.
//! - `name` is non-empty after trimming; uniqueness is NOT enforced.
//! - `income` is a finite IEEE-754 double so comparison filters stay total.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a persisted client record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ClientId = i64;

/// Validation failure for client field invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Income is NaN or infinite and cannot participate in comparisons.
    NonFiniteIncome(f64),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "client name must not be empty"),
            Self::NonFiniteIncome(value) => {
                write!(f, "client income must be finite, got {value}")
            }
        }
    }
}

impl Error for ClientValidationError {}

/// Insert shape for a client record, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    /// Display name. Compared case-insensitively, never unique.
    pub name: String,
    /// Monthly income as an IEEE-754 double. Filters use exact semantics.
    pub income: f64,
    /// Birth instant as Unix epoch milliseconds, UTC.
    pub birth_date: i64,
    /// Opaque payload carried through storage, never filtered on.
    pub children: Option<i64>,
}

impl NewClient {
    /// Creates an insert shape with no children payload.
    pub fn new(name: impl Into<String>, income: f64, birth_date: i64) -> Self {
        Self {
            name: name.into(),
            income,
            birth_date,
            children: None,
        }
    }

    /// Checks field invariants shared by all write paths.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        validate_fields(&self.name, self.income)
    }
}

/// Canonical persisted client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned stable id.
    pub id: ClientId,
    pub name: String,
    pub income: f64,
    /// Birth instant as Unix epoch milliseconds, UTC.
    pub birth_date: i64,
    pub children: Option<i64>,
}

impl Client {
    /// Attaches a store-assigned id to an insert shape.
    pub fn from_parts(id: ClientId, new: NewClient) -> Self {
        Self {
            id,
            name: new.name,
            income: new.income,
            birth_date: new.birth_date,
            children: new.children,
        }
    }

    /// Checks field invariants shared by all write paths.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        validate_fields(&self.name, self.income)
    }
}

fn validate_fields(name: &str, income: f64) -> Result<(), ClientValidationError> {
    if name.trim().is_empty() {
        return Err(ClientValidationError::EmptyName);
    }
    if !income.is_finite() {
        return Err(ClientValidationError::NonFiniteIncome(income));
    }
    Ok(())
}
