//! GUID identifiers for things, thing types and audit parties.
//!
//! The health-record service identifies every stored thing, every thing type and every
//! application or person in an audit trail with a GUID. On the XML wire these always appear in
//! the *canonical* hyphenated form:
//!
//! - Length: 36
//! - Shape: `8-4-4-4-12` hexadecimal groups separated by `-`
//! - Letter case: lowercase once normalised
//! - Example: `b81eb4a6-6eac-4292-ae93-3872d6870994`
//!
//! This crate provides:
//! - [`Guid`], a wrapper that guarantees the canonical form once constructed.
//! - [`ThingKey`], the identity of one version of a stored thing.
//!
//! Notes:
//! - Uppercase hex digits are accepted on input and normalised to lowercase.
//! - Other common shapes (32-character simple form, braced, URN) are rejected so that a single
//!   textual form round-trips through parse and write.

mod guid;

pub use guid::{Guid, ThingKey};

/// Error type for GUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for GUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
