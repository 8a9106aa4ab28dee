//! Health record thing types and their XML mapping.
//!
//! A *thing type* is one clinical data category (heart rate, insulin injection, encounter,
//! respiratory profile, ...) modelled as a value object with a fixed XML fragment. This crate
//! provides:
//! - shared data types used inside thing payloads (codable values, approximate dates, display
//!   values, flows, organisations),
//! - audit records describing who created or changed a stored thing,
//! - the thing types themselves, each implementing [`ThingType`],
//! - the `<thing>` envelope that wraps a payload with its key, state and audit trail,
//! - a registry mapping thing type identifiers to their names and root elements.
//!
//! Every type follows the same shape: a domain struct with validated fields, a private serde
//! wire struct describing the XML nodes, and `from_wire` / `to_wire` translation between the
//! two. The generic read/write walk lives in `hr-xml`.
//!
//! Transport to the remote service and authentication are out of scope.

mod audit;
mod common;
mod convert;
mod datetime;
mod registry;
mod thing;
mod thing_type;
mod types;
mod values;
mod wire;

#[cfg(test)]
mod fixtures;

pub use audit::{AccessAvenue, Audit, AuditAction, AuditParty};
pub use common::{CodableValue, CodedValue, DisplayValue, Organization};
pub use datetime::{
    ApproximateDate, ApproximateDateTime, ApproximateTime, DurationValue, HealthDateTime,
};
pub use registry::{lookup_root, lookup_type, registered_types, ThingTypeInfo};
pub use thing::{CommonData, ReadOptions, RelatedThing, Thing, ThingData, ThingState};
pub use thing_type::ThingType;
pub use types::{Encounter, HeartRate, InsulinInjection, RespiratoryProfile};
pub use values::{FlowValue, InsulinAmount};

pub use hr_types::{NonEmptyText, NonNegative};
pub use hr_uuid::{Guid, ThingKey};
pub use hr_xml::WriteOptions;

/// Errors returned by the `things` crate.
#[derive(Debug, thiserror::Error)]
pub enum ThingsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{field} out of range: {message}")]
    OutOfRange { field: String, message: String },

    #[error(transparent)]
    Xml(#[from] hr_xml::XmlError),

    #[error("invalid GUID: {0}")]
    InvalidGuid(String),

    #[error("thing type mismatch: type-id expects <{expected}>, data-xml holds <{found}>")]
    TypeMismatch { expected: String, found: String },

    #[error("unknown thing type: {0}")]
    UnknownType(String),
}

/// Type alias for Results that can fail with a [`ThingsError`].
pub type ThingsResult<T> = Result<T, ThingsError>;
