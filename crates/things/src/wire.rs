//! Sealed translation between domain values and their serde wire structs.
//!
//! This module is private, so [`WireMapped`] cannot be implemented outside this crate; it only
//! exists so [`crate::ThingType`] can provide `parse` and `render` for every thing type.

use crate::ThingsResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub trait WireMapped: Sized {
    /// Serde description of the XML node shape.
    type Wire: Serialize + DeserializeOwned;

    /// Convert and validate a parsed wire struct.
    fn from_wire(wire: Self::Wire) -> ThingsResult<Self>;

    /// Build the wire struct for writing.
    fn to_wire(&self) -> Self::Wire;
}
