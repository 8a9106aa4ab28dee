//! The thing type catalog.
//!
//! Each module holds one type: the domain struct, its wire struct and the [`crate::ThingType`]
//! implementation with the type's identifier and root element.

mod encounter;
mod heart_rate;
mod insulin_injection;
mod respiratory_profile;

pub use encounter::Encounter;
pub use heart_rate::HeartRate;
pub use insulin_injection::InsulinInjection;
pub use respiratory_profile::RespiratoryProfile;

pub(crate) use encounter::EncounterWire;
pub(crate) use heart_rate::HeartRateWire;
pub(crate) use insulin_injection::InsulinInjectionWire;
pub(crate) use respiratory_profile::RespiratoryProfileWire;
