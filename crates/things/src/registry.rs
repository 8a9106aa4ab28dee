//! Lookup of thing types by identifier or root element.

use crate::thing_type::ThingType;
use crate::types::{Encounter, HeartRate, InsulinInjection, RespiratoryProfile};
use hr_uuid::Guid;
use serde::Serialize;

/// Identity of one registered thing type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ThingTypeInfo {
    pub id: Guid,
    pub name: &'static str,
    pub root_element: &'static str,
}

const fn info<T: ThingType>() -> ThingTypeInfo {
    ThingTypeInfo {
        id: T::TYPE_ID,
        name: T::TYPE_NAME,
        root_element: T::ROOT_ELEMENT,
    }
}

static REGISTERED: [ThingTypeInfo; 4] = [
    info::<Encounter>(),
    info::<HeartRate>(),
    info::<InsulinInjection>(),
    info::<RespiratoryProfile>(),
];

/// Every thing type this crate can read and write.
pub fn registered_types() -> &'static [ThingTypeInfo] {
    &REGISTERED
}

/// Find a type by its identifier.
pub fn lookup_type(id: &Guid) -> Option<&'static ThingTypeInfo> {
    REGISTERED.iter().find(|info| info.id == *id)
}

/// Find a type by the root element of its payload.
pub fn lookup_root(root_element: &str) -> Option<&'static ThingTypeInfo> {
    REGISTERED
        .iter()
        .find(|info| info.root_element == root_element)
}
