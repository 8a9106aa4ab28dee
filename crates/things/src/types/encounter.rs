use crate::common::{CodableValue, CodableValueWire, Organization, OrganizationWire};
use crate::convert::{child, optional_text};
use crate::datetime::{DurationValue, DurationValueWire, HealthDateTime, HealthDateTimeWire};
use crate::thing_type::ThingType;
use crate::wire::WireMapped;
use crate::{ThingsError, ThingsResult};
use chrono::NaiveDateTime;
use hr_types::NonEmptyText;
use hr_uuid::Guid;
use serde::{Deserialize, Serialize};

const ROOT: &str = "encounter";

/// A visit or contact with a health care provider.
///
/// Every field is optional; an empty `<encounter/>` is a valid record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Encounter {
    pub when: Option<HealthDateTime>,

    /// The kind of encounter, written as `<type>`.
    pub kind: Option<CodableValue>,

    pub reason: Option<NonEmptyText>,
    pub duration: Option<DurationValue>,
    pub consent_granted: Option<bool>,
    pub facility: Option<Organization>,
}

impl Encounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WireMapped for Encounter {
    type Wire = EncounterWire;

    fn from_wire(wire: EncounterWire) -> ThingsResult<Self> {
        Ok(Self {
            when: wire
                .when
                .map(|w| HealthDateTime::from_wire(w, &child(ROOT, "when")))
                .transpose()?,
            kind: CodableValue::from_optional_wire(wire.kind, &child(ROOT, "type"))?,
            reason: optional_text(&child(ROOT, "reason"), wire.reason.as_deref())?,
            duration: wire
                .duration
                .map(|d| DurationValue::from_wire(d, &child(ROOT, "duration")))
                .transpose()?,
            consent_granted: wire
                .consent_granted
                .as_deref()
                .map(|raw| parse_bool(&child(ROOT, "consent-granted"), raw))
                .transpose()?,
            facility: wire
                .facility
                .map(|f| Organization::from_wire(f, &child(ROOT, "facility")))
                .transpose()?,
        })
    }

    fn to_wire(&self) -> EncounterWire {
        EncounterWire {
            when: self.when.as_ref().map(HealthDateTime::to_wire),
            kind: self.kind.as_ref().map(CodableValue::to_wire),
            reason: self.reason.as_ref().map(ToString::to_string),
            duration: self.duration.as_ref().map(DurationValue::to_wire),
            consent_granted: self.consent_granted.map(|b| b.to_string()),
            facility: self.facility.as_ref().map(Organization::to_wire),
        }
    }
}

impl ThingType for Encounter {
    const TYPE_ID: Guid = Guid::from_u128(0x464083cc_13de_4f3e_a189_da8e47d5651b);
    const TYPE_NAME: &'static str = "Encounter";
    const ROOT_ELEMENT: &'static str = ROOT;

    fn validate(&self) -> ThingsResult<()> {
        if let Some(when) = &self.when {
            when.validate(&child(ROOT, "when"))?;
        }
        if let Some(duration) = &self.duration {
            duration.validate(&child(ROOT, "duration"))?;
        }
        Ok(())
    }

    fn effective_date(&self) -> Option<NaiveDateTime> {
        self.when
            .as_ref()
            .map(HealthDateTime::to_naive_datetime)
            .or_else(|| self.duration.as_ref().and_then(|d| d.start.earliest()))
    }
}

/// XML Schema booleans: `true`, `false`, `1`, `0`.
fn parse_bool(field: &str, raw: &str) -> ThingsResult<bool> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ThingsError::InvalidInput(format!(
            "{field}: expected true or false, got '{other}'"
        ))),
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EncounterWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<HealthDateTimeWire>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CodableValueWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationValueWire>,
    #[serde(
        rename = "consent-granted",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub consent_granted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<OrganizationWire>,
}
