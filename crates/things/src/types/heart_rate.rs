use crate::common::{CodableValue, CodableValueWire};
use crate::convert::child;
use crate::datetime::{HealthDateTime, HealthDateTimeWire};
use crate::thing_type::ThingType;
use crate::wire::WireMapped;
use crate::{ThingsError, ThingsResult};
use chrono::NaiveDateTime;
use hr_uuid::Guid;
use serde::{Deserialize, Serialize};

const ROOT: &str = "heart-rate";

/// A single heart rate measurement in beats per minute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeartRate {
    /// When the measurement was taken.
    pub when: HealthDateTime,

    /// Beats per minute.
    pub value: u32,

    /// How the rate was measured (for example, pulse oximeter).
    pub measurement_method: Option<CodableValue>,

    /// Conditions at the time of measurement (for example, at rest).
    pub measurement_conditions: Option<CodableValue>,

    /// Additional flags such as "irregular".
    pub measurement_flags: Option<CodableValue>,
}

impl HeartRate {
    pub fn new(when: HealthDateTime, value: u32) -> Self {
        Self {
            when,
            value,
            measurement_method: None,
            measurement_conditions: None,
            measurement_flags: None,
        }
    }

    pub fn with_method(mut self, method: CodableValue) -> Self {
        self.measurement_method = Some(method);
        self
    }
}

impl WireMapped for HeartRate {
    type Wire = HeartRateWire;

    fn from_wire(wire: HeartRateWire) -> ThingsResult<Self> {
        let value = u32::try_from(wire.value).map_err(|_| ThingsError::OutOfRange {
            field: child(ROOT, "value"),
            message: format!(
                "must be between 0 and {}, got {}",
                u32::MAX,
                wire.value
            ),
        })?;

        Ok(Self {
            when: HealthDateTime::from_wire(wire.when, &child(ROOT, "when"))?,
            value,
            measurement_method: CodableValue::from_optional_wire(
                wire.measurement_method,
                &child(ROOT, "measurement-method"),
            )?,
            measurement_conditions: CodableValue::from_optional_wire(
                wire.measurement_conditions,
                &child(ROOT, "measurement-conditions"),
            )?,
            measurement_flags: CodableValue::from_optional_wire(
                wire.measurement_flags,
                &child(ROOT, "measurement-flags"),
            )?,
        })
    }

    fn to_wire(&self) -> HeartRateWire {
        HeartRateWire {
            when: self.when.to_wire(),
            value: i64::from(self.value),
            measurement_method: self.measurement_method.as_ref().map(CodableValue::to_wire),
            measurement_conditions: self
                .measurement_conditions
                .as_ref()
                .map(CodableValue::to_wire),
            measurement_flags: self.measurement_flags.as_ref().map(CodableValue::to_wire),
        }
    }
}

impl ThingType for HeartRate {
    const TYPE_ID: Guid = Guid::from_u128(0xb81eb4a6_6eac_4292_ae93_3872d6870994);
    const TYPE_NAME: &'static str = "Heart Rate";
    const ROOT_ELEMENT: &'static str = ROOT;

    fn validate(&self) -> ThingsResult<()> {
        self.when.validate(&child(ROOT, "when"))
    }

    fn effective_date(&self) -> Option<NaiveDateTime> {
        Some(self.when.to_naive_datetime())
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HeartRateWire {
    pub when: HealthDateTimeWire,
    /// Signed so that negative readings surface as range errors rather than schema errors.
    pub value: i64,
    #[serde(
        rename = "measurement-method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub measurement_method: Option<CodableValueWire>,
    #[serde(
        rename = "measurement-conditions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub measurement_conditions: Option<CodableValueWire>,
    #[serde(
        rename = "measurement-flags",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub measurement_flags: Option<CodableValueWire>,
}
