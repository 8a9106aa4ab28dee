use crate::common::{CodableValue, CodableValueWire};
use crate::convert::{child, optional_text};
use crate::datetime::{HealthDateTime, HealthDateTimeWire};
use crate::thing_type::ThingType;
use crate::values::{InsulinAmount, InsulinAmountWire};
use crate::wire::WireMapped;
use crate::ThingsResult;
use chrono::NaiveDateTime;
use hr_types::NonEmptyText;
use hr_uuid::Guid;
use serde::{Deserialize, Serialize};

const ROOT: &str = "insulin-injection";

/// A single insulin dose.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsulinInjection {
    pub when: HealthDateTime,

    /// The kind of insulin, written as `<type>`.
    pub insulin_type: CodableValue,

    pub amount: InsulinAmount,

    /// Identifier of the pen or pump that delivered the dose.
    pub device_id: Option<NonEmptyText>,
}

impl InsulinInjection {
    pub fn new(when: HealthDateTime, insulin_type: CodableValue, amount: InsulinAmount) -> Self {
        Self {
            when,
            insulin_type,
            amount,
            device_id: None,
        }
    }
}

impl WireMapped for InsulinInjection {
    type Wire = InsulinInjectionWire;

    fn from_wire(wire: InsulinInjectionWire) -> ThingsResult<Self> {
        Ok(Self {
            when: HealthDateTime::from_wire(wire.when, &child(ROOT, "when"))?,
            insulin_type: CodableValue::from_wire(wire.insulin_type, &child(ROOT, "type"))?,
            amount: InsulinAmount::from_wire(wire.amount, &child(ROOT, "amount"))?,
            device_id: optional_text(&child(ROOT, "device-id"), wire.device_id.as_deref())?,
        })
    }

    fn to_wire(&self) -> InsulinInjectionWire {
        InsulinInjectionWire {
            when: self.when.to_wire(),
            insulin_type: self.insulin_type.to_wire(),
            amount: self.amount.to_wire(),
            device_id: self.device_id.as_ref().map(ToString::to_string),
        }
    }
}

impl ThingType for InsulinInjection {
    const TYPE_ID: Guid = Guid::from_u128(0x3b3c053b_b1fe_4e11_9e22_d4b480de74e8);
    const TYPE_NAME: &'static str = "Insulin Injection";
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

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsulinInjectionWire {
    pub when: HealthDateTimeWire,
    #[serde(rename = "type")]
    pub insulin_type: CodableValueWire,
    pub amount: InsulinAmountWire,
    #[serde(rename = "device-id", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}
