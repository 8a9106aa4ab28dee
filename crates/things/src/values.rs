//! Measured quantities stored in a base unit with an optional display form.

use crate::common::{DisplayValue, DisplayValueWire};
use crate::convert::{child, non_negative};
use crate::ThingsResult;
use hr_types::NonNegative;
use serde::{Deserialize, Serialize};

/// A flow rate in litres per second.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowValue {
    pub liters_per_second: NonNegative,
    pub display: Option<DisplayValue>,
}

impl FlowValue {
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::OutOfRange`] if `liters_per_second` is negative or not finite.
    pub fn new(liters_per_second: f64) -> ThingsResult<Self> {
        Ok(Self {
            liters_per_second: non_negative("liters-per-second", liters_per_second)?,
            display: None,
        })
    }

    pub fn with_display(mut self, display: DisplayValue) -> Self {
        self.display = Some(display);
        self
    }

    pub(crate) fn from_wire(wire: FlowValueWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            liters_per_second: non_negative(
                &child(field, "liters-per-second"),
                wire.liters_per_second,
            )?,
            display: wire
                .display
                .map(|d| DisplayValue::from_wire(d, &child(field, "display")))
                .transpose()?,
        })
    }

    pub(crate) fn to_wire(&self) -> FlowValueWire {
        FlowValueWire {
            liters_per_second: self.liters_per_second.get(),
            display: self.display.as_ref().map(DisplayValue::to_wire),
        }
    }
}

/// An insulin dose in international units.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsulinAmount {
    pub international_units: NonNegative,
    pub display: Option<DisplayValue>,
}

impl InsulinAmount {
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::OutOfRange`] if `international_units` is negative or not
    /// finite.
    pub fn new(international_units: f64) -> ThingsResult<Self> {
        Ok(Self {
            international_units: non_negative("iu", international_units)?,
            display: None,
        })
    }

    pub fn with_display(mut self, display: DisplayValue) -> Self {
        self.display = Some(display);
        self
    }

    pub(crate) fn from_wire(wire: InsulinAmountWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            international_units: non_negative(&child(field, "iu"), wire.iu)?,
            display: wire
                .display
                .map(|d| DisplayValue::from_wire(d, &child(field, "display")))
                .transpose()?,
        })
    }

    pub(crate) fn to_wire(&self) -> InsulinAmountWire {
        InsulinAmountWire {
            iu: self.international_units.get(),
            display: self.display.as_ref().map(DisplayValue::to_wire),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FlowValueWire {
    #[serde(rename = "liters-per-second")]
    pub liters_per_second: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayValueWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsulinAmountWire {
    pub iu: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayValueWire>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThingsError;
    use hr_xml::read_document;

    #[test]
    fn flow_value_reads_base_unit_and_display() {
        let xml = r#"<flow><liters-per-second>5.5</liters-per-second><display units="L/min">330</display></flow>"#;
        let wire: FlowValueWire = read_document(xml, "flow").expect("read");
        let flow = FlowValue::from_wire(wire, "flow").expect("convert");
        assert!((flow.liters_per_second.get() - 5.5).abs() < f64::EPSILON);
        assert_eq!(
            flow.display.as_ref().and_then(|d| d.units.as_deref()),
            Some("L/min")
        );
    }

    #[test]
    fn flow_value_rejects_negative_rate() {
        let wire = FlowValueWire {
            liters_per_second: -1.0,
            display: None,
        };
        let err = FlowValue::from_wire(wire, "zone").expect_err("negative flow");
        assert!(
            matches!(err, ThingsError::OutOfRange { field, .. } if field == "zone.liters-per-second")
        );
    }

    #[test]
    fn insulin_amount_rejects_nan() {
        let err = InsulinAmount::new(f64::NAN).expect_err("NaN dose");
        assert!(matches!(err, ThingsError::OutOfRange { field, .. } if field == "iu"));
    }

    #[test]
    fn insulin_amount_keeps_display() {
        let amount = InsulinAmount::new(4.0)
            .expect("dose")
            .with_display(DisplayValue::new("4 units", Some("IU")).expect("display"));
        let wire = amount.to_wire();
        assert!((wire.iu - 4.0).abs() < f64::EPSILON);
        assert_eq!(
            wire.display.as_ref().map(|d| d.text.as_str()),
            Some("4 units")
        );
    }
}
