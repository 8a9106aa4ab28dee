use crate::convert::child;
use crate::datetime::{HealthDateTime, HealthDateTimeWire};
use crate::thing_type::ThingType;
use crate::values::{FlowValue, FlowValueWire};
use crate::wire::WireMapped;
use crate::{ThingsError, ThingsResult};
use chrono::NaiveDateTime;
use hr_uuid::Guid;
use serde::{Deserialize, Serialize};

const ROOT: &str = "respiratory-profile";

const RED_ZONE: &str = "expiratory-flow-red-zone-upper-boundary";
const ORANGE_ZONE: &str = "expiratory-flow-orange-zone-upper-boundary";
const YELLOW_ZONE: &str = "expiratory-flow-yellow-zone-upper-boundary";

/// Peak expiratory flow zones used in an asthma action plan.
///
/// Each zone is described by its upper boundary. The red zone is the most severe, so present
/// boundaries must satisfy red <= orange <= yellow.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RespiratoryProfile {
    pub when: HealthDateTime,
    pub red_zone_upper: Option<FlowValue>,
    pub orange_zone_upper: Option<FlowValue>,
    pub yellow_zone_upper: Option<FlowValue>,
}

impl RespiratoryProfile {
    pub fn new(when: HealthDateTime) -> Self {
        Self {
            when,
            red_zone_upper: None,
            orange_zone_upper: None,
            yellow_zone_upper: None,
        }
    }

    fn zones(&self) -> [(&'static str, Option<&FlowValue>); 3] {
        [
            (RED_ZONE, self.red_zone_upper.as_ref()),
            (ORANGE_ZONE, self.orange_zone_upper.as_ref()),
            (YELLOW_ZONE, self.yellow_zone_upper.as_ref()),
        ]
    }
}

impl WireMapped for RespiratoryProfile {
    type Wire = RespiratoryProfileWire;

    fn from_wire(wire: RespiratoryProfileWire) -> ThingsResult<Self> {
        let zone = |value: Option<FlowValueWire>, name: &str| {
            value
                .map(|v| FlowValue::from_wire(v, &child(ROOT, name)))
                .transpose()
        };

        Ok(Self {
            when: HealthDateTime::from_wire(wire.when, &child(ROOT, "when"))?,
            red_zone_upper: zone(wire.red_zone_upper, RED_ZONE)?,
            orange_zone_upper: zone(wire.orange_zone_upper, ORANGE_ZONE)?,
            yellow_zone_upper: zone(wire.yellow_zone_upper, YELLOW_ZONE)?,
        })
    }

    fn to_wire(&self) -> RespiratoryProfileWire {
        RespiratoryProfileWire {
            when: self.when.to_wire(),
            red_zone_upper: self.red_zone_upper.as_ref().map(FlowValue::to_wire),
            orange_zone_upper: self.orange_zone_upper.as_ref().map(FlowValue::to_wire),
            yellow_zone_upper: self.yellow_zone_upper.as_ref().map(FlowValue::to_wire),
        }
    }
}

impl ThingType for RespiratoryProfile {
    const TYPE_ID: Guid = Guid::from_u128(0x5fd15cb7_b717_4b1c_89e0_1dbcf7f815dd);
    const TYPE_NAME: &'static str = "Respiratory Profile";
    const ROOT_ELEMENT: &'static str = ROOT;

    fn validate(&self) -> ThingsResult<()> {
        self.when.validate(&child(ROOT, "when"))?;

        let mut previous: Option<(&str, f64)> = None;
        for (name, zone) in self.zones() {
            let Some(zone) = zone else { continue };
            let value = zone.liters_per_second.get();
            if let Some((lower_name, lower)) = previous {
                if value < lower {
                    return Err(ThingsError::OutOfRange {
                        field: child(ROOT, name),
                        message: format!("{value} L/s is below the {lower_name} value {lower} L/s"),
                    });
                }
            }
            previous = Some((name, value));
        }
        Ok(())
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
pub struct RespiratoryProfileWire {
    pub when: HealthDateTimeWire,
    #[serde(
        rename = "expiratory-flow-red-zone-upper-boundary",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub red_zone_upper: Option<FlowValueWire>,
    #[serde(
        rename = "expiratory-flow-orange-zone-upper-boundary",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub orange_zone_upper: Option<FlowValueWire>,
    #[serde(
        rename = "expiratory-flow-yellow-zone-upper-boundary",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub yellow_zone_upper: Option<FlowValueWire>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::NaiveDate;

    fn profile(red: Option<f64>, orange: Option<f64>, yellow: Option<f64>) -> RespiratoryProfile {
        let flow = |v: Option<f64>| v.map(|lps| FlowValue::new(lps).expect("flow"));
        RespiratoryProfile {
            when: HealthDateTime::new(NaiveDate::from_ymd_opt(2024, 1, 8).expect("date")),
            red_zone_upper: flow(red),
            orange_zone_upper: flow(orange),
            yellow_zone_upper: flow(yellow),
        }
    }

    #[test]
    fn parses_zone_boundaries() {
        let plan = RespiratoryProfile::parse(fixtures::RESPIRATORY_PROFILE).expect("parse");
        let red = plan.red_zone_upper.as_ref().expect("red zone");
        assert!((red.liters_per_second.get() - 3.0).abs() < f64::EPSILON);
        assert!(plan.orange_zone_upper.is_none());
        assert!(plan.yellow_zone_upper.is_some());
    }

    #[test]
    fn ordered_zones_are_valid() {
        assert!(profile(Some(3.0), Some(4.5), Some(6.0)).validate().is_ok());
        assert!(profile(Some(3.0), None, Some(6.0)).validate().is_ok());
        assert!(profile(None, None, None).validate().is_ok());
    }

    #[test]
    fn decreasing_zones_are_rejected() {
        let err = profile(Some(5.0), Some(4.0), None)
            .validate()
            .expect_err("orange below red");
        match err {
            ThingsError::OutOfRange { field, message } => {
                assert_eq!(field, format!("respiratory-profile.{ORANGE_ZONE}"));
                assert!(message.contains(RED_ZONE));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn gap_does_not_hide_ordering_error() {
        let err = profile(Some(5.0), None, Some(4.0))
            .validate()
            .expect_err("yellow below red");
        assert!(
            matches!(err, ThingsError::OutOfRange { field, .. } if field.ends_with(YELLOW_ZONE))
        );
    }

    #[test]
    fn parse_applies_zone_ordering() {
        let xml = "<respiratory-profile><when><date><y>2024</y><m>1</m><d>8</d></date></when><expiratory-flow-red-zone-upper-boundary><liters-per-second>4</liters-per-second></expiratory-flow-red-zone-upper-boundary><expiratory-flow-yellow-zone-upper-boundary><liters-per-second>2</liters-per-second></expiratory-flow-yellow-zone-upper-boundary></respiratory-profile>";
        assert!(RespiratoryProfile::parse(xml).is_err());
    }
}
