//! Dates and times as the health record service writes them.
//!
//! Dates are split into numeric child elements rather than ISO strings:
//!
//! ```text
//! <when>
//!   <date><y>2024</y><m>3</m><d>14</d></date>
//!   <time><h>9</h><m>5</m><s>0</s><f>0</f></time>
//!   <tz><text>GMT</text></tz>
//! </when>
//! ```
//!
//! Precise measurements use [`HealthDateTime`] (a full calendar date, optional time). Patient
//! reported history uses [`ApproximateDateTime`], which allows a partial date or free text such
//! as "spring 2019".

use crate::common::{CodableValue, CodableValueWire};
use crate::convert::{check_range, child, required_text};
use crate::{ThingsError, ThingsResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use hr_types::NonEmptyText;
use serde::{Deserialize, Serialize};

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

// ============================================================================
// Public domain-level types
// ============================================================================

/// A time of day with optional seconds and milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ApproximateTime {
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
    pub millisecond: Option<u32>,
}

impl ApproximateTime {
    /// Create a time with hour and minute precision.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError::OutOfRange`] if the hour or minute is out of range.
    pub fn new(hour: u32, minute: u32) -> ThingsResult<Self> {
        let time = Self {
            hour,
            minute,
            second: None,
            millisecond: None,
        };
        time.validate("time")?;
        Ok(time)
    }

    /// Create a time from a `NaiveTime`, keeping second and millisecond precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second: Some(time.second()),
            // Leap-second nanoseconds exceed 999 ms; clamp to the last representable value.
            millisecond: Some((time.nanosecond() / 1_000_000).min(999)),
        }
    }

    /// The time as a `NaiveTime`, treating missing parts as zero.
    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(
            self.hour,
            self.minute,
            self.second.unwrap_or(0),
            self.millisecond.unwrap_or(0),
        )
        .unwrap_or_default()
    }

    /// Check component ranges; milliseconds require seconds.
    pub fn validate(&self, field: &str) -> ThingsResult<()> {
        check_range(&child(field, "h"), i64::from(self.hour), 0, 23)?;
        check_range(&child(field, "m"), i64::from(self.minute), 0, 59)?;
        if let Some(second) = self.second {
            check_range(&child(field, "s"), i64::from(second), 0, 59)?;
        }
        if let Some(millisecond) = self.millisecond {
            if self.second.is_none() {
                return Err(ThingsError::InvalidInput(format!(
                    "{}: milliseconds require seconds",
                    child(field, "f")
                )));
            }
            check_range(&child(field, "f"), i64::from(millisecond), 0, 999)?;
        }
        Ok(())
    }

    pub(crate) fn from_wire(wire: ApproximateTimeWire, field: &str) -> ThingsResult<Self> {
        let time = Self {
            hour: wire.h,
            minute: wire.m,
            second: wire.s,
            millisecond: wire.f,
        };
        time.validate(field)?;
        Ok(time)
    }

    pub(crate) fn to_wire(self) -> ApproximateTimeWire {
        ApproximateTimeWire {
            h: self.hour,
            m: self.minute,
            s: self.second,
            f: self.millisecond,
        }
    }
}

/// A full calendar date with an optional time of day and time zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthDateTime {
    pub date: NaiveDate,
    pub time: Option<ApproximateTime>,
    pub time_zone: Option<CodableValue>,
}

impl HealthDateTime {
    /// A date without a time of day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            time: None,
            time_zone: None,
        }
    }

    /// A date and time with second and millisecond precision.
    pub fn from_naive_datetime(value: NaiveDateTime) -> Self {
        Self {
            date: value.date(),
            time: Some(ApproximateTime::from_naive_time(value.time())),
            time_zone: None,
        }
    }

    /// Set the time of day.
    pub fn with_time(mut self, time: ApproximateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The instant as a `NaiveDateTime`; a missing time is treated as midnight.
    pub fn to_naive_datetime(&self) -> NaiveDateTime {
        let time = self
            .time
            .map(|t| t.to_naive_time())
            .unwrap_or_default();
        self.date.and_time(time)
    }

    /// Check the year range and time components.
    pub fn validate(&self, field: &str) -> ThingsResult<()> {
        check_range(
            &child(&child(field, "date"), "y"),
            i64::from(self.date.year()),
            i64::from(MIN_YEAR),
            i64::from(MAX_YEAR),
        )?;
        if let Some(time) = &self.time {
            time.validate(&child(field, "time"))?;
        }
        Ok(())
    }

    pub(crate) fn from_wire(wire: HealthDateTimeWire, field: &str) -> ThingsResult<Self> {
        let date_field = child(field, "date");
        check_range(
            &child(&date_field, "y"),
            i64::from(wire.date.y),
            i64::from(MIN_YEAR),
            i64::from(MAX_YEAR),
        )?;
        check_range(&child(&date_field, "m"), i64::from(wire.date.m), 1, 12)?;
        let date = NaiveDate::from_ymd_opt(wire.date.y, wire.date.m, wire.date.d).ok_or_else(
            || ThingsError::OutOfRange {
                field: child(&date_field, "d"),
                message: format!(
                    "{:04}-{:02}-{:02} is not a calendar date",
                    wire.date.y, wire.date.m, wire.date.d
                ),
            },
        )?;

        let time = wire
            .time
            .map(|t| ApproximateTime::from_wire(t, &child(field, "time")))
            .transpose()?;

        Ok(Self {
            date,
            time,
            time_zone: CodableValue::from_optional_wire(wire.tz, &child(field, "tz"))?,
        })
    }

    pub(crate) fn to_wire(&self) -> HealthDateTimeWire {
        HealthDateTimeWire {
            date: DateWire {
                y: self.date.year(),
                m: self.date.month(),
                d: self.date.day(),
            },
            time: self.time.map(ApproximateTime::to_wire),
            tz: self.time_zone.as_ref().map(CodableValue::to_wire),
        }
    }
}

/// A date that may be missing its day, or both its month and day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ApproximateDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl ApproximateDate {
    /// A year-only date.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError::OutOfRange`] if the year is outside 1000–9999.
    pub fn year(year: i32) -> ThingsResult<Self> {
        let date = Self {
            year,
            month: None,
            day: None,
        };
        date.validate("date")?;
        Ok(date)
    }

    /// A complete date.
    pub fn from_naive_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    /// The first calendar day the approximate date could refer to.
    pub fn earliest(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    /// The last calendar day the approximate date could refer to.
    pub fn latest(&self) -> Option<NaiveDate> {
        match (self.month, self.day) {
            (Some(month), Some(day)) => NaiveDate::from_ymd_opt(self.year, month, day),
            (Some(12), None) => NaiveDate::from_ymd_opt(self.year, 12, 31),
            (Some(month), None) => NaiveDate::from_ymd_opt(self.year, month + 1, 1)?.pred_opt(),
            (None, _) => NaiveDate::from_ymd_opt(self.year, 12, 31),
        }
    }

    /// Check the year and month ranges; a day requires a month and must exist in it.
    pub fn validate(&self, field: &str) -> ThingsResult<()> {
        check_range(
            &child(field, "y"),
            i64::from(self.year),
            i64::from(MIN_YEAR),
            i64::from(MAX_YEAR),
        )?;
        if let Some(month) = self.month {
            check_range(&child(field, "m"), i64::from(month), 1, 12)?;
        }
        match (self.month, self.day) {
            (None, Some(_)) => Err(ThingsError::InvalidInput(format!(
                "{}: a day requires a month",
                child(field, "d")
            ))),
            (Some(month), Some(day)) => {
                if NaiveDate::from_ymd_opt(self.year, month, day).is_none() {
                    return Err(ThingsError::OutOfRange {
                        field: child(field, "d"),
                        message: format!(
                            "{:04}-{:02}-{:02} is not a calendar date",
                            self.year, month, day
                        ),
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn from_wire(wire: ApproximateDateWire, field: &str) -> ThingsResult<Self> {
        let date = Self {
            year: wire.y,
            month: wire.m,
            day: wire.d,
        };
        date.validate(field)?;
        Ok(date)
    }

    pub(crate) fn to_wire(self) -> ApproximateDateWire {
        ApproximateDateWire {
            y: self.year,
            m: self.month,
            d: self.day,
        }
    }
}

/// A point in time that may be partially known or only described in words.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproximateDateTime {
    Structured {
        date: ApproximateDate,
        time: Option<ApproximateTime>,
        time_zone: Option<CodableValue>,
    },
    Descriptive(NonEmptyText),
}

impl ApproximateDateTime {
    /// A structured value from an approximate date without a time.
    pub fn from_date(date: ApproximateDate) -> Self {
        Self::Structured {
            date,
            time: None,
            time_zone: None,
        }
    }

    /// A free-text description such as "early 2019".
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError::InvalidInput`] if `text` is blank.
    pub fn descriptive(text: &str) -> ThingsResult<Self> {
        Ok(Self::Descriptive(required_text("descriptive", text)?))
    }

    /// Lower bound of the instant for structured values; `None` for descriptive values.
    pub fn earliest(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Structured { date, time, .. } => {
                let day = date.earliest()?;
                let time = time.map(|t| t.to_naive_time()).unwrap_or_default();
                Some(day.and_time(time))
            }
            Self::Descriptive(_) => None,
        }
    }

    /// Upper bound of the instant for structured values; `None` for descriptive values.
    ///
    /// Without a time the bound is the last millisecond of the latest day.
    pub fn latest(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Structured { date, time, .. } => {
                let day = date.latest()?;
                let time = match time {
                    Some(time) => time.to_naive_time(),
                    None => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
                };
                Some(day.and_time(time))
            }
            Self::Descriptive(_) => None,
        }
    }

    pub fn validate(&self, field: &str) -> ThingsResult<()> {
        match self {
            Self::Structured { date, time, .. } => {
                let structured = child(field, "structured");
                date.validate(&child(&structured, "date"))?;
                if let Some(time) = time {
                    time.validate(&child(&structured, "time"))?;
                }
                Ok(())
            }
            Self::Descriptive(_) => Ok(()),
        }
    }

    pub(crate) fn from_wire(wire: ApproximateDateTimeWire, field: &str) -> ThingsResult<Self> {
        match (wire.structured, wire.descriptive) {
            (Some(structured), None) => {
                let structured_field = child(field, "structured");
                Ok(Self::Structured {
                    date: ApproximateDate::from_wire(
                        structured.date,
                        &child(&structured_field, "date"),
                    )?,
                    time: structured
                        .time
                        .map(|t| ApproximateTime::from_wire(t, &child(&structured_field, "time")))
                        .transpose()?,
                    time_zone: CodableValue::from_optional_wire(
                        structured.tz,
                        &child(&structured_field, "tz"),
                    )?,
                })
            }
            (None, Some(text)) => Ok(Self::Descriptive(required_text(
                &child(field, "descriptive"),
                &text,
            )?)),
            _ => Err(ThingsError::InvalidInput(format!(
                "{field}: exactly one of <structured> or <descriptive> is required"
            ))),
        }
    }

    pub(crate) fn to_wire(&self) -> ApproximateDateTimeWire {
        match self {
            Self::Structured {
                date,
                time,
                time_zone,
            } => ApproximateDateTimeWire {
                structured: Some(StructuredWire {
                    date: date.to_wire(),
                    time: time.map(ApproximateTime::to_wire),
                    tz: time_zone.as_ref().map(CodableValue::to_wire),
                }),
                descriptive: None,
            },
            Self::Descriptive(text) => ApproximateDateTimeWire {
                structured: None,
                descriptive: Some(text.to_string()),
            },
        }
    }
}

/// A span of time with a known start and an optional end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DurationValue {
    pub start: ApproximateDateTime,
    pub end: Option<ApproximateDateTime>,
}

impl DurationValue {
    /// Check both ends. When both are structured, the latest instant the end could refer to
    /// must not precede the earliest instant of the start.
    pub fn validate(&self, field: &str) -> ThingsResult<()> {
        self.start.validate(&child(field, "start-date"))?;
        if let Some(end) = &self.end {
            end.validate(&child(field, "end-date"))?;
            if let (Some(start), Some(finish)) = (self.start.earliest(), end.latest()) {
                if finish < start {
                    return Err(ThingsError::OutOfRange {
                        field: child(field, "end-date"),
                        message: format!("end {finish} precedes start {start}"),
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn from_wire(wire: DurationValueWire, field: &str) -> ThingsResult<Self> {
        let duration = Self {
            start: ApproximateDateTime::from_wire(wire.start, &child(field, "start-date"))?,
            end: wire
                .end
                .map(|e| ApproximateDateTime::from_wire(e, &child(field, "end-date")))
                .transpose()?,
        };
        duration.validate(field)?;
        Ok(duration)
    }

    pub(crate) fn to_wire(&self) -> DurationValueWire {
        DurationValueWire {
            start: self.start.to_wire(),
            end: self.end.as_ref().map(ApproximateDateTime::to_wire),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApproximateTimeWire {
    pub h: u32,
    pub m: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<u32>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DateWire {
    pub y: i32,
    pub m: u32,
    pub d: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HealthDateTimeWire {
    pub date: DateWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ApproximateTimeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<CodableValueWire>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApproximateDateWire {
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StructuredWire {
    pub date: ApproximateDateWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ApproximateTimeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<CodableValueWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApproximateDateTimeWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptive: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DurationValueWire {
    #[serde(rename = "start-date")]
    pub start: ApproximateDateTimeWire,
    #[serde(rename = "end-date", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ApproximateDateTimeWire>,
}
