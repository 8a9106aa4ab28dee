//! Field-level conversion helpers used by every `from_wire` implementation.
//!
//! Error messages name the failing node as a dotted XML path (`heart-rate.when.date`) so that
//! validation failures read the same way as schema mismatches from `hr-xml`.

use crate::{ThingsError, ThingsResult};
use hr_types::{NonEmptyText, NonNegative};
use hr_uuid::Guid;

/// Join a parent path and a child element name.
pub(crate) fn child(parent: &str, name: &str) -> String {
    format!("{parent}.{name}")
}

pub(crate) fn required_text(field: &str, value: &str) -> ThingsResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|e| ThingsError::InvalidInput(format!("{field}: {e}")))
}

pub(crate) fn optional_text(field: &str, value: Option<&str>) -> ThingsResult<Option<NonEmptyText>> {
    value.map(|v| required_text(field, v)).transpose()
}

pub(crate) fn non_negative(field: &str, value: f64) -> ThingsResult<NonNegative> {
    NonNegative::new(value).map_err(|e| ThingsError::OutOfRange {
        field: field.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn guid(field: &str, value: &str) -> ThingsResult<Guid> {
    Guid::parse(value).map_err(|e| ThingsError::InvalidGuid(format!("{field}: {e}")))
}

/// Check that `value` lies in `min..=max`.
pub(crate) fn check_range(field: &str, value: i64, min: i64, max: i64) -> ThingsResult<()> {
    if value < min || value > max {
        return Err(ThingsError::OutOfRange {
            field: field.to_string(),
            message: format!("must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_names_the_field() {
        let err = required_text("heart-rate.measurement-method.text", "  ").expect_err("blank");
        assert!(
            matches!(err, ThingsError::InvalidInput(msg) if msg == "heart-rate.measurement-method.text: Text cannot be empty")
        );
    }

    #[test]
    fn check_range_is_inclusive() {
        assert!(check_range("h", 0, 0, 23).is_ok());
        assert!(check_range("h", 23, 0, 23).is_ok());
        let err = check_range("when.time.h", 24, 0, 23).expect_err("out of range");
        match err {
            ThingsError::OutOfRange { field, message } => {
                assert_eq!(field, "when.time.h");
                assert!(message.contains("between 0 and 23, got 24"));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn guid_reports_invalid_values() {
        let err = guid("app-id", "nope").expect_err("bad guid");
        assert!(matches!(err, ThingsError::InvalidGuid(msg) if msg.starts_with("app-id:")));
    }
}
