//! The trait implemented by every thing type.

use crate::wire::WireMapped;
use crate::ThingsResult;
use chrono::NaiveDateTime;
use hr_uuid::Guid;
use hr_xml::WriteOptions;

/// One clinical data category with a fixed XML fragment.
///
/// Implementors declare their identity through the associated constants and their invariants
/// through [`ThingType::validate`]; parsing and rendering are provided and identical for every
/// type:
///
/// - `parse`: locate the root element, read the wire struct, translate to the domain struct,
///   validate.
/// - `render`: validate, translate to the wire struct, write under the root element.
///
/// The trait is sealed; the catalog is defined by this crate.
///
/// # Examples
///
/// ```rust
/// use things::{HealthDateTime, HeartRate, ThingType};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
/// let reading = HeartRate::new(HealthDateTime::new(date), 64);
/// let xml = reading.render()?;
/// assert_eq!(HeartRate::parse(&xml)?, reading);
/// # Ok::<(), things::ThingsError>(())
/// ```
pub trait ThingType: WireMapped {
    /// Identifier of the thing type on the service.
    const TYPE_ID: Guid;

    /// Human-readable type name, written as the `name` attribute of `<type-id>`.
    const TYPE_NAME: &'static str;

    /// Local name of the payload's root element inside `<data-xml>`.
    const ROOT_ELEMENT: &'static str;

    /// Check required values and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] or [`crate::ThingsError::OutOfRange`]
    /// naming the failing node.
    fn validate(&self) -> ThingsResult<()>;

    /// The date and time the item describes, used as the envelope's effective date.
    fn effective_date(&self) -> Option<NaiveDateTime> {
        None
    }

    /// Parse the item from its XML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError`] if the XML is malformed, does not match the node shape,
    /// or holds values that fail validation.
    fn parse(xml: &str) -> ThingsResult<Self> {
        let wire: Self::Wire = hr_xml::read_document(xml, Self::ROOT_ELEMENT)?;
        let item = Self::from_wire(wire)?;
        item.validate()?;
        Ok(item)
    }

    /// Write the item as a compact XML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError`] if validation or serialisation fails.
    fn render(&self) -> ThingsResult<String> {
        self.render_with(&WriteOptions::compact())
    }

    /// Write the item as an XML fragment with the given output options.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError`] if validation or serialisation fails.
    fn render_with(&self, options: &WriteOptions) -> ThingsResult<String> {
        self.validate()?;
        Ok(hr_xml::write_document(
            Self::ROOT_ELEMENT,
            &self.to_wire(),
            options,
        )?)
    }
}
