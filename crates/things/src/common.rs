//! Codable values, display values and organisations.
//!
//! These are the building blocks that appear inside most thing payloads. A *codable value* is
//! human-readable text optionally paired with one or more codes from controlled vocabularies;
//! thing types use it for every categorical field (measurement method, insulin type,
//! encounter type, time zone).

use crate::convert::{child, optional_text, required_text};
use crate::ThingsResult;
use hr_types::NonEmptyText;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// A single code from a controlled vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodedValue {
    /// The code itself (for example `pulse-ox`).
    pub value: NonEmptyText,

    /// Vocabulary family (for example `wc`).
    pub family: Option<NonEmptyText>,

    /// Vocabulary name, written as `<type>`.
    pub vocabulary: NonEmptyText,

    /// Vocabulary version.
    pub version: Option<NonEmptyText>,
}

impl CodedValue {
    /// Create a coded value from its code and vocabulary name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] if either argument is blank.
    pub fn new(value: &str, vocabulary: &str) -> ThingsResult<Self> {
        Ok(Self {
            value: required_text("code.value", value)?,
            family: None,
            vocabulary: required_text("code.type", vocabulary)?,
            version: None,
        })
    }

    /// Set the vocabulary family.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] if `family` is blank.
    pub fn with_family(mut self, family: &str) -> ThingsResult<Self> {
        self.family = Some(required_text("code.family", family)?);
        Ok(self)
    }

    /// Set the vocabulary version.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] if `version` is blank.
    pub fn with_version(mut self, version: &str) -> ThingsResult<Self> {
        self.version = Some(required_text("code.version", version)?);
        Ok(self)
    }

    pub(crate) fn from_wire(wire: CodedValueWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            value: required_text(&child(field, "value"), &wire.value)?,
            family: optional_text(&child(field, "family"), wire.family.as_deref())?,
            vocabulary: required_text(&child(field, "type"), &wire.vocabulary)?,
            version: optional_text(&child(field, "version"), wire.version.as_deref())?,
        })
    }

    pub(crate) fn to_wire(&self) -> CodedValueWire {
        CodedValueWire {
            value: self.value.to_string(),
            family: self.family.as_ref().map(ToString::to_string),
            vocabulary: self.vocabulary.to_string(),
            version: self.version.as_ref().map(ToString::to_string),
        }
    }
}

/// Text paired with zero or more codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodableValue {
    /// Human-readable text; always present.
    pub text: NonEmptyText,

    /// Codes describing the same concept, in order of preference.
    pub codes: Vec<CodedValue>,
}

impl CodableValue {
    /// Create a text-only codable value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] if `text` is blank.
    pub fn new(text: &str) -> ThingsResult<Self> {
        Ok(Self {
            text: required_text("text", text)?,
            codes: Vec::new(),
        })
    }

    /// Append a code.
    pub fn with_code(mut self, code: CodedValue) -> Self {
        self.codes.push(code);
        self
    }

    /// The first code from `vocabulary`, if any.
    pub fn code_in(&self, vocabulary: &str) -> Option<&CodedValue> {
        self.codes
            .iter()
            .find(|c| c.vocabulary.as_str() == vocabulary)
    }

    pub(crate) fn from_wire(wire: CodableValueWire, field: &str) -> ThingsResult<Self> {
        let code_field = child(field, "code");
        Ok(Self {
            text: required_text(&child(field, "text"), &wire.text)?,
            codes: wire
                .code
                .into_iter()
                .map(|c| CodedValue::from_wire(c, &code_field))
                .collect::<ThingsResult<Vec<_>>>()?,
        })
    }

    pub(crate) fn from_optional_wire(
        wire: Option<CodableValueWire>,
        field: &str,
    ) -> ThingsResult<Option<Self>> {
        wire.map(|w| Self::from_wire(w, field)).transpose()
    }

    pub(crate) fn to_wire(&self) -> CodableValueWire {
        CodableValueWire {
            text: self.text.to_string(),
            code: self.codes.iter().map(CodedValue::to_wire).collect(),
        }
    }
}

/// A value as it should be shown to a person, with optional units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayValue {
    pub text: NonEmptyText,
    pub units: Option<String>,
    pub units_code: Option<String>,
}

impl DisplayValue {
    /// Create a display value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] if `text` is blank.
    pub fn new(text: &str, units: Option<&str>) -> ThingsResult<Self> {
        Ok(Self {
            text: required_text("display", text)?,
            units: units.map(str::to_string),
            units_code: None,
        })
    }

    pub(crate) fn from_wire(wire: DisplayValueWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            text: required_text(field, &wire.text)?,
            units: wire.units,
            units_code: wire.units_code,
        })
    }

    pub(crate) fn to_wire(&self) -> DisplayValueWire {
        DisplayValueWire {
            units: self.units.clone(),
            units_code: self.units_code.clone(),
            text: self.text.to_string(),
        }
    }
}

/// An organisation such as a clinic or hospital.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub name: NonEmptyText,

    /// Kind of organisation, written as `<type>`.
    pub kind: Option<CodableValue>,

    pub website: Option<NonEmptyText>,
}

impl Organization {
    /// Create an organisation with just a name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingsError::InvalidInput`] if `name` is blank.
    pub fn new(name: &str) -> ThingsResult<Self> {
        Ok(Self {
            name: required_text("name", name)?,
            kind: None,
            website: None,
        })
    }

    pub(crate) fn from_wire(wire: OrganizationWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            name: required_text(&child(field, "name"), &wire.name)?,
            kind: CodableValue::from_optional_wire(wire.kind, &child(field, "type"))?,
            website: optional_text(&child(field, "website"), wire.website.as_deref())?,
        })
    }

    pub(crate) fn to_wire(&self) -> OrganizationWire {
        OrganizationWire {
            name: self.name.to_string(),
            kind: self.kind.as_ref().map(CodableValue::to_wire),
            website: self.website.as_ref().map(ToString::to_string),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodedValueWire {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(rename = "type")]
    pub vocabulary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodableValueWire {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code: Vec<CodedValueWire>,
}

/// `<display units=".." units-code="..">text</display>`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DisplayValueWire {
    #[serde(rename = "@units", default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "@units-code", default, skip_serializing_if = "Option::is_none")]
    pub units_code: Option<String>,
    #[serde(rename = "$text", default)]
    pub text: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OrganizationWire {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CodableValueWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
