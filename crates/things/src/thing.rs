//! The `<thing>` envelope.
//!
//! A stored item is written as:
//!
//! ```text
//! <thing>
//!   <thing-id version-stamp="..">..</thing-id>
//!   <type-id name="Heart Rate">b81eb4a6-..</type-id>
//!   <thing-state>Active</thing-state>
//!   <flags>0</flags>
//!   <eff-date>2024-03-14T09:05:00</eff-date>
//!   <created>..</created>
//!   <updated>..</updated>
//!   <data-xml>
//!     <heart-rate>..</heart-rate>
//!     <common>..</common>
//!   </data-xml>
//! </thing>
//! ```
//!
//! The payload element inside `<data-xml>` must be the root element registered for the
//! `type-id`. Only `<type-id>` and `<data-xml>` are required.

use crate::audit::{Audit, AuditWire};
use crate::convert::{child, guid, optional_text};
use crate::registry::{lookup_type, ThingTypeInfo};
use crate::thing_type::ThingType;
use crate::types::{
    Encounter, EncounterWire, HeartRate, HeartRateWire, InsulinInjection, InsulinInjectionWire,
    RespiratoryProfile, RespiratoryProfileWire,
};
use crate::wire::WireMapped;
use crate::{ThingsError, ThingsResult};
use chrono::NaiveDateTime;
use hr_types::NonEmptyText;
use hr_uuid::{Guid, ThingKey};
use hr_xml::WriteOptions;
use serde::{Deserialize, Serialize};

const ROOT: &str = "thing";
const EFF_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ============================================================================
// Public domain-level types
// ============================================================================

/// Lifecycle state of a stored thing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ThingState {
    #[default]
    Active,
    Deleted,
}

impl ThingState {
    fn to_wire(self) -> &'static str {
        match self {
            ThingState::Active => "Active",
            ThingState::Deleted => "Deleted",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(ThingState::Active),
            "Deleted" => Some(ThingState::Deleted),
            _ => None,
        }
    }
}

/// Options for reading a `<thing>` document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Reject documents whose `<type-id name="..">` differs from the registered type name.
    pub strict_type_names: bool,
}

/// The payload of a thing: exactly one registered thing type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ThingData {
    Encounter(Encounter),
    HeartRate(HeartRate),
    InsulinInjection(InsulinInjection),
    RespiratoryProfile(RespiratoryProfile),
}

macro_rules! impl_from_thing_type {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ThingData {
                fn from(value: $variant) -> Self {
                    ThingData::$variant(value)
                }
            }
        )*
    };
}

impl_from_thing_type!(Encounter, HeartRate, InsulinInjection, RespiratoryProfile);

impl ThingData {
    pub fn type_id(&self) -> Guid {
        match self {
            ThingData::Encounter(_) => Encounter::TYPE_ID,
            ThingData::HeartRate(_) => HeartRate::TYPE_ID,
            ThingData::InsulinInjection(_) => InsulinInjection::TYPE_ID,
            ThingData::RespiratoryProfile(_) => RespiratoryProfile::TYPE_ID,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ThingData::Encounter(_) => Encounter::TYPE_NAME,
            ThingData::HeartRate(_) => HeartRate::TYPE_NAME,
            ThingData::InsulinInjection(_) => InsulinInjection::TYPE_NAME,
            ThingData::RespiratoryProfile(_) => RespiratoryProfile::TYPE_NAME,
        }
    }

    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        match self {
            ThingData::Encounter(item) => item.effective_date(),
            ThingData::HeartRate(item) => item.effective_date(),
            ThingData::InsulinInjection(item) => item.effective_date(),
            ThingData::RespiratoryProfile(item) => item.effective_date(),
        }
    }

    pub fn validate(&self) -> ThingsResult<()> {
        match self {
            ThingData::Encounter(item) => item.validate(),
            ThingData::HeartRate(item) => item.validate(),
            ThingData::InsulinInjection(item) => item.validate(),
            ThingData::RespiratoryProfile(item) => item.validate(),
        }
    }

    /// Select and convert the single payload in `<data-xml>`.
    fn from_wire(data: DataXmlWire, info: &ThingTypeInfo) -> ThingsResult<Self> {
        let field = child(ROOT, "data-xml");
        let present: Vec<&'static str> = [
            (Encounter::ROOT_ELEMENT, data.encounter.is_some()),
            (HeartRate::ROOT_ELEMENT, data.heart_rate.is_some()),
            (InsulinInjection::ROOT_ELEMENT, data.insulin_injection.is_some()),
            (
                RespiratoryProfile::ROOT_ELEMENT,
                data.respiratory_profile.is_some(),
            ),
        ]
        .into_iter()
        .filter_map(|(root, is_present)| is_present.then_some(root))
        .collect();

        match present.as_slice() {
            [] => {
                return Err(ThingsError::InvalidInput(format!(
                    "{field}: expected a <{}> payload",
                    info.root_element
                )))
            }
            [found] if *found != info.root_element => {
                return Err(ThingsError::TypeMismatch {
                    expected: info.root_element.to_string(),
                    found: (*found).to_string(),
                })
            }
            [_] => {}
            many => {
                return Err(ThingsError::InvalidInput(format!(
                    "{field}: expected exactly one payload, found {}",
                    many.iter()
                        .map(|root| format!("<{root}>"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )))
            }
        }

        let item = match (
            data.encounter,
            data.heart_rate,
            data.insulin_injection,
            data.respiratory_profile,
        ) {
            (Some(wire), None, None, None) => ThingData::Encounter(Encounter::from_wire(wire)?),
            (None, Some(wire), None, None) => ThingData::HeartRate(HeartRate::from_wire(wire)?),
            (None, None, Some(wire), None) => {
                ThingData::InsulinInjection(InsulinInjection::from_wire(wire)?)
            }
            (None, None, None, Some(wire)) => {
                ThingData::RespiratoryProfile(RespiratoryProfile::from_wire(wire)?)
            }
            _ => {
                return Err(ThingsError::InvalidInput(format!(
                    "{field}: expected exactly one payload"
                )))
            }
        };
        item.validate()?;
        Ok(item)
    }

    fn to_wire(&self, common: Option<CommonWire>) -> DataXmlWire {
        let mut data = DataXmlWire {
            common,
            ..DataXmlWire::default()
        };
        match self {
            ThingData::Encounter(item) => data.encounter = Some(item.to_wire()),
            ThingData::HeartRate(item) => data.heart_rate = Some(item.to_wire()),
            ThingData::InsulinInjection(item) => data.insulin_injection = Some(item.to_wire()),
            ThingData::RespiratoryProfile(item) => {
                data.respiratory_profile = Some(item.to_wire())
            }
        }
        data
    }
}

/// A link from one thing to another, such as a medication dose to its prescription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelatedThing {
    pub thing_id: Guid,
    pub version_stamp: Option<Guid>,
    pub relationship_type: Option<NonEmptyText>,
}

impl RelatedThing {
    pub fn new(thing_id: Guid) -> Self {
        Self {
            thing_id,
            version_stamp: None,
            relationship_type: None,
        }
    }

    fn from_wire(wire: RelatedThingWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            thing_id: guid(&child(field, "thing-id"), &wire.thing_id)?,
            version_stamp: wire
                .version_stamp
                .as_deref()
                .map(|stamp| guid(&child(field, "version-stamp"), stamp))
                .transpose()?,
            relationship_type: optional_text(
                &child(field, "relationship-type"),
                wire.relationship_type.as_deref(),
            )?,
        })
    }

    fn to_wire(&self) -> RelatedThingWire {
        RelatedThingWire {
            thing_id: self.thing_id.to_string(),
            version_stamp: self.version_stamp.map(|stamp| stamp.to_string()),
            relationship_type: self.relationship_type.as_ref().map(ToString::to_string),
        }
    }
}

/// Data every thing type can carry alongside its payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommonData {
    /// Where the data came from, such as a device name.
    pub source: Option<NonEmptyText>,
    pub note: Option<NonEmptyText>,

    /// Trimmed, non-blank tags without case-insensitive duplicates. Set through
    /// [`CommonData::with_tags`] so that the stored list is always the one written.
    tags: Vec<String>,
    pub related: Vec<RelatedThing>,
}

impl CommonData {
    /// Replace the tags. Values may themselves be comma-separated lists.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalise_tags(tags);
        self
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.note.is_none() && self.tags.is_empty() && self.related.is_empty()
    }

    fn from_wire(wire: CommonWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            source: optional_text(&child(field, "source"), wire.source.as_deref())?,
            note: optional_text(&child(field, "note"), wire.note.as_deref())?,
            tags: wire.tags.map(|raw| normalise_tags([raw])).unwrap_or_default(),
            related: wire
                .related
                .into_iter()
                .map(|r| RelatedThing::from_wire(r, &child(field, "related-thing")))
                .collect::<ThingsResult<Vec<_>>>()?,
        })
    }

    fn to_wire(&self) -> CommonWire {
        CommonWire {
            source: self.source.as_ref().map(ToString::to_string),
            note: self.note.as_ref().map(ToString::to_string),
            tags: (!self.tags.is_empty()).then(|| self.tags.join(",")),
            related: self.related.iter().map(RelatedThing::to_wire).collect(),
        }
    }
}

fn key_from_wire(wire: ThingIdWire) -> ThingsResult<ThingKey> {
    let field = child(ROOT, "thing-id");
    let stamp = wire.version_stamp.as_deref().ok_or_else(|| {
        ThingsError::InvalidInput(format!("{field}: version-stamp is required"))
    })?;
    Ok(ThingKey::new(
        guid(&field, &wire.id)?,
        guid(&child(&field, "version-stamp"), stamp)?,
    ))
}

fn normalise_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for raw in tags {
        for tag in raw.as_ref().split(',').map(str::trim) {
            if tag.is_empty() {
                continue;
            }
            let folded = tag.to_lowercase();
            if seen.contains(&folded) {
                continue;
            }
            seen.push(folded);
            out.push(tag.to_string());
        }
    }
    out
}

/// A stored health record item: one payload with its identity, state and audit trail.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Thing {
    /// Absent for items that have not been stored yet.
    pub key: Option<ThingKey>,
    pub state: ThingState,
    pub flags: u32,

    /// The date recorded on the envelope. Parsing and [`Thing::new`] fill it from the payload
    /// when the payload has its own date, and that date is always the one written.
    pub effective_date: Option<NaiveDateTime>,

    pub created: Option<Audit>,
    pub updated: Option<Audit>,
    pub data: ThingData,
    pub common: CommonData,
}

impl Thing {
    /// Wrap a payload in a new, unstored envelope.
    pub fn new(data: impl Into<ThingData>) -> Self {
        let data = data.into();
        Self {
            key: None,
            state: ThingState::Active,
            flags: 0,
            effective_date: data.effective_date(),
            created: None,
            updated: None,
            data,
            common: CommonData::default(),
        }
    }

    pub fn type_id(&self) -> Guid {
        self.data.type_id()
    }

    /// The payload date when it has one, otherwise the stored envelope date.
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.data.effective_date().or(self.effective_date)
    }

    /// Parse a `<thing>` document with default options.
    ///
    /// # Errors
    ///
    /// See [`Thing::parse_with`].
    pub fn parse(xml: &str) -> ThingsResult<Self> {
        Self::parse_with(xml, &ReadOptions::default())
    }

    /// Parse a `<thing>` document.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`ThingsError::Xml`] if the document is malformed or does not match the envelope shape,
    /// - [`ThingsError::UnknownType`] if the `type-id` is not registered,
    /// - [`ThingsError::TypeMismatch`] if the payload element does not belong to the `type-id`,
    /// - [`ThingsError::InvalidInput`], [`ThingsError::OutOfRange`] or
    ///   [`ThingsError::InvalidGuid`] if a value fails validation.
    pub fn parse_with(xml: &str, options: &ReadOptions) -> ThingsResult<Self> {
        let wire: ThingWire = hr_xml::read_document(xml, ROOT)?;

        let type_id = guid(&child(ROOT, "type-id"), &wire.type_id.id)?;
        let info = lookup_type(&type_id)
            .ok_or_else(|| ThingsError::UnknownType(type_id.to_string()))?;
        if options.strict_type_names {
            if let Some(name) = wire.type_id.name.as_deref() {
                if name != info.name {
                    return Err(ThingsError::InvalidInput(format!(
                        "{}: name '{name}' does not match registered name '{}'",
                        child(ROOT, "type-id"),
                        info.name
                    )));
                }
            }
        }

        let key = wire.thing_id.map(key_from_wire).transpose()?;

        let state = match wire.thing_state.as_deref().map(str::trim) {
            None => ThingState::Active,
            Some(raw) => ThingState::from_wire(raw).ok_or_else(|| {
                ThingsError::InvalidInput(format!(
                    "{}: unknown state '{raw}'",
                    child(ROOT, "thing-state")
                ))
            })?,
        };

        let effective_date = wire
            .eff_date
            .as_deref()
            .map(|raw| {
                NaiveDateTime::parse_from_str(raw.trim(), EFF_DATE_FORMAT).map_err(|e| {
                    ThingsError::InvalidInput(format!(
                        "{}: expected YYYY-MM-DDTHH:MM:SS, got '{raw}': {e}",
                        child(ROOT, "eff-date")
                    ))
                })
            })
            .transpose()?;

        let created = wire
            .created
            .map(|a| Audit::from_wire_at(a, &child(ROOT, "created")))
            .transpose()?;
        let updated = wire
            .updated
            .map(|a| Audit::from_wire_at(a, &child(ROOT, "updated")))
            .transpose()?;

        let mut data_xml = wire.data_xml;
        let common = match data_xml.common.take() {
            Some(common) => {
                CommonData::from_wire(common, &child(&child(ROOT, "data-xml"), "common"))?
            }
            None => CommonData::default(),
        };
        let data = ThingData::from_wire(data_xml, info)?;
        let effective_date = data.effective_date().or(effective_date);

        Ok(Self {
            key,
            state,
            flags: wire.flags.unwrap_or(0),
            effective_date,
            created,
            updated,
            data,
            common,
        })
    }

    /// Check the payload and audit records.
    pub fn validate(&self) -> ThingsResult<()> {
        self.data.validate()?;
        if let Some(created) = &self.created {
            created.validate(&child(ROOT, "created"))?;
        }
        if let Some(updated) = &self.updated {
            updated.validate(&child(ROOT, "updated"))?;
        }
        Ok(())
    }

    /// Write the envelope as compact XML.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError`] if validation or serialisation fails.
    pub fn render(&self) -> ThingsResult<String> {
        self.render_with(&WriteOptions::compact())
    }

    /// Write the envelope with the given output options.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError`] if validation or serialisation fails.
    pub fn render_with(&self, options: &WriteOptions) -> ThingsResult<String> {
        self.validate()?;
        Ok(hr_xml::write_document(ROOT, &self.to_wire(), options)?)
    }

    fn to_wire(&self) -> ThingWire {
        let common = (!self.common.is_empty()).then(|| self.common.to_wire());
        ThingWire {
            thing_id: self.key.map(|key| ThingIdWire {
                version_stamp: Some(key.version_stamp.to_string()),
                id: key.id.to_string(),
            }),
            type_id: TypeIdWire {
                name: Some(self.data.type_name().to_string()),
                id: self.data.type_id().to_string(),
            },
            thing_state: Some(self.state.to_wire().to_string()),
            flags: (self.flags != 0).then_some(self.flags),
            eff_date: self
                .effective_date()
                .map(|date| date.format(EFF_DATE_FORMAT).to_string()),
            created: self.created.as_ref().map(Audit::to_wire),
            updated: self.updated.as_ref().map(Audit::to_wire),
            data_xml: self.data.to_wire(common),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThingIdWire {
    #[serde(rename = "@version-stamp", default, skip_serializing_if = "Option::is_none")]
    pub version_stamp: Option<String>,
    #[serde(rename = "$text", default)]
    pub id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TypeIdWire {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "$text", default)]
    pub id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RelatedThingWire {
    #[serde(rename = "thing-id")]
    pub thing_id: String,
    #[serde(rename = "version-stamp", default, skip_serializing_if = "Option::is_none")]
    pub version_stamp: Option<String>,
    #[serde(
        rename = "relationship-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relationship_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommonWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(rename = "related-thing", default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedThingWire>,
}

/// Payload elements are optional here; [`ThingData::from_wire`] enforces that exactly one is
/// present. Elements of unregistered types are skipped.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DataXmlWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter: Option<EncounterWire>,
    #[serde(rename = "heart-rate", default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<HeartRateWire>,
    #[serde(
        rename = "insulin-injection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub insulin_injection: Option<InsulinInjectionWire>,
    #[serde(
        rename = "respiratory-profile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub respiratory_profile: Option<RespiratoryProfileWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<CommonWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThingWire {
    #[serde(rename = "thing-id", default, skip_serializing_if = "Option::is_none")]
    pub thing_id: Option<ThingIdWire>,
    #[serde(rename = "type-id")]
    pub type_id: TypeIdWire,
    #[serde(rename = "thing-state", default, skip_serializing_if = "Option::is_none")]
    pub thing_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(rename = "eff-date", default, skip_serializing_if = "Option::is_none")]
    pub eff_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<AuditWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<AuditWire>,
    #[serde(rename = "data-xml")]
    pub data_xml: DataXmlWire,
}
