//! Audit records: who created or changed a stored thing, when, and through which avenue.
//!
//! The same node shape appears under several roots (`<created>` and `<updated>` inside a thing
//! envelope, or a standalone `<audit>`), so the root element is chosen by the caller.

use crate::convert::{child, guid};
use crate::{ThingsError, ThingsResult};
use chrono::{DateTime, SecondsFormat, Utc};
use hr_uuid::Guid;
use hr_xml::WriteOptions;
use serde::{Deserialize, Serialize};

/// How the change reached the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessAvenue {
    /// The person was using the application interactively.
    Online,
    /// The application acted without the person present.
    Offline,
}

impl AccessAvenue {
    fn to_wire(self) -> &'static str {
        match self {
            AccessAvenue::Online => "Online",
            AccessAvenue::Offline => "Offline",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "Online" => Some(AccessAvenue::Online),
            "Offline" => Some(AccessAvenue::Offline),
            _ => None,
        }
    }
}

/// What happened to the thing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
}

impl AuditAction {
    fn to_wire(self) -> &'static str {
        match self {
            AuditAction::Created => "Created",
            AuditAction::Updated => "Updated",
            AuditAction::Deleted => "Deleted",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "Created" => Some(AuditAction::Created),
            "Updated" => Some(AuditAction::Updated),
            "Deleted" => Some(AuditAction::Deleted),
            _ => None,
        }
    }
}

/// An application or person identified by GUID, with an optional display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditParty {
    pub id: Guid,
    pub name: Option<String>,
}

impl AuditParty {
    pub fn new(id: Guid) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: Guid, name: &str) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
        }
    }

    fn from_wire(wire: PartyIdWire, field: &str) -> ThingsResult<Self> {
        Ok(Self {
            id: guid(field, &wire.id)?,
            name: wire.name.filter(|n| !n.trim().is_empty()),
        })
    }

    fn to_wire(&self) -> PartyIdWire {
        PartyIdWire {
            name: self.name.clone(),
            id: self.id.to_string(),
        }
    }
}

/// A record of who created or modified a thing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Audit {
    pub timestamp: DateTime<Utc>,

    /// The application that made the change.
    pub application: AuditParty,

    /// The person on whose behalf the change was made.
    pub person: Option<AuditParty>,

    /// A person acting for `person`, such as a carer.
    pub impersonator: Option<AuditParty>,

    pub access_avenue: AccessAvenue,
    pub action: AuditAction,

    /// The parent application when `application` is a child of a master application.
    pub master_application_id: Option<Guid>,
}

impl Audit {
    /// An audit record with only the required parts.
    pub fn new(
        timestamp: DateTime<Utc>,
        application: AuditParty,
        access_avenue: AccessAvenue,
        action: AuditAction,
    ) -> Self {
        Self {
            timestamp,
            application,
            person: None,
            impersonator: None,
            access_avenue,
            action,
            master_application_id: None,
        }
    }

    /// Check cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError::InvalidInput`] if an impersonator is recorded without a person.
    pub fn validate(&self, field: &str) -> ThingsResult<()> {
        if self.impersonator.is_some() && self.person.is_none() {
            return Err(ThingsError::InvalidInput(format!(
                "{}: an impersonator requires a person",
                child(field, "impersonator-id")
            )));
        }
        Ok(())
    }

    /// Parse a standalone audit record whose root element is `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError`] if the XML does not match the audit node shape or fails
    /// validation.
    pub fn parse(xml: &str, root: &str) -> ThingsResult<Self> {
        let wire: AuditWire = hr_xml::read_document(xml, root)?;
        Self::from_wire_at(wire, root)
    }

    /// Write the record as compact XML under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError`] if validation or serialisation fails.
    pub fn render(&self, root: &str) -> ThingsResult<String> {
        self.render_with(root, &WriteOptions::compact())
    }

    /// Write the record under `root` with the given output options.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsError`] if validation or serialisation fails.
    pub fn render_with(&self, root: &str, options: &WriteOptions) -> ThingsResult<String> {
        self.validate(root)?;
        Ok(hr_xml::write_document(root, &self.to_wire(), options)?)
    }

    pub(crate) fn from_wire_at(wire: AuditWire, field: &str) -> ThingsResult<Self> {
        let timestamp = DateTime::parse_from_rfc3339(wire.timestamp.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                ThingsError::InvalidInput(format!(
                    "{}: expected an RFC 3339 timestamp, got '{}': {e}",
                    child(field, "timestamp"),
                    wire.timestamp
                ))
            })?;

        let access_avenue = AccessAvenue::from_wire(wire.access_avenue.trim()).ok_or_else(|| {
            ThingsError::InvalidInput(format!(
                "{}: unknown access avenue '{}'",
                child(field, "access-avenue"),
                wire.access_avenue
            ))
        })?;

        let action = AuditAction::from_wire(wire.audit_action.trim()).ok_or_else(|| {
            ThingsError::InvalidInput(format!(
                "{}: unknown audit action '{}'",
                child(field, "audit-action"),
                wire.audit_action
            ))
        })?;

        let audit = Self {
            timestamp,
            application: AuditParty::from_wire(wire.app_id, &child(field, "app-id"))?,
            person: wire
                .person_id
                .map(|p| AuditParty::from_wire(p, &child(field, "person-id")))
                .transpose()?,
            impersonator: wire
                .impersonator_id
                .map(|p| AuditParty::from_wire(p, &child(field, "impersonator-id")))
                .transpose()?,
            access_avenue,
            action,
            master_application_id: wire
                .master_app_id
                .as_deref()
                .map(|id| guid(&child(field, "master-app-id"), id))
                .transpose()?,
        };
        audit.validate(field)?;
        Ok(audit)
    }
}

impl Audit {
    pub(crate) fn to_wire(&self) -> AuditWire {
        AuditWire {
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            app_id: self.application.to_wire(),
            person_id: self.person.as_ref().map(AuditParty::to_wire),
            impersonator_id: self.impersonator.as_ref().map(AuditParty::to_wire),
            access_avenue: self.access_avenue.to_wire().to_string(),
            audit_action: self.action.to_wire().to_string(),
            master_app_id: self.master_application_id.map(|id| id.to_string()),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// `<app-id name="..">guid</app-id>`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartyIdWire {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "$text", default)]
    pub id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuditWire {
    pub timestamp: String,
    #[serde(rename = "app-id")]
    pub app_id: PartyIdWire,
    #[serde(rename = "person-id", default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<PartyIdWire>,
    #[serde(
        rename = "impersonator-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub impersonator_id: Option<PartyIdWire>,
    #[serde(rename = "access-avenue")]
    pub access_avenue: String,
    #[serde(rename = "audit-action")]
    pub audit_action: String,
    #[serde(rename = "master-app-id", default, skip_serializing_if = "Option::is_none")]
    pub master_app_id: Option<String>,
}
