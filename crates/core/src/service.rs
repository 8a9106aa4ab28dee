//! Thing document operations.
//!
//! [`ThingService`] wraps the `things` crate with the runtime configuration: document size
//! limits, read and write options, file I/O, export to YAML or JSON, and logging.

use crate::{CoreConfig, CoreError, CoreResult};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use things::{Guid, Thing, ThingTypeInfo};

/// Output format for [`ThingService::export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Yaml,
    Json,
}

/// A short description of a thing, suitable for listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThingSummary {
    pub type_name: &'static str,
    pub type_id: String,
    pub thing_id: Option<String>,
    pub version_stamp: Option<String>,
    pub state: String,
    pub effective_date: Option<String>,
    pub created_by: Option<String>,
}

impl fmt::Display for ThingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.type_id)?;
        if let Some(thing_id) = &self.thing_id {
            write!(f, " id={thing_id}")?;
        }
        write!(f, " state={}", self.state)?;
        if let Some(date) = &self.effective_date {
            write!(f, " effective={date}")?;
        }
        Ok(())
    }
}

/// Pure thing document operations.
#[derive(Clone, Debug)]
pub struct ThingService {
    cfg: Arc<CoreConfig>,
}

impl ThingService {
    /// Creates a new instance of ThingService.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Every thing type that can be read and written.
    pub fn registered_types(&self) -> &'static [ThingTypeInfo] {
        things::registered_types()
    }

    /// Find a registered type by its GUID or by the root element of its payload.
    pub fn find_type(&self, key: &str) -> Option<&'static ThingTypeInfo> {
        let key = key.trim();
        match Guid::parse(key) {
            Ok(id) => things::lookup_type(&id),
            Err(_) => things::lookup_root(key),
        }
    }

    /// Parse a `<thing>` document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentTooLarge`] if the document exceeds the configured limit, or
    /// [`CoreError::Things`] if it cannot be parsed or fails validation.
    pub fn parse_thing(&self, xml: &str) -> CoreResult<Thing> {
        self.check_size(xml.len() as u64)?;
        match Thing::parse_with(xml, &self.cfg.read_options()) {
            Ok(thing) => {
                tracing::debug!(
                    "parsed {} thing ({} bytes)",
                    thing.data.type_name(),
                    xml.len()
                );
                Ok(thing)
            }
            Err(e) => {
                tracing::warn!("rejected thing document: {}", e);
                Err(e.into())
            }
        }
    }

    /// Write a thing as XML using the configured output options.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Things`] if the thing fails validation.
    pub fn render_thing(&self, thing: &Thing) -> CoreResult<String> {
        let xml = thing.render_with(&self.cfg.write_options())?;
        tracing::debug!("rendered {} thing ({} bytes)", thing.data.type_name(), xml.len());
        Ok(xml)
    }

    /// Parse a document and summarise it.
    ///
    /// # Errors
    ///
    /// See [`ThingService::parse_thing`].
    pub fn validate_document(&self, xml: &str) -> CoreResult<ThingSummary> {
        let thing = self.parse_thing(xml)?;
        Ok(self.summarise(&thing))
    }

    /// Read and parse a `<thing>` document from disk.
    ///
    /// The size limit is checked against the file metadata before the file is read.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileRead`] if the file cannot be read, plus the errors of
    /// [`ThingService::parse_thing`].
    pub fn read_thing_file(&self, path: &Path) -> CoreResult<Thing> {
        let metadata = std::fs::metadata(path).map_err(CoreError::FileRead)?;
        self.check_size(metadata.len())?;
        let xml = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        tracing::debug!("read {}", path.display());
        self.parse_thing(&xml)
    }

    /// Render a thing and write it to disk, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileWrite`] if the file cannot be written, or
    /// [`CoreError::Things`] if the thing fails validation.
    pub fn write_thing_file(&self, path: &Path, thing: &Thing) -> CoreResult<()> {
        let xml = self.render_thing(thing)?;
        std::fs::write(path, xml).map_err(CoreError::FileWrite)?;
        tracing::info!("wrote {} thing to {}", thing.data.type_name(), path.display());
        Ok(())
    }

    /// Serialise a thing's domain values as YAML or JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::YamlSerialization`] or [`CoreError::JsonSerialization`] if
    /// serialisation fails.
    pub fn export(&self, thing: &Thing, format: ExportFormat) -> CoreResult<String> {
        match format {
            ExportFormat::Yaml => {
                serde_yaml::to_string(thing).map_err(CoreError::YamlSerialization)
            }
            ExportFormat::Json => {
                serde_json::to_string_pretty(thing).map_err(CoreError::JsonSerialization)
            }
        }
    }

    pub fn summarise(&self, thing: &Thing) -> ThingSummary {
        ThingSummary {
            type_name: thing.data.type_name(),
            type_id: thing.type_id().to_string(),
            thing_id: thing.key.map(|key| key.id.to_string()),
            version_stamp: thing.key.map(|key| key.version_stamp.to_string()),
            state: format!("{:?}", thing.state),
            effective_date: thing.effective_date().map(|date| date.to_string()),
            created_by: thing
                .created
                .as_ref()
                .map(|audit| match &audit.application.name {
                    Some(name) => name.clone(),
                    None => audit.application.id.to_string(),
                }),
        }
    }

    fn check_size(&self, size: u64) -> CoreResult<()> {
        let limit = self.cfg.max_document_bytes();
        if size > limit as u64 {
            tracing::warn!("rejected {} byte document (limit {})", size, limit);
            return Err(CoreError::DocumentTooLarge { size, limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use things::{HeartRate, ThingType, ThingsError};

    const HEART_RATE_THING: &str = r#"<thing><thing-id version-stamp="0f1e2d3c-4b5a-4978-8695-a4b3c2d1e0f9">9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d</thing-id><type-id name="Heart Rate">b81eb4a6-6eac-4292-ae93-3872d6870994</type-id><created><timestamp>2024-03-14T09:06:00Z</timestamp><app-id name="Glucose Tracker">1f3a9c2e-5b7d-4e21-9a0c-3d4e5f6a7b8c</app-id><access-avenue>Online</access-avenue><audit-action>Created</audit-action></created><data-xml><heart-rate><when><date><y>2024</y><m>3</m><d>14</d></date><time><h>9</h><m>5</m></time></when><value>72</value></heart-rate></data-xml></thing>"#;

    fn service() -> ThingService {
        ThingService::new(Arc::new(CoreConfig::default()))
    }

    fn service_with(cfg: CoreConfig) -> ThingService {
        ThingService::new(Arc::new(cfg))
    }

    #[test]
    fn parses_and_summarises() {
        let summary = service()
            .validate_document(HEART_RATE_THING)
            .expect("valid document");

        assert_eq!(summary.type_name, "Heart Rate");
        assert_eq!(summary.type_id, HeartRate::TYPE_ID.to_string());
        assert_eq!(
            summary.thing_id.as_deref(),
            Some("9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d")
        );
        assert_eq!(summary.state, "Active");
        assert_eq!(summary.effective_date.as_deref(), Some("2024-03-14 09:05:00"));
        assert_eq!(summary.created_by.as_deref(), Some("Glucose Tracker"));
        assert!(summary.to_string().starts_with("Heart Rate (b81eb4a6-"));
    }

    #[test]
    fn rejects_documents_over_limit() {
        let svc = service_with(CoreConfig::new(64, None, false).expect("config"));
        let err = svc.parse_thing(HEART_RATE_THING).expect_err("too large");
        match err {
            CoreError::DocumentTooLarge { size, limit } => {
                assert_eq!(size, HEART_RATE_THING.len() as u64);
                assert_eq!(limit, 64);
            }
            other => panic!("expected DocumentTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn strict_names_follow_config() {
        let renamed = HEART_RATE_THING.replace(r#"name="Heart Rate""#, r#"name="Pulse""#);
        assert!(service().parse_thing(&renamed).is_ok());

        let strict = service_with(
            CoreConfig::new(crate::constants::DEFAULT_MAX_DOCUMENT_BYTES, None, true)
                .expect("config"),
        );
        let err = strict.parse_thing(&renamed).expect_err("strict name check");
        assert!(matches!(err, CoreError::Things(ThingsError::InvalidInput(_))));
    }

    #[test]
    fn parse_errors_pass_through() {
        let unknown = HEART_RATE_THING.replace(
            "b81eb4a6-6eac-4292-ae93-3872d6870994",
            &Guid::nil().to_string(),
        );
        let err = service().parse_thing(&unknown).expect_err("unknown type");
        assert!(matches!(err, CoreError::Things(ThingsError::UnknownType(_))));
    }

    #[test]
    fn render_uses_configured_indent() {
        let svc = service();
        let thing = svc.parse_thing(HEART_RATE_THING).expect("parse");
        let compact = svc.render_thing(&thing).expect("compact");
        assert!(!compact.contains('\n'));

        let indented = service_with(
            CoreConfig::new(crate::constants::DEFAULT_MAX_DOCUMENT_BYTES, Some(2), false)
                .expect("config"),
        );
        let pretty = indented.render_thing(&thing).expect("indented");
        assert!(pretty.contains("\n  <type-id"), "xml was {pretty}");
    }

    #[test]
    fn writes_and_reads_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("heart-rate.xml");
        let svc = service();

        let thing = svc.parse_thing(HEART_RATE_THING).expect("parse");
        svc.write_thing_file(&path, &thing).expect("write");
        let back = svc.read_thing_file(&path).expect("read");
        assert_eq!(back, thing);
    }

    #[test]
    fn read_checks_size_before_reading() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.xml");
        std::fs::write(&path, HEART_RATE_THING).expect("write fixture");

        let svc = service_with(CoreConfig::new(10, None, false).expect("config"));
        let err = svc.read_thing_file(&path).expect_err("too large");
        assert!(matches!(err, CoreError::DocumentTooLarge { limit: 10, .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = service()
            .read_thing_file(&dir.path().join("absent.xml"))
            .expect_err("missing file");
        assert!(matches!(err, CoreError::FileRead(_)));
    }

    #[test]
    fn exports_yaml_and_json() {
        let svc = service();
        let thing = svc.parse_thing(HEART_RATE_THING).expect("parse");

        let yaml = svc.export(&thing, ExportFormat::Yaml).expect("yaml");
        assert!(yaml.contains("type: heart-rate"), "yaml was {yaml}");

        let json = svc.export(&thing, ExportFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["data"]["value"], 72);
        assert_eq!(value["state"], "Active");
    }

    #[test]
    fn lists_registered_types() {
        let names: Vec<_> = service()
            .registered_types()
            .iter()
            .map(|info| info.name)
            .collect();
        assert!(names.contains(&"Heart Rate"));
        assert!(names.contains(&"Encounter"));
    }

    #[test]
    fn finds_types_by_guid_or_root() {
        let svc = service();
        let by_id = svc
            .find_type(&HeartRate::TYPE_ID.to_string().to_uppercase())
            .expect("by guid");
        assert_eq!(by_id.root_element, "heart-rate");

        let by_root = svc.find_type(" insulin-injection ").expect("by root");
        assert_eq!(by_root.name, "Insulin Injection");

        assert!(svc.find_type("blood-glucose").is_none());
        assert!(svc.find_type(&Guid::nil().to_string()).is_none());
    }
}
