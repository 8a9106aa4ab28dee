//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into [`crate::ThingService`]. Library code never reads environment variables itself;
//! the binary collects the raw values and hands them to [`CoreConfig::from_env_values`].

use crate::constants::{
    DEFAULT_MAX_DOCUMENT_BYTES, MAX_DOCUMENT_BYTES_ENV, STRICT_TYPE_NAMES_ENV, XML_INDENT_ENV,
};
use crate::{CoreError, CoreResult};
use things::{ReadOptions, WriteOptions};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    max_document_bytes: usize,
    xml_indent: Option<usize>,
    strict_type_names: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            xml_indent: None,
            strict_type_names: false,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `max_document_bytes` is zero.
    pub fn new(
        max_document_bytes: usize,
        xml_indent: Option<usize>,
        strict_type_names: bool,
    ) -> CoreResult<Self> {
        if max_document_bytes == 0 {
            return Err(CoreError::InvalidInput(
                "max_document_bytes must be greater than zero".into(),
            ));
        }

        Ok(Self {
            max_document_bytes,
            xml_indent,
            strict_type_names,
        })
    }

    /// Build a configuration from the optional raw values of the `HR_*` environment variables.
    ///
    /// Missing or blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] naming the variable if a value cannot be parsed.
    pub fn from_env_values(
        max_document_bytes: Option<String>,
        xml_indent: Option<String>,
        strict_type_names: Option<String>,
    ) -> CoreResult<Self> {
        let max_document_bytes = usize_from_env_value(MAX_DOCUMENT_BYTES_ENV, max_document_bytes)?
            .unwrap_or(DEFAULT_MAX_DOCUMENT_BYTES);
        let xml_indent = usize_from_env_value(XML_INDENT_ENV, xml_indent)?;
        let strict_type_names =
            bool_from_env_value(STRICT_TYPE_NAMES_ENV, strict_type_names)?.unwrap_or(false);

        Self::new(max_document_bytes, xml_indent, strict_type_names)
    }

    pub fn max_document_bytes(&self) -> usize {
        self.max_document_bytes
    }

    pub fn xml_indent(&self) -> Option<usize> {
        self.xml_indent
    }

    pub fn strict_type_names(&self) -> bool {
        self.strict_type_names
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.xml_indent,
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            strict_type_names: self.strict_type_names,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn usize_from_env_value(name: &str, value: Option<String>) -> CoreResult<Option<usize>> {
    trimmed(value)
        .map(|v| {
            v.parse::<usize>().map_err(|e| {
                CoreError::InvalidInput(format!("{name} must be a whole number, got '{v}': {e}"))
            })
        })
        .transpose()
}

fn bool_from_env_value(name: &str, value: Option<String>) -> CoreResult<Option<bool>> {
    trimmed(value)
        .map(|v| match v.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(CoreError::InvalidInput(format!(
                "{name} must be true or false, got '{v}'"
            ))),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        let cfg = CoreConfig::from_env_values(None, None, None).expect("defaults");
        assert_eq!(cfg, CoreConfig::default());
        assert_eq!(cfg.max_document_bytes(), DEFAULT_MAX_DOCUMENT_BYTES);
        assert_eq!(cfg.write_options(), WriteOptions::compact());
        assert!(!cfg.read_options().strict_type_names);
    }

    #[test]
    fn blank_values_use_defaults() {
        let cfg = CoreConfig::from_env_values(Some("  ".into()), Some(String::new()), None)
            .expect("blank values");
        assert_eq!(cfg, CoreConfig::default());
    }

    #[test]
    fn parses_all_values() {
        let cfg = CoreConfig::from_env_values(
            Some("2048".into()),
            Some(" 2 ".into()),
            Some("YES".into()),
        )
        .expect("explicit values");
        assert_eq!(cfg.max_document_bytes(), 2048);
        assert_eq!(cfg.write_options(), WriteOptions::indented(2));
        assert!(cfg.strict_type_names());
    }

    #[test]
    fn rejects_zero_limit() {
        let err = CoreConfig::from_env_values(Some("0".into()), None, None).expect_err("zero");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("greater than zero")));
    }

    #[test]
    fn rejects_unparseable_values_with_variable_name() {
        let err = CoreConfig::from_env_values(Some("lots".into()), None, None)
            .expect_err("not a number");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.starts_with(MAX_DOCUMENT_BYTES_ENV)));

        let err = CoreConfig::from_env_values(None, None, Some("maybe".into()))
            .expect_err("not a boolean");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.starts_with(STRICT_TYPE_NAMES_ENV)));
    }
}
