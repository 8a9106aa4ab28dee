//! Environment variable names and defaults used by the core crate.

/// Maximum size of a `<thing>` document, in bytes.
pub const MAX_DOCUMENT_BYTES_ENV: &str = "HR_MAX_DOCUMENT_BYTES";

/// Indentation width for written XML; unset or empty means compact output.
pub const XML_INDENT_ENV: &str = "HR_XML_INDENT";

/// Whether `<type-id name="..">` must match the registered type name.
pub const STRICT_TYPE_NAMES_ENV: &str = "HR_STRICT_TYPE_NAMES";

/// Default document size limit (1 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;
