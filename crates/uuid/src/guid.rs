//! Internal implementation of the GUID wrapper and thing keys.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Byte offsets of the `-` separators in the canonical form.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A GUID in canonical form (36 lowercase characters, hyphenated).
///
/// Once you have a `Guid`, you can assume the value is valid and that [`Display`] produces
/// exactly the text that is written to XML.
///
/// # Construction
/// - [`Guid::new`] generates a fresh random identifier (for example, a new version stamp).
/// - [`Guid::parse`] validates an externally supplied identifier.
/// - [`Guid::from_u128`] builds well-known constants such as thing type identifiers.
///
/// [`Display`]: fmt::Display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(Uuid);

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl Guid {
    /// Generates a new random (version 4) GUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds a GUID from its 128-bit value.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// The all-zero GUID.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Validates and parses a hyphenated GUID string.
    ///
    /// Hex digits may be upper or lower case; the stored value is always written back in
    /// lowercase. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not a hyphenated `8-4-4-4-12` GUID.
    pub fn parse(input: &str) -> UuidResult<Self> {
        let trimmed = input.trim();
        if !Self::is_hyphenated(trimmed) {
            return Err(UuidError::InvalidInput(format!(
                "GUID must be 36 hex characters in 8-4-4-4-12 hyphenated form, got: '{}'",
                input
            )));
        }

        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid GUID '{}': {}", input, e)))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns `true` if `input` is already in canonical form (lowercase, hyphenated).
    pub fn is_canonical(input: &str) -> bool {
        Self::is_hyphenated(input) && !input.bytes().any(|b| b.is_ascii_uppercase())
    }

    fn is_hyphenated(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| {
                if HYPHEN_POSITIONS.contains(&i) {
                    b == b'-'
                } else {
                    b.is_ascii_hexdigit()
                }
            })
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for Guid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Guid::parse(s)
    }
}

impl From<Uuid> for Guid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Guid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Guid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Guid::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Identity of one version of a stored thing.
///
/// The service assigns a thing id when an item is first stored and a new version stamp every
/// time it is updated, so the pair names exactly one version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThingKey {
    /// Identifier shared by every version of the thing.
    pub id: Guid,

    /// Identifier of this particular version.
    pub version_stamp: Guid,
}

impl ThingKey {
    pub fn new(id: Guid, version_stamp: Guid) -> Self {
        Self { id, version_stamp }
    }
}

impl fmt::Display for ThingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version_stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEART_RATE: &str = "b81eb4a6-6eac-4292-ae93-3872d6870994";

    #[test]
    fn new_generates_canonical_guid() {
        let guid = Guid::new();
        let text = guid.to_string();
        assert_eq!(text.len(), 36);
        assert!(Guid::is_canonical(&text));
    }

    #[test]
    fn parse_accepts_canonical_guid() {
        let guid = Guid::parse(HEART_RATE).expect("canonical guid");
        assert_eq!(guid.to_string(), HEART_RATE);
    }

    #[test]
    fn parse_normalises_uppercase() {
        let guid = Guid::parse("B81EB4A6-6EAC-4292-AE93-3872D6870994").expect("uppercase guid");
        assert_eq!(guid.to_string(), HEART_RATE);
        assert!(!Guid::is_canonical("B81EB4A6-6EAC-4292-AE93-3872D6870994"));
    }

    #[test]
    fn parse_ignores_surrounding_whitespace() {
        let guid = Guid::parse("  b81eb4a6-6eac-4292-ae93-3872d6870994\n").expect("trimmed");
        assert_eq!(guid.to_string(), HEART_RATE);
    }

    #[test]
    fn parse_rejects_other_shapes() {
        for input in [
            "b81eb4a66eac4292ae933872d6870994",
            "{b81eb4a6-6eac-4292-ae93-3872d6870994}",
            "urn:uuid:b81eb4a6-6eac-4292-ae93-3872d6870994",
            "b81eb4a6-6eac-4292-ae93-3872d687099",
            "g81eb4a6-6eac-4292-ae93-3872d6870994",
            "b81eb4a6_6eac_4292_ae93_3872d6870994",
            "",
        ] {
            let err = Guid::parse(input).expect_err("should reject");
            assert!(
                matches!(err, UuidError::InvalidInput(ref msg) if msg.contains("8-4-4-4-12")),
                "unexpected error for {input:?}: {err:?}"
            );
        }
    }

    #[test]
    fn from_u128_matches_parsed_value() {
        let constant = Guid::from_u128(0xb81eb4a6_6eac_4292_ae93_3872d6870994);
        assert_eq!(constant, Guid::parse(HEART_RATE).expect("parse"));
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let guid: Guid = HEART_RATE.parse().expect("from_str");
        assert_eq!(guid.to_string(), HEART_RATE);
        assert!("not-a-guid".parse::<Guid>().is_err());
    }

    #[test]
    fn serde_uses_canonical_string() {
        let guid = Guid::parse(HEART_RATE).expect("parse");
        let json = serde_json::to_string(&guid).expect("serialize");
        assert_eq!(json, format!("\"{HEART_RATE}\""));

        let back: Guid = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, guid);
        assert!(serde_json::from_str::<Guid>("\"nope\"").is_err());
    }

    #[test]
    fn thing_key_display_joins_parts() {
        let id = Guid::parse(HEART_RATE).expect("id");
        let stamp = Guid::nil();
        let key = ThingKey::new(id, stamp);
        assert_eq!(
            key.to_string(),
            format!("{HEART_RATE}@00000000-0000-0000-0000-000000000000")
        );
    }
}
