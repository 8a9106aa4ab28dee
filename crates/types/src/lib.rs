//! Validated primitive types shared by the thing-type crates.
//!
//! These wrappers carry their invariants in the type: once constructed, a [`NonEmptyText`] is
//! never blank and a [`NonNegative`] is never negative, NaN or infinite. Wire layers convert raw
//! XML strings and numbers into these types so that domain structs never hold unchecked values.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The trimmed input exceeded the permitted number of characters
    #[error("Text exceeds maximum length of {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Errors that can occur when creating validated numeric types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NumberError {
    /// The input was NaN or infinite
    #[error("Number must be finite")]
    NotFinite,

    /// The input was below zero
    #[error("Number must not be negative (got {0})")]
    Negative(f64),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a new `NonEmptyText` whose trimmed content is at most `max` characters.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and [`TextError::TooLong`] when the trimmed
    /// input has more than `max` characters.
    pub fn with_max_len(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        let actual = text.0.chars().count();
        if actual > max {
            return Err(TextError::TooLong { max, actual });
        }
        Ok(text)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A finite floating point quantity that is never negative.
///
/// Used for measured amounts (flow rates, insulin units) where a negative reading has no
/// clinical meaning.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct NonNegative(f64);

impl NonNegative {
    /// Creates a new `NonNegative`.
    ///
    /// # Errors
    ///
    /// Returns [`NumberError::NotFinite`] for NaN or infinities and [`NumberError::Negative`]
    /// for values below zero.
    pub fn new(value: f64) -> Result<Self, NumberError> {
        if !value.is_finite() {
            return Err(NumberError::NotFinite);
        }
        if value < 0.0 {
            return Err(NumberError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Returns the wrapped value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for NonNegative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for NonNegative {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonNegative {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        NonNegative::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Pulse oximeter \n").expect("valid text");
        assert_eq!(text.as_str(), "Pulse oximeter");
    }

    #[test]
    fn non_empty_text_rejects_blank_input() {
        assert_eq!(NonEmptyText::new("").unwrap_err(), TextError::Empty);
        assert_eq!(NonEmptyText::new(" \t ").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn non_empty_text_enforces_max_length_in_characters() {
        assert!(NonEmptyText::with_max_len("héllo", 5).is_ok());
        let err = NonEmptyText::with_max_len("héllo!", 5).expect_err("too long");
        assert_eq!(err, TextError::TooLong { max: 5, actual: 6 });
    }

    #[test]
    fn non_empty_text_deserialize_validates() {
        let ok: NonEmptyText = serde_json::from_str("\" bpm \"").expect("deserialize");
        assert_eq!(ok.as_str(), "bpm");

        let err = serde_json::from_str::<NonEmptyText>("\"   \"").expect_err("blank");
        assert!(err.to_string().contains("Text cannot be empty"));
    }

    #[test]
    fn non_negative_accepts_zero_and_positive() {
        assert_eq!(NonNegative::new(0.0).expect("zero").get(), 0.0);
        assert_eq!(NonNegative::new(4.5).expect("positive").get(), 4.5);
    }

    #[test]
    fn non_negative_rejects_negative_and_non_finite() {
        assert_eq!(
            NonNegative::new(-0.5).expect_err("negative"),
            NumberError::Negative(-0.5)
        );
        assert_eq!(
            NonNegative::new(f64::NAN).expect_err("nan"),
            NumberError::NotFinite
        );
        assert_eq!(
            NonNegative::new(f64::INFINITY).expect_err("inf"),
            NumberError::NotFinite
        );
    }
}
