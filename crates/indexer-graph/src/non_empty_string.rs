// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string validation
//!
//! [`NonEmptyString`] guards configuration values that must never be blank,
//! such as the indexer admin secret. Once constructed the value is known to
//! contain at least one non-whitespace character.
//!
//! ```rust
//! use indexer_graph::NonEmptyString;
//!
//! let secret = NonEmptyString::new("hasura-admin-secret").expect("valid secret");
//! assert_eq!(secret.as_str(), "hasura-admin-secret");
//!
//! assert!(NonEmptyString::new("").is_err());
//! assert!(NonEmptyString::new(" \t\n").is_err());
//! ```

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// A string with at least one non-whitespace character
///
/// Surrounding whitespace is preserved; only blank values are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Validate a string
    ///
    /// # Errors
    ///
    /// Returns a message if the string is empty or whitespace-only
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.trim().is_empty() {
            Err("String cannot be empty or whitespace-only".to_string())
        } else {
            Ok(NonEmptyString(s.into_boxed_str()))
        }
    }

    /// Get a string slice of the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NonEmptyString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_values_with_content() {
        for value in ["a", " padded ", "sk-1234567890"] {
            let parsed = NonEmptyString::new(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
    }

    #[test]
    fn rejects_blank_values() {
        for value in ["", "   ", "\t\n"] {
            let error = NonEmptyString::new(value).unwrap_err();
            assert!(error.contains("cannot be empty"));
        }
    }

    #[test]
    fn deserializes_with_validation() {
        let parsed: NonEmptyString = serde_json::from_str("\"secret\"").unwrap();
        assert_eq!(parsed.to_string(), "secret");
        assert!(serde_json::from_str::<NonEmptyString>("\"  \"").is_err());
    }
}
