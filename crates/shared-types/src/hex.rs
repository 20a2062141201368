// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Hexadecimal identifiers
//!
//! Addresses, token contracts and hashes all arrive as `0x`-prefixed hex
//! strings. No checksum or length validation is performed; the only contract is
//! the character set, and the value is lowercased because the indexer stores
//! every identifier in lowercase.

use std::{fmt, sync::LazyLock};

use regex::Regex;

static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^0x[0-9A-F]+$").expect("hex pattern is a valid regex"));

/// Returns true if `value` is `0x` followed by at least one hex digit, in any case
pub fn is_hex(value: &str) -> bool {
    HEX_PATTERN.is_match(value)
}

/// A lowercased `0x`-prefixed hexadecimal string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexString(Box<str>);

impl HexString {
    /// Validate and normalize a hex string
    pub fn parse(value: &str) -> Result<Self, HexParseError> {
        if !is_hex(value) {
            return Err(HexParseError(value.to_string()));
        }
        Ok(Self(value.to_lowercase().into_boxed_str()))
    }

    /// Get the normalized string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a value is not a `0x`-prefixed hex string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a 0x-prefixed hex string: {0:?}")]
pub struct HexParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_in_any_case() {
        for value in [
            "0x0",
            "0xabc",
            "0xABC",
            "0XaBc",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640a2c41296fcb3f5640a2c4129",
        ] {
            assert!(is_hex(value), "{value} should be accepted");
        }
    }

    #[test]
    fn rejects_non_hex() {
        for value in [
            "",
            "0x",
            "abc",
            "0xg",
            "0x12 34",
            " 0x1234",
            "0x1234 ",
            "0x1234\"}",
            "1234",
            "0x-1",
        ] {
            assert!(!is_hex(value), "{value:?} should be rejected");
        }
    }

    #[test]
    fn parse_lowercases() {
        let hex = HexString::parse("0xD8DA6BF26964AF9D7EED9E03E53415D37AA96045").unwrap();
        assert_eq!(hex.as_str(), "0xd8da6bf26964af9d7eed9e03e53415d37aa96045");
    }

    #[test]
    fn parse_error_keeps_input() {
        let err = HexParseError("nope".to_string());
        assert_eq!(HexString::parse("nope").unwrap_err(), err);
        assert!(err.to_string().contains("nope"));
    }
}
