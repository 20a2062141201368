// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain chain names
//!
//! The indexer and the public API name some chains differently. The indexer
//! stores Ethereum mainnet as `mainnet` and Avalanche C-Chain as `avalanche`,
//! while API clients know them as `ethereum` and `avax`. Every other chain
//! name is shared verbatim by both vocabularies.
//!
//! [`ChainName`] always holds the *indexer* spelling so it can be placed in a
//! query as-is, and renders the public spelling on the way out.

use std::{fmt, sync::LazyLock};

use regex::Regex;

/// Pairs of (indexer name, public name) that differ between vocabularies
const CHAIN_ALIASES: &[(&str, &str)] = &[("mainnet", "ethereum"), ("avalanche", "avax")];

static CHAIN_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("chain name pattern is a valid regex")
});

/// Translate an indexer chain name into its public API spelling
///
/// Unknown names pass through unchanged.
pub fn public_chain_name(indexer_name: &str) -> &str {
    CHAIN_ALIASES
        .iter()
        .find(|(indexer, _)| *indexer == indexer_name)
        .map_or(indexer_name, |(_, public)| public)
}

/// Translate a public API chain name into the indexer spelling
///
/// Unknown names pass through unchanged.
pub fn indexer_chain_name(public_name: &str) -> &str {
    CHAIN_ALIASES
        .iter()
        .find(|(_, public)| *public == public_name)
        .map_or(public_name, |(indexer, _)| indexer)
}

/// A validated chain name, stored in the indexer vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainName(Box<str>);

impl ChainName {
    /// Parse a chain name supplied by an API client
    ///
    /// The name is lowercased, checked against the allowed character set and
    /// translated into the indexer vocabulary.
    pub fn from_public(name: &str) -> Result<Self, ChainNameError> {
        let lowered = name.trim().to_lowercase();
        if !CHAIN_NAME_PATTERN.is_match(&lowered) {
            return Err(ChainNameError::Invalid(name.to_string()));
        }
        Ok(Self(Box::from(indexer_chain_name(&lowered))))
    }

    /// The name as the indexer stores it
    pub fn indexer_name(&self) -> &str {
        &self.0
    }

    /// The name as API clients know it
    pub fn public_name(&self) -> &str {
        public_chain_name(&self.0)
    }
}

impl fmt::Display for ChainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.public_name())
    }
}

/// Error type for chain name parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainNameError {
    /// The name contains characters outside `[a-z0-9_-]` or is empty
    #[error("invalid chain name: {0:?}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_pairs() {
        assert_eq!(public_chain_name("mainnet"), "ethereum");
        assert_eq!(public_chain_name("avalanche"), "avax");
        assert_eq!(indexer_chain_name("ethereum"), "mainnet");
        assert_eq!(indexer_chain_name("avax"), "avalanche");
    }

    #[test]
    fn translation_is_inverse() {
        for name in ["mainnet", "avalanche", "polygon", "bsc", "optimism"] {
            assert_eq!(indexer_chain_name(public_chain_name(name)), name);
        }
        for name in ["ethereum", "avax", "polygon", "arbitrum"] {
            assert_eq!(public_chain_name(indexer_chain_name(name)), name);
        }
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(public_chain_name("gnosis"), "gnosis");
        assert_eq!(indexer_chain_name("gnosis"), "gnosis");
    }

    #[test]
    fn from_public_translates_and_lowercases() {
        let chain = ChainName::from_public("Ethereum").unwrap();
        assert_eq!(chain.indexer_name(), "mainnet");
        assert_eq!(chain.public_name(), "ethereum");

        let chain = ChainName::from_public("AVAX").unwrap();
        assert_eq!(chain.indexer_name(), "avalanche");

        let chain = ChainName::from_public("polygon").unwrap();
        assert_eq!(chain.indexer_name(), "polygon");
        assert_eq!(chain.to_string(), "polygon");
    }

    #[test]
    fn from_public_rejects_unsafe_names() {
        for name in ["", "   ", "eth\"} }", "main net", "-mainnet", "chain;drop"] {
            assert!(
                ChainName::from_public(name).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_public_trims_whitespace() {
        let chain = ChainName::from_public(" ethereum\n").unwrap();
        assert_eq!(chain.indexer_name(), "mainnet");
    }
}
