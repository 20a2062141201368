// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Indexer reachability as seen by a health-check query

use serde::{Deserialize, Serialize};

/// Outcome of probing the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// The health-check query succeeded
    Up,
    /// The indexer answered, but with an error status or an unexpected body
    Degraded { reason: String },
    /// The indexer is unreachable or rejects the admin secret
    Down { reason: String },
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down { .. })
    }

    /// Why the indexer is not up
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Up => None,
            Self::Degraded { reason } | Self::Down { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_has_no_reason() {
        assert!(HealthStatus::Up.is_up());
        assert!(!HealthStatus::Up.is_down());
        assert_eq!(HealthStatus::Up.reason(), None);
    }

    #[test]
    fn degraded_is_neither_up_nor_down() {
        let status = HealthStatus::Degraded {
            reason: "API returned status 503".to_string(),
        };
        assert!(!status.is_up());
        assert!(!status.is_down());
        assert_eq!(status.reason(), Some("API returned status 503"));
    }
}
