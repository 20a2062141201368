// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Request parameter extraction and validation
//!
//! Custom extractors wrap axum's `Path` and `Query` so that malformed requests
//! are answered with a failure envelope instead of axum's plain-text
//! rejections. The parsing helpers turn raw path and query strings into the
//! typed values the query builders accept, with the exact error message each
//! endpoint reports.

use std::sync::LazyLock;

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use indexer_graph::HistoryFilters;
use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};
use shared_types::{ChainName, HexString};
use utoipa::IntoParams;

use crate::{
    error::{ServerError, ServerResult},
    pagination::{DEFAULT_HOLDERS_LIMIT, MAX_HOLDERS_LIMIT, PageWindow},
};

static PROTOCOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("protocol pattern is a valid regex")
});

/// Largest offset the indexer accepts (GraphQL `Int` is 32-bit)
const MAX_OFFSET: u64 = 2_147_483_647;

/// Path parameters, rejected with a failure envelope
#[derive(Debug)]
pub struct PathParams<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| ServerError::invalid_input(rejection.body_text()))
    }
}

/// Query string parameters, rejected with a failure envelope
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| ServerError::invalid_input(rejection.body_text()))
    }
}

/// Query parameters of the transaction history
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// 1-based page number; unparseable values fall back to 1
    pub page: Option<String>,
    /// Comma-separated public chain names, e.g. `ethereum,avax`
    pub chains: Option<String>,
    /// Comma-separated protocol adapter ids
    pub protocols: Option<String>,
}

/// Query parameters of the token holder listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HoldersParams {
    /// 1-based page number
    pub page: Option<String>,
    /// Holders per page, 1 to 100 (default 50)
    pub limit: Option<String>,
}

/// What to do with a page parameter that is not a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFallback {
    /// Serve the first page
    FirstPage,
    /// Answer 400 `invalid page`
    Reject,
}

/// How a block is addressed in `/chain/{chain}/block/{block}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    /// Block hash
    Hash(HexString),
    /// Block height
    Number(u64),
}

impl BlockRef {
    /// Hex selects a hash lookup, a decimal selects a number lookup
    pub fn parse(raw: &str) -> ServerResult<Self> {
        if let Ok(hash) = HexString::parse(raw) {
            return Ok(Self::Hash(hash));
        }
        raw.parse::<u64>()
            .map(Self::Number)
            .map_err(|_| ServerError::invalid_input("invalid block"))
    }
}

/// Validate a hex identifier, failing with `message`
pub fn parse_hex(raw: &str, message: &'static str) -> ServerResult<HexString> {
    HexString::parse(raw).map_err(|_| ServerError::invalid_input(message))
}

/// Validate a public chain name
pub fn parse_chain(raw: &str) -> ServerResult<ChainName> {
    ChainName::from_public(raw).map_err(|_| ServerError::invalid_input("invalid chain"))
}

/// Parse a page number
///
/// Missing, blank and zero values mean page 1.
pub fn parse_page(raw: Option<&str>, fallback: PageFallback) -> ServerResult<u64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(1);
    };
    match (raw.parse::<u64>(), fallback) {
        (Ok(page), _) => Ok(page.max(1)),
        (Err(_), PageFallback::FirstPage) => Ok(1),
        (Err(_), PageFallback::Reject) => Err(ServerError::invalid_input("invalid page")),
    }
}

/// Parse the holder page size, clamped to `1..=100`
pub fn parse_holders_limit(raw: Option<&str>) -> ServerResult<u64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_HOLDERS_LIMIT);
    };
    raw.parse::<u64>()
        .map(|limit| limit.clamp(1, MAX_HOLDERS_LIMIT))
        .map_err(|_| ServerError::invalid_input("invalid limit"))
}

/// Build the window for `page`, rejecting pages the indexer cannot address
pub fn page_window(page: u64, limit: u64) -> ServerResult<PageWindow> {
    let window = PageWindow { page, limit };
    if window.offset() > MAX_OFFSET {
        return Err(ServerError::invalid_input("invalid page"));
    }
    Ok(window)
}

/// Split a filter list: quotes stripped, comma separated, blanks dropped
pub fn parse_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.replace(['"', '\''], "")
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the `chains` and `protocols` history filters
pub fn parse_history_filters(params: &HistoryParams) -> ServerResult<HistoryFilters> {
    let chains = parse_list(params.chains.as_deref())
        .iter()
        .map(|chain| parse_chain(chain))
        .collect::<ServerResult<Vec<_>>>()?;

    let protocols = parse_list(params.protocols.as_deref());
    if protocols.iter().any(|p| !PROTOCOL_PATTERN.is_match(p)) {
        return Err(ServerError::invalid_input("invalid protocol"));
    }

    Ok(HistoryFilters { chains, protocols })
}
