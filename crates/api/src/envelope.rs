// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Response envelope
//!
//! Every API answer is either `{"success": true, "data": ...}` with status 200
//! or `{"success": false, "error": "..."}` with an error status. Both forms
//! are JSON and carry a wildcard `Access-Control-Allow-Origin`.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Successful answer wrapping a payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiSuccess<T> {
    /// Always `true`
    success: bool,
    /// Endpoint payload
    data: T,
}

impl<T> ApiSuccess<T> {
    /// Wrap a payload
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// The wrapped payload
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        envelope(StatusCode::OK, &self)
    }
}

/// Failed answer carrying a message
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiFailure {
    #[serde(skip)]
    status: StatusCode,
    /// Always `false`
    success: bool,
    /// What went wrong
    error: String,
}

impl ApiFailure {
    /// Build a failure reported with `status`
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        envelope(self.status, &self)
    }
}

fn envelope<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(body),
    )
        .into_response()
}
