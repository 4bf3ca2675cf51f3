// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP-facing error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ingest::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("bad request: {0}")]
	BadRequest(String),
	#[error("service unavailable: {0}")]
	Unavailable(String),
	#[error("internal error: {0}")]
	Internal(String),
}

impl From<IngestError> for ServerError {
	fn from(e: IngestError) -> Self {
		ServerError::Unavailable(e.to_string())
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: &'static str,
	message: String,
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			// The panel only looks at the status code.
			ServerError::BadRequest(_) => StatusCode::BAD_REQUEST.into_response(),
			ServerError::Unavailable(message) => (
				StatusCode::SERVICE_UNAVAILABLE,
				Json(ErrorBody {
					error: "unavailable",
					message,
				}),
			)
				.into_response(),
			ServerError::Internal(message) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(ErrorBody {
					error: "internal",
					message,
				}),
			)
				.into_response(),
		}
	}
}
