// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session event intake.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use pulse_sessions_core::SessionEvent;
use tracing::{debug, instrument};

use crate::api::AppState;
use crate::error::ServerError;

/// POST /write - queue one session event.
///
/// The body is decoded regardless of its declared content type.
#[instrument(skip(state, body), fields(len = body.len()))]
pub async fn write_event(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<StatusCode, ServerError> {
	let event: SessionEvent = serde_json::from_slice(&body).map_err(|e| {
		debug!(error = %e, "rejecting malformed session event");
		ServerError::BadRequest(e.to_string())
	})?;

	event.validate().map_err(|e| {
		debug!(uuid = %event.id, error = %e, "rejecting session event");
		ServerError::BadRequest(e.to_string())
	})?;

	state.ingest.submit(event).await?;

	Ok(StatusCode::CREATED)
}
