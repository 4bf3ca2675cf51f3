// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::metrics::VERSION;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	/// Sessions currently held in the store
	pub sessions: usize,
	pub version: &'static str,
}

/// GET /health - liveness check.
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok",
		sessions: state.store.count(),
		version: VERSION,
	})
}
