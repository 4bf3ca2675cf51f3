// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::AppState;
use crate::error::ServerError;

/// GET /metrics - Prometheus metrics export endpoint.
#[tracing::instrument(skip(state))]
pub async fn prometheus_metrics(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	match state.metrics.gather_metrics() {
		Ok(metrics) => {
			tracing::debug!("prometheus_metrics: gathering metrics");
			Ok((
				StatusCode::OK,
				[(
					axum::http::header::CONTENT_TYPE,
					"text/plain; version=0.0.4; charset=utf-8",
				)],
				metrics,
			))
		}
		Err(e) => {
			tracing::error!(error = %e, "prometheus_metrics: failed to gather metrics");
			Err(ServerError::Internal(format!(
				"Failed to gather metrics: {e}"
			)))
		}
	}
}
