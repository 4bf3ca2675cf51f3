// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP router and shared application state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use pulse_server_config::ServerConfig;
use pulse_sessions_core::GapCap;
use tokio::task::JoinHandle;

use crate::ingest::{spawn_ingest_worker, IngestHandle};
use crate::metrics::Metrics;
use crate::routes;
use crate::session_log::SessionLogOptions;
use crate::store::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub store: SessionStore,
	pub ingest: IngestHandle,
	pub metrics: Arc<Metrics>,
}

/// Build the store, metrics registry and ingest worker for `config`.
///
/// Must be called from within a tokio runtime. The returned handle is the
/// ingest worker task.
pub fn create_app_state(
	config: &ServerConfig,
) -> Result<(AppState, JoinHandle<()>), prometheus::Error> {
	let store = SessionStore::new();
	let gap_cap = GapCap::from(config.sessions.session_timeout);
	let metrics = Arc::new(Metrics::new(store.clone(), gap_cap)?);

	let (ingest, worker) = spawn_ingest_worker(
		store.clone(),
		config.sessions.ingest_queue_capacity,
		SessionLogOptions {
			enabled: config.logging.session_log,
			include_variables: config.logging.variable_log,
		},
	);

	Ok((
		AppState {
			store,
			ingest,
			metrics,
		},
		worker,
	))
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/write", post(routes::write::write_event))
		.route("/metrics", get(routes::metrics::prometheus_metrics))
		.route("/health", get(routes::health::health_check))
		.with_state(state)
}
