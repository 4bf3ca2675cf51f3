// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulse server: receives dashboard session events and exports them as
//! Prometheus metrics.

pub mod api;
pub mod capacity;
pub mod error;
pub mod exporter;
pub mod ingest;
pub mod metrics;
pub mod routes;
pub mod session_log;
pub mod store;

pub use api::{create_app_state, create_router, AppState};
pub use capacity::CapacityMonitor;
pub use error::ServerError;
pub use exporter::SessionExporter;
pub use ingest::{apply_event, spawn_ingest_worker, IngestError, IngestHandle};
pub use metrics::Metrics;
pub use session_log::SessionLogOptions;
pub use store::SessionStore;
