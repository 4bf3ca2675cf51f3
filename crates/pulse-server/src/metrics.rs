// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Prometheus registry for the server.

use prometheus::{Encoder, GaugeVec, Registry, TextEncoder};
use pulse_sessions_core::GapCap;

use crate::exporter::{SessionExporter, NAMESPACE, SUBSYSTEM};
use crate::store::SessionStore;

pub const SERVICE_NAME: &str = "pulse-server";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Owns the registry exposed on `/metrics`.
pub struct Metrics {
	registry: Registry,
}

impl Metrics {
	pub fn new(store: SessionStore, gap_cap: GapCap) -> prometheus::Result<Self> {
		let registry = Registry::new();

		registry.register(Box::new(SessionExporter::new(store, gap_cap)?))?;

		let build_info = GaugeVec::new(
			prometheus::Opts::new("build_info", "Build information for the running server.")
				.namespace(NAMESPACE)
				.subsystem(SUBSYSTEM),
			&["version", "name"],
		)?;
		build_info
			.get_metric_with_label_values(&[VERSION, SERVICE_NAME])?
			.set(1.0);
		registry.register(Box::new(build_info))?;

		Ok(Self { registry })
	}

	/// Scrape every collector and encode the result in the text format.
	pub fn gather_metrics(&self) -> prometheus::Result<String> {
		let encoder = TextEncoder::new();
		let metric_families = self.registry.gather();
		let mut buffer = Vec::new();
		encoder.encode(&metric_families, &mut buffer)?;
		String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
	}
}
