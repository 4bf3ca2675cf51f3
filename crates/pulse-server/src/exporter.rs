// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Prometheus collector that publishes the current session store.
//!
//! Session metrics are rebuilt from scratch on every scrape: both vectors
//! are reset and refilled from the sessions currently held. They are
//! counter-typed but behave like snapshots, so a store clear makes them
//! drop.

use parking_lot::Mutex;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Counter, CounterVec, Gauge, Opts};
use pulse_sessions_core::{GapCap, LABEL_NAMES};
use tracing::error;

use crate::store::SessionStore;

pub const NAMESPACE: &str = "grafana";
pub const SUBSYSTEM: &str = "analytics";

fn opts(name: &str, help: &str) -> Opts {
	Opts::new(name, help)
		.namespace(NAMESPACE)
		.subsystem(SUBSYSTEM)
}

pub struct SessionExporter {
	store: SessionStore,
	gap_cap: GapCap,
	scrape_lock: Mutex<()>,

	sessions: CounterVec,
	duration: CounterVec,
	up: Gauge,
	scrapes: Counter,
	failures: Counter,
}

impl SessionExporter {
	pub fn new(store: SessionStore, gap_cap: GapCap) -> prometheus::Result<Self> {
		Ok(Self {
			store,
			gap_cap,
			scrape_lock: Mutex::new(()),
			sessions: CounterVec::new(opts("sessions_total", "Number of sessions."), &LABEL_NAMES)?,
			duration: CounterVec::new(
				opts("sessions_duration_seconds_total", "Duration of sessions."),
				&LABEL_NAMES,
			)?,
			up: Gauge::with_opts(opts("up", "Was the last scrape successful."))?,
			scrapes: Counter::with_opts(opts("exporter_scrapes_total", "Number of scrapes."))?,
			failures: Counter::with_opts(opts(
				"exporter_query_failures_total",
				"Number of errors.",
			))?,
		})
	}

	fn refresh(&self) -> prometheus::Result<()> {
		self.sessions.reset();
		self.duration.reset();

		for snapshot in self.store.items() {
			let labels = snapshot.labels();
			let values = labels.values();

			self.sessions.get_metric_with_label_values(&values)?.inc();

			match snapshot.duration(self.gap_cap) {
				Ok(elapsed) if snapshot.has_activity() => self
					.duration
					.get_metric_with_label_values(&values)?
					.inc_by(elapsed.as_secs_f64()),
				Ok(_) => {}
				Err(e) => error!(uuid = %snapshot.id(), error = %e, "skipping session duration"),
			}
		}

		Ok(())
	}
}

impl Collector for SessionExporter {
	fn desc(&self) -> Vec<&Desc> {
		self
			.sessions
			.desc()
			.into_iter()
			.chain(self.duration.desc())
			.chain(self.up.desc())
			.chain(self.scrapes.desc())
			.chain(self.failures.desc())
			.collect()
	}

	fn collect(&self) -> Vec<MetricFamily> {
		let _guard = self.scrape_lock.lock();

		match self.refresh() {
			Ok(()) => self.up.set(1.0),
			Err(e) => {
				error!(error = %e, "collection failed");
				self.up.set(0.0);
				self.failures.inc();
			}
		}
		self.scrapes.inc();

		let mut families = self.sessions.collect();
		families.extend(self.duration.collect());
		families.extend(self.up.collect());
		families.extend(self.scrapes.collect());
		families.extend(self.failures.collect());
		families
	}
}
