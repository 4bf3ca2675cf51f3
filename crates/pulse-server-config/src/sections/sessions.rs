// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session aggregation configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_MAX_SESSIONS: usize = 1000;
const DEFAULT_CAPACITY_CHECK_INTERVAL_MS: u64 = 1000;
const DEFAULT_INGEST_QUEUE_CAPACITY: usize = 1024;

/// Session aggregation configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionsConfig {
	/// Sessions held before the store is cleared. 0 = unbounded.
	pub max_sessions: usize,
	/// Longest time credited between two heartbeats. Zero derives it per
	/// session from the heartbeat interval.
	pub session_timeout: Duration,
	pub capacity_check_interval: Duration,
	pub ingest_queue_capacity: usize,
}

impl Default for SessionsConfig {
	fn default() -> Self {
		Self {
			max_sessions: DEFAULT_MAX_SESSIONS,
			session_timeout: Duration::ZERO,
			capacity_check_interval: Duration::from_millis(DEFAULT_CAPACITY_CHECK_INTERVAL_MS),
			ingest_queue_capacity: DEFAULT_INGEST_QUEUE_CAPACITY,
		}
	}
}

/// Session aggregation configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SessionsConfigLayer {
	#[serde(default)]
	pub max_sessions: Option<usize>,
	/// Human-readable duration, e.g. `"90s"` or `"1h 30m"`
	#[serde(default)]
	pub session_timeout: Option<String>,
	#[serde(default)]
	pub capacity_check_interval_ms: Option<u64>,
	#[serde(default)]
	pub ingest_queue_capacity: Option<usize>,
}

impl SessionsConfigLayer {
	pub fn merge(&mut self, other: SessionsConfigLayer) {
		if other.max_sessions.is_some() {
			self.max_sessions = other.max_sessions;
		}
		if other.session_timeout.is_some() {
			self.session_timeout = other.session_timeout;
		}
		if other.capacity_check_interval_ms.is_some() {
			self.capacity_check_interval_ms = other.capacity_check_interval_ms;
		}
		if other.ingest_queue_capacity.is_some() {
			self.ingest_queue_capacity = other.ingest_queue_capacity;
		}
	}

	pub fn finalize(self) -> Result<SessionsConfig, ConfigError> {
		let session_timeout = match self.session_timeout.as_deref().map(str::trim) {
			None | Some("") | Some("0") => Duration::ZERO,
			Some(raw) => humantime::parse_duration(raw)
				.map_err(|e| ConfigError::invalid_value("sessions.session_timeout", e.to_string()))?,
		};

		Ok(SessionsConfig {
			max_sessions: self.max_sessions.unwrap_or(DEFAULT_MAX_SESSIONS),
			session_timeout,
			capacity_check_interval: Duration::from_millis(
				self
					.capacity_check_interval_ms
					.unwrap_or(DEFAULT_CAPACITY_CHECK_INTERVAL_MS),
			),
			ingest_queue_capacity: self
				.ingest_queue_capacity
				.unwrap_or(DEFAULT_INGEST_QUEUE_CAPACITY),
		})
	}
}
