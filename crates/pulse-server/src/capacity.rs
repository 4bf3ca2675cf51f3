// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic bound on the number of tracked sessions.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use crate::store::SessionStore;

/// Clears the whole store once it holds more than `max_sessions` sessions.
pub struct CapacityMonitor {
	store: SessionStore,
	max_sessions: usize,
	interval: Duration,
}

impl CapacityMonitor {
	pub fn new(store: SessionStore, max_sessions: usize, interval: Duration) -> Self {
		Self {
			store,
			max_sessions,
			interval,
		}
	}

	/// A limit of zero means the store is unbounded.
	pub fn is_enabled(&self) -> bool {
		self.max_sessions > 0
	}

	/// Run a single check. Returns the number of sessions removed.
	pub fn check_once(&self) -> usize {
		if !self.is_enabled() {
			return 0;
		}

		let count = self.store.count();
		if count <= self.max_sessions {
			return 0;
		}

		self.store.clear();
		info!(
			sessions = count,
			max_sessions = self.max_sessions,
			"session store over capacity, cleared"
		);
		count
	}

	/// Check on every tick until `shutdown` fires. Returns `None` when
	/// disabled.
	pub fn spawn(self, mut shutdown: broadcast::Receiver<()>) -> Option<JoinHandle<()>> {
		if !self.is_enabled() {
			info!("capacity monitor disabled");
			return None;
		}

		Some(tokio::spawn(async move {
			loop {
				tokio::select! {
					_ = tokio::time::sleep(self.interval) => {
						self.check_once();
					}
					_ = shutdown.recv() => {
						info!("shutting down capacity monitor");
						break;
					}
				}
			}
		}))
	}
}
