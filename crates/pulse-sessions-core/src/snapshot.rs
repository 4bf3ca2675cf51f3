// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Aggregated per-session state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duration::{session_duration, GapCap};
use crate::error::Result;
use crate::event::{DashboardInfo, EventType, HostInfo, SessionEvent, TemplateVariable, TimeRange, UserInfo};
use crate::labels::SessionLabels;

/// Informational fields carried from the most recent event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionDetails {
	/// Type of the last event merged into the session
	pub last_event_type: EventType,
	pub has_focus: bool,
	pub host: HostInfo,
	pub dashboard: DashboardInfo,
	pub user: UserInfo,
	pub variables: Vec<TemplateVariable>,
	pub time_range: TimeRange,
	pub time_zone: String,
}

impl From<&SessionEvent> for SessionDetails {
	fn from(event: &SessionEvent) -> Self {
		Self {
			last_event_type: event.event_type.clone(),
			has_focus: event.has_focus,
			host: event.host.clone(),
			dashboard: event.dashboard.clone(),
			user: event.user.clone(),
			variables: event.variables.clone(),
			time_range: event.time_range.clone(),
			time_zone: event.time_zone.clone(),
		}
	}
}

/// Current aggregated state of one session.
///
/// Timing fields only change through [`crate::merge_event`]: the start and
/// end instants are written at most once and heartbeats are append-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
	id: String,
	start_time: Option<DateTime<Utc>>,
	heartbeat_times: Vec<DateTime<Utc>>,
	end_time: Option<DateTime<Utc>>,
	heartbeat_interval: Option<u64>,
	details: SessionDetails,
}

impl SessionSnapshot {
	/// An unopened snapshot with no timing information.
	#[must_use]
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			start_time: None,
			heartbeat_times: Vec::new(),
			end_time: None,
			heartbeat_interval: None,
			details: SessionDetails::default(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn start_time(&self) -> Option<DateTime<Utc>> {
		self.start_time
	}

	/// Heartbeat instants in merge order, which is not chronological.
	pub fn heartbeat_times(&self) -> &[DateTime<Utc>] {
		&self.heartbeat_times
	}

	pub fn end_time(&self) -> Option<DateTime<Utc>> {
		self.end_time
	}

	/// Expected heartbeat cadence in seconds, as last reported by the panel.
	pub fn heartbeat_interval(&self) -> Option<u64> {
		self.heartbeat_interval
	}

	pub fn details(&self) -> &SessionDetails {
		&self.details
	}

	/// A session is opened once it has a start instant.
	pub fn is_opened(&self) -> bool {
		self.start_time.is_some()
	}

	pub fn has_heartbeats(&self) -> bool {
		!self.heartbeat_times.is_empty()
	}

	pub fn has_ended(&self) -> bool {
		self.end_time.is_some()
	}

	/// Whether the session has anything beyond its opening instant to measure.
	pub fn has_activity(&self) -> bool {
		self.has_heartbeats() || self.has_ended()
	}

	/// Estimated elapsed time, see [`session_duration`].
	pub fn duration(&self, cap: GapCap) -> Result<Duration> {
		session_duration(self, cap)
	}

	pub fn labels(&self) -> SessionLabels {
		SessionLabels::from_snapshot(self)
	}

	pub(crate) fn overlay(&mut self, event: &SessionEvent) {
		self.details = SessionDetails::from(event);
		self.heartbeat_interval = event.heartbeat_interval_hint();
	}

	/// Returns false when a start was already recorded.
	pub(crate) fn open(&mut self, at: DateTime<Utc>) -> bool {
		if self.start_time.is_some() {
			return false;
		}
		self.start_time = Some(at);
		true
	}

	pub(crate) fn push_heartbeat(&mut self, at: DateTime<Utc>) {
		self.heartbeat_times.push(at);
	}

	/// Returns false when an end was already recorded.
	pub(crate) fn close(&mut self, at: DateTime<Utc>) -> bool {
		if self.end_time.is_some() {
			return false;
		}
		self.end_time = Some(at);
		true
	}
}
