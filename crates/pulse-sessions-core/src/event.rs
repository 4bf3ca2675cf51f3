// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session lifecycle events as posted by the dashboard panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionsError};

/// Largest accepted unix timestamp (9999-12-31T23:59:59Z).
pub const MAX_UNIX_SECONDS: i64 = 253_402_300_799;

/// Convert unix seconds into an instant, rejecting negative or absurd values.
pub fn unix_instant(field: &'static str, secs: i64) -> Result<DateTime<Utc>> {
	if !(0..=MAX_UNIX_SECONDS).contains(&secs) {
		return Err(SessionsError::InvalidTimestamp { field, value: secs });
	}
	DateTime::from_timestamp(secs, 0).ok_or(SessionsError::InvalidTimestamp { field, value: secs })
}

/// Kind of lifecycle event.
///
/// Anything the panel sends that is not one of the known kinds is kept
/// verbatim in [`EventType::Other`] so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
	Start,
	Heartbeat,
	End,
	Other(String),
}

impl Default for EventType {
	fn default() -> Self {
		EventType::Other(String::new())
	}
}

impl From<String> for EventType {
	fn from(s: String) -> Self {
		match s.as_str() {
			"start" => EventType::Start,
			"heartbeat" => EventType::Heartbeat,
			"end" => EventType::End,
			_ => EventType::Other(s),
		}
	}
}

impl From<&str> for EventType {
	fn from(s: &str) -> Self {
		EventType::from(s.to_string())
	}
}

impl From<EventType> for String {
	fn from(t: EventType) -> Self {
		t.to_string()
	}
}

impl std::fmt::Display for EventType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			EventType::Start => write!(f, "start"),
			EventType::Heartbeat => write!(f, "heartbeat"),
			EventType::End => write!(f, "end"),
			EventType::Other(s) => write!(f, "{s}"),
		}
	}
}

/// Panel options that accompany every event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelOptions {
	pub post_start: bool,
	pub post_end: bool,
	pub post_heartbeat: bool,
	/// Expected seconds between heartbeats
	pub heartbeat_interval: i64,
	pub heartbeat_always: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildInfo {
	pub version: String,
	pub commit: String,
	pub env: String,
	pub edition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LicenseInfo {
	pub has_license: bool,
	pub expiry: i64,
	pub state_info: String,
}

/// The Grafana instance hosting the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostInfo {
	pub hostname: String,
	pub port: String,
	pub protocol: String,
	pub build_info: BuildInfo,
	pub license_info: LicenseInfo,
}

impl HostInfo {
	/// `hostname:port`, used as the host label.
	pub fn address(&self) -> String {
		format!("{}:{}", self.hostname, self.port)
	}

	/// `protocol//hostname:port`, as the browser reports it.
	pub fn url(&self) -> String {
		format!("{}//{}:{}", self.protocol, self.hostname, self.port)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardInfo {
	pub name: String,
	pub uid: String,
}

/// The signed-in Grafana user viewing the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInfo {
	pub is_signed_in: bool,
	pub id: i64,
	pub login: String,
	pub email: String,
	pub name: String,
	pub light_theme: bool,
	pub org_count: i64,
	pub org_id: i64,
	pub org_name: String,
	pub org_role: String,
	pub is_grafana_admin: bool,
	pub timezone: String,
	pub locale: String,
	pub has_edit_permission_in_folders: bool,
}

impl UserInfo {
	pub fn theme(&self) -> &'static str {
		if self.light_theme {
			"light"
		} else {
			"dark"
		}
	}

	/// Admin outranks editor; everyone else is a plain user.
	pub fn role(&self) -> &'static str {
		if self.is_grafana_admin {
			"admin"
		} else if self.has_edit_permission_in_folders {
			"editor"
		} else {
			"user"
		}
	}
}

/// A dashboard template variable and its current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateVariable {
	pub name: String,
	pub label: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub multi: bool,
	pub values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTimeRange {
	pub from: String,
	pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRange {
	pub from: i64,
	pub to: i64,
	pub raw: RawTimeRange,
}

/// One lifecycle event for a dashboard session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionEvent {
	#[serde(rename = "uuid")]
	pub id: String,
	#[serde(rename = "type")]
	pub event_type: EventType,
	pub has_focus: bool,
	pub options: PanelOptions,
	pub host: HostInfo,
	pub dashboard: DashboardInfo,
	pub user: UserInfo,
	pub variables: Vec<TemplateVariable>,
	pub time_range: TimeRange,
	/// Timezone declared by the dashboard
	pub time_zone: String,
	/// Session clock origin, unix seconds
	#[serde(rename = "timeOrigin")]
	pub origin_timestamp: i64,
	/// When this event was emitted, unix seconds
	#[serde(rename = "time")]
	pub event_timestamp: i64,
}

impl SessionEvent {
	#[must_use]
	pub fn new(id: impl Into<String>, event_type: impl Into<EventType>) -> Self {
		Self {
			id: id.into(),
			event_type: event_type.into(),
			..Default::default()
		}
	}

	/// Check both timestamps against the accepted range.
	pub fn validate(&self) -> Result<()> {
		unix_instant("timeOrigin", self.origin_timestamp)?;
		unix_instant("time", self.event_timestamp)?;
		Ok(())
	}

	/// The heartbeat interval hint, if the panel sent a positive one.
	pub fn heartbeat_interval_hint(&self) -> Option<u64> {
		u64::try_from(self.options.heartbeat_interval)
			.ok()
			.filter(|secs| *secs > 0)
	}
}
