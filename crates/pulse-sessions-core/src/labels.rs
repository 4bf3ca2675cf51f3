// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Label tuples used to partition session metrics.

use crate::snapshot::SessionSnapshot;

/// Label names, in the order [`SessionLabels::values`] yields them.
pub const LABEL_NAMES: [&str; 11] = [
	"grafana_host",
	"grafana_env",
	"dashboard_name",
	"dashboard_uid",
	"dashboard_timezone",
	"user_login",
	"user_name",
	"user_theme",
	"user_timezone",
	"user_locale",
	"user_role",
];

/// Descriptive dimensions of a session.
///
/// Two sessions with equal labels are indistinguishable in the exported
/// metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionLabels {
	pub grafana_host: String,
	pub grafana_env: String,
	pub dashboard_name: String,
	pub dashboard_uid: String,
	pub dashboard_timezone: String,
	pub user_login: String,
	pub user_name: String,
	pub user_theme: &'static str,
	pub user_timezone: String,
	pub user_locale: String,
	pub user_role: &'static str,
}

impl SessionLabels {
	pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
		let details = snapshot.details();
		Self {
			grafana_host: details.host.address(),
			grafana_env: details.host.build_info.env.clone(),
			dashboard_name: details.dashboard.name.clone(),
			dashboard_uid: details.dashboard.uid.clone(),
			dashboard_timezone: details.time_zone.clone(),
			user_login: details.user.login.clone(),
			user_name: details.user.name.clone(),
			user_theme: details.user.theme(),
			user_timezone: details.user.timezone.clone(),
			user_locale: details.user.locale.clone(),
			user_role: details.user.role(),
		}
	}

	pub fn values(&self) -> [&str; 11] {
		[
			&self.grafana_host,
			&self.grafana_env,
			&self.dashboard_name,
			&self.dashboard_uid,
			&self.dashboard_timezone,
			&self.user_login,
			&self.user_name,
			self.user_theme,
			&self.user_timezone,
			&self.user_locale,
			self.user_role,
		]
	}
}
