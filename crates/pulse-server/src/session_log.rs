// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-event session logging.

use pulse_sessions_core::{SessionEvent, TemplateVariable};
use tracing::info;

/// Which parts of an applied event get logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLogOptions {
	pub enabled: bool,
	pub include_variables: bool,
}

impl Default for SessionLogOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			include_variables: true,
		}
	}
}

/// Emit one `info` line describing `event`.
pub fn log_event(event: &SessionEvent, options: SessionLogOptions) {
	if !options.enabled {
		return;
	}

	let host = &event.host;
	let build = &host.build_info;
	let license = &host.license_info;
	let user = &event.user;
	let range = &event.time_range;

	let variables = if options.include_variables {
		describe_variables(&event.variables)
	} else {
		String::new()
	};

	info!(
		uuid = %event.id,
		event_type = %event.event_type,
		host = %host.url(),
		build = %format!(
			"(commit={}, edition={}, env={}, version={})",
			build.commit, build.edition, build.env, build.version
		),
		license = %format!(
			"(state={}, expiry={}, license={})",
			license.state_info, license.expiry, license.has_license
		),
		dashboard_name = %event.dashboard.name,
		dashboard_uid = %event.dashboard.uid,
		dashboard_timezone = %event.time_zone,
		user_id = user.id,
		user_login = %user.login,
		user_email = %user.email,
		user_name = %user.name,
		user_theme = user.theme(),
		user_role = user.role(),
		user_locale = %user.locale,
		user_timezone = %user.timezone,
		time_from = range.from,
		time_to = range.to,
		time_from_raw = %range.raw.from,
		time_to_raw = %range.raw.to,
		timeorigin = event.origin_timestamp,
		time = event.event_timestamp,
		variables = %variables,
		"Received session data"
	);
}

/// `name=(label=…, type=…, multi=…, count=…)` for each variable, space separated.
pub fn describe_variables(variables: &[TemplateVariable]) -> String {
	variables
		.iter()
		.map(|v| {
			format!(
				"{}=(label={}, type={}, multi={}, count={})",
				v.name,
				v.label,
				v.kind,
				v.multi,
				v.values.len()
			)
		})
		.collect::<Vec<_>>()
		.join(" ")
}
