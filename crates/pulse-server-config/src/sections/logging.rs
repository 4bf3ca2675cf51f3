// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration.

use serde::Deserialize;

/// Logging configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
	/// Default filter directive when `RUST_LOG` is unset
	pub level: String,
	/// Log every received session event
	pub session_log: bool,
	/// Include template variables in session logs
	pub variable_log: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			session_log: true,
			variable_log: true,
		}
	}
}

/// Logging configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub session_log: Option<bool>,
	#[serde(default)]
	pub variable_log: Option<bool>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.session_log.is_some() {
			self.session_log = other.session_log;
		}
		if other.variable_log.is_some() {
			self.variable_log = other.variable_log;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		let defaults = LoggingConfig::default();
		LoggingConfig {
			level: self.level.unwrap_or(defaults.level),
			session_log: self.session_log.unwrap_or(defaults.session_log),
			variable_log: self.variable_log.unwrap_or(defaults.variable_log),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_enable_session_logs() {
		let config = LoggingConfigLayer::default().finalize();
		assert_eq!(config.level, "info");
		assert!(config.session_log);
		assert!(config.variable_log);
	}

	#[test]
	fn test_deserialize_partial() {
		let layer: LoggingConfigLayer = toml::from_str("variable_log = false").unwrap();
		assert_eq!(layer.variable_log, Some(false));
		assert!(layer.level.is_none());

		let config = layer.finalize();
		assert!(config.session_log);
		assert!(!config.variable_log);
	}
}
