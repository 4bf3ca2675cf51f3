// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the Pulse server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment, CLI)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`PULSE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use pulse_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, OverrideSource, Precedence, TomlSource,
	SYSTEM_CONFIG_PATH,
};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub sessions: SessionsConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`PULSE_SERVER_*`)
/// 2. Config file (`/etc/pulse/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_config_with_overrides(None, ServerConfigLayer::default())
}

/// Load configuration with an optional custom config file path and a layer
/// of command-line overrides that beats every other source.
pub fn load_config_with_overrides(
	config_path: Option<PathBuf>,
	overrides: ServerConfigLayer,
) -> Result<ServerConfig, ConfigError> {
	let file = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};

	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(file),
		Box::new(EnvSource),
		Box::new(OverrideSource::new(overrides)),
	];

	resolve(sources)
}

fn resolve(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let sessions = layer.sessions.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&sessions)?;

	info!(
		host = %http.host,
		port = http.port,
		max_sessions = sessions.max_sessions,
		session_timeout = %humantime::format_duration(sessions.session_timeout),
		session_log = logging.session_log,
		variable_log = logging.variable_log,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		sessions,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(sessions: &SessionsConfig) -> Result<(), ConfigError> {
	if sessions.ingest_queue_capacity == 0 {
		return Err(ConfigError::Validation(
			"sessions.ingest_queue_capacity must be at least 1".to_string(),
		));
	}
	if sessions.capacity_check_interval.is_zero() {
		return Err(ConfigError::Validation(
			"sessions.capacity_check_interval_ms must be greater than 0".to_string(),
		));
	}

	Ok(())
}
