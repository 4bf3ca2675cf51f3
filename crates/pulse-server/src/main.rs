// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulse server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pulse_server::{create_app_state, create_router, CapacityMonitor};
use pulse_server_config::{
	HttpConfigLayer, LoggingConfigLayer, ServerConfigLayer, SessionsConfigLayer,
};
use tokio::sync::broadcast;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pulse server - dashboard session analytics receiver.
#[derive(Parser, Debug)]
#[command(
	name = "pulse-server",
	about = "Receives dashboard session events and exports Prometheus metrics",
	version
)]
struct Args {
	#[command(subcommand)]
	command: Option<Command>,

	/// Path to the TOML config file
	#[arg(long)]
	config: Option<PathBuf>,

	/// Address to listen on
	#[arg(long)]
	host: Option<String>,

	#[arg(long)]
	port: Option<u16>,

	/// Sessions held before the store is cleared (0 = unbounded)
	#[arg(long)]
	max_sessions: Option<usize>,

	/// Longest time credited between two heartbeats, e.g. "90s" (0 = auto)
	#[arg(long)]
	session_timeout: Option<String>,

	#[arg(long)]
	disable_session_log: bool,

	#[arg(long)]
	disable_variable_log: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

impl Args {
	fn overrides(&self) -> ServerConfigLayer {
		ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: self.host.clone(),
				port: self.port,
			}),
			sessions: Some(SessionsConfigLayer {
				max_sessions: self.max_sessions,
				session_timeout: self.session_timeout.clone(),
				..Default::default()
			}),
			logging: Some(LoggingConfigLayer {
				session_log: self.disable_session_log.then_some(false),
				variable_log: self.disable_variable_log.then_some(false),
				..Default::default()
			}),
		}
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("pulse-server version: {}", pulse_server::metrics::VERSION);
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = pulse_server_config::load_config_with_overrides(
		args.config.clone(),
		args.overrides(),
	)?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		max_sessions = config.sessions.max_sessions,
		session_timeout = %humantime::format_duration(config.sessions.session_timeout),
		"starting pulse-server"
	);

	let (state, _ingest_worker) = create_app_state(&config)?;

	let (shutdown_tx, _) = broadcast::channel(1);
	let monitor = CapacityMonitor::new(
		state.store.clone(),
		config.sessions.max_sessions,
		config.sessions.capacity_check_interval,
	)
	.spawn(shutdown_tx.subscribe());

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	let _ = shutdown_tx.send(());
	if let Some(monitor) = monitor {
		let _ = monitor.await;
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
