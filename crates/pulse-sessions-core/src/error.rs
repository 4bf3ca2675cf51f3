// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the sessions core.

use thiserror::Error;

/// Errors that can occur while merging or measuring sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionsError {
	/// A timestamp outside the accepted unix-seconds range
	#[error("invalid {field} timestamp: {value}")]
	InvalidTimestamp { field: &'static str, value: i64 },

	/// Duration requested for a session that was never opened
	#[error("start time is not set for session {0}")]
	MissingStartTime(String),
}

/// Result type for sessions core operations.
pub type Result<T> = std::result::Result<T, SessionsError>;
