// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core session types for Pulse dashboard analytics.
//!
//! This crate is free of I/O. It provides:
//! - [`SessionEvent`]: the lifecycle event posted by the dashboard panel
//! - [`SessionSnapshot`]: the aggregated state of one session
//! - [`merge_event`]: folding an event into a snapshot
//! - [`session_duration`]: capped, order-independent duration estimation
//! - [`SessionLabels`]: the label tuple used to partition metrics

pub mod duration;
pub mod error;
pub mod event;
pub mod labels;
pub mod merge;
pub mod snapshot;

pub use duration::{session_duration, GapCap};
pub use error::{Result, SessionsError};
pub use event::{
	unix_instant, BuildInfo, DashboardInfo, EventType, HostInfo, LicenseInfo, PanelOptions,
	RawTimeRange, SessionEvent, TemplateVariable, TimeRange, UserInfo, MAX_UNIX_SECONDS,
};
pub use labels::{SessionLabels, LABEL_NAMES};
pub use merge::{merge_event, MergeOutcome, MergeWarning};
pub use snapshot::{SessionDetails, SessionSnapshot};
