// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Folding lifecycle events into session snapshots.
//!
//! Merging is pure: it takes the current snapshot (if any) and returns the
//! next one. Committing the result is the caller's job, and callers must not
//! run two merges for the same session concurrently.
//!
//! Start and end instants are first-write-wins. A session first seen through
//! a heartbeat or end event is opened at that event's timestamp, and a later
//! explicit `start` does not move it.

use crate::error::Result;
use crate::event::{unix_instant, EventType, SessionEvent};
use crate::snapshot::SessionSnapshot;

/// Non-fatal conditions noticed while merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
	/// The event type was not recognised and was merged as a heartbeat.
	UnknownEventType(String),
}

impl std::fmt::Display for MergeWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MergeWarning::UnknownEventType(kind) => {
				write!(f, "invalid session type {kind:?}, defaulted to heartbeat")
			}
		}
	}
}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
	pub snapshot: SessionSnapshot,
	pub warning: Option<MergeWarning>,
}

/// Fold `event` into `current`, producing the snapshot to store.
///
/// Fails only when a timestamp the event contributes is out of range, in
/// which case nothing should be committed.
pub fn merge_event(current: Option<&SessionSnapshot>, event: &SessionEvent) -> Result<MergeOutcome> {
	let first_contact = current.is_none();
	let mut snapshot = match current {
		Some(existing) => existing.clone(),
		None => SessionSnapshot::new(event.id.clone()),
	};

	let warning = match &event.event_type {
		EventType::Start => {
			let origin = unix_instant("timeOrigin", event.origin_timestamp)?;
			snapshot.open(origin);
			None
		}
		EventType::Heartbeat => {
			record_heartbeat(&mut snapshot, event, first_contact)?;
			None
		}
		EventType::End => {
			let at = unix_instant("time", event.event_timestamp)?;
			snapshot.close(at);
			if first_contact {
				snapshot.open(at);
			}
			None
		}
		EventType::Other(kind) => {
			record_heartbeat(&mut snapshot, event, first_contact)?;
			Some(MergeWarning::UnknownEventType(kind.clone()))
		}
	};

	snapshot.overlay(event);

	Ok(MergeOutcome { snapshot, warning })
}

fn record_heartbeat(
	snapshot: &mut SessionSnapshot,
	event: &SessionEvent,
	first_contact: bool,
) -> Result<()> {
	let at = unix_instant("time", event.event_timestamp)?;
	snapshot.push_heartbeat(at);
	if first_contact {
		snapshot.open(at);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::SessionsError;
	use chrono::{DateTime, Utc};

	fn at(secs: i64) -> DateTime<Utc> {
		DateTime::from_timestamp(secs, 0).unwrap()
	}

	fn event(kind: &str, origin: i64, time: i64) -> SessionEvent {
		let mut event = SessionEvent::new("s1", kind);
		event.origin_timestamp = origin;
		event.event_timestamp = time;
		event
	}

	fn apply(current: Option<SessionSnapshot>, event: &SessionEvent) -> SessionSnapshot {
		merge_event(current.as_ref(), event).unwrap().snapshot
	}

	#[test]
	fn test_start_uses_origin_timestamp() {
		let snapshot = apply(None, &event("start", 1_600_000_000, 1_600_000_001));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_000)));
		assert!(snapshot.heartbeat_times().is_empty());
		assert_eq!(snapshot.end_time(), None);
	}

	#[test]
	fn test_heartbeat_on_first_contact_opens_session() {
		let snapshot = apply(None, &event("heartbeat", 0, 1_600_000_060));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_060)));
		assert_eq!(snapshot.heartbeat_times(), &[at(1_600_000_060)]);
	}

	#[test]
	fn test_heartbeat_preserves_existing_start() {
		let snapshot = apply(None, &event("start", 1_600_000_000, 1_600_000_000));
		let snapshot = apply(Some(snapshot), &event("heartbeat", 0, 1_600_000_060));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_000)));
		assert_eq!(snapshot.heartbeat_times(), &[at(1_600_000_060)]);
	}

	#[test]
	fn test_heartbeat_does_not_open_existing_unopened_snapshot() {
		let unopened = SessionSnapshot::new("s1");
		let snapshot = apply(Some(unopened), &event("heartbeat", 0, 1_600_000_060));
		assert!(!snapshot.is_opened());
		assert_eq!(snapshot.heartbeat_times().len(), 1);
	}

	#[test]
	fn test_end_only_session_opens_at_end() {
		let snapshot = apply(None, &event("end", 0, 1_600_007_200));
		assert_eq!(snapshot.start_time(), Some(at(1_600_007_200)));
		assert_eq!(snapshot.end_time(), Some(at(1_600_007_200)));
	}

	#[test]
	fn test_end_preserves_heartbeats_and_start() {
		let snapshot = apply(None, &event("start", 1_600_000_000, 1_600_000_000));
		let snapshot = apply(Some(snapshot), &event("heartbeat", 0, 1_600_000_060));
		let snapshot = apply(Some(snapshot), &event("end", 0, 1_600_000_120));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_000)));
		assert_eq!(snapshot.heartbeat_times(), &[at(1_600_000_060)]);
		assert_eq!(snapshot.end_time(), Some(at(1_600_000_120)));
	}

	#[test]
	fn test_second_start_is_ignored() {
		let snapshot = apply(None, &event("start", 1_600_000_000, 1_600_000_000));
		let snapshot = apply(Some(snapshot), &event("start", 1_500_000_000, 1_500_000_000));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_000)));
	}

	#[test]
	fn test_start_after_implicit_open_is_ignored() {
		let snapshot = apply(None, &event("heartbeat", 0, 1_600_000_060));
		let snapshot = apply(Some(snapshot), &event("start", 1_600_000_000, 1_600_000_000));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_060)));
	}

	#[test]
	fn test_start_after_end_only_is_ignored() {
		let snapshot = apply(None, &event("end", 0, 1_600_007_200));
		let snapshot = apply(Some(snapshot), &event("start", 1_600_000_000, 1_600_000_000));
		assert_eq!(snapshot.start_time(), Some(at(1_600_007_200)));
		assert_eq!(snapshot.end_time(), Some(at(1_600_007_200)));
	}

	#[test]
	fn test_start_opens_unopened_snapshot() {
		let unopened = SessionSnapshot::new("s1");
		let snapshot = apply(Some(unopened), &event("start", 1_600_000_000, 0));
		assert_eq!(snapshot.start_time(), Some(at(1_600_000_000)));
	}

	#[test]
	fn test_second_end_is_ignored_but_details_update() {
		let mut first = event("end", 0, 1_600_007_200);
		first.dashboard.name = "before".to_string();
		let snapshot = apply(None, &first);

		let mut second = event("end", 0, 1_600_009_000);
		second.dashboard.name = "after".to_string();
		let snapshot = apply(Some(snapshot), &second);

		assert_eq!(snapshot.end_time(), Some(at(1_600_007_200)));
		assert_eq!(snapshot.details().dashboard.name, "after");
	}

	#[test]
	fn test_events_after_end_still_merge() {
		let snapshot = apply(None, &event("end", 0, 1_600_000_100));
		let snapshot = apply(Some(snapshot), &event("heartbeat", 0, 1_600_000_200));
		assert_eq!(snapshot.heartbeat_times(), &[at(1_600_000_200)]);
		assert_eq!(snapshot.details().last_event_type, EventType::Heartbeat);
	}

	#[test]
	fn test_unknown_type_merges_as_heartbeat_with_warning() {
		let mut bogus = event("bogus", 1_600_000_000, 1_600_000_060);
		bogus.user.login = "jdoe".to_string();
		let mut heartbeat = bogus.clone();
		heartbeat.event_type = EventType::Heartbeat;

		let from_bogus = merge_event(None, &bogus).unwrap();
		let from_heartbeat = merge_event(None, &heartbeat).unwrap();

		assert_eq!(
			from_bogus.warning,
			Some(MergeWarning::UnknownEventType("bogus".to_string()))
		);
		assert_eq!(from_heartbeat.warning, None);
		assert_eq!(
			from_bogus.snapshot.start_time(),
			from_heartbeat.snapshot.start_time()
		);
		assert_eq!(
			from_bogus.snapshot.heartbeat_times(),
			from_heartbeat.snapshot.heartbeat_times()
		);
		assert_eq!(from_bogus.snapshot.end_time(), from_heartbeat.snapshot.end_time());
		assert_eq!(
			from_bogus.snapshot.details().user,
			from_heartbeat.snapshot.details().user
		);
	}

	#[test]
	fn test_invalid_timestamp_rejected() {
		let result = merge_event(None, &event("heartbeat", 0, -1));
		assert_eq!(
			result,
			Err(SessionsError::InvalidTimestamp {
				field: "time",
				value: -1
			})
		);
	}

	#[test]
	fn test_merge_does_not_touch_input() {
		let original = apply(None, &event("start", 1_600_000_000, 0));
		let before = original.clone();
		let _ = merge_event(Some(&original), &event("heartbeat", 0, 1_600_000_060)).unwrap();
		assert_eq!(original, before);
	}
}
