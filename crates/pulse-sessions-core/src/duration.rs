// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session duration estimation.
//!
//! Heartbeats are lossy: a browser tab can be suspended, the network can drop
//! requests, and events arrive out of order. The duration of a session is
//! therefore the sum of the gaps between its known instants (start, every
//! heartbeat, end) taken in chronological order, with each gap clamped to a
//! cap so one long silence cannot dominate the total.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{Result, SessionsError};
use crate::snapshot::SessionSnapshot;

/// Upper bound on the time attributed to a single gap between instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapCap {
	/// Derive the cap from each session's heartbeat interval hint plus 25%.
	#[default]
	Auto,
	/// Use the same cap for every session.
	Fixed(Duration),
}

impl From<Duration> for GapCap {
	/// A zero duration means no explicit cap was configured.
	fn from(d: Duration) -> Self {
		if d.is_zero() {
			GapCap::Auto
		} else {
			GapCap::Fixed(d)
		}
	}
}

impl GapCap {
	/// The cap to apply between heartbeats for a session with `hint` seconds
	/// between heartbeats. Without a hint, `Auto` caps every gap at zero.
	pub fn effective(self, hint: Option<u64>) -> Duration {
		match self {
			GapCap::Fixed(max) => max,
			GapCap::Auto => {
				let interval = Duration::from_secs(hint.unwrap_or(0));
				interval + interval / 4
			}
		}
	}
}

/// Estimate how long a session has lasted.
///
/// Returns [`SessionsError::MissingStartTime`] for an unopened session; its
/// duration should be treated as zero. Never mutates the snapshot.
pub fn session_duration(snapshot: &SessionSnapshot, cap: GapCap) -> Result<Duration> {
	let start = snapshot
		.start_time()
		.ok_or_else(|| SessionsError::MissingStartTime(snapshot.id().to_string()))?;

	if snapshot.has_heartbeats() {
		let max = cap.effective(snapshot.heartbeat_interval());

		let mut instants = Vec::with_capacity(snapshot.heartbeat_times().len() + 2);
		instants.extend_from_slice(snapshot.heartbeat_times());
		instants.push(start);
		if let Some(end) = snapshot.end_time() {
			instants.push(end);
		}
		instants.sort();

		return Ok(instants
			.windows(2)
			.map(|pair| elapsed(pair[0], pair[1]).min(max))
			.sum());
	}

	let Some(end) = snapshot.end_time() else {
		return Ok(Duration::ZERO);
	};

	let total = elapsed(start, end);
	Ok(match cap {
		GapCap::Fixed(max) if total > max => max,
		_ => total,
	})
}

/// Time from `from` to `to`, or zero if `to` is earlier.
fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
	(to - from).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::SessionEvent;
	use crate::merge::merge_event;
	use proptest::prelude::*;

	const T0: i64 = 1_600_000_000;

	fn event(kind: &str, origin: i64, time: i64, interval: i64) -> SessionEvent {
		let mut event = SessionEvent::new("s1", kind);
		event.origin_timestamp = origin;
		event.event_timestamp = time;
		event.options.heartbeat_interval = interval;
		event
	}

	fn build(events: &[SessionEvent]) -> SessionSnapshot {
		let mut current: Option<SessionSnapshot> = None;
		for event in events {
			current = Some(merge_event(current.as_ref(), event).unwrap().snapshot);
		}
		current.unwrap()
	}

	#[test]
	fn test_start_end_without_heartbeats() {
		let snapshot = build(&[
			event("start", T0, T0 + 1, 0),
			event("end", 0, T0 + 7200, 0),
		]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::from_secs(7200)
		);
	}

	#[test]
	fn test_start_end_capped_by_fixed_cap() {
		let snapshot = build(&[event("start", T0, T0, 0), event("end", 0, T0 + 7200, 0)]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Fixed(Duration::from_secs(3600))).unwrap(),
			Duration::from_secs(3600)
		);
		assert_eq!(
			session_duration(&snapshot, GapCap::Fixed(Duration::from_secs(9000))).unwrap(),
			Duration::from_secs(7200)
		);
	}

	#[test]
	fn test_end_before_start_is_zero() {
		let snapshot = build(&[event("start", T0, T0, 0), event("end", 0, T0 - 60, 0)]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::ZERO
		);
	}

	#[test]
	fn test_capped_heartbeat_gaps() {
		// The first heartbeat opens the session at T0+1.
		let snapshot = build(&[
			event("heartbeat", 0, T0 + 1, 3600),
			event("heartbeat", 0, T0, 3600),
			event("heartbeat", 0, T0 + 7200, 3600),
		]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::from_secs(4501)
		);
	}

	#[test]
	fn test_heartbeats_with_end_included() {
		let snapshot = build(&[
			event("start", T0, T0, 60),
			event("heartbeat", 0, T0 + 60, 60),
			event("heartbeat", 0, T0 + 120, 60),
			event("end", 0, T0 + 150, 60),
		]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::from_secs(150)
		);
	}

	#[test]
	fn test_fixed_cap_overrides_hint() {
		let snapshot = build(&[
			event("start", T0, T0, 3600),
			event("heartbeat", 0, T0 + 7200, 3600),
		]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Fixed(Duration::from_secs(600))).unwrap(),
			Duration::from_secs(600)
		);
	}

	#[test]
	fn test_auto_cap_without_hint_is_zero() {
		let snapshot = build(&[event("start", T0, T0, 0), event("heartbeat", 0, T0 + 60, 0)]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::ZERO
		);
	}

	#[test]
	fn test_no_heartbeat_no_end_is_zero() {
		let snapshot = build(&[event("start", T0, T0, 60)]);
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::ZERO
		);
	}

	#[test]
	fn test_unopened_session_reports_missing_start() {
		let snapshot = SessionSnapshot::new("ghost");
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto),
			Err(SessionsError::MissingStartTime("ghost".to_string()))
		);
	}

	#[test]
	fn test_repeated_queries_have_no_side_effects() {
		let snapshot = build(&[
			event("heartbeat", 0, T0 + 1, 3600),
			event("heartbeat", 0, T0, 3600),
			event("heartbeat", 0, T0 + 7200, 3600),
		]);
		let heartbeats_before = snapshot.heartbeat_times().to_vec();

		let _ = session_duration(&snapshot, GapCap::Auto);
		let _ = session_duration(&snapshot, GapCap::Fixed(Duration::from_secs(3600)));
		let _ = session_duration(&snapshot, GapCap::Auto);

		assert_eq!(snapshot.heartbeat_times(), heartbeats_before.as_slice());
		assert_eq!(
			session_duration(&snapshot, GapCap::Auto).unwrap(),
			Duration::from_secs(3600 + 15 * 60 + 1)
		);
	}

	#[test]
	fn test_gap_cap_from_duration() {
		assert_eq!(GapCap::from(Duration::ZERO), GapCap::Auto);
		assert_eq!(
			GapCap::from(Duration::from_secs(5)),
			GapCap::Fixed(Duration::from_secs(5))
		);
		assert_eq!(
			GapCap::Auto.effective(Some(3600)),
			Duration::from_secs(4500)
		);
		assert_eq!(GapCap::Auto.effective(None), Duration::ZERO);
	}

	fn offsets_and_permutation() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
		prop::collection::vec(0i64..20_000, 1..24)
			.prop_flat_map(|offsets| (Just(offsets.clone()), Just(offsets).prop_shuffle()))
	}

	proptest! {
		#[test]
		fn duration_is_independent_of_heartbeat_order(
			(offsets, shuffled) in offsets_and_permutation(),
			interval in 1i64..600,
			fixed_cap in 0u64..1200,
		) {
			let start = event("start", T0, T0, interval);
			let as_events = |offsets: &[i64]| {
				let mut events = vec![start.clone()];
				events.extend(offsets.iter().map(|o| event("heartbeat", 0, T0 + o, interval)));
				events
			};

			let ordered = build(&as_events(&offsets));
			let permuted = build(&as_events(&shuffled));

			for cap in [GapCap::Auto, GapCap::from(Duration::from_secs(fixed_cap))] {
				prop_assert_eq!(
					session_duration(&ordered, cap).unwrap(),
					session_duration(&permuted, cap).unwrap()
				);
			}
		}

		#[test]
		fn duration_never_exceeds_cap_per_gap(
			offsets in prop::collection::vec(0i64..50_000, 1..16),
			cap_secs in 1u64..5_000,
		) {
			let mut events = vec![event("start", T0, T0, 0)];
			events.extend(offsets.iter().map(|o| event("heartbeat", 0, T0 + o, 0)));
			let snapshot = build(&events);

			let cap = Duration::from_secs(cap_secs);
			let total = session_duration(&snapshot, GapCap::Fixed(cap)).unwrap();
			prop_assert!(total <= cap * offsets.len() as u32);
		}
	}
}
