// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory session store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use pulse_sessions_core::SessionSnapshot;

/// A thread-safe map from session id to its latest snapshot.
///
/// Cloning the handle shares the underlying map. Reads may run concurrently
/// with each other; writes are exclusive.
#[derive(Clone, Default)]
pub struct SessionStore {
	inner: Arc<SessionStoreInner>,
}

#[derive(Default)]
struct SessionStoreInner {
	sessions: RwLock<HashMap<String, SessionSnapshot>>,
}

impl SessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// The snapshot for `id`, inserting an unopened one if absent.
	pub fn get_or_create(&self, id: &str) -> SessionSnapshot {
		if let Some(existing) = self.get(id) {
			return existing;
		}
		self
			.inner
			.sessions
			.write()
			.entry(id.to_string())
			.or_insert_with(|| SessionSnapshot::new(id))
			.clone()
	}

	pub fn get(&self, id: &str) -> Option<SessionSnapshot> {
		self.inner.sessions.read().get(id).cloned()
	}

	/// Replace the snapshot stored under `id`.
	pub fn put(&self, id: impl Into<String>, snapshot: SessionSnapshot) {
		self.inner.sessions.write().insert(id.into(), snapshot);
	}

	/// An owned copy of every snapshot. Later writes do not affect it.
	pub fn items(&self) -> Vec<SessionSnapshot> {
		self.inner.sessions.read().values().cloned().collect()
	}

	pub fn count(&self) -> usize {
		self.inner.sessions.read().len()
	}

	/// Remove every session.
	pub fn clear(&self) {
		self.inner.sessions.write().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use pulse_sessions_core::{merge_event, SessionEvent};

	fn opened(id: &str, start: i64) -> SessionSnapshot {
		let mut event = SessionEvent::new(id, "start");
		event.origin_timestamp = start;
		merge_event(None, &event).unwrap().snapshot
	}

	#[test]
	fn test_get_or_create_inserts_unopened() {
		let store = SessionStore::new();
		let snapshot = store.get_or_create("s1");
		assert_eq!(snapshot.id(), "s1");
		assert!(!snapshot.is_opened());
		assert_eq!(store.count(), 1);

		store.put("s1", opened("s1", 100));
		assert!(store.get_or_create("s1").is_opened());
		assert_eq!(store.count(), 1);
	}

	#[test]
	fn test_put_is_last_writer_wins() {
		let store = SessionStore::new();
		store.put("s1", opened("s1", 100));
		store.put("s1", opened("s1", 200));
		assert_eq!(
			store.get("s1").unwrap().start_time().unwrap().timestamp(),
			200
		);
	}

	#[test]
	fn test_items_is_a_detached_copy() {
		let store = SessionStore::new();
		store.put("a", opened("a", 1));
		store.put("b", opened("b", 2));

		let items = store.items();
		store.clear();

		assert_eq!(items.len(), 2);
		assert_eq!(store.count(), 0);
		assert!(store.items().is_empty());
	}

	#[test]
	fn test_clones_share_state() {
		let store = SessionStore::new();
		let other = store.clone();
		other.put("s1", opened("s1", 1));
		assert!(store.get("s1").is_some());
	}

	#[test]
	fn test_concurrent_writers() {
		let store = SessionStore::new();
		let handles: Vec<_> = (0..8)
			.map(|t| {
				let store = store.clone();
				std::thread::spawn(move || {
					for i in 0..100 {
						let id = format!("{t}-{i}");
						store.put(id.clone(), opened(&id, i));
						let _ = store.items();
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}
		assert_eq!(store.count(), 800);
	}

	proptest! {
		#[test]
		fn count_matches_distinct_ids(ids in prop::collection::vec("[a-f]{1,3}", 0..64)) {
			let store = SessionStore::new();
			for id in &ids {
				store.put(id.clone(), SessionSnapshot::new(id.clone()));
			}
			let distinct: std::collections::HashSet<_> = ids.iter().collect();
			prop_assert_eq!(store.count(), distinct.len());
			prop_assert_eq!(store.items().len(), distinct.len());
		}
	}
}
