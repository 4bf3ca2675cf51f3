// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Serialized ingestion of session events.
//!
//! Every accepted event goes through one bounded queue consumed by a single
//! worker, so merges for the same session never race and are applied in the
//! order they were queued.

use pulse_sessions_core::{merge_event, MergeWarning, SessionEvent, SessionsError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::session_log::{log_event, SessionLogOptions};
use crate::store::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
	#[error("ingest worker has stopped")]
	Closed,
}

/// Producer side of the ingest queue.
#[derive(Clone)]
pub struct IngestHandle {
	tx: mpsc::Sender<SessionEvent>,
}

impl IngestHandle {
	/// Queue an event, waiting for room if the queue is full.
	pub async fn submit(&self, event: SessionEvent) -> Result<(), IngestError> {
		self.tx.send(event).await.map_err(|_| IngestError::Closed)
	}
}

/// Spawn the worker that merges queued events into `store`.
///
/// The worker exits once every [`IngestHandle`] has been dropped and the
/// queue is drained.
pub fn spawn_ingest_worker(
	store: SessionStore,
	queue_capacity: usize,
	log_options: SessionLogOptions,
) -> (IngestHandle, JoinHandle<()>) {
	let (tx, mut rx) = mpsc::channel::<SessionEvent>(queue_capacity.max(1));

	let task = tokio::spawn(async move {
		info!(queue_capacity, "ingest worker started");
		while let Some(event) = rx.recv().await {
			match apply_event(&store, &event) {
				Ok(warning) => {
					if let Some(warning) = warning {
						warn!(uuid = %event.id, %warning, "session event defaulted to heartbeat");
					}
					log_event(&event, log_options);
				}
				Err(e) => {
					warn!(uuid = %event.id, error = %e, "dropping session event");
				}
			}
		}
		info!("ingest worker stopped");
	});

	(IngestHandle { tx }, task)
}

/// Merge one event into the store.
///
/// Nothing is written when the merge fails.
pub fn apply_event(
	store: &SessionStore,
	event: &SessionEvent,
) -> Result<Option<MergeWarning>, SessionsError> {
	let current = store.get(&event.id);
	let outcome = merge_event(current.as_ref(), event)?;
	debug!(uuid = %event.id, event_type = %event.event_type, "merged session event");
	store.put(event.id.clone(), outcome.snapshot);
	Ok(outcome.warning)
}
