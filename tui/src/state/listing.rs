//! The listing state store.
//!
//! Fetches the rows of one entity collection at a time. Every load replaces the row set
//! wholesale, and a load that has been superseded by a newer one is discarded when it lands.

use std::sync::Arc;

use distro_core::{api::AdminApi, entity::EntityKind, errors::ApiError};
use serde_json::Value;
use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

use crate::termination::Interrupted;

use super::action::ListingAction;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingStatus {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The load failed, the message is shown in place of the rows.
    Failed(String),
}

/// What the listing store publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub kind: Option<EntityKind>,
    pub status: ListingStatus,
    /// The rows, in the order the server returned them.
    pub rows: Arc<[Value]>,
    /// Bumped on every load, so consumers can tell a fresh row set apart.
    pub generation: u64,
}

impl Default for ListingSnapshot {
    fn default() -> Self {
        Self {
            kind: None,
            status: ListingStatus::Idle,
            rows: Arc::from([]),
            generation: 0,
        }
    }
}

type Response = (u64, Result<Vec<Value>, ApiError>);

/// The listing state store.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ListingState {
    state_tx: UnboundedSender<ListingSnapshot>,
}

impl ListingState {
    /// create a new listing state store, and return the receiver for listening to state updates.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<ListingSnapshot>) {
        let (state_tx, state_rx) = unbounded_channel::<ListingSnapshot>();

        (Self { state_tx }, state_rx)
    }

    /// a loop that loads listings when requested.
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent
    pub async fn main_loop(
        &self,
        api: Arc<dyn AdminApi>,
        mut action_rx: UnboundedReceiver<ListingAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut state = ListingSnapshot::default();
        let (response_tx, mut response_rx) = unbounded_channel::<Response>();

        // the initial state once
        self.state_tx.send(state.clone())?;

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => {
                    let kind = match action {
                        ListingAction::Load(kind) => kind,
                        ListingAction::Refresh => match state.kind {
                            Some(kind) => kind,
                            None => continue,
                        },
                    };
                    state = Self::begin_load(&state, kind);
                    self.state_tx.send(state.clone())?;

                    let api = api.clone();
                    let response_tx = response_tx.clone();
                    let generation = state.generation;
                    tokio::spawn(async move {
                        let result = api.list(kind.list_endpoint()).await;
                        response_tx.send((generation, result)).ok();
                    });
                },
                // Apply the responses of the loads we issued
                Some((generation, result)) = response_rx.recv() => {
                    if let Some(new_state) = Self::finish_load(&state, generation, result) {
                        state = new_state;
                        self.state_tx.send(state.clone())?;
                    }
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        Ok(result)
    }

    /// Start loading `kind`: the previous rows are dropped immediately.
    fn begin_load(state: &ListingSnapshot, kind: EntityKind) -> ListingSnapshot {
        ListingSnapshot {
            kind: Some(kind),
            status: ListingStatus::Loading,
            rows: Arc::from([]),
            generation: state.generation + 1,
        }
    }

    /// Apply a response, or `None` if it belongs to a load that has since been superseded.
    fn finish_load(
        state: &ListingSnapshot,
        generation: u64,
        result: Result<Vec<Value>, ApiError>,
    ) -> Option<ListingSnapshot> {
        if generation != state.generation {
            log::debug!(
                "discarding listing response {generation}, current is {}",
                state.generation
            );
            return None;
        }

        Some(match result {
            Ok(rows) => ListingSnapshot {
                status: ListingStatus::Ready,
                rows: Arc::from(rows),
                ..state.clone()
            },
            Err(e) => {
                log::warn!("failed to load {:?}: {e}", state.kind);
                ListingSnapshot {
                    status: ListingStatus::Failed(e.user_message()),
                    rows: Arc::from([]),
                    ..state.clone()
                }
            }
        })
    }
}
