//! The relation search state store.
//!
//! Backs the relation pickers of the edit form. Input is debounced: a burst of keystrokes results
//! in at most one request, carrying the text at the end of the burst. Every request is tagged with
//! a token, and only the response to the most recently issued token is ever applied, no matter
//! the order responses come back in.

use std::{sync::Arc, time::Duration};

use distro_core::{
    api::AdminApi,
    entity::{RelationRef, RelationType},
    errors::ApiError,
};
use tokio::{
    sync::{
        broadcast,
        mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    },
    time::Instant,
};

use crate::termination::Interrupted;

use super::action::SearchAction;

/// What the search store publishes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSnapshot {
    /// The picker the query belongs to, `None` when no picker is open.
    pub relation: Option<RelationType>,
    pub text: String,
    pub results: Vec<RelationRef>,
    /// A search is scheduled or in flight.
    pub pending: bool,
    /// The last search failed, the results are empty because of it.
    pub failed: bool,
}

/// The bookkeeping behind a search-as-you-type query.
#[derive(Debug, Default)]
struct Query {
    /// The last token handed out.
    issued: u64,
    /// The token whose response will be applied, if any.
    current: Option<u64>,
    /// When to fire the scheduled search, if one is scheduled.
    deadline: Option<Instant>,
}

impl Query {
    /// Forget the scheduled search and anything in flight.
    const fn invalidate(&mut self) {
        self.current = None;
        self.deadline = None;
    }

    /// Hand out a token for a request that is about to be issued.
    const fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.current = Some(self.issued);
        self.deadline = None;
        self.issued
    }

    fn is_current(&self, token: u64) -> bool {
        self.current == Some(token)
    }
}

type Response = (u64, Result<Vec<RelationRef>, ApiError>);

/// The search state store.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchState {
    state_tx: UnboundedSender<SearchSnapshot>,
    debounce: Duration,
}

impl SearchState {
    /// create a new search state store, and return the receiver for listening to state updates.
    #[must_use]
    pub fn new(debounce: Duration) -> (Self, UnboundedReceiver<SearchSnapshot>) {
        let (state_tx, state_rx) = unbounded_channel::<SearchSnapshot>();

        (Self { state_tx, debounce }, state_rx)
    }

    /// a loop that schedules searches as the query changes, and applies their results.
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent
    pub async fn main_loop(
        &self,
        api: Arc<dyn AdminApi>,
        mut action_rx: UnboundedReceiver<SearchAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut state = SearchSnapshot::default();
        let mut query = Query::default();
        let (response_tx, mut response_rx) = unbounded_channel::<Response>();

        // the initial state once
        self.state_tx.send(state.clone())?;

        let result = loop {
            let deadline = query.deadline;

            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => {
                    state = self.handle_action(&mut query, action);
                    self.state_tx.send(state.clone())?;
                },
                // The input has been quiet for long enough, fire the search
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let Some(relation) = state.relation else {
                        query.invalidate();
                        continue;
                    };
                    let token = query.issue();
                    let text = state.text.clone();
                    log::debug!("searching {relation:?} for {text:?} (token {token})");

                    let api = api.clone();
                    let response_tx = response_tx.clone();
                    tokio::spawn(async move {
                        let result = api.search(relation, &text).await;
                        response_tx.send((token, result)).ok();
                    });
                },
                // Apply the results of the current search, drop the rest
                Some((token, result)) = response_rx.recv() => {
                    if let Some(new_state) = Self::apply_response(&state, &query, token, result) {
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

    /// Handle the action, returning the new state.
    fn handle_action(&self, query: &mut Query, action: SearchAction) -> SearchSnapshot {
        // every change to the query makes whatever is in flight stale
        query.invalidate();

        match action {
            SearchAction::Input(relation, text) => {
                let pending = !text.trim().is_empty();
                if pending {
                    query.deadline = Some(Instant::now() + self.debounce);
                }
                SearchSnapshot {
                    relation: Some(relation),
                    text,
                    results: Vec::new(),
                    pending,
                    failed: false,
                }
            }
            SearchAction::Close => SearchSnapshot::default(),
        }
    }

    /// Apply a response, or `None` if it isn't the response to the current query.
    fn apply_response(
        state: &SearchSnapshot,
        query: &Query,
        token: u64,
        result: Result<Vec<RelationRef>, ApiError>,
    ) -> Option<SearchSnapshot> {
        if !query.is_current(token) {
            log::debug!("discarding stale search response (token {token})");
            return None;
        }

        Some(match result {
            Ok(results) => SearchSnapshot {
                results,
                pending: false,
                failed: false,
                ..state.clone()
            },
            Err(e) => {
                log::warn!("search for {:?} failed: {e}", state.text);
                SearchSnapshot {
                    results: Vec::new(),
                    pending: false,
                    failed: true,
                    ..state.clone()
                }
            }
        })
    }
}
