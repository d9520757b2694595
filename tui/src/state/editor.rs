//! The editor state store.
//!
//! Owns the one [`EditSession`] that exists at a time, performs its requests, and sends the user
//! back to where they came from once a save or delete goes through.

use std::sync::Arc;

use distro_core::{
    api::AdminApi,
    errors::ApiError,
    session::{EditSession, Outcome},
};
use serde_json::Value;
use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

use crate::termination::Interrupted;

use super::action::{Action, EditorAction, ViewAction};

/// The outcome of a request, tagged with the generation of the session that made it.
#[derive(Debug)]
enum Response {
    Loaded(u64, Result<Value, ApiError>),
    Saved(u64, Result<(), ApiError>),
    Deleted(u64, Result<(), ApiError>),
}

/// A request the session wants made.
#[derive(Debug, PartialEq)]
enum Request {
    Load(String),
    Save(String, Value),
    Delete(String),
}

/// The editor state store.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct EditorState {
    state_tx: UnboundedSender<Option<EditSession>>,
}

impl EditorState {
    /// create a new editor state store, and return the receiver for listening to state updates.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<Option<EditSession>>) {
        let (state_tx, state_rx) = unbounded_channel::<Option<EditSession>>();

        (Self { state_tx }, state_rx)
    }

    /// a loop that drives the edit session.
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent, or the request to navigate back can't be sent.
    pub async fn main_loop(
        &self,
        api: Arc<dyn AdminApi>,
        action_tx: UnboundedSender<Action>,
        mut action_rx: UnboundedReceiver<EditorAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut session: Option<EditSession> = None;
        // bumped whenever the session is replaced, so responses for an old one are dropped
        let mut generation = 0u64;
        let (response_tx, mut response_rx) = unbounded_channel::<Response>();

        // the initial state once
        self.state_tx.send(None)?;

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => {
                    if let Some(request) = Self::handle_action(&mut session, &mut generation, action) {
                        Self::spawn_request(api.clone(), response_tx.clone(), generation, request);
                    }
                    self.state_tx.send(session.clone())?;
                },
                // Apply the outcome of our requests
                Some(response) = response_rx.recv() => {
                    match Self::handle_response(session.as_mut(), generation, response) {
                        Some(Outcome::NavigateBack) => {
                            action_tx.send(Action::ActiveView(ViewAction::Back))?;
                        }
                        Some(Outcome::Stay) => {}
                        None => continue,
                    }
                    self.state_tx.send(session.clone())?;
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        Ok(result)
    }

    /// Apply the action to the session, returning the request to make, if any.
    fn handle_action(
        session: &mut Option<EditSession>,
        generation: &mut u64,
        action: EditorAction,
    ) -> Option<Request> {
        match action {
            EditorAction::Open(kind, id) => {
                *generation += 1;
                let new_session = EditSession::new(kind, id);
                let endpoint = new_session.endpoint();
                *session = Some(new_session);
                Some(Request::Load(endpoint))
            }
            EditorAction::Close => {
                *generation += 1;
                *session = None;
                None
            }
            EditorAction::SetScalar(value) => {
                session.as_mut()?.edit(|draft| draft.set_scalar(value));
                None
            }
            EditorAction::SetAlbum(album) => {
                session.as_mut()?.edit(|draft| {
                    if let Some(song) = draft.as_song_mut() {
                        song.album = album;
                    }
                });
                None
            }
            EditorAction::SetArtists(artists) => {
                session.as_mut()?.edit(|draft| {
                    if let Some(song) = draft.as_song_mut() {
                        song.artists = artists;
                    }
                });
                None
            }
            EditorAction::Save => {
                let session = session.as_mut()?;
                let payload = session.begin_save()?;
                Some(Request::Save(session.endpoint(), payload))
            }
            EditorAction::Delete => {
                let session = session.as_mut()?;
                session
                    .begin_delete()
                    .then(|| Request::Delete(session.endpoint()))
            }
        }
    }

    /// Feed a response to the session it belongs to.
    ///
    /// Returns `None` if the response belongs to a session that has since been replaced.
    fn handle_response(
        session: Option<&mut EditSession>,
        generation: u64,
        response: Response,
    ) -> Option<Outcome> {
        let (Response::Loaded(tag, _) | Response::Saved(tag, _) | Response::Deleted(tag, _)) =
            &response;
        if *tag != generation {
            log::debug!("discarding response for edit session {tag}, current is {generation}");
            return None;
        }
        let session = session?;

        Some(match response {
            Response::Loaded(_, result) => {
                session.loaded(result);
                Outcome::Stay
            }
            Response::Saved(_, result) => session.save_finished(result),
            Response::Deleted(_, result) => session.delete_finished(result),
        })
    }

    fn spawn_request(
        api: Arc<dyn AdminApi>,
        response_tx: UnboundedSender<Response>,
        generation: u64,
        request: Request,
    ) {
        tokio::spawn(async move {
            let response = match request {
                Request::Load(endpoint) => Response::Loaded(generation, api.get(&endpoint).await),
                Request::Save(endpoint, payload) => {
                    Response::Saved(generation, api.update(&endpoint, &payload).await)
                }
                Request::Delete(endpoint) => {
                    Response::Deleted(generation, api.delete(&endpoint).await)
                }
            };
            response_tx.send(response).ok();
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::{SETTLE, latest};
    use distro_core::{
        draft::EditDraft,
        entity::{EditKind, Id, RelationRef},
        session::Phase,
        test_utils::{Method, MockApi},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Harness {
        api: Arc<MockApi>,
        action_tx: UnboundedSender<EditorAction>,
        state_rx: UnboundedReceiver<Option<EditSession>>,
        app_rx: UnboundedReceiver<Action>,
        _interrupt_tx: broadcast::Sender<Interrupted>,
    }

    fn spawn_store(api: MockApi) -> Harness {
        let api = Arc::new(api);
        let (store, state_rx) = EditorState::new();
        let (action_tx, action_rx) = unbounded_channel();
        let (app_tx, app_rx) = unbounded_channel();
        let (interrupt_tx, interrupt_rx) = broadcast::channel(1);
        let dyn_api: Arc<dyn AdminApi> = api.clone();
        tokio::spawn(
            async move { store.main_loop(dyn_api, app_tx, action_rx, interrupt_rx).await },
        );
        Harness {
            api,
            action_tx,
            state_rx,
            app_rx,
            _interrupt_tx: interrupt_tx,
        }
    }

    fn song_api() -> MockApi {
        MockApi::new().on(
            Method::Get,
            "/songs/4",
            Ok(json!({
                "title": "Echoes",
                "album": { "id": 9, "title": "Meddle" },
                "artists": [ { "id": 1, "name": "Pink Floyd" } ]
            })),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_loads_the_entity() {
        let mut harness = spawn_store(song_api());

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Song, Id::from(4)))
            .unwrap();
        tokio::time::sleep(SETTLE).await;

        let session = latest(&mut harness.state_rx).unwrap().unwrap();
        assert_eq!(session.phase(), &Phase::Ready);
        assert_eq!(session.draft().map(EditDraft::scalar), Some("Echoes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure() {
        let mut harness = spawn_store(MockApi::new().on(
            Method::Get,
            "/albums/3",
            Err(ApiError::Server {
                status: 500,
                message: None,
            }),
        ));

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Album, Id::from(3)))
            .unwrap();
        tokio::time::sleep(SETTLE).await;

        let session = latest(&mut harness.state_rx).unwrap().unwrap();
        assert_eq!(
            session.phase(),
            &Phase::LoadFailed("Failed to load item. Request failed with status code 500".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_submits_payload_and_navigates_back() {
        let mut harness = spawn_store(song_api());

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Song, Id::from(4)))
            .unwrap();
        tokio::time::sleep(SETTLE).await;

        harness
            .action_tx
            .send(EditorAction::SetArtists(vec![
                RelationRef::new(1, "Pink Floyd"),
                RelationRef::synthetic("David Gilmour"),
            ]))
            .unwrap();
        harness.action_tx.send(EditorAction::Save).unwrap();
        tokio::time::sleep(SETTLE).await;

        let calls = harness.api.calls_to(Method::Put, "/songs/4");
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            Some(json!({
                "title": "Echoes",
                "album_title": "Meddle",
                "artists": [
                    { "name": "Pink Floyd", "identifier": "pink-floyd" },
                    { "name": "David Gilmour", "identifier": "david-gilmour" }
                ]
            }))
        );
        assert_eq!(
            harness.app_rx.try_recv().unwrap(),
            Action::ActiveView(ViewAction::Back)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_stays_with_message() {
        let mut harness = spawn_store(song_api().on(
            Method::Put,
            "/songs/4",
            Err(ApiError::Server {
                status: 409,
                message: Some("title taken".into()),
            }),
        ));

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Song, Id::from(4)))
            .unwrap();
        tokio::time::sleep(SETTLE).await;
        harness
            .action_tx
            .send(EditorAction::SetScalar("Time".into()))
            .unwrap();
        harness.action_tx.send(EditorAction::Save).unwrap();
        tokio::time::sleep(SETTLE).await;

        let session = latest(&mut harness.state_rx).unwrap().unwrap();
        assert_eq!(session.error(), Some("title taken"));
        assert_eq!(session.phase(), &Phase::Ready);
        assert_eq!(session.draft().map(EditDraft::scalar), Some("Time"));
        assert!(harness.app_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_navigates_back() {
        let mut harness = spawn_store(song_api());

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Song, Id::from(4)))
            .unwrap();
        tokio::time::sleep(SETTLE).await;
        harness.action_tx.send(EditorAction::Delete).unwrap();
        tokio::time::sleep(SETTLE).await;

        assert_eq!(harness.api.calls_to(Method::Delete, "/songs/4").len(), 1);
        assert_eq!(
            harness.app_rx.try_recv().unwrap(),
            Action::ActiveView(ViewAction::Back)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_entity_restarts_at_loading() {
        let mut harness = spawn_store(song_api().on_delayed(
            Method::Get,
            "/albums/9",
            Duration::from_secs(1),
            Ok(json!({"title": "Meddle"})),
        ));

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Song, Id::from(4)))
            .unwrap();
        tokio::time::sleep(SETTLE).await;
        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Album, Id::from(9)))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let session = latest(&mut harness.state_rx).unwrap().unwrap();
        assert!(session.is_for(EditKind::Album, &Id::from(9)));
        assert_eq!(session.phase(), &Phase::Loading);
        assert!(session.draft().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_for_closed_session_is_dropped() {
        let mut harness = spawn_store(MockApi::new().on_delayed(
            Method::Get,
            "/artists/1",
            Duration::from_secs(1),
            Ok(json!({"name": "Pink Floyd"})),
        ));

        harness
            .action_tx
            .send(EditorAction::Open(EditKind::Artist, Id::from(1)))
            .unwrap();
        harness.action_tx.send(EditorAction::Close).unwrap();
        tokio::time::sleep(SETTLE).await;

        assert_eq!(latest(&mut harness.state_rx).unwrap(), None);
    }

    #[test]
    fn test_edits_before_load_are_ignored() {
        let mut session = Some(EditSession::new(EditKind::Song, Id::from(4)));
        let mut generation = 1;

        let request = EditorState::handle_action(
            &mut session,
            &mut generation,
            EditorAction::SetScalar("x".into()),
        );
        assert_eq!(request, None);
        assert_eq!(
            EditorState::handle_action(&mut session, &mut generation, EditorAction::Save),
            None
        );
        assert_eq!(
            EditorState::handle_action(&mut None, &mut generation, EditorAction::Delete),
            None
        );
    }
}
