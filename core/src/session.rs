//! Edit sessions, and the context every session runs in.
//!
//! An [`EditSession`] is the state machine behind the edit form: it loads one entity,
//! holds the draft while the user edits it, and tracks saving and deleting. It never
//! performs I/O itself, the caller feeds it the outcome of each request.

use serde_json::Value;

use crate::{
    draft::EditDraft,
    entity::{EditKind, Id},
    errors::ApiError,
};

/// The context the console runs in: who we are, and which backend we talk to.
///
/// Created when the console starts and dropped when it exits, nothing reads it from a global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    pub base_url: String,
    pub token: Option<String>,
    pub user_id: Option<Id>,
}

impl AdminContext {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            user_id: None,
        }
    }

    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_user(self, user_id: Id) -> Self {
        Self {
            user_id: Some(user_id),
            ..self
        }
    }

    /// Join an endpoint path onto the base url.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    /// The entity couldn't be loaded, the only way out is back.
    LoadFailed(String),
    Saving,
    Deleting,
}

/// What the form should do once a request finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Return to wherever the user came from.
    NavigateBack,
    /// Stay on the form.
    Stay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    kind: EditKind,
    id: Id,
    phase: Phase,
    draft: Option<EditDraft>,
    error: Option<String>,
}

impl EditSession {
    /// Start a session for the entity `(kind, id)`, waiting on its load.
    #[must_use]
    pub const fn new(kind: EditKind, id: Id) -> Self {
        Self {
            kind,
            id,
            phase: Phase::Loading,
            draft: None,
            error: None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EditKind {
        self.kind
    }

    #[must_use]
    pub const fn id(&self) -> &Id {
        &self.id
    }

    #[must_use]
    pub fn is_for(&self, kind: EditKind, id: &Id) -> bool {
        self.kind == kind && &self.id == id
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// The inline error from the last failed save or delete.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The endpoint of the entity being edited.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.kind.item_endpoint(&self.id)
    }

    /// Whether save and delete are currently allowed.
    #[must_use]
    pub const fn controls_enabled(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    /// Apply the result of loading the entity.
    pub fn loaded(&mut self, result: Result<Value, ApiError>) {
        if self.phase != Phase::Loading {
            log::warn!("ignoring load result for {} in phase {:?}", self.id, self.phase);
            return;
        }

        let draft = result
            .and_then(|data| EditDraft::from_server(self.kind, data).map_err(ApiError::from));
        match draft {
            Ok(draft) => {
                self.draft = Some(draft);
                self.phase = Phase::Ready;
            }
            Err(e) => {
                self.phase = Phase::LoadFailed(format!("Failed to load item. {}", e.user_message()));
            }
        }
    }

    /// Change the draft. Does nothing until the draft is loaded.
    ///
    /// Returns whether the edit was applied.
    pub fn edit(&mut self, f: impl FnOnce(&mut EditDraft)) -> bool {
        match (&self.phase, self.draft.as_mut()) {
            (Phase::Loading | Phase::LoadFailed(_), _) | (_, None) => false,
            (_, Some(draft)) => {
                f(draft);
                true
            }
        }
    }

    /// Start saving, returning the payload to submit.
    ///
    /// Returns `None` if the form isn't in a state where it can be saved.
    pub fn begin_save(&mut self) -> Option<Value> {
        if !self.controls_enabled() {
            return None;
        }
        let payload = self.draft.as_ref()?.payload();
        self.phase = Phase::Saving;
        self.error = None;
        Some(payload)
    }

    /// Apply the result of a save. On failure the draft is left exactly as it was.
    pub fn save_finished(&mut self, result: Result<(), ApiError>) -> Outcome {
        if self.phase != Phase::Saving {
            return Outcome::Stay;
        }
        self.phase = Phase::Ready;
        match result {
            Ok(()) => Outcome::NavigateBack,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }

    /// Start deleting. The caller is responsible for getting the user's confirmation first.
    pub fn begin_delete(&mut self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.phase = Phase::Deleting;
        self.error = None;
        true
    }

    pub fn delete_finished(&mut self, result: Result<(), ApiError>) -> Outcome {
        if self.phase != Phase::Deleting {
            return Outcome::Stay;
        }
        self.phase = Phase::Ready;
        match result {
            Ok(()) => Outcome::NavigateBack,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }
}
