//! The account state store.
//!
//! Handles changes to the signed-in user's own account. There is no state to publish, the
//! outcome of every request is reported with a notification popup.

use std::sync::Arc;

use distro_core::{api::AdminApi, entity::Id};
use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender},
};

use crate::{
    termination::Interrupted,
    ui::widgets::popups::{PopupType, notification::Notice},
};

use super::action::{AccountAction, Action, PopupAction};

pub const PASSWORD_CHANGED: &str = "SUCCESS: CREDENTIALS UPDATED";

/// The account state store.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct AccountState {
    user_id: Option<Id>,
}

impl AccountState {
    #[must_use]
    pub const fn new(user_id: Option<Id>) -> Self {
        Self { user_id }
    }

    /// a loop that performs account changes when requested.
    ///
    /// # Errors
    ///
    /// Fails if the notification cannot be sent
    pub async fn main_loop(
        &self,
        api: Arc<dyn AdminApi>,
        action_tx: UnboundedSender<Action>,
        mut action_rx: UnboundedReceiver<AccountAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => {
                    let notice = self.handle_action(api.as_ref(), action).await;
                    action_tx.send(Action::Popup(PopupAction::Open(PopupType::Notification(
                        notice,
                    ))))?;
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        Ok(result)
    }

    /// Perform the action, returning what to tell the user.
    async fn handle_action(&self, api: &dyn AdminApi, action: AccountAction) -> Notice {
        match action {
            AccountAction::ChangePassword(password) => {
                let Some(user_id) = &self.user_id else {
                    log::warn!("cannot change password, no user id is configured");
                    return Notice::Failure("no user id is configured".to_string());
                };

                match api.change_password(user_id, &password).await {
                    Ok(()) => {
                        log::info!("password changed for user {user_id}");
                        Notice::Success(PASSWORD_CHANGED.to_string())
                    }
                    Err(e) => {
                        log::error!("failed to change password for user {user_id}: {e}");
                        Notice::Failure(e.user_message())
                    }
                }
            }
        }
    }
}
