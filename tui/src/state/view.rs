//! The `ViewStore` is responsible for managing the `CurrentView` to be displayed.

use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

use crate::{termination::Interrupted, ui::components::content_view::ActiveView};

use super::action::ViewAction;

/// The `ViewStore` is responsible for managing the `CurrentView` to be displayed.
#[allow(clippy::module_name_repetitions)]
pub struct ViewState {
    state_tx: UnboundedSender<ActiveView>,
}

impl ViewState {
    /// Create a new `ViewStore`.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<ActiveView>) {
        let (state_tx, state_rx) = unbounded_channel::<ActiveView>();
        (Self { state_tx }, state_rx)
    }

    /// A loop that updates the store when requested
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent
    pub async fn main_loop(
        &self,
        mut action_rx: UnboundedReceiver<ViewAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut state = ActiveView::default();
        // a stack to keep track of previous views
        let mut view_stack = Vec::new();

        // the initial state once
        self.state_tx.send(state.clone())?;

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                // and process them to do async operations
                Some(action) = action_rx.recv() => {
                    state = Self::handle_action(&state, &mut view_stack, action);
                    self.state_tx.send(state.clone())?;
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        Ok(result)
    }

    /// Handle the action, returning the new state
    fn handle_action(
        state: &ActiveView,
        view_stack: &mut Vec<ActiveView>,
        action: ViewAction,
    ) -> ActiveView {
        match action {
            // re-selecting the current view doesn't grow the stack
            ViewAction::Set(view) if &view == state => view,
            ViewAction::Set(view) => {
                view_stack.push(state.clone());
                view
            }
            ViewAction::Back => view_stack.pop().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distro_core::entity::{EditKind, EntityKind, Id};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_handle_action() {
        let mut view_stack = Vec::new();

        let mut state = ViewState::handle_action(
            &ActiveView::default(),
            &mut view_stack,
            ViewAction::Set(ActiveView::List(EntityKind::Album)),
        );
        assert_eq!(state, ActiveView::List(EntityKind::Album));

        state = ViewState::handle_action(
            &state,
            &mut view_stack,
            ViewAction::Set(ActiveView::List(EntityKind::Song)),
        );
        assert_eq!(state, ActiveView::List(EntityKind::Song));

        state = ViewState::handle_action(
            &state,
            &mut view_stack,
            ViewAction::Set(ActiveView::Edit(EditKind::Song, Id::from(4))),
        );
        assert_eq!(state, ActiveView::Edit(EditKind::Song, Id::from(4)));

        // back returns to wherever we came from, not a fixed route
        state = ViewState::handle_action(&state, &mut view_stack, ViewAction::Back);
        assert_eq!(state, ActiveView::List(EntityKind::Song));

        state = ViewState::handle_action(&state, &mut view_stack, ViewAction::Back);
        assert_eq!(state, ActiveView::List(EntityKind::Album));

        state = ViewState::handle_action(&state, &mut view_stack, ViewAction::Back);
        assert_eq!(state, ActiveView::default());

        state = ViewState::handle_action(&state, &mut view_stack, ViewAction::Back);
        assert_eq!(state, ActiveView::default());
    }

    #[test]
    fn test_reselecting_does_not_stack() {
        let mut view_stack = Vec::new();
        let songs = ActiveView::List(EntityKind::Song);

        let state = ViewState::handle_action(
            &ActiveView::None,
            &mut view_stack,
            ViewAction::Set(songs.clone()),
        );
        let state = ViewState::handle_action(&state, &mut view_stack, ViewAction::Set(songs));
        assert_eq!(view_stack, vec![ActiveView::None]);

        let state = ViewState::handle_action(&state, &mut view_stack, ViewAction::Back);
        assert_eq!(state, ActiveView::None);
    }

    #[tokio::test]
    async fn test_main_loop_sends_initial_state() {
        let (view, mut state_rx) = ViewState::new();
        let (action_tx, action_rx) = unbounded_channel();
        let (interrupt_tx, interrupt_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move { view.main_loop(action_rx, interrupt_rx).await });

        assert_eq!(state_rx.recv().await, Some(ActiveView::None));
        action_tx
            .send(ViewAction::Set(ActiveView::List(EntityKind::User)))
            .unwrap();
        assert_eq!(
            state_rx.recv().await,
            Some(ActiveView::List(EntityKind::User))
        );

        interrupt_tx.send(Interrupted::UserInt).unwrap();
        assert_eq!(handle.await.unwrap().unwrap(), Interrupted::UserInt);
    }
}
