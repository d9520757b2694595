//! The focus store.
//!
//! The console has two panes, the sidebar listing the collections and the content view showing
//! whatever was opened from it. Keyboard input goes to whichever pane has focus.

use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender},
};

use crate::termination::Interrupted;

use super::action::ComponentAction;

/// The store tracking which pane has focus.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ComponentState {
    state_tx: UnboundedSender<ActiveComponent>,
}

impl ComponentState {
    /// create the focus store, and the receiver the ui listens to it on.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<ActiveComponent>) {
        let (state_tx, state_rx) = tokio::sync::mpsc::unbounded_channel();

        (Self { state_tx }, state_rx)
    }

    /// Publishes the focus, starting on the sidebar, and again after every action.
    ///
    /// # Errors
    ///
    /// Fails if the ui has stopped listening.
    pub async fn main_loop(
        &self,
        mut action_rx: UnboundedReceiver<ComponentAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut focus = ActiveComponent::default();
        self.state_tx.send(focus)?;

        loop {
            tokio::select! {
                Some(action) = action_rx.recv() => {
                    focus = focus.apply(action);
                    self.state_tx.send(focus)?;
                },
                Ok(interrupted) = interrupt_rx.recv() => break Ok(interrupted),
            }
        }
    }
}

/// The pane with focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::module_name_repetitions)]
pub enum ActiveComponent {
    #[default]
    Sidebar,
    ContentView,
}

impl ActiveComponent {
    /// The pane that doesn't have focus.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Sidebar => Self::ContentView,
            Self::ContentView => Self::Sidebar,
        }
    }

    /// The focus after `action`. With two panes, cycling either way swaps them.
    #[must_use]
    pub const fn apply(self, action: ComponentAction) -> Self {
        match action {
            ComponentAction::Next | ComponentAction::Previous => self.other(),
            ComponentAction::Set(focus) => focus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::latest;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::tab(ComponentAction::Next)]
    #[case::back_tab(ComponentAction::Previous)]
    fn test_cycling_swaps_panes(#[case] action: ComponentAction) {
        assert_eq!(
            ActiveComponent::Sidebar.apply(action),
            ActiveComponent::ContentView
        );
        assert_eq!(
            ActiveComponent::ContentView.apply(action),
            ActiveComponent::Sidebar
        );
    }

    #[rstest]
    #[case::sidebar(ActiveComponent::Sidebar)]
    #[case::content_view(ActiveComponent::ContentView)]
    fn test_set_is_absolute(#[case] target: ActiveComponent) {
        for from in [ActiveComponent::Sidebar, ActiveComponent::ContentView] {
            assert_eq!(from.apply(ComponentAction::Set(target)), target);
        }
    }

    #[tokio::test]
    async fn test_main_loop_publishes_focus() {
        let (store, mut state_rx) = ComponentState::new();
        let (action_tx, action_rx) = tokio::sync::mpsc::unbounded_channel();
        let (interrupt_tx, interrupt_rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move { store.main_loop(action_rx, interrupt_rx).await });

        assert_eq!(state_rx.recv().await, Some(ActiveComponent::Sidebar));

        // opening a collection hands focus to the content view
        action_tx
            .send(ComponentAction::Set(ActiveComponent::ContentView))
            .unwrap();
        assert_eq!(state_rx.recv().await, Some(ActiveComponent::ContentView));

        action_tx.send(ComponentAction::Next).unwrap();
        assert_eq!(state_rx.recv().await, Some(ActiveComponent::Sidebar));
        assert_eq!(latest(&mut state_rx), None);

        interrupt_tx.send(Interrupted::UserInt).unwrap();
        assert_eq!(handle.await.unwrap().unwrap(), Interrupted::UserInt);
    }
}
