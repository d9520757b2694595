use std::sync::Arc;

use action::Action;
use distro_core::{api::AdminApi, config::Settings, session::EditSession};
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use crate::{
    termination::{Interrupted, Terminator},
    ui::components::content_view::ActiveView,
};

pub mod account;
pub mod action;
pub mod component;
pub mod editor;
pub mod listing;
pub mod popup;
pub mod search;
pub mod view;

/// an all-in-one dispactcher for managing state updates.
pub struct Dispatcher {
    listing: listing::ListingState,
    search: search::SearchState,
    editor: editor::EditorState,
    account: account::AccountState,
    view: view::ViewState,
    popup: popup::PopupState,
    component: component::ComponentState,
}

/// a struct that centralized the receivers for all the state stores.
pub struct Receivers {
    pub listing: UnboundedReceiver<listing::ListingSnapshot>,
    pub search: UnboundedReceiver<search::SearchSnapshot>,
    pub editor: UnboundedReceiver<Option<EditSession>>,
    pub view: UnboundedReceiver<ActiveView>,
    pub popup: popup::PopupStateReceiver,
    pub component: UnboundedReceiver<component::ActiveComponent>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(settings: &Settings) -> (Self, Receivers) {
        let (listing, listing_rx) = listing::ListingState::new();
        let (search, search_rx) = search::SearchState::new(settings.search.debounce());
        let (editor, editor_rx) = editor::EditorState::new();
        let account = account::AccountState::new(settings.context().user_id);
        let (view, view_rx) = view::ViewState::new();
        let (popup, popup_rx) = popup::PopupState::new();
        let (component, component_rx) = component::ComponentState::new();

        let dispatcher = Self {
            listing,
            search,
            editor,
            account,
            view,
            popup,
            component,
        };
        let state_receivers = Receivers {
            listing: listing_rx,
            search: search_rx,
            editor: editor_rx,
            view: view_rx,
            popup: popup_rx,
            component: component_rx,
        };

        (dispatcher, state_receivers)
    }

    /// Run every state store, and route the actions coming from the UI to them.
    ///
    /// `action_tx` is handed to the stores that react to their own results by dispatching
    /// further actions, like the editor navigating back after a save.
    ///
    /// # Errors
    ///
    /// Fails if any of the stores fail, or an action can't be routed.
    pub async fn main_loop(
        &self,
        api: Arc<dyn AdminApi>,
        terminator: Terminator,
        action_tx: UnboundedSender<Action>,
        action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let (listing_action_tx, listing_action_rx) = mpsc::unbounded_channel();
        let (search_action_tx, search_action_rx) = mpsc::unbounded_channel();
        let (editor_action_tx, editor_action_rx) = mpsc::unbounded_channel();
        let (account_action_tx, account_action_rx) = mpsc::unbounded_channel();
        let (view_action_tx, view_action_rx) = mpsc::unbounded_channel();
        let (popup_action_tx, popup_action_rx) = mpsc::unbounded_channel();
        let (component_action_tx, component_action_rx) = mpsc::unbounded_channel();

        // run multiple tasks in parallel, and wait for all of them to finish.
        tokio::try_join!(
            // the listing state store
            self.listing
                .main_loop(api.clone(), listing_action_rx, interrupt_rx.resubscribe()),
            // the relation search state store
            self.search
                .main_loop(api.clone(), search_action_rx, interrupt_rx.resubscribe()),
            // the editor state store
            self.editor.main_loop(
                api.clone(),
                action_tx.clone(),
                editor_action_rx,
                interrupt_rx.resubscribe()
            ),
            // the account state store
            self.account.main_loop(
                api.clone(),
                action_tx,
                account_action_rx,
                interrupt_rx.resubscribe()
            ),
            // the view store
            self.view
                .main_loop(view_action_rx, interrupt_rx.resubscribe()),
            // the popup store
            self.popup
                .main_loop(popup_action_rx, interrupt_rx.resubscribe()),
            // the component store
            self.component
                .main_loop(component_action_rx, interrupt_rx.resubscribe()),
            // the action dispatcher
            Self::action_dispatcher(
                terminator,
                action_rx,
                Routes {
                    listing: listing_action_tx,
                    search: search_action_tx,
                    editor: editor_action_tx,
                    account: account_action_tx,
                    view: view_action_tx,
                    popup: popup_action_tx,
                    component: component_action_tx,
                },
            ),
        )?;

        Ok(interrupt_rx.recv().await?)
    }

    async fn action_dispatcher(
        mut terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        routes: Routes,
    ) -> anyhow::Result<()> {
        while let Some(action) = action_rx.recv().await {
            match action {
                Action::General(action::GeneralAction::Exit) => {
                    let _ = terminator.terminate(Interrupted::UserInt);

                    break;
                }
                Action::Listing(action) => routes.listing.send(action)?,
                Action::Search(action) => routes.search.send(action)?,
                Action::Editor(action) => routes.editor.send(action)?,
                Action::Account(action) => routes.account.send(action)?,
                Action::ActiveView(action) => routes.view.send(action)?,
                Action::Popup(action) => routes.popup.send(action)?,
                Action::ActiveComponent(action) => routes.component.send(action)?,
            }
        }

        Ok(())
    }
}

/// Where each kind of action gets sent.
struct Routes {
    listing: UnboundedSender<action::ListingAction>,
    search: UnboundedSender<action::SearchAction>,
    editor: UnboundedSender<action::EditorAction>,
    account: UnboundedSender<action::AccountAction>,
    view: UnboundedSender<action::ViewAction>,
    popup: UnboundedSender<action::PopupAction>,
    component: UnboundedSender<action::ComponentAction>,
}
