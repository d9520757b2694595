//! This module contains the actions that the user can perform through the UI.
//! these actions are sent from the UI to the state stores, which then update the state accordingly.
#![allow(clippy::module_name_repetitions)]

use distro_core::entity::{EditKind, EntityKind, Id, RelationRef, RelationType};

use crate::ui::{components::content_view::ActiveView, widgets::popups::PopupType};

use super::component::ActiveComponent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// General actions
    General(GeneralAction),
    /// Actions that effect the listing state store.
    Listing(ListingAction),
    /// Actions that effect the relation search state store.
    Search(SearchAction),
    /// Actions that effect the edit session.
    Editor(EditorAction),
    /// Actions regarding the signed-in account.
    Account(AccountAction),
    /// Actions that effect the current view.
    ActiveView(ViewAction),
    /// Actions regarding popups
    Popup(PopupAction),
    /// Actions that change the active component
    ActiveComponent(ComponentAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralAction {
    /// Exit the application.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAction {
    /// Fetch the listing of a kind, replacing whatever was shown before.
    Load(EntityKind),
    /// Fetch the current listing again.
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// The user changed the text of a relation picker.
    Input(RelationType, String),
    /// The picker lost focus, forget the query and anything in flight.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Start a fresh session for an entity.
    Open(EditKind, Id),
    /// Change the title or name.
    SetScalar(String),
    /// Change the album of the song being edited.
    SetAlbum(Option<RelationRef>),
    /// Change the artists of the song being edited.
    SetArtists(Vec<RelationRef>),
    /// Submit the draft.
    Save,
    /// Delete the entity, the user has already confirmed.
    Delete,
    /// Drop the session.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    /// Set a new password for the signed-in user.
    ChangePassword(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Set the active view
    Set(ActiveView),
    /// Return to a previous view
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupAction {
    /// Open a popup
    Open(PopupType),
    /// Close the current popup
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    /// Move to the next component
    Next,
    /// Move to the previous component
    Previous,
    /// Set the active component
    Set(ActiveComponent),
}
