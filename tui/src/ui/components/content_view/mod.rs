//! The content view displays the contents of the current view (e.g. the rows of a collection, or the edit form of one entity).

pub mod views;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use distro_core::entity::{EditKind, EntityKind, Id};
use ratatui::{
    Frame,
    layout::{Position, Rect},
};
use tokio::sync::mpsc::UnboundedSender;
use views::{data::DataView, edit::EditView, none::NoneView};

use crate::{
    state::{
        action::{Action, ComponentAction, ViewAction},
        component::ActiveComponent,
    },
    ui::AppState,
};

use super::{Component, ComponentRender, RenderProps};

pub struct ContentView {
    pub(crate) props: Props,
    //
    pub(crate) none_view: NoneView,
    pub(crate) data_view: DataView,
    pub(crate) edit_view: EditView,
    //
    pub(crate) action_tx: UnboundedSender<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Props {
    pub(crate) active_view: ActiveView,
}

impl From<&AppState> for Props {
    fn from(value: &AppState) -> Self {
        Self {
            active_view: value.active_view.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveView {
    /// Blank view.
    #[default]
    None,
    /// The rows of one collection.
    List(EntityKind),
    /// The edit form of one entity.
    Edit(EditKind, Id),
}

impl ContentView {
    fn get_active_view_component(&self) -> &dyn Component {
        match &self.props.active_view {
            ActiveView::None => &self.none_view,
            ActiveView::List(_) => &self.data_view,
            ActiveView::Edit(_, _) => &self.edit_view,
        }
    }

    fn get_active_view_component_mut(&mut self) -> &mut dyn Component {
        match &self.props.active_view {
            ActiveView::None => &mut self.none_view,
            ActiveView::List(_) => &mut self.data_view,
            ActiveView::Edit(_, _) => &mut self.edit_view,
        }
    }

    /// Whether the active view wants Esc for itself, rather than going back.
    fn captures_esc(&self) -> bool {
        match &self.props.active_view {
            ActiveView::None => false,
            ActiveView::List(_) => self.data_view.captures_esc(),
            ActiveView::Edit(_, _) => self.edit_view.captures_esc(),
        }
    }
}

impl Component for ContentView {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            props: Props::from(state),
            none_view: NoneView::new(state, action_tx.clone()),
            data_view: DataView::new(state, action_tx.clone()),
            edit_view: EditView::new(state, action_tx.clone()),
            action_tx,
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        Self {
            props: Props::from(state),
            none_view: self.none_view.move_with_state(state),
            data_view: self.data_view.move_with_state(state),
            edit_view: self.edit_view.move_with_state(state),
            action_tx: self.action_tx,
        }
    }

    fn name(&self) -> &str {
        self.get_active_view_component().name()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        // handle back navigation first
        if key.code == KeyCode::Esc && !self.captures_esc() {
            self.action_tx
                .send(Action::ActiveView(ViewAction::Back))
                .ok();
            return;
        }

        // defer to active view
        self.get_active_view_component_mut().handle_key_event(key);
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        let mouse_position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if area.contains(mouse_position) => {
                self.action_tx
                    .send(Action::ActiveComponent(ComponentAction::Set(
                        ActiveComponent::ContentView,
                    )))
                    .ok();
            }
            // this returns because going back changes the active view
            MouseEventKind::Down(MouseButton::Right) if area.contains(mouse_position) => {
                self.action_tx
                    .send(Action::ActiveView(ViewAction::Back))
                    .ok();
                return;
            }
            _ => {}
        }

        // defer to active view
        self.get_active_view_component_mut()
            .handle_mouse_event(mouse, area);
    }
}

impl ComponentRender<RenderProps> for ContentView {
    /// we defer all border rendering to the active view
    fn render_border(&self, _: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        props
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        match &self.props.active_view {
            ActiveView::None => self.none_view.render(frame, props),
            ActiveView::List(_) => self.data_view.render(frame, props),
            ActiveView::Edit(_, _) => self.edit_view.render(frame, props),
        }
    }
}
