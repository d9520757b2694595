//! Handles the main application view logic and state.
//!
//! The `App` struct is responsible for rendering the state of the application to the terminal.
//! The app is updated every tick, and they use the state stores to get the latest state.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    text::Span,
    widgets::Block,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::state::{
    action::{Action, ComponentAction, GeneralAction, ViewAction},
    component::ActiveComponent,
};

use super::{
    AppState,
    colors::{APP_BORDER, APP_BORDER_TEXT, TEXT_NORMAL},
    components::{
        Component, ComponentRender, RenderProps, content_view::ContentView, sidebar::Sidebar,
    },
    widgets::popups::Popup,
};

#[must_use]
pub struct App {
    /// Action Sender
    pub action_tx: UnboundedSender<Action>,
    /// active component
    active_component: ActiveComponent,
    // Components that are always in view
    sidebar: Sidebar,
    content_view: ContentView,
    // (global) Components that are conditionally in view (popups)
    popup: Option<Box<dyn Popup>>,
}

impl App {
    fn get_active_view_component(&self) -> &dyn Component {
        match self.active_component {
            ActiveComponent::Sidebar => &self.sidebar,
            ActiveComponent::ContentView => &self.content_view,
        }
    }

    fn get_active_view_component_mut(&mut self) -> &mut dyn Component {
        match self.active_component {
            ActiveComponent::Sidebar => &mut self.sidebar,
            ActiveComponent::ContentView => &mut self.content_view,
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the data view
    pub fn move_with_listing(self, state: &AppState) -> Self {
        let new = self.content_view.data_view.move_with_state(state);
        Self {
            content_view: ContentView {
                data_view: new,
                ..self.content_view
            },
            ..self
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the edit view, which owns the relation pickers
    pub fn move_with_search(self, state: &AppState) -> Self {
        let new = self.content_view.edit_view.move_with_state(state);
        Self {
            content_view: ContentView {
                edit_view: new,
                ..self.content_view
            },
            ..self
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the edit view
    pub fn move_with_editor(self, state: &AppState) -> Self {
        let new = self.content_view.edit_view.move_with_state(state);
        Self {
            content_view: ContentView {
                edit_view: new,
                ..self.content_view
            },
            ..self
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the content view
    pub fn move_with_view(self, state: &AppState) -> Self {
        let content_view = self.content_view.move_with_state(state);
        Self {
            content_view,
            ..self
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the active component
    pub fn move_with_component(self, state: &AppState) -> Self {
        Self {
            active_component: state.active_component,
            ..self
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the popup
    pub fn move_with_popup(self, popup: Option<Box<dyn Popup>>) -> Self {
        Self { popup, ..self }
    }
}

impl Component for App {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            action_tx: action_tx.clone(),
            active_component: state.active_component,
            //
            sidebar: Sidebar::new(state, action_tx.clone()),
            content_view: ContentView::new(state, action_tx),
            //
            popup: None,
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        Self {
            sidebar: self.sidebar.move_with_state(state),
            content_view: self.content_view.move_with_state(state),
            popup: self.popup.map(|popup| {
                let mut popup = popup;
                popup.update_with_state(state);
                popup
            }),
            ..self
        }
    }

    // defer to the active component
    fn name(&self) -> &str {
        self.get_active_view_component().name()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // ctrl-c always quits, even with a popup open
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.action_tx
                .send(Action::General(GeneralAction::Exit))
                .ok();
            return;
        }

        // if there is a popup, defer all key handling to it.
        if let Some(popup) = self.popup.as_mut() {
            popup.handle_key_event(key, &self.action_tx);
            return;
        }

        // if it's a navigation command, handle it here.
        // otherwise, defer to the active component
        match key.code {
            // cycle through the components
            KeyCode::Tab => {
                self.action_tx
                    .send(Action::ActiveComponent(ComponentAction::Next))
                    .ok();
            }
            KeyCode::BackTab => {
                self.action_tx
                    .send(Action::ActiveComponent(ComponentAction::Previous))
                    .ok();
            }
            // the content view decides for itself what esc means
            KeyCode::Esc if self.active_component == ActiveComponent::Sidebar => {
                self.action_tx
                    .send(Action::ActiveView(ViewAction::Back))
                    .ok();
            }
            // defer to the active component
            _ => self.get_active_view_component_mut().handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        // popups are keyboard driven
        if self.popup.is_some() {
            return;
        }

        // adjust area to exclude the border
        let area = area.inner(Margin::new(1, 1));

        // defer to the component that the mouse is in
        let mouse_position = Position::new(mouse.column, mouse.row);
        let Areas {
            sidebar,
            content_view,
        } = split_area(area);

        if sidebar.contains(mouse_position) {
            self.sidebar.handle_mouse_event(mouse, sidebar);
        } else if content_view.contains(mouse_position) {
            self.content_view.handle_mouse_event(mouse, content_view);
        }
    }
}

#[derive(Debug)]
struct Areas {
    pub sidebar: Rect,
    pub content_view: Rect,
}

fn split_area(area: Rect) -> Areas {
    let [sidebar, content_view] =
        Layout::horizontal([Constraint::Length(20), Constraint::Fill(1)]).areas(area);

    Areas {
        sidebar,
        content_view,
    }
}

impl ComponentRender<Rect> for App {
    fn render_border(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        let block = Block::bordered()
            .title_top(Span::styled(
                "DISTRO",
                Style::default().bold().fg(APP_BORDER_TEXT),
            ))
            .title_bottom(Span::styled(
                "Tab/Shift+Tab to switch focus | Esc to go back | Ctrl+C to quit",
                Style::default().fg(APP_BORDER_TEXT),
            ))
            .border_style(Style::default().fg(APP_BORDER))
            .style(Style::default().fg(TEXT_NORMAL));
        let app_area = block.inner(area);
        debug_assert_eq!(area.inner(Margin::new(1, 1)), app_area);

        frame.render_widget(block, area);
        app_area
    }

    fn render_content(&self, frame: &mut Frame<'_>, area: Rect) {
        let Areas {
            sidebar,
            content_view,
        } = split_area(area);

        // figure out the active component, and give it a different colored border
        let (sidebar_focused, content_view_focused) = match self.active_component {
            ActiveComponent::Sidebar => (true, false),
            ActiveComponent::ContentView => (false, true),
        };

        // render the sidebar
        self.sidebar.render(
            frame,
            RenderProps {
                area: sidebar,
                is_focused: sidebar_focused,
            },
        );

        // render the content view
        self.content_view.render(
            frame,
            RenderProps {
                area: content_view,
                is_focused: content_view_focused,
            },
        );

        // render the popup if there is one
        if let Some(popup) = &self.popup {
            popup.render_popup(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::{action::PopupAction, listing::ListingStatus},
        test_utils::{loaded_song, setup_test_terminal, state_with_songs},
        ui::{
            components::content_view::ActiveView,
            widgets::popups::{
                PopupType,
                notification::{Notice, Notification},
            },
        },
    };
    use distro_core::entity::{EditKind, EntityKind, Id};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tokio::sync::mpsc::unbounded_channel;

    fn notification() -> Box<dyn Popup> {
        Box::new(Notification::new(Notice::Success("Hello, World!".into())))
    }

    #[rstest]
    #[case::tab(KeyEvent::from(KeyCode::Tab), Action::ActiveComponent(ComponentAction::Next))]
    #[case::back_tab(
        KeyEvent::from(KeyCode::BackTab),
        Action::ActiveComponent(ComponentAction::Previous)
    )]
    #[case::esc(KeyEvent::from(KeyCode::Esc), Action::ActiveView(ViewAction::Back))]
    #[case::quit(
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Action::General(GeneralAction::Exit)
    )]
    fn test_actions(#[case] key: KeyEvent, #[case] expected: Action) {
        let (tx, mut rx) = unbounded_channel();
        let mut app = App::new(&AppState::default(), tx);

        app.handle_key_event(key);

        let action = rx.try_recv().unwrap();

        assert_eq!(action, expected);
    }

    #[rstest]
    #[case::sidebar(ActiveComponent::Sidebar)]
    #[case::content_view(ActiveComponent::ContentView)]
    fn smoke_render(
        #[case] active_component: ActiveComponent,
        #[values(
            ActiveView::None,
            ActiveView::List(EntityKind::Song),
            ActiveView::Edit(EditKind::Song, Id::from(2))
        )]
        active_view: ActiveView,
    ) {
        let (tx, _) = unbounded_channel();
        let app = App::new(
            &AppState {
                active_component,
                active_view,
                editor: Some(loaded_song()),
                ..state_with_songs()
            },
            tx,
        );

        let (mut terminal, area) = setup_test_terminal(100, 40);
        let completed_frame = terminal.draw(|frame| app.render(frame, area));

        assert!(completed_frame.is_ok());
    }

    #[rstest]
    #[case::sidebar(ActiveComponent::Sidebar)]
    #[case::content_view(ActiveComponent::ContentView)]
    fn test_popup_takes_over_key_events(#[case] active_component: ActiveComponent) {
        let (tx, mut rx) = unbounded_channel();
        let mut app = App::new(
            &AppState {
                active_component,
                ..Default::default()
            },
            tx,
        );

        let (mut terminal, area) = setup_test_terminal(100, 40);
        let pre_popup = terminal.draw(|frame| app.render(frame, area)).unwrap().buffer.clone();

        app = app.move_with_popup(Some(notification()));

        let (mut terminal, area) = setup_test_terminal(100, 40);
        let post_popup = terminal.draw(|frame| app.render(frame, area)).unwrap().buffer.clone();

        // assert that the popup is rendered
        assert!(!pre_popup.diff(&post_popup).is_empty());

        // tab doesn't reach the components
        app.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert!(rx.try_recv().is_err());

        // now, send a Esc key event to the app
        app.handle_key_event(KeyEvent::from(KeyCode::Esc));

        // assert that we received a close popup action
        assert_eq!(rx.try_recv().unwrap(), Action::Popup(PopupAction::Close));

        // close the popup (the action handler isn't running so we have to do it manually)
        app = app.move_with_popup(None);

        let (mut terminal, area) = setup_test_terminal(100, 40);
        let post_close = terminal.draw(|frame| app.render(frame, area)).unwrap().buffer.clone();

        // assert that the popup is no longer rendered
        assert!(pre_popup.diff(&post_close).is_empty());
    }

    #[test]
    fn test_move_with_listing() {
        let (tx, _) = unbounded_channel();
        let state = AppState {
            active_component: ActiveComponent::ContentView,
            active_view: ActiveView::List(EntityKind::Song),
            ..Default::default()
        };
        let mut app = App::new(&state, tx);

        let state = AppState {
            active_view: ActiveView::List(EntityKind::Song),
            ..state_with_songs()
        };
        app = app.move_with_listing(&state);

        assert_eq!(app.content_view.data_view.props.status, ListingStatus::Ready);
        assert_eq!(app.content_view.data_view.listing.rows().len(), 3);
    }

    #[test]
    fn test_move_with_view() {
        let (tx, _) = unbounded_channel();
        let state = AppState {
            active_component: ActiveComponent::ContentView,
            active_view: ActiveView::List(EntityKind::Song),
            ..Default::default()
        };
        let mut app = App::new(&state, tx);

        let state = AppState {
            active_view: ActiveView::Edit(EditKind::Song, Id::from(2)),
            ..state
        };
        app = app.move_with_view(&state);

        assert_eq!(app.content_view.props.active_view, state.active_view);
    }

    #[test]
    fn test_move_with_component() {
        let (tx, _) = unbounded_channel();
        let app = App::new(&AppState::default(), tx);

        assert_eq!(app.active_component, ActiveComponent::Sidebar);

        let state = AppState {
            active_component: ActiveComponent::ContentView,
            ..Default::default()
        };
        let app = app.move_with_component(&state);

        assert_eq!(app.active_component, ActiveComponent::ContentView);
    }

    #[test]
    fn test_move_with_popup() {
        let (tx, _) = unbounded_channel();
        let app = App::new(&AppState::default(), tx.clone());

        assert!(app.popup.is_none());

        let app = app.move_with_popup(Some(PopupType::ChangePassword.into_popup(tx)));

        assert!(app.popup.is_some());
    }

    #[rstest]
    #[case::sidebar(ActiveComponent::Sidebar, "Sidebar")]
    // the content view defers its `name()` to the active view
    #[case::content_view(ActiveComponent::ContentView, "None")]
    fn test_get_active_view_component(
        #[case] active_component: ActiveComponent,
        #[case] expected: &str,
    ) {
        let (tx, _) = unbounded_channel();
        let state = AppState {
            active_component,
            ..Default::default()
        };
        let mut app = App::new(&state, tx);

        assert_eq!(app.get_active_view_component().name(), expected);
        assert_eq!(app.get_active_view_component_mut().name(), expected);
    }

    #[test]
    fn test_click_to_focus() {
        let (tx, mut rx) = unbounded_channel();
        let mut app = App::new(&AppState::default(), tx);
        let (_, area) = setup_test_terminal(100, 40);
        let click = |column, row| MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        };

        // the spacer, so the sidebar only takes focus
        app.handle_mouse_event(click(2, 7), area);
        assert_eq!(
            rx.try_recv().unwrap(),
            Action::ActiveComponent(ComponentAction::Set(ActiveComponent::Sidebar))
        );
        assert!(rx.try_recv().is_err());

        app.handle_mouse_event(click(50, 10), area);
        assert_eq!(
            rx.try_recv().unwrap(),
            Action::ActiveComponent(ComponentAction::Set(ActiveComponent::ContentView))
        );
    }
}
