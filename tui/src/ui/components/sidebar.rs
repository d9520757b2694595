//! Implement the sidebar component.
//!
//! Responsible for allowing users to navigate between the entity listings.

use std::fmt::Display;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use distro_core::entity::EntityKind;
use ratatui::{
    Frame,
    layout::{Alignment, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::{
        action::{Action, ComponentAction, PopupAction, ViewAction},
        component::ActiveComponent,
    },
    ui::{
        AppState,
        colors::{TEXT_HIGHLIGHT, TEXT_NORMAL, border_color},
        components::{Component, ComponentRender, RenderProps},
        widgets::popups::PopupType,
    },
};

use super::content_view::ActiveView;

#[allow(clippy::module_name_repetitions)]
pub struct Sidebar {
    /// Action Sender
    pub action_tx: UnboundedSender<Action>,
    /// List state
    list_state: ListState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SidebarItem {
    Listing(EntityKind),
    Space, // this is used to create space between the listings and the account items
    ChangePassword,
}

impl Display for SidebarItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listing(kind) => write!(f, "{}", kind.title()),
            Self::Space => write!(f, ""),
            Self::ChangePassword => write!(f, "Change Password"),
        }
    }
}

const SIDEBAR_ITEMS: [SidebarItem; 7] = [
    SidebarItem::Listing(EntityKind::Song),
    SidebarItem::Listing(EntityKind::Album),
    SidebarItem::Listing(EntityKind::Artist),
    SidebarItem::Listing(EntityKind::Playlist),
    SidebarItem::Listing(EntityKind::User),
    SidebarItem::Space,
    SidebarItem::ChangePassword,
];

impl Sidebar {
    fn activate(&self, item: SidebarItem) {
        let action = match item {
            SidebarItem::Listing(kind) => {
                Action::ActiveView(ViewAction::Set(ActiveView::List(kind)))
            }
            SidebarItem::ChangePassword => {
                Action::Popup(PopupAction::Open(PopupType::ChangePassword))
            }
            SidebarItem::Space => return,
        };
        self.action_tx.send(action).ok();
    }
}

impl Component for Sidebar {
    fn new(_state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            action_tx,
            list_state: ListState::default(),
        }
    }

    fn move_with_state(self, _state: &AppState) -> Self
    where
        Self: Sized,
    {
        self
    }

    fn name(&self) -> &'static str {
        "Sidebar"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            // move the selected index up
            KeyCode::Up => {
                let new_selected = match self.list_state.selected() {
                    Some(0) | None => SIDEBAR_ITEMS.len() - 1,
                    Some(selected) => selected - 1,
                };
                self.list_state.select(Some(new_selected));
            }
            // move the selected index down
            KeyCode::Down => {
                let new_selected = match self.list_state.selected() {
                    Some(selected) if selected < SIDEBAR_ITEMS.len() - 1 => selected + 1,
                    _ => 0,
                };
                self.list_state.select(Some(new_selected));
            }
            // select the current item
            KeyCode::Enter => {
                if let Some(selected) = self.list_state.selected() {
                    self.activate(SIDEBAR_ITEMS[selected]);
                }
            }
            _ => {}
        }
    }

    /// Clicking an item selects and activates it.
    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        let MouseEvent {
            kind, column, row, ..
        } = mouse;
        let mouse_position = Position::new(column, row);

        if kind != MouseEventKind::Down(MouseButton::Left) || !area.contains(mouse_position) {
            return;
        }
        self.action_tx
            .send(Action::ActiveComponent(ComponentAction::Set(
                ActiveComponent::Sidebar,
            )))
            .ok();

        // the items start below the top border
        let index = usize::from(row.saturating_sub(area.y + 1));
        if index < SIDEBAR_ITEMS.len() {
            self.list_state.select(Some(index));
            self.activate(SIDEBAR_ITEMS[index]);
        }
    }
}

impl ComponentRender<RenderProps> for Sidebar {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let border_style = Style::default().fg(border_color(props.is_focused));

        let border = Block::bordered()
            .title_top("Sidebar")
            .title_bottom(Line::from("Enter: Select").alignment(Alignment::Center))
            .border_style(border_style);
        frame.render_widget(&border, props.area);
        let area = border.inner(props.area);
        let border = Block::default()
            .borders(Borders::BOTTOM)
            .title_bottom(Line::from("↑/↓: Move").alignment(Alignment::Center))
            .border_style(border_style);
        frame.render_widget(&border, area);
        let area = border.inner(area);
        RenderProps {
            area,
            is_focused: props.is_focused,
        }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        let items = SIDEBAR_ITEMS
            .iter()
            .map(|item| {
                ListItem::new(Span::styled(
                    item.to_string(),
                    Style::default().fg(TEXT_NORMAL),
                ))
            })
            .collect::<Vec<_>>();

        frame.render_stateful_widget(
            List::new(items).highlight_style(
                Style::default()
                    .fg(TEXT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            props.area,
            &mut self.list_state.clone(),
        );
    }
}
