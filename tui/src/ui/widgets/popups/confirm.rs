//! Asks the user to confirm deleting the entity being edited.

use crossterm::event::{KeyCode, KeyEvent};
use distro_core::entity::{EditKind, Id};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Text},
    widgets::{Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::action::{Action, EditorAction, PopupAction},
    ui::{AppState, colors::TEXT_ERROR, components::ComponentRender},
};

use super::{Popup, centered};

pub struct ConfirmDelete {
    kind: EditKind,
    id: Id,
    name: String,
    action_tx: UnboundedSender<Action>,
}

impl ConfirmDelete {
    #[must_use]
    pub const fn new(
        kind: EditKind,
        id: Id,
        name: String,
        action_tx: UnboundedSender<Action>,
    ) -> Self {
        Self {
            kind,
            id,
            name,
            action_tx,
        }
    }

    fn message(&self) -> Text<'_> {
        Text::from(vec![
            Line::from(format!(
                "Delete {} \"{}\" ({})?",
                self.kind.heading().to_lowercase(),
                self.name,
                self.id
            )),
            Line::from("This cannot be undone.").bold(),
        ])
    }
}

impl ComponentRender<Rect> for ConfirmDelete {
    fn render_border(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        self.render_popup_border(frame, area)
    }

    fn render_content(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(
            Paragraph::new(self.message())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Popup for ConfirmDelete {
    fn title(&self) -> Line<'_> {
        Line::from(format!("Delete {}", self.kind.heading())).bold()
    }

    fn instructions(&self) -> Line<'_> {
        Line::raw("y/Enter: Delete | n/Esc: Cancel")
    }

    fn border_color(&self) -> Color {
        TEXT_ERROR
    }

    fn area(&self, terminal_area: Rect) -> Rect {
        let width = u16::try_from(self.message().width() + 4)
            .unwrap_or(u16::MAX)
            .max(36);
        centered(terminal_area, width, 4)
    }

    fn update_with_state(&mut self, _: &AppState) {}

    fn inner_handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                self.action_tx
                    .send(Action::Editor(EditorAction::Delete))
                    .ok();
                self.action_tx.send(Action::Popup(PopupAction::Close)).ok();
            }
            KeyCode::Char('n' | 'N') => {
                self.action_tx.send(Action::Popup(PopupAction::Close)).ok();
            }
            _ => {}
        }
    }
}
