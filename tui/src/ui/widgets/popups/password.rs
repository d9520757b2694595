//! The popup for setting a new password for the signed-in user.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Block,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::action::{AccountAction, Action, PopupAction},
    ui::{
        AppState,
        colors::{TEXT_ERROR, TEXT_HIGHLIGHT, TEXT_NORMAL, border_color},
        components::{Component, ComponentRender},
        widgets::input_box::{self, InputBox},
    },
};

use super::{Popup, centered};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Password,
    Confirm,
}

pub struct ChangePassword {
    password: InputBox,
    confirm: InputBox,
    focus: Field,
    error: Option<&'static str>,
    action_tx: UnboundedSender<Action>,
}

impl ChangePassword {
    #[must_use]
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self {
            password: InputBox::masked(),
            confirm: InputBox::masked(),
            focus: Field::Password,
            error: None,
            action_tx,
        }
    }

    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Password => Field::Confirm,
            Field::Confirm => Field::Password,
        };
    }

    fn submit(&mut self) {
        if self.password.text().is_empty() {
            self.error = Some("password cannot be empty");
            return;
        }
        if self.password.text() != self.confirm.text() {
            self.error = Some("passwords do not match");
            return;
        }

        self.action_tx
            .send(Action::Account(AccountAction::ChangePassword(
                self.password.text().to_string(),
            )))
            .ok();
        self.action_tx.send(Action::Popup(PopupAction::Close)).ok();
    }

    fn render_input(&self, frame: &mut Frame<'_>, field: Field, area: Rect) {
        let (input, title) = match field {
            Field::Password => (&self.password, "New password"),
            Field::Confirm => (&self.confirm, "Confirm password"),
        };
        let is_focused = self.focus == field;
        input.render(
            frame,
            input_box::RenderProps {
                border: Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(border_color(is_focused))),
                area,
                text_color: if is_focused {
                    TEXT_HIGHLIGHT
                } else {
                    TEXT_NORMAL
                },
                show_cursor: is_focused,
            },
        );
    }
}

impl ComponentRender<Rect> for ChangePassword {
    fn render_border(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        self.render_popup_border(frame, area)
    }

    fn render_content(&self, frame: &mut Frame<'_>, area: Rect) {
        let [password, confirm, error] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_input(frame, Field::Password, password);
        self.render_input(frame, Field::Confirm, confirm);

        if let Some(message) = self.error {
            frame.render_widget(
                Line::styled(message, Style::default().fg(TEXT_ERROR)),
                error,
            );
        }
    }
}

impl Popup for ChangePassword {
    fn title(&self) -> Line<'_> {
        Line::raw("Change Password")
    }

    fn instructions(&self) -> Line<'_> {
        Line::raw("Tab: Switch field | Enter: Save | Esc: Cancel")
    }

    fn area(&self, terminal_area: Rect) -> Rect {
        centered(terminal_area, 50, 9)
    }

    fn update_with_state(&mut self, _: &AppState) {}

    fn inner_handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_focus(),
            KeyCode::Enter => self.submit(),
            _ => {
                self.error = None;
                match self.focus {
                    Field::Password => self.password.handle_key_event(key),
                    Field::Confirm => self.confirm.handle_key_event(key),
                }
            }
        }
    }
}
