pub mod confirm;
pub mod notification;
pub mod password;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use distro_core::entity::{EditKind, Id};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Clear},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::action::{Action, PopupAction},
    ui::{AppState, colors::POPUP_BORDER, components::ComponentRender},
};

pub trait Popup: ComponentRender<Rect> + Send + Sync {
    fn title(&self) -> Line<'_>;
    fn instructions(&self) -> Line<'_>;
    /// The area needed for the popup to render.
    fn area(&self, terminal_area: Rect) -> Rect;

    /// override this method to change the border color of the popup
    fn border_color(&self) -> Color {
        POPUP_BORDER
    }

    fn update_with_state(&mut self, state: &AppState);

    /// Key Event Handler for the inner component of the popup,
    /// this method is called when the key event is not the escape key.
    fn inner_handle_key_event(&mut self, key: KeyEvent);

    /// Use this method to handle key events for the popup.
    ///
    /// It defers most of the key handling to the component implementing the popup, but
    /// it handles making the escape key close the popup.
    fn handle_key_event(&mut self, key: KeyEvent, action_tx: &UnboundedSender<Action>) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                action_tx.send(Action::Popup(PopupAction::Close)).ok();
            }
            _ => self.inner_handle_key_event(key),
        }
    }

    fn render_popup_border(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        let title = self.title();
        let instructions = self.instructions();

        // Draw border with title and instructions
        let border = Block::bordered()
            .title_top(title)
            .title_bottom(instructions)
            .border_style(Style::default().fg(self.border_color()));
        let component_area = border.inner(area);
        frame.render_widget(border, area);
        component_area
    }

    /// Use this method to handle rendering the popup.
    ///
    /// It draws a border with the given title and instructions and
    /// renders the component implementing popup.
    fn render_popup(&self, frame: &mut Frame<'_>) {
        let area = self.area(frame.area());

        // clear the popup area
        frame.render_widget(Clear, area);

        self.render(frame, area);
    }
}

/// A centered area of at most `width` by `height`.
#[must_use]
pub fn centered(terminal_area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(terminal_area.width);
    let height = height.min(terminal_area.height);
    Rect::new(
        terminal_area.x + (terminal_area.width - width) / 2,
        terminal_area.y + (terminal_area.height - height) / 2,
        width,
        height,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupType {
    Notification(notification::Notice),
    /// Ask before deleting the entity being edited.
    ConfirmDelete { kind: EditKind, id: Id, name: String },
    ChangePassword,
}

impl PopupType {
    #[must_use]
    pub fn into_popup(self, action_tx: UnboundedSender<Action>) -> Box<dyn Popup> {
        match self {
            Self::Notification(notice) => Box::new(notification::Notification::new(notice)) as _,
            Self::ConfirmDelete { kind, id, name } => {
                Box::new(confirm::ConfirmDelete::new(kind, id, name, action_tx)) as _
            }
            Self::ChangePassword => Box::new(password::ChangePassword::new(action_tx)) as _,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Rect::new(0, 0, 100, 50), 40, 10, Rect::new(30, 20, 40, 10))]
    #[case(Rect::new(0, 0, 30, 8), 40, 10, Rect::new(0, 0, 30, 8))]
    #[case(Rect::new(5, 5, 10, 10), 4, 2, Rect::new(8, 9, 4, 2))]
    fn test_centered(
        #[case] terminal: Rect,
        #[case] width: u16,
        #[case] height: u16,
        #[case] expected: Rect,
    ) {
        assert_eq!(centered(terminal, width, height), expected);
    }

    #[test]
    fn test_escape_closes_any_popup() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        for popup in [
            PopupType::Notification(notification::Notice::Success("hi".into())),
            PopupType::ConfirmDelete {
                kind: EditKind::Album,
                id: Id::from(3),
                name: "Meddle".into(),
            },
            PopupType::ChangePassword,
        ] {
            let mut popup = popup.into_popup(tx.clone());
            popup.handle_key_event(KeyEvent::from(KeyCode::Esc), &tx);
            assert_eq!(rx.try_recv().unwrap(), Action::Popup(PopupAction::Close));
            assert!(rx.try_recv().is_err());
        }
    }
}
