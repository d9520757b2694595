//! Reports how something the user started in the background turned out.

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    prelude::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::Paragraph,
};

use crate::ui::{
    AppState,
    colors::{POPUP_BORDER, TEXT_ERROR, TEXT_NORMAL},
    components::ComponentRender,
};

use super::{Popup, centered};

/// The outcome of a background request, and what to tell the user about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

pub struct Notification {
    notice: Notice,
}

impl Notification {
    #[must_use]
    pub const fn new(notice: Notice) -> Self {
        Self { notice }
    }

    fn text(&self) -> Text<'_> {
        Text::raw(self.notice.message())
    }
}

impl ComponentRender<Rect> for Notification {
    fn render_border(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        self.render_popup_border(frame, area)
    }

    fn render_content(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(
            Paragraph::new(self.text()).style(Style::default().fg(TEXT_NORMAL)),
            area,
        );
    }
}

impl Popup for Notification {
    fn title(&self) -> Line<'_> {
        if self.notice.is_failure() {
            Line::raw("Failed")
        } else {
            Line::raw("Done")
        }
    }

    fn instructions(&self) -> Line<'_> {
        Line::raw("Esc: close")
    }

    fn border_color(&self) -> Color {
        if self.notice.is_failure() {
            TEXT_ERROR
        } else {
            POPUP_BORDER
        }
    }

    fn update_with_state(&mut self, _: &AppState) {}

    fn area(&self, terminal_area: Rect) -> Rect {
        let text = self.text();
        let widest = text
            .width()
            .max(self.instructions().width())
            .max(self.title().width());
        // 2 for the border
        let width = u16::try_from(widest + 2).unwrap_or(u16::MAX);
        let height = u16::try_from(text.height() + 2).unwrap_or(u16::MAX);
        centered(terminal_area, width, height)
    }

    fn inner_handle_key_event(&mut self, _key: KeyEvent) {}
}
