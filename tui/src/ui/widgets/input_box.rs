//! Implementation of a single line text input

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    widgets::{Block, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use unicode_width::UnicodeWidthStr;

use crate::{
    state::action::Action,
    ui::{
        AppState,
        components::{Component, ComponentRender},
    },
};

const MASK: char = '•';

#[derive(Debug, Default)]
pub struct InputBox {
    /// Current value of the input box
    text: String,
    /// Position of cursor in the editor area, in chars.
    cursor_position: usize,
    /// Render every char as [`MASK`].
    masked: bool,
}

impl InputBox {
    /// An input box that doesn't show what's typed into it.
    #[must_use]
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, new_text: &str) {
        self.text = String::from(new_text);
        self.cursor_position = self.char_count();
    }

    pub fn reset(&mut self) {
        self.cursor_position = 0;
        self.text.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// The byte index of the char the cursor is on.
    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.text.len())
    }

    fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }

    fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }

    fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.text.insert(index, new_char);

        self.move_cursor_right();
    }

    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.move_cursor_left();
        let index = self.byte_index();
        self.text.remove(index);
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.char_count())
    }

    /// What gets drawn, the text or its mask.
    fn display(&self) -> String {
        if self.masked {
            std::iter::repeat_n(MASK, self.char_count()).collect()
        } else {
            self.text.clone()
        }
    }

    /// Width of everything left of the cursor, as drawn.
    fn cursor_offset(&self) -> usize {
        let display = self.display();
        let end = display
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(display.len());
        display[..end].width()
    }
}

impl Component for InputBox {
    fn new(_state: &AppState, _action_tx: UnboundedSender<Action>) -> Self {
        Self::default()
    }

    fn move_with_state(self, _state: &AppState) -> Self
    where
        Self: Sized,
    {
        self
    }

    fn name(&self) -> &'static str {
        "Input Box"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char(to_insert) => {
                self.enter_char(to_insert);
            }
            KeyCode::Backspace => {
                self.delete_char();
            }
            KeyCode::Left => {
                self.move_cursor_left();
            }
            KeyCode::Right => {
                self.move_cursor_right();
            }
            KeyCode::Home => {
                self.cursor_position = 0;
            }
            KeyCode::End => {
                self.cursor_position = self.char_count();
            }
            _ => {}
        }
    }

    /// Handle mouse events
    ///
    /// moves the cursor to the clicked position
    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        let MouseEvent {
            kind, column, row, ..
        } = mouse;
        let mouse_position = Position::new(column, row);

        if !area.contains(mouse_position) {
            return;
        }

        if kind == crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left) {
            // NOTE: this assumes that the border is 1 character wide
            let mouse_x = mouse_position.x.saturating_sub(area.x + 1) as usize;

            self.cursor_position = self.clamp_cursor(mouse_x);
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderProps<'a> {
    pub border: Block<'a>,
    pub area: Rect,
    pub text_color: ratatui::style::Color,
    pub show_cursor: bool,
}

impl<'a> ComponentRender<RenderProps<'a>> for InputBox {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps<'a>) -> RenderProps<'a> {
        let view_area = props.border.inner(props.area);
        frame.render_widget(&props.border, props.area);
        RenderProps {
            area: view_area,
            ..props
        }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps<'a>) {
        let input = Paragraph::new(self.display()).style(Style::default().fg(props.text_color));
        frame.render_widget(input, props.area);

        if props.show_cursor {
            let offset = u16::try_from(self.cursor_offset()).unwrap_or(u16::MAX);
            frame.set_cursor_position(Position::new(
                props.area.x.saturating_add(offset),
                props.area.y,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{buffer_text, setup_test_terminal};

    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;
    use rstest::rstest;

    #[test]
    fn test_input_box() {
        let mut input_box = InputBox::default();

        input_box.enter_char('a');
        assert_eq!(input_box.text, "a");
        assert_eq!(input_box.cursor_position, 1);

        input_box.enter_char('b');
        input_box.enter_char('c');
        assert_eq!(input_box.text, "abc");
        assert_eq!(input_box.cursor_position, 3);

        input_box.move_cursor_left();
        assert_eq!(input_box.cursor_position, 2);

        input_box.delete_char();
        assert_eq!(input_box.text, "ac");
        assert_eq!(input_box.cursor_position, 1);

        input_box.enter_char('d');
        assert_eq!(input_box.text, "adc");
        assert_eq!(input_box.cursor_position, 2);

        input_box.move_cursor_right();
        input_box.move_cursor_right();
        assert_eq!(input_box.cursor_position, 3);

        input_box.reset();
        assert_eq!(input_box.text, "");
        assert_eq!(input_box.cursor_position, 0);

        input_box.delete_char();
        assert_eq!(input_box.text, "");
        assert_eq!(input_box.cursor_position, 0);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input_box = InputBox::default();
        input_box.set_text("Björk");
        assert_eq!(input_box.cursor_position, 5);

        input_box.handle_key_event(KeyEvent::from(KeyCode::Left));
        input_box.handle_key_event(KeyEvent::from(KeyCode::Left));
        input_box.handle_key_event(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(input_box.text(), "Bjrk");

        input_box.handle_key_event(KeyEvent::from(KeyCode::Char('ö')));
        assert_eq!(input_box.text(), "Björk");
        assert_eq!(input_box.cursor_position, 3);
    }

    #[rstest]
    #[case(KeyCode::Home, 0)]
    #[case(KeyCode::End, 5)]
    #[case(KeyCode::Right, 5)]
    #[case(KeyCode::Left, 4)]
    fn test_cursor_keys(#[case] key: KeyCode, #[case] expected: usize) {
        let mut input_box = InputBox::default();
        input_box.set_text("hello");
        input_box.handle_key_event(KeyEvent::from(key));
        assert_eq!(input_box.cursor_position, expected);
    }

    #[test]
    fn test_render_masked() {
        let mut input_box = InputBox::masked();
        input_box.set_text("hunter2");

        let (mut terminal, area) = setup_test_terminal(12, 3);
        let buffer = terminal
            .draw(|frame| {
                input_box.render(
                    frame,
                    RenderProps {
                        border: Block::bordered(),
                        area,
                        text_color: Color::White,
                        show_cursor: true,
                    },
                );
            })
            .unwrap()
            .buffer
            .clone();

        let text = buffer_text(&buffer);
        assert!(text.contains("•••••••"));
        assert!(!text.contains("hunter2"));
        assert_eq!(input_box.text(), "hunter2");
    }
}
