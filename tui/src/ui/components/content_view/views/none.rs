//! the view shown before anything is picked from the sidebar

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Style, Stylize},
    text::{Line, Text},
    widgets::{Block, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::action::Action,
    ui::{
        AppState,
        colors::{TEXT_HIGHLIGHT_ALT, TEXT_NORMAL, border_color},
        components::{Component, ComponentRender, RenderProps},
    },
};

#[allow(clippy::module_name_repetitions)]
pub struct NoneView;

impl Component for NoneView {
    fn new(_state: &AppState, _action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self
    }

    fn move_with_state(self, _state: &AppState) -> Self
    where
        Self: Sized,
    {
        self
    }

    fn name(&self) -> &'static str {
        "None"
    }

    fn handle_key_event(&mut self, _key: KeyEvent) {
        // do nothing
    }
}

impl ComponentRender<RenderProps> for NoneView {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let border_style = Style::default().fg(border_color(props.is_focused));

        let block = Block::bordered().border_style(border_style);
        let area = block.inner(props.area);
        frame.render_widget(block, props.area);

        RenderProps { area, ..props }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        let text = Text::from(vec![
            Line::from("Distro Admin").bold().fg(TEXT_HIGHLIGHT_ALT),
            Line::from(""),
            Line::from("Pick a collection from the sidebar to browse it."),
        ])
        .style(Style::default().fg(TEXT_NORMAL));

        let [area] = Layout::vertical([Constraint::Length(3)])
            .flex(ratatui::layout::Flex::Center)
            .areas(props.area);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_text, setup_test_terminal};

    #[test]
    fn test_render() {
        let (tx, _) = tokio::sync::mpsc::unbounded_channel();
        let view = NoneView::new(&AppState::default(), tx);

        let (mut terminal, area) = setup_test_terminal(60, 9);
        let props = RenderProps {
            area,
            is_focused: true,
        };
        let buffer = terminal
            .draw(|frame| view.render(frame, props))
            .unwrap()
            .buffer
            .clone();
        let text = buffer_text(&buffer);

        assert!(text.contains("Distro Admin"));
        assert!(text.contains("Pick a collection from the sidebar to browse it."));
    }
}
