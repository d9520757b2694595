//! The listing of one entity collection, as a table.
//!
//! Columns come from the kind's descriptors, cells from the field accessor. Sorting and
//! filtering only change how the rows are presented, `o` always gets back to server order.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use distro_core::{
    entity::{EntityKind, Id},
    listing::{Listing, SortDirection, SortKey},
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Row, Table, TableState},
};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::{
        action::{Action, ListingAction, ViewAction},
        listing::ListingStatus,
    },
    ui::{
        AppState,
        colors::{TEXT_ERROR, TEXT_HIGHLIGHT, TEXT_HIGHLIGHT_ALT, TEXT_MUTED, TEXT_NORMAL, border_color},
        components::{Component, ComponentRender, RenderProps, content_view::ActiveView},
        widgets::input_box::{self, InputBox},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Props {
    pub kind: Option<EntityKind>,
    pub status: ListingStatus,
    pub generation: u64,
}

#[allow(clippy::module_name_repetitions)]
pub struct DataView {
    action_tx: UnboundedSender<Action>,
    pub(crate) props: Props,
    pub(crate) listing: Listing,
    table_state: TableState,
    /// The filter being typed, while the user is typing it.
    filter_input: Option<InputBox>,
    page_size: usize,
}

/// The per-row affordance: what pressing Enter on the row does, if anything.
fn row_action(kind: EntityKind, row: &Value) -> Option<ActiveView> {
    let edit_kind = kind.editable()?;
    let id = Id::from_row(row)?;
    Some(ActiveView::Edit(edit_kind, id))
}

impl DataView {
    /// Whether the view wants Esc for itself.
    #[must_use]
    pub const fn captures_esc(&self) -> bool {
        self.filter_input.is_some()
    }

    fn page_len(&self) -> usize {
        self.listing.page_rows().len()
    }

    fn reset_selection(&mut self) {
        self.table_state
            .select((self.page_len() > 0).then_some(0));
    }

    fn selected_row(&self) -> Option<&Value> {
        let index = self.table_state.selected()?;
        self.listing.page_rows().get(index).copied()
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(input) = self.filter_input.as_mut() else {
            return;
        };
        match key.code {
            // keep the filter
            KeyCode::Enter => self.filter_input = None,
            // drop it
            KeyCode::Esc => {
                self.filter_input = None;
                self.listing.set_filter("");
            }
            _ => {
                input.handle_key_event(key);
                let text = input.text().to_string();
                self.listing.set_filter(text);
            }
        }
        self.reset_selection();
    }
}

impl Component for DataView {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        let page_size = state.settings.tui.page_size;
        Self {
            action_tx,
            props: Props {
                kind: None,
                status: ListingStatus::Idle,
                generation: 0,
            },
            listing: Listing::new(Vec::new(), page_size),
            table_state: TableState::default(),
            filter_input: None,
            page_size,
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        let snapshot = &state.listing;
        if snapshot.generation == self.props.generation && snapshot.status == self.props.status {
            return self;
        }

        let mut listing = self.listing;
        let mut filter_input = self.filter_input;
        if snapshot.kind != self.props.kind {
            // a different collection, start from a clean slate
            listing = Listing::new(
                snapshot.kind.map(EntityKind::columns).unwrap_or_default(),
                self.page_size,
            );
            filter_input = None;
        }
        listing.set_rows(snapshot.rows.clone());

        let mut new = Self {
            props: Props {
                kind: snapshot.kind,
                status: snapshot.status.clone(),
                generation: snapshot.generation,
            },
            listing,
            filter_input,
            ..self
        };
        new.reset_selection();
        new
    }

    fn name(&self) -> &'static str {
        "Data View"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.filter_input.is_some() {
            self.handle_filter_key(key);
            return;
        }

        match key.code {
            KeyCode::Up => self.table_state.select_previous(),
            KeyCode::Down => {
                let next = self
                    .table_state
                    .selected()
                    .map_or(0, |i| (i + 1).min(self.page_len().saturating_sub(1)));
                self.table_state.select((self.page_len() > 0).then_some(next));
            }
            KeyCode::PageDown => {
                self.listing.next_page();
                self.reset_selection();
            }
            KeyCode::PageUp => {
                self.listing.prev_page();
                self.reset_selection();
            }
            KeyCode::Enter => {
                let target = self
                    .props
                    .kind
                    .zip(self.selected_row())
                    .and_then(|(kind, row)| row_action(kind, row));
                if let Some(view) = target {
                    self.action_tx
                        .send(Action::ActiveView(ViewAction::Set(view)))
                        .ok();
                }
            }
            KeyCode::Char('s') => {
                self.listing.cycle_sort();
                self.reset_selection();
            }
            KeyCode::Char('o') => {
                self.listing.restore_order();
                self.reset_selection();
            }
            KeyCode::Char('/') => {
                let mut input = InputBox::default();
                input.set_text(self.listing.filter());
                self.filter_input = Some(input);
            }
            KeyCode::Char('r') => {
                self.action_tx
                    .send(Action::Listing(ListingAction::Refresh))
                    .ok();
            }
            _ => {}
        }
    }
}

impl ComponentRender<RenderProps> for DataView {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let title = self.props.kind.map_or("Listing", EntityKind::title);
        let count = match self.props.status {
            ListingStatus::Ready => format!(" {} records", self.listing.rows().len()),
            _ => String::new(),
        };
        let editable = self.props.kind.and_then(EntityKind::editable).is_some();
        let instructions = if editable {
            "Enter: Edit | s: Sort | o: Server order | /: Filter | r: Refresh | PgUp/PgDn: Page"
        } else {
            "s: Sort | o: Server order | /: Filter | r: Refresh | PgUp/PgDn: Page"
        };

        let border = Block::bordered()
            .title_top(Line::from(vec![
                Span::styled(title, Style::default().bold()),
                Span::raw(count),
            ]))
            .title_bottom(Line::from(instructions).alignment(Alignment::Center))
            .border_style(Style::default().fg(border_color(props.is_focused)));
        let area = border.inner(props.area);
        frame.render_widget(border, props.area);
        RenderProps { area, ..props }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(props.area);

        let message = match &self.props.status {
            ListingStatus::Idle => None,
            ListingStatus::Loading => {
                Some(Line::styled("Loading...", Style::default().fg(TEXT_MUTED)))
            }
            ListingStatus::Failed(error) => {
                Some(Line::styled(error.clone(), Style::default().fg(TEXT_ERROR)))
            }
            ListingStatus::Ready if self.listing.rows().is_empty() => {
                Some(Line::styled("No records", Style::default().fg(TEXT_MUTED)))
            }
            ListingStatus::Ready => None,
        };
        if let Some(message) = message {
            frame.render_widget(
                Paragraph::new(message).alignment(Alignment::Center),
                table_area,
            );
        } else {
            self.render_table(frame, table_area);
        }

        // the footer: the filter being typed, or where we are
        if let Some(input) = &self.filter_input {
            let [prompt_area, input_area] =
                Layout::horizontal([Constraint::Length(2), Constraint::Min(1)]).areas(footer_area);
            frame.render_widget(Span::raw("/ "), prompt_area);
            input.render(
                frame,
                input_box::RenderProps {
                    border: Block::new(),
                    area: input_area,
                    text_color: TEXT_HIGHLIGHT,
                    show_cursor: props.is_focused,
                },
            );
        } else {
            let mut footer = vec![Span::raw(format!(
                "Page {}/{}",
                self.listing.page() + 1,
                self.listing.page_count()
            ))];
            if !self.listing.filter().is_empty() {
                footer.push(Span::raw(format!(" | filter: {}", self.listing.filter())));
            }
            if self.listing.sort().is_none() {
                footer.push(Span::raw(" | server order"));
            }
            frame.render_widget(
                Line::from(footer).style(Style::default().fg(TEXT_MUTED)),
                footer_area,
            );
        }
    }
}

impl DataView {
    fn render_table(&self, frame: &mut Frame<'_>, area: ratatui::layout::Rect) {
        let Some(kind) = self.props.kind else {
            return;
        };
        let editable = kind.editable().is_some();

        let header = self
            .listing
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let arrow = match self.listing.sort() {
                    Some(SortKey {
                        column: sorted,
                        direction: SortDirection::Ascending,
                    }) if sorted == i => " ▲",
                    Some(SortKey {
                        column: sorted,
                        direction: SortDirection::Descending,
                    }) if sorted == i => " ▼",
                    _ => "",
                };
                format!("{}{arrow}", column.label)
            })
            .chain(editable.then(|| String::from("Actions")))
            .collect::<Row<'_>>()
            .style(Style::default().fg(TEXT_HIGHLIGHT_ALT).bold());

        let rows = self
            .listing
            .page_rows()
            .into_iter()
            .map(|row| {
                let action = row_action(kind, row).map(|_| "Edit");
                self.listing
                    .cells(row)
                    .into_iter()
                    .chain(editable.then(|| action.unwrap_or_default().to_string()))
                    .collect::<Row<'_>>()
            })
            .collect::<Vec<_>>();

        let widths = self
            .listing
            .columns()
            .iter()
            .map(|_| Constraint::Fill(1))
            .chain(editable.then_some(Constraint::Length(7)))
            .collect::<Vec<_>>();

        frame.render_stateful_widget(
            Table::new(rows, widths)
                .header(header)
                .style(Style::default().fg(TEXT_NORMAL))
                .row_highlight_style(
                    Style::default()
                        .fg(TEXT_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ),
            area,
            &mut self.table_state.clone(),
        );
    }
}
