//! A relation picker: type to search the backend, pick from the results, or commit what was
//! typed as a new entity.
//!
//! With the query empty, Left/Right walk the selected entries and Delete removes the highlighted
//! one.
//!
//! The widget doesn't talk to the backend itself. It reports what the user did, and the owner
//! dispatches the search and the selection change.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use distro_core::{
    entity::{RelationRef, RelationType},
    selection::Selection,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState},
};

use crate::{
    state::search::SearchSnapshot,
    ui::{
        colors::{TEXT_ERROR, TEXT_HIGHLIGHT, TEXT_MUTED, TEXT_NORMAL, border_color},
        components::{Component, ComponentRender, RenderProps},
    },
};

use super::input_box::{self, InputBox};

/// How many results are shown at once.
const MAX_RESULTS: u16 = 5;

/// What a key press did to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    /// The key means nothing to the picker, the owner may use it.
    Ignored,
    /// Handled, nothing to report.
    Handled,
    /// The query text changed.
    Query(String),
    /// The selection changed, and the query was cleared.
    Changed,
}

#[derive(Debug)]
pub struct SearchSelect {
    relation: RelationType,
    selection: Selection,
    input: InputBox,
    results: Vec<RelationRef>,
    pending: bool,
    failed: bool,
    list_state: ListState,
    /// The selected entry highlighted for removal.
    highlighted: Option<usize>,
    allow_create: bool,
}

impl SearchSelect {
    #[must_use]
    pub fn new(relation: RelationType, selection: Selection, allow_create: bool) -> Self {
        Self {
            relation,
            selection,
            input: InputBox::default(),
            results: Vec::new(),
            pending: false,
            failed: false,
            list_state: ListState::default(),
            highlighted: None,
            allow_create,
        }
    }

    #[must_use]
    pub const fn relation(&self) -> RelationType {
        self.relation
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.input.text()
    }

    #[must_use]
    pub fn results(&self) -> &[RelationRef] {
        &self.results
    }

    /// Replace the selection without any user interaction, nothing is searched.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.highlighted = None;
    }

    /// Take the results of the search store, if they answer this picker's current query.
    pub fn update_results(&mut self, snapshot: &SearchSnapshot) {
        if snapshot.relation != Some(self.relation) || snapshot.text != self.input.text() {
            return;
        }
        if snapshot.results != self.results {
            self.list_state
                .select((!snapshot.results.is_empty()).then_some(0));
        }
        self.results.clone_from(&snapshot.results);
        self.pending = snapshot.pending;
        self.failed = snapshot.failed;
    }

    /// Forget the query, e.g. when the picker loses focus. The selection is kept.
    pub fn close(&mut self) {
        self.input.reset();
        self.results.clear();
        self.pending = false;
        self.failed = false;
        self.list_state.select(None);
        self.highlighted = None;
    }

    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether there are results to move between.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.results.is_empty()
    }

    /// The rows needed to render the picker.
    #[must_use]
    pub fn height(&self, is_focused: bool) -> u16 {
        // border, selection, and input
        let base = 4;
        if is_focused {
            base + u16::try_from(self.results.len())
                .unwrap_or(MAX_RESULTS)
                .clamp(1, MAX_RESULTS)
        } else {
            base
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> SelectEvent {
        if key.kind != KeyEventKind::Press {
            return SelectEvent::Handled;
        }

        match key.code {
            KeyCode::Up if self.is_open() => {
                self.list_state.select_previous();
                SelectEvent::Handled
            }
            KeyCode::Down if self.is_open() => {
                let last = self.results.len() - 1;
                let next = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(next));
                SelectEvent::Handled
            }
            KeyCode::Enter => self.commit(),
            KeyCode::Left if self.input.is_empty() && !self.selection.is_empty() => {
                let last = self.selection.len() - 1;
                self.highlighted = Some(self.highlighted.map_or(last, |i| i.saturating_sub(1)));
                SelectEvent::Handled
            }
            KeyCode::Right if self.highlighted.is_some() => {
                self.highlighted = self
                    .highlighted
                    .map(|i| i + 1)
                    .filter(|i| *i < self.selection.len());
                SelectEvent::Handled
            }
            KeyCode::Delete | KeyCode::Backspace if self.highlighted.is_some() => {
                self.remove_highlighted()
            }
            KeyCode::Backspace if self.input.is_empty() => {
                if self.selection.remove_last().is_some() {
                    SelectEvent::Changed
                } else {
                    SelectEvent::Handled
                }
            }
            KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => {
                self.highlighted = None;
                let before = self.input.text().to_string();
                self.input.handle_key_event(key);
                if self.input.text() == before {
                    return SelectEvent::Handled;
                }
                // every keystroke starts the query over
                self.results.clear();
                self.list_state.select(None);
                self.failed = false;
                self.pending = !self.input.text().trim().is_empty();
                SelectEvent::Query(self.input.text().to_string())
            }
            _ => SelectEvent::Ignored,
        }
    }

    /// Drop the highlighted entry, and anything else pointing at the same target.
    fn remove_highlighted(&mut self) -> SelectEvent {
        let target = self
            .highlighted
            .and_then(|i| self.selection.items().get(i))
            .cloned();
        let Some(target) = target else {
            self.highlighted = None;
            return SelectEvent::Handled;
        };
        if !self.selection.remove(&target) {
            return SelectEvent::Handled;
        }

        let len = self.selection.len();
        self.highlighted = self
            .highlighted
            .filter(|_| len > 0)
            .map(|i| i.min(len - 1));
        SelectEvent::Changed
    }

    /// Enter: pick the highlighted result, or commit the typed text as a new entity.
    fn commit(&mut self) -> SelectEvent {
        let candidate = self
            .list_state
            .selected()
            .and_then(|i| self.results.get(i))
            .cloned();

        let changed = match candidate {
            Some(candidate) => self.selection.select(candidate),
            None if self.allow_create && !self.pending => self.selection.create(self.input.text()),
            None => return SelectEvent::Handled,
        };

        self.close();
        if changed {
            SelectEvent::Changed
        } else {
            // picked something already selected, only the query goes away
            SelectEvent::Query(String::new())
        }
    }

    fn status_line(&self) -> Option<Line<'static>> {
        if self.pending {
            Some(Line::styled("searching...", Style::default().fg(TEXT_MUTED)))
        } else if self.failed {
            Some(Line::styled("search failed", Style::default().fg(TEXT_ERROR)))
        } else if self.input.text().trim().is_empty() {
            None
        } else if self.allow_create {
            Some(Line::styled(
                format!("no results, Enter to create \"{}\"", self.input.text().trim()),
                Style::default().fg(TEXT_MUTED),
            ))
        } else {
            Some(Line::styled("no results", Style::default().fg(TEXT_MUTED)))
        }
    }
}

impl ComponentRender<RenderProps> for SearchSelect {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let border = Block::bordered()
            .title_top(Line::from(vec![
                Span::styled(self.relation.to_string(), Style::default().bold()),
                Span::raw(if self.selection.is_multiple() {
                    " (multiple)"
                } else {
                    ""
                }),
            ]))
            .border_style(Style::default().fg(border_color(props.is_focused)));
        let area = border.inner(props.area);
        frame.render_widget(border, props.area);
        RenderProps { area, ..props }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        let [selected_area, input_area, results_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(props.area);

        // what's selected so far
        let selected = if self.selection.is_empty() {
            Line::styled("(none)", Style::default().fg(TEXT_MUTED))
        } else {
            Line::from(
                self.selection
                    .items()
                    .iter()
                    .enumerate()
                    .flat_map(|(i, item)| {
                        let separator = (i > 0).then(|| Span::raw(", "));
                        // references that don't exist yet stand out
                        let mut modifier = if item.id.is_none() {
                            Modifier::ITALIC
                        } else {
                            Modifier::empty()
                        };
                        if self.highlighted == Some(i) {
                            modifier |= Modifier::REVERSED;
                        }
                        let name = Span::styled(
                            item.name.clone(),
                            Style::default().fg(TEXT_NORMAL).add_modifier(modifier),
                        );
                        separator.into_iter().chain(std::iter::once(name))
                    })
                    .collect::<Vec<_>>(),
            )
        };
        frame.render_widget(selected, selected_area);

        // the query
        self.input.render(
            frame,
            input_box::RenderProps {
                border: Block::new(),
                area: input_area,
                text_color: TEXT_HIGHLIGHT,
                show_cursor: props.is_focused,
            },
        );

        if !props.is_focused {
            return;
        }

        // the results, or why there aren't any
        if self.results.is_empty() {
            if let Some(status) = self.status_line() {
                frame.render_widget(status, results_area);
            }
            return;
        }
        let items = self
            .results
            .iter()
            .map(|result| ListItem::new(Span::raw(result.name.clone())))
            .collect::<Vec<_>>();
        frame.render_stateful_widget(
            List::new(items).highlight_style(
                Style::default()
                    .fg(TEXT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            results_area,
            &mut self.list_state.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_text, setup_test_terminal};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn artists() -> SearchSelect {
        SearchSelect::new(
            RelationType::Artist,
            Selection::Multiple(vec![RelationRef::new(1, "Pink Floyd")]),
            true,
        )
    }

    fn type_text(select: &mut SearchSelect, text: &str) -> SelectEvent {
        let mut event = SelectEvent::Handled;
        for c in text.chars() {
            event = select.handle_key_event(KeyEvent::from(KeyCode::Char(c)));
        }
        event
    }

    fn answer(select: &mut SearchSelect, results: Vec<RelationRef>) {
        let snapshot = SearchSnapshot {
            relation: Some(select.relation()),
            text: select.text().to_string(),
            results,
            pending: false,
            failed: false,
        };
        select.update_results(&snapshot);
    }

    #[test]
    fn test_typing_reports_query() {
        let mut select = artists();
        assert_eq!(type_text(&mut select, "gil"), SelectEvent::Query("gil".into()));
        assert!(select.pending);
    }

    #[test]
    fn test_select_result_appends() {
        let mut select = artists();
        type_text(&mut select, "gil");
        answer(&mut select, vec![RelationRef::new(2, "David Gilmour")]);
        assert!(select.is_open());

        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Enter)),
            SelectEvent::Changed
        );
        assert_eq!(
            select.selection().items(),
            &[
                RelationRef::new(1, "Pink Floyd"),
                RelationRef::new(2, "David Gilmour")
            ]
        );
        // the query is gone, the selection stays
        assert_eq!(select.text(), "");
        assert!(!select.is_open());
    }

    #[test]
    fn test_selecting_duplicate_is_ignored() {
        let mut select = artists();
        type_text(&mut select, "pink");
        answer(&mut select, vec![RelationRef::new(1, "Pink Floyd")]);

        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Enter)),
            SelectEvent::Query(String::new())
        );
        assert_eq!(select.selection().len(), 1);
    }

    #[test]
    fn test_navigate_results() {
        let mut select = artists();
        type_text(&mut select, "d");
        answer(
            &mut select,
            vec![
                RelationRef::new(2, "David Gilmour"),
                RelationRef::new(3, "Dave Brock"),
            ],
        );

        select.handle_key_event(KeyEvent::from(KeyCode::Down));
        select.handle_key_event(KeyEvent::from(KeyCode::Down));
        assert_eq!(select.list_state.selected(), Some(1));
        select.handle_key_event(KeyEvent::from(KeyCode::Up));
        assert_eq!(select.list_state.selected(), Some(0));
        select.handle_key_event(KeyEvent::from(KeyCode::Down));
        select.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(
            select.selection().items().last(),
            Some(&RelationRef::new(3, "Dave Brock"))
        );
    }

    #[test]
    fn test_create_from_text() {
        let mut select = artists();
        type_text(&mut select, "Nick Mason ");
        answer(&mut select, vec![]);

        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Enter)),
            SelectEvent::Changed
        );
        let created = select.selection().items().last().cloned().unwrap();
        assert_eq!(created, RelationRef::synthetic("Nick Mason"));
        assert_eq!(created.identifier, None);
    }

    #[rstest]
    #[case::creation_disabled(false, false)]
    #[case::search_in_flight(true, true)]
    fn test_enter_does_not_create(#[case] allow_create: bool, #[case] pending: bool) {
        let mut select = SearchSelect::new(RelationType::Album, Selection::Single(None), allow_create);
        type_text(&mut select, "Meddle");
        if !pending {
            answer(&mut select, vec![]);
        }

        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Enter)),
            SelectEvent::Handled
        );
        assert!(select.selection().is_empty());
        assert_eq!(select.text(), "Meddle");
    }

    #[test]
    fn test_single_selection_is_replaced() {
        let mut select = SearchSelect::new(
            RelationType::Album,
            Selection::Single(Some(RelationRef::new(9, "Meddle"))),
            true,
        );
        type_text(&mut select, "ani");
        answer(&mut select, vec![RelationRef::new(10, "Animals")]);
        select.handle_key_event(KeyEvent::from(KeyCode::Enter));

        assert_eq!(
            select.selection(),
            &Selection::Single(Some(RelationRef::new(10, "Animals")))
        );
    }

    #[test]
    fn test_backspace_on_empty_removes_last() {
        let mut select = artists();
        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Backspace)),
            SelectEvent::Changed
        );
        assert!(select.selection().is_empty());
        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Backspace)),
            SelectEvent::Handled
        );
    }

    #[test]
    fn test_remove_an_entry_from_the_middle() {
        let mut select = SearchSelect::new(
            RelationType::Artist,
            Selection::Multiple(vec![
                RelationRef::new(1, "Pink Floyd"),
                RelationRef::new(2, "Roger Waters"),
                RelationRef::synthetic("Nick Mason"),
            ]),
            true,
        );

        select.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(select.highlighted(), Some(2));
        select.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(select.highlighted(), Some(1));

        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Delete)),
            SelectEvent::Changed
        );
        assert_eq!(
            select.selection().items(),
            &[
                RelationRef::new(1, "Pink Floyd"),
                RelationRef::synthetic("Nick Mason"),
            ]
        );
        // the highlight stays in place
        assert_eq!(select.highlighted(), Some(1));

        // walking past the end goes back to the query
        select.handle_key_event(KeyEvent::from(KeyCode::Right));
        assert_eq!(select.highlighted(), None);
        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Delete)),
            SelectEvent::Ignored
        );
        assert_eq!(select.selection().len(), 2);
    }

    #[test]
    fn test_typing_drops_the_highlight() {
        let mut select = artists();
        select.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(select.highlighted(), Some(0));

        assert_eq!(type_text(&mut select, "a"), SelectEvent::Query("a".into()));
        assert_eq!(select.highlighted(), None);

        // with a query, Left moves the text cursor instead
        select.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(select.highlighted(), None);
        assert_eq!(select.selection().len(), 1);
    }

    #[test]
    fn test_remove_the_last_remaining_entry() {
        let mut select = artists();
        select.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Backspace)),
            SelectEvent::Changed
        );
        assert!(select.selection().is_empty());
        assert_eq!(select.highlighted(), None);
        assert_eq!(
            select.handle_key_event(KeyEvent::from(KeyCode::Left)),
            SelectEvent::Handled
        );
        assert_eq!(select.highlighted(), None);
    }

    #[test]
    fn test_results_for_other_queries_are_ignored() {
        let mut select = artists();
        type_text(&mut select, "gil");

        select.update_results(&SearchSnapshot {
            relation: Some(RelationType::Artist),
            text: "gi".into(),
            results: vec![RelationRef::new(2, "David Gilmour")],
            ..SearchSnapshot::default()
        });
        select.update_results(&SearchSnapshot {
            relation: Some(RelationType::Album),
            text: "gil".into(),
            results: vec![RelationRef::new(2, "Gilded")],
            ..SearchSnapshot::default()
        });
        assert!(!select.is_open());
    }

    #[test]
    fn test_failure_keeps_text_and_selection() {
        let mut select = artists();
        type_text(&mut select, "gil");
        select.update_results(&SearchSnapshot {
            relation: Some(RelationType::Artist),
            text: "gil".into(),
            results: vec![],
            pending: false,
            failed: true,
        });

        assert_eq!(select.text(), "gil");
        assert_eq!(select.selection().len(), 1);

        let (mut terminal, area) = setup_test_terminal(40, 8);
        let buffer = terminal
            .draw(|frame| {
                select.render(
                    frame,
                    RenderProps {
                        area,
                        is_focused: true,
                    },
                );
            })
            .unwrap()
            .buffer
            .clone();
        let text = buffer_text(&buffer);
        assert!(text.contains("Artists (multiple)"));
        assert!(text.contains("Pink Floyd"));
        assert!(text.contains("search failed"));
    }
}
