//! The edit form of one entity.
//!
//! The form keeps its own copy of the fields, taken from the draft once the entity loads, and
//! reports every change to the editor store. Echoes of those changes coming back through the
//! state are not applied to the fields, so typing is never clobbered by a slower update.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use distro_core::{
    draft::EditDraft,
    entity::{EditKind, Id, RelationType},
    selection::Selection,
    session::{EditSession, Phase},
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state::action::{Action, EditorAction, PopupAction, SearchAction},
    ui::{
        AppState,
        colors::{TEXT_ERROR, TEXT_HIGHLIGHT, TEXT_MUTED, TEXT_NORMAL, border_color},
        components::{Component, ComponentRender, RenderProps},
        widgets::{
            input_box::{self, InputBox},
            popups::PopupType,
            search_select::{SearchSelect, SelectEvent},
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Scalar,
    Album,
    Artists,
}

impl Field {
    const fn all(kind: EditKind) -> &'static [Self] {
        match kind {
            EditKind::Song => &[Self::Scalar, Self::Album, Self::Artists],
            _ => &[Self::Scalar],
        }
    }
}

#[allow(clippy::module_name_repetitions)]
pub struct EditView {
    action_tx: UnboundedSender<Action>,
    session: Option<EditSession>,
    /// The entity the fields were last filled from.
    loaded_for: Option<(EditKind, Id)>,
    scalar: InputBox,
    album: SearchSelect,
    artists: SearchSelect,
    focus: Field,
    allow_create: bool,
}

impl EditView {
    /// Whether the view wants Esc for itself.
    #[must_use]
    pub fn captures_esc(&self) -> bool {
        self.picker().is_some_and(|picker| !picker.text().is_empty())
    }

    const fn picker(&self) -> Option<&SearchSelect> {
        match self.focus {
            Field::Scalar => None,
            Field::Album => Some(&self.album),
            Field::Artists => Some(&self.artists),
        }
    }

    const fn picker_mut(&mut self) -> Option<&mut SearchSelect> {
        match self.focus {
            Field::Scalar => None,
            Field::Album => Some(&mut self.album),
            Field::Artists => Some(&mut self.artists),
        }
    }

    fn send(&self, action: Action) {
        self.action_tx.send(action).ok();
    }

    /// Fill the fields from a freshly loaded draft.
    fn fill_from(&mut self, draft: &EditDraft) {
        self.scalar.set_text(draft.scalar());
        let (album, artists) = draft
            .as_song()
            .map(|song| (song.album.clone(), song.artists.clone()))
            .unwrap_or_default();
        self.album = SearchSelect::new(
            RelationType::Album,
            Selection::Single(album),
            self.allow_create,
        );
        self.artists = SearchSelect::new(
            RelationType::Artist,
            Selection::Multiple(artists),
            self.allow_create,
        );
        self.focus = Field::Scalar;
    }

    /// Move the focus by `step` fields, closing the picker being left.
    fn move_focus(&mut self, step: isize) {
        let Some(kind) = self.session.as_ref().map(EditSession::kind) else {
            return;
        };
        let fields = Field::all(kind);
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let Some(next) = current
            .checked_add_signed(step)
            .filter(|next| *next < fields.len())
        else {
            return;
        };
        if let Some(picker) = self.picker_mut() {
            picker.close();
            self.send(Action::Search(SearchAction::Close));
        }
        self.focus = fields[next];
    }

    fn handle_picker_event(&mut self, event: SelectEvent) {
        match event {
            SelectEvent::Query(text) => {
                if let Some(picker) = self.picker() {
                    let relation = picker.relation();
                    self.send(Action::Search(SearchAction::Input(relation, text)));
                }
            }
            SelectEvent::Changed => {
                let action = match self.focus {
                    Field::Album => {
                        EditorAction::SetAlbum(self.album.selection().clone().into_single())
                    }
                    Field::Artists => {
                        EditorAction::SetArtists(self.artists.selection().clone().into_vec())
                    }
                    Field::Scalar => return,
                };
                self.send(Action::Editor(action));
                self.send(Action::Search(SearchAction::Close));
            }
            SelectEvent::Ignored | SelectEvent::Handled => {}
        }
    }
}

impl Component for EditView {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        let allow_create = state.settings.search.allow_create;
        Self {
            action_tx,
            session: None,
            loaded_for: None,
            scalar: InputBox::default(),
            album: SearchSelect::new(RelationType::Album, Selection::Single(None), allow_create),
            artists: SearchSelect::new(
                RelationType::Artist,
                Selection::Multiple(Vec::new()),
                allow_create,
            ),
            focus: Field::Scalar,
            allow_create,
        }
        .move_with_state(state)
    }

    fn move_with_state(mut self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        self.session.clone_from(&state.editor);

        let loaded = self
            .session
            .as_ref()
            .and_then(|session| {
                let draft = session.draft()?.clone();
                Some((session.kind(), session.id().clone(), draft))
            });
        match loaded {
            Some((kind, id, draft)) if self.loaded_for.as_ref() != Some(&(kind, id.clone())) => {
                self.fill_from(&draft);
                self.loaded_for = Some((kind, id));
            }
            Some(_) => {}
            None => self.loaded_for = None,
        }

        self.album.update_results(&state.search);
        self.artists.update_results(&state.search);
        self
    }

    fn name(&self) -> &'static str {
        "Edit"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        // the fields stay editable while a save or delete is outstanding
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if !session.controls_enabled() {
                return;
            }
            match key.code {
                KeyCode::Char('s') => self.send(Action::Editor(EditorAction::Save)),
                KeyCode::Char('d') => {
                    let popup = PopupType::ConfirmDelete {
                        kind: session.kind(),
                        id: session.id().clone(),
                        name: session
                            .draft()
                            .map(|draft| draft.scalar().to_string())
                            .unwrap_or_default(),
                    };
                    self.send(Action::Popup(PopupAction::Open(popup)));
                }
                _ => {}
            }
            return;
        }

        let picker_open = self.picker().is_some_and(SearchSelect::is_open);
        match key.code {
            KeyCode::Up if !picker_open => self.move_focus(-1),
            KeyCode::Down if !picker_open => self.move_focus(1),
            KeyCode::Esc => {
                if let Some(picker) = self.picker_mut() {
                    picker.close();
                    self.send(Action::Search(SearchAction::Close));
                }
            }
            _ => {
                if let Some(picker) = self.picker_mut() {
                    let event = picker.handle_key_event(key);
                    self.handle_picker_event(event);
                } else {
                    let before = self.scalar.text().to_string();
                    self.scalar.handle_key_event(key);
                    if self.scalar.text() != before {
                        let text = self.scalar.text().to_string();
                        self.send(Action::Editor(EditorAction::SetScalar(text)));
                    }
                }
            }
        }
    }
}

impl ComponentRender<RenderProps> for EditView {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let title = self.session.as_ref().map_or_else(
            || String::from("EDIT"),
            |session| format!("EDIT {} ({})", session.kind().heading(), session.id()),
        );
        let border = Block::bordered()
            .title_top(Span::styled(title, Style::default().bold()))
            .title_bottom(
                Line::from("Ctrl-S: Save | Ctrl-D: Delete | ↑/↓: Field | ←/→ Del: Remove | Esc: Back")
                    .alignment(Alignment::Center),
            )
            .border_style(Style::default().fg(border_color(props.is_focused)));
        let area = border.inner(props.area);
        frame.render_widget(border, props.area);
        RenderProps { area, ..props }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        let Some(session) = &self.session else {
            return;
        };

        match session.phase() {
            Phase::Loading => {
                frame.render_widget(
                    Paragraph::new(Line::styled("Loading...", Style::default().fg(TEXT_MUTED)))
                        .alignment(Alignment::Center),
                    props.area,
                );
                return;
            }
            Phase::LoadFailed(message) => {
                let text = Text::from(vec![
                    Line::styled(message.clone(), Style::default().fg(TEXT_ERROR)),
                    Line::from(""),
                    Line::styled("Esc: back", Style::default().fg(TEXT_MUTED)),
                ]);
                frame.render_widget(
                    Paragraph::new(text)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    props.area,
                );
                return;
            }
            Phase::Ready | Phase::Saving | Phase::Deleting => {}
        }

        let song = session.kind() == EditKind::Song;
        let focused = |field: Field| props.is_focused && self.focus == field;
        let [scalar_area, album_area, artists_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(if song { self.album.height(focused(Field::Album)) } else { 0 }),
            Constraint::Length(if song {
                self.artists.height(focused(Field::Artists))
            } else {
                0
            }),
            Constraint::Min(1),
        ])
        .areas(props.area);

        let label = session.draft().map_or("Title", EditDraft::scalar_label);
        self.scalar.render(
            frame,
            input_box::RenderProps {
                border: Block::bordered()
                    .title(Span::styled(label, Style::default().bold()))
                    .border_style(Style::default().fg(border_color(focused(Field::Scalar)))),
                area: scalar_area,
                text_color: if focused(Field::Scalar) {
                    TEXT_HIGHLIGHT
                } else {
                    TEXT_NORMAL
                },
                show_cursor: focused(Field::Scalar),
            },
        );

        if song {
            self.album.render(
                frame,
                RenderProps {
                    area: album_area,
                    is_focused: focused(Field::Album),
                },
            );
            self.artists.render(
                frame,
                RenderProps {
                    area: artists_area,
                    is_focused: focused(Field::Artists),
                },
            );
        }

        let status = match (session.phase(), session.error()) {
            (Phase::Saving, _) => Line::styled("Saving...", Style::default().fg(TEXT_MUTED)),
            (Phase::Deleting, _) => Line::styled("Deleting...", Style::default().fg(TEXT_MUTED)),
            (_, Some(error)) => Line::styled(error.to_string(), Style::default().fg(TEXT_ERROR)),
            _ => Line::default(),
        };
        frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), status_area);
    }
}
