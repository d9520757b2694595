//! This module contains the implementations of the TUI.
//!
//! The app is responsible for rendering the state of the application to the terminal.
//!
//! The app is updated every tick, and they use the state stores to get the latest state.

pub mod app;
pub mod colors;
pub mod components;
pub mod widgets;

use std::{
    io::{self, Stdout},
    time::Duration,
};

use anyhow::Context as _;
use app::App;
use components::{Component, ComponentRender, content_view::ActiveView};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use distro_core::{config::Settings, session::EditSession};
use ratatui::prelude::*;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::StreamExt;

use crate::{
    state::{
        Receivers,
        action::{Action, ComponentAction, EditorAction, ListingAction, SearchAction},
        component::ActiveComponent,
        listing::ListingSnapshot,
        search::SearchSnapshot,
    },
    termination::Interrupted,
};

#[derive(Debug, Default)]
pub struct AppState {
    pub active_component: ActiveComponent,
    pub active_view: ActiveView,
    pub listing: ListingSnapshot,
    pub search: SearchSnapshot,
    pub editor: Option<EditSession>,
    pub settings: Settings,
}

const RENDERING_TICK_RATE: Duration = Duration::from_millis(250);

#[allow(clippy::module_name_repetitions)]
pub struct UiManager {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl UiManager {
    #[must_use]
    pub const fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    /// Main loop for the UI manager.
    ///
    /// This function will run until the user exits the application.
    ///
    /// # Errors
    ///
    /// This function will return an error if there was an issue rendering to the terminal.
    pub async fn main_loop(
        self,
        settings: Settings,
        mut state_rx: Receivers,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        // consume the first state to initialize the ui app
        let mut state = AppState {
            active_component: state_rx.component.recv().await.unwrap_or_default(),
            active_view: state_rx.view.recv().await.unwrap_or_default(),
            listing: state_rx.listing.recv().await.unwrap_or_default(),
            search: state_rx.search.recv().await.unwrap_or_default(),
            editor: state_rx.editor.recv().await.flatten(),
            settings,
        };
        let mut app = App::new(&state, self.action_tx.clone());

        let mut terminal = setup_terminal()?;
        let mut ticker = tokio::time::interval(RENDERING_TICK_RATE);
        let mut crossterm_events = EventStream::new();

        let result: anyhow::Result<Interrupted> = loop {
            tokio::select! {
                // Tick to terminate the select every N milliseconds
                _ = ticker.tick() => (),
                // Catch and handle crossterm events
                maybe_event = crossterm_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key)))  => {
                        app.handle_key_event(key);
                    },
                    Some(Ok(Event::Mouse(mouse))) => {
                        let terminal_size = terminal.size().context("could not get terminal size")?;
                        let area = Rect::new(0, 0, terminal_size.width, terminal_size.height);
                        app.handle_mouse_event(mouse, area);
                    },
                    None => break Ok(Interrupted::UserInt),
                    _ => (),
                },
                // Handle state updates
                Some(listing) = state_rx.listing.recv() => {
                    state = AppState {
                        listing,
                        ..state
                    };
                    app = app.move_with_listing(&state);
                },
                Some(search) = state_rx.search.recv() => {
                    state = AppState {
                        search,
                        ..state
                    };
                    app = app.move_with_search(&state);
                },
                Some(editor) = state_rx.editor.recv() => {
                    state = AppState {
                        editor,
                        ..state
                    };
                    app = app.move_with_editor(&state);
                },
                Some(active_view) = state_rx.view.recv() => {
                    for action in view_changed(&state.active_view, &active_view) {
                        self.action_tx.send(action)?;
                    }
                    state = AppState {
                        active_view,
                        ..state
                    };
                    app = app.move_with_view(&state);
                },
                Some(active_component) = state_rx.component.recv() => {
                    state = AppState {
                        active_component,
                        ..state
                    };
                    app = app.move_with_component(&state);
                },
                Some(popup) = state_rx.popup.recv() => {
                     app = app.move_with_popup(popup.map(|popup| {
                         popup.into_popup(self.action_tx.clone())
                     }));
                }
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break Ok(interrupted);
                }
            }

            if let Err(err) = terminal
                .draw(|frame| app.render(frame, frame.area()))
                .context("could not render to the terminal")
            {
                break Err(err);
            }
        };

        restore_terminal(&mut terminal)?;

        result
    }
}

/// The requests that entering `next` from `previous` calls for.
///
/// A listing is fetched every time it's entered, so coming back from an edit shows fresh rows.
fn view_changed(previous: &ActiveView, next: &ActiveView) -> Vec<Action> {
    let mut actions = Vec::new();

    if matches!(previous, ActiveView::Edit(..)) && previous != next {
        actions.push(Action::Editor(EditorAction::Close));
        actions.push(Action::Search(SearchAction::Close));
    }

    match next {
        ActiveView::None => {}
        ActiveView::List(kind) => actions.push(Action::Listing(ListingAction::Load(*kind))),
        ActiveView::Edit(kind, id) => {
            actions.push(Action::Editor(EditorAction::Open(*kind, id.clone())));
        }
    }
    if *next != ActiveView::None {
        actions.push(Action::ActiveComponent(ComponentAction::Set(
            ActiveComponent::ContentView,
        )));
    }

    actions
}

#[cfg(not(tarpaulin_include))]
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();

    enable_raw_mode()?;

    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

#[cfg(not(tarpaulin_include))]
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
    )?;

    Ok(terminal.show_cursor()?)
}

#[cfg(not(tarpaulin_include))]
pub fn init_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // intentionally ignore errors here since we're already in a panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);

        original_hook(panic_info);
    }));
}
