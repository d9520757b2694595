use std::{sync::Arc, time::Duration};

use distro_core::{
    config::Settings,
    entity::{EditKind, EntityKind, Id},
    session::EditSession,
};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, layout::Rect};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    state::listing::{ListingSnapshot, ListingStatus},
    ui::AppState,
};

/// Setup a test terminal with the given width and height.
///
/// # Panics
///
/// Panics if the terminal cannot be created.
pub fn setup_test_terminal(width: u16, height: u16) -> (Terminal<TestBackend>, Rect) {
    let backend = TestBackend::new(width, height);
    let terminal = Terminal::new(backend).unwrap();
    let area = Rect::new(0, 0, width, height);
    (terminal, area)
}

/// Every symbol in the buffer, row by row.
pub fn buffer_text(buffer: &Buffer) -> String {
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Take every state update currently queued on `rx`, returning the last one.
pub fn latest<T>(rx: &mut UnboundedReceiver<T>) -> Option<T> {
    let mut last = None;
    while let Ok(state) = rx.try_recv() {
        last = Some(state);
    }
    last
}

/// Long enough for every scripted delay to have played out on a paused clock.
pub const SETTLE: Duration = Duration::from_secs(5);

pub fn song_rows() -> Arc<[serde_json::Value]> {
    Arc::from(vec![
        json!({"id": 1, "title": "Time", "album": {"title": "The Dark Side of the Moon"}, "created_at": "2024-01-03"}),
        json!({"id": 2, "title": "Echoes", "album": {"title": "Meddle"}, "created_at": "2024-01-01"}),
        json!({"id": 3, "title": "Dogs", "album": null, "created_at": "2024-01-02"}),
    ])
}

pub fn loaded_song() -> EditSession {
    let mut session = EditSession::new(EditKind::Song, Id::from(2));
    session.loaded(Ok(json!({
        "title": "Echoes",
        "album": { "id": 9, "title": "Meddle" },
        "artists": [ { "id": 1, "name": "Pink Floyd" } ]
    })));
    session
}

/// A state with a listing of songs loaded.
pub fn state_with_songs() -> AppState {
    AppState {
        listing: ListingSnapshot {
            kind: Some(EntityKind::Song),
            status: ListingStatus::Ready,
            rows: song_rows(),
            generation: 1,
        },
        settings: Settings::default(),
        ..AppState::default()
    }
}
