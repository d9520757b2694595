//! Edit drafts: the in-memory copy of an entity while it is being edited.
//!
//! Each [`EditKind`] has exactly one mapping from the server's representation into a draft,
//! and one mapping from the draft into the payload the backend expects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    entity::{EditKind, Id, RelationRef},
    slug::resolve_identifier,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SongDraft {
    pub title: String,
    pub album: Option<RelationRef>,
    pub artists: Vec<RelationRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDraft {
    Song(SongDraft),
    Album { title: String },
    Artist { name: String },
    Playlist { name: String },
}

// shapes of the entities as the backend returns them, only what the form reads.

#[derive(Debug, Deserialize)]
struct ServerSong {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    album: Option<ServerAlbumRef>,
    #[serde(default)]
    artists: Option<Vec<ServerArtistRef>>,
}

#[derive(Debug, Deserialize)]
struct ServerAlbumRef {
    #[serde(default)]
    id: Option<Id>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerArtistRef {
    #[serde(default)]
    id: Option<Id>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    identifiers: Option<Vec<ServerIdentifier>>,
}

#[derive(Debug, Deserialize)]
struct ServerIdentifier {
    #[serde(default)]
    identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerTitled {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerNamed {
    #[serde(default)]
    name: Option<String>,
}

// shapes of the update payloads

#[derive(Debug, Serialize)]
struct SongPayload<'a> {
    title: &'a str,
    album_title: &'a str,
    artists: Vec<ArtistPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct ArtistPayload<'a> {
    name: &'a str,
    identifier: String,
}

impl From<ServerSong> for SongDraft {
    fn from(song: ServerSong) -> Self {
        Self {
            title: song.title.unwrap_or_default(),
            album: song.album.map(|album| RelationRef {
                id: album.id,
                name: album.title.unwrap_or_default(),
                identifier: None,
                sub: None,
            }),
            artists: song
                .artists
                .unwrap_or_default()
                .into_iter()
                .map(|artist| RelationRef {
                    id: artist.id,
                    name: artist.name.unwrap_or_default(),
                    identifier: artist
                        .identifiers
                        .unwrap_or_default()
                        .into_iter()
                        .next()
                        .and_then(|i| i.identifier),
                    sub: None,
                })
                .collect(),
        }
    }
}

impl EditDraft {
    /// Map the server's representation of an entity into a draft.
    ///
    /// # Errors
    ///
    /// Fails if `data` isn't an object of the expected shape.
    pub fn from_server(kind: EditKind, data: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EditKind::Song => Self::Song(serde_json::from_value::<ServerSong>(data)?.into()),
            EditKind::Album => Self::Album {
                title: serde_json::from_value::<ServerTitled>(data)?
                    .title
                    .unwrap_or_default(),
            },
            EditKind::Artist => Self::Artist {
                name: serde_json::from_value::<ServerNamed>(data)?
                    .name
                    .unwrap_or_default(),
            },
            EditKind::Playlist => Self::Playlist {
                name: serde_json::from_value::<ServerNamed>(data)?
                    .name
                    .unwrap_or_default(),
            },
        })
    }

    #[must_use]
    pub const fn kind(&self) -> EditKind {
        match self {
            Self::Song(_) => EditKind::Song,
            Self::Album { .. } => EditKind::Album,
            Self::Artist { .. } => EditKind::Artist,
            Self::Playlist { .. } => EditKind::Playlist,
        }
    }

    /// The request body for saving this draft.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::Song(song) => serde_json::to_value(SongPayload {
                title: &song.title,
                album_title: song.album.as_ref().map_or("", |a| a.name.as_str()),
                artists: song
                    .artists
                    .iter()
                    .map(|artist| ArtistPayload {
                        name: &artist.name,
                        identifier: resolve_identifier(artist),
                    })
                    .collect(),
            })
            .unwrap_or_default(),
            Self::Album { title } => serde_json::json!({ "title": title }),
            Self::Artist { name } | Self::Playlist { name } => serde_json::json!({ "name": name }),
        }
    }

    /// The label of the draft's text field.
    #[must_use]
    pub const fn scalar_label(&self) -> &'static str {
        match self {
            Self::Song(_) | Self::Album { .. } => "Title",
            Self::Artist { .. } | Self::Playlist { .. } => "Name",
        }
    }

    /// The draft's text field: a title or a name, depending on the kind.
    #[must_use]
    pub fn scalar(&self) -> &str {
        match self {
            Self::Song(SongDraft { title, .. }) | Self::Album { title } => title,
            Self::Artist { name } | Self::Playlist { name } => name,
        }
    }

    pub fn set_scalar(&mut self, value: impl Into<String>) {
        match self {
            Self::Song(SongDraft { title, .. }) | Self::Album { title } => *title = value.into(),
            Self::Artist { name } | Self::Playlist { name } => *name = value.into(),
        }
    }

    #[must_use]
    pub const fn as_song(&self) -> Option<&SongDraft> {
        match self {
            Self::Song(song) => Some(song),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_song_mut(&mut self) -> Option<&mut SongDraft> {
        match self {
            Self::Song(song) => Some(song),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_song_from_server() {
        let data = json!({
            "id": 4,
            "title": "Echoes",
            "album": { "id": 9, "title": "Meddle" },
            "artists": [
                { "id": 1, "name": "Pink Floyd", "identifiers": [ { "identifier": "pink-floyd" }, { "identifier": "pf" } ] },
                { "id": 2, "name": "Roger Waters" }
            ]
        });

        let draft = EditDraft::from_server(EditKind::Song, data).unwrap();

        assert_eq!(
            draft,
            EditDraft::Song(SongDraft {
                title: "Echoes".into(),
                album: Some(RelationRef::new(9, "Meddle")),
                artists: vec![
                    RelationRef::new(1, "Pink Floyd").with_identifier("pink-floyd"),
                    RelationRef::new(2, "Roger Waters"),
                ],
            })
        );
    }

    #[test]
    fn test_song_from_server_without_relations() {
        let draft =
            EditDraft::from_server(EditKind::Song, json!({ "title": "Untitled", "album": null }))
                .unwrap();
        assert_eq!(
            draft,
            EditDraft::Song(SongDraft {
                title: "Untitled".into(),
                album: None,
                artists: vec![],
            })
        );
    }

    #[rstest]
    #[case(EditKind::Album, json!({"title": "Meddle", "id": 1}), EditDraft::Album { title: "Meddle".into() })]
    #[case(EditKind::Artist, json!({"name": "Pink Floyd"}), EditDraft::Artist { name: "Pink Floyd".into() })]
    #[case(EditKind::Playlist, json!({"name": "Road trip"}), EditDraft::Playlist { name: "Road trip".into() })]
    #[case(EditKind::Playlist, json!({}), EditDraft::Playlist { name: String::new() })]
    fn test_scalar_from_server(
        #[case] kind: EditKind,
        #[case] data: Value,
        #[case] expected: EditDraft,
    ) {
        assert_eq!(EditDraft::from_server(kind, data).unwrap(), expected);
    }

    #[test]
    fn test_from_server_rejects_non_objects() {
        assert!(EditDraft::from_server(EditKind::Song, json!([1, 2])).is_err());
    }

    #[test]
    fn test_song_payload_synthesizes_identifiers() {
        let draft = EditDraft::Song(SongDraft {
            title: "Echoes".into(),
            album: Some(RelationRef::synthetic("Meddle")),
            artists: vec![RelationRef::synthetic("Pink Floyd")],
        });

        assert_eq!(
            draft.payload(),
            json!({
                "title": "Echoes",
                "album_title": "Meddle",
                "artists": [ { "name": "Pink Floyd", "identifier": "pink-floyd" } ]
            })
        );
    }

    #[test]
    fn test_song_payload_keeps_known_identifiers() {
        let draft = EditDraft::Song(SongDraft {
            title: "Time".into(),
            album: None,
            artists: vec![
                RelationRef::new(1, "Pink Floyd").with_identifier("floyd"),
                RelationRef {
                    sub: Some("gilmour-d".into()),
                    ..RelationRef::synthetic("David Gilmour")
                },
                RelationRef::synthetic(""),
            ],
        });

        assert_eq!(
            draft.payload(),
            json!({
                "title": "Time",
                "album_title": "",
                "artists": [
                    { "name": "Pink Floyd", "identifier": "floyd" },
                    { "name": "David Gilmour", "identifier": "gilmour-d" },
                    { "name": "", "identifier": "unknown" }
                ]
            })
        );
    }

    #[rstest]
    #[case(EditDraft::Album { title: "Meddle".into() }, json!({"title": "Meddle"}))]
    #[case(EditDraft::Artist { name: "Pink Floyd".into() }, json!({"name": "Pink Floyd"}))]
    #[case(EditDraft::Playlist { name: "Road trip".into() }, json!({"name": "Road trip"}))]
    fn test_scalar_payload(#[case] draft: EditDraft, #[case] expected: Value) {
        assert_eq!(draft.payload(), expected);
    }

    #[test]
    fn test_set_scalar() {
        let mut draft = EditDraft::Song(SongDraft::default());
        draft.set_scalar("Echoes");
        assert_eq!(draft.scalar(), "Echoes");
        assert_eq!(draft.scalar_label(), "Title");

        let mut draft = EditDraft::Artist {
            name: String::new(),
        };
        draft.set_scalar("Pink Floyd");
        assert_eq!(draft, EditDraft::Artist { name: "Pink Floyd".into() });
        assert_eq!(draft.scalar_label(), "Name");
    }
}
