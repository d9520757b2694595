//! The entities the distribution service exposes, and the lightweight references used to link them.

use std::{borrow::Cow, fmt::Display};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// An opaque identifier, as handed out by the backend.
///
/// The backend is free to use numeric or textual ids, we only ever echo them back in URL paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    Text(String),
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Id {
    /// Read the `id` field of a listing row, if it has a usable one.
    #[must_use]
    pub fn from_row(row: &serde_json::Value) -> Option<Self> {
        match row.get("id")? {
            serde_json::Value::Number(n) => n.as_u64().map(Self::Number),
            serde_json::Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

/// A column of a listing: a dotted path into the row, and the header to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: Cow<'static, str>,
    pub label: Cow<'static, str>,
}

impl ColumnDescriptor {
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key: Cow::Borrowed(key),
            label: Cow::Borrowed(label),
        }
    }
}

/// Every kind of entity the admin console knows how to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum EntityKind {
    Song,
    Album,
    Artist,
    Playlist,
    User,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl EntityKind {
    /// All the kinds, in the order they are presented to the user.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// The name of the backend collection for this kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Song => "songs",
            Self::Album => "albums",
            Self::Artist => "artists",
            Self::Playlist => "playlists",
            Self::User => "users",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Song => "Songs",
            Self::Album => "Albums",
            Self::Artist => "Artists",
            Self::Playlist => "Playlists",
            Self::User => "Users",
        }
    }

    /// The endpoint that lists every entity of this kind.
    ///
    /// Songs are listed through the public collection, everything else through the admin one.
    #[must_use]
    pub const fn list_endpoint(self) -> &'static str {
        match self {
            Self::Song => "/songs",
            Self::Album => "/admin/albums",
            Self::Artist => "/admin/artists",
            Self::Playlist => "/admin/playlists",
            Self::User => "/admin/users",
        }
    }

    /// The endpoint for a single entity, used to load, update, and delete it.
    #[must_use]
    pub fn item_endpoint(self, id: &Id) -> String {
        format!("/{}/{id}", self.collection())
    }

    /// The columns shown when listing this kind.
    #[must_use]
    pub fn columns(self) -> Vec<ColumnDescriptor> {
        match self {
            Self::Song => vec![
                ColumnDescriptor::new("title", "Title"),
                ColumnDescriptor::new("album.title", "Album"),
                ColumnDescriptor::new("created_at", "Created"),
            ],
            Self::Album => vec![
                ColumnDescriptor::new("title", "Title"),
                ColumnDescriptor::new("created_at", "Created"),
            ],
            Self::Artist | Self::Playlist => vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("created_at", "Created"),
            ],
            Self::User => vec![
                ColumnDescriptor::new("username", "Username"),
                ColumnDescriptor::new("role", "Role"),
                ColumnDescriptor::new("created_at", "Created"),
            ],
        }
    }

    /// The edit form variant for this kind, users can only be listed.
    #[must_use]
    pub const fn editable(self) -> Option<EditKind> {
        match self {
            Self::Song => Some(EditKind::Song),
            Self::Album => Some(EditKind::Album),
            Self::Artist => Some(EditKind::Artist),
            Self::Playlist => Some(EditKind::Playlist),
            Self::User => None,
        }
    }
}

/// The kinds of entity that have an edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Song,
    Album,
    Artist,
    Playlist,
}

impl From<EditKind> for EntityKind {
    fn from(value: EditKind) -> Self {
        match value {
            EditKind::Song => Self::Song,
            EditKind::Album => Self::Album,
            EditKind::Artist => Self::Artist,
            EditKind::Playlist => Self::Playlist,
        }
    }
}

impl EditKind {
    #[must_use]
    pub fn item_endpoint(self, id: &Id) -> String {
        EntityKind::from(self).item_endpoint(id)
    }

    /// Singular, upper-cased name, used in headings.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Song => "SONG",
            Self::Album => "ALBUM",
            Self::Artist => "ARTIST",
            Self::Playlist => "PLAYLIST",
        }
    }
}

/// The kinds of entity that can be searched for and attached to a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    Album,
    Artist,
}

impl RelationType {
    #[must_use]
    pub const fn search_endpoint(self) -> &'static str {
        match self {
            Self::Album => "/search/albums",
            Self::Artist => "/search/artists",
        }
    }
}

impl Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Album => write!(f, "Album"),
            Self::Artist => write!(f, "Artists"),
        }
    }
}

/// A pointer to another entity, carrying enough to display and resubmit it without refetching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationRef {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(alias = "title", default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl RelationRef {
    #[must_use]
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            identifier: None,
            sub: None,
        }
    }

    /// A reference to something that doesn't exist yet, named by what the user typed.
    #[must_use]
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            identifier: None,
            sub: None,
        }
    }

    #[must_use]
    pub fn with_identifier(self, identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..self
        }
    }

    /// Whether two references point at the same entity.
    ///
    /// References that came from the backend compare by id, synthesized ones by name.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name.trim().eq_ignore_ascii_case(other.name.trim()),
            _ => false,
        }
    }
}
