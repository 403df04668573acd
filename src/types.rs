use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils::null_as_default;

/// Discriminator carried in the `kind` field of every resolved entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    User,
    Track,
    Playlist,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::User => "user",
            Kind::Track => "track",
            Kind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource the resolve endpoint can hand back.
pub trait Entity {
    const KIND: Kind;

    /// The `kind` tag the API actually returned.
    fn kind(&self) -> &str;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub track_count: u64,
}

impl Entity for User {
    const KIND: Kind = Kind::User;

    fn kind(&self) -> &str {
        &self.kind
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde(rename = "artwork_url")]
    pub artwork: Option<String>,
    pub created_at: Option<String>,
    pub genre: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub media: Media,
    #[serde(rename = "track_authorization", deserialize_with = "null_as_default")]
    pub authorization: String,
    #[serde(rename = "user", deserialize_with = "null_as_default")]
    pub author: User,
    #[serde(deserialize_with = "null_as_default")]
    pub policy: TrackPolicy,
    pub id: i64,
}

impl Entity for Track {
    const KIND: Kind = Kind::Track;

    fn kind(&self) -> &str {
        &self.kind
    }
}

impl Track {
    /// Playlist listings only carry the id for most entries; those come back
    /// without a title and have to be fetched again.
    pub fn is_partial(&self) -> bool {
        self.title.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Playlist {
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tracks: Vec<Track>,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
}

impl Entity for Playlist {
    const KIND: Kind = Kind::Playlist;

    fn kind(&self) -> &str {
        &self.kind
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackPolicy {
    Allow,
    Block,
    Monetize,
    Snip,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Hls,
    Progressive,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: Protocol,
    #[serde(deserialize_with = "null_as_default")]
    pub mime_type: String,
}

/// One encoded version of a track's audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transcoding {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub preset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub format: Format,
    #[serde(deserialize_with = "null_as_default")]
    pub quality: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    #[serde(deserialize_with = "null_as_default")]
    pub transcodings: Vec<Transcoding>,
}

/// Answer of the stream exchange: a short-lived manifest URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// One page of a cursor-based listing as sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub collection: Vec<T>,
    #[serde(default)]
    pub next_href: Option<String>,
}

/// A playlist entry whose details have to be backfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingTrack {
    pub id: i64,
    /// Position of the entry in the playlist as returned by resolve.
    pub index: usize,
}

#[derive(Tabled)]
pub struct OutcomeTableRow {
    pub track: String,
    pub status: String,
    pub detail: String,
}
