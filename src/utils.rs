use std::fmt;

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::{
    error::{Error, Result},
    types::MissingTrack,
};

/// Deserializes `null` the same way as a missing field.
///
/// The API sends `null` for plenty of fields that are usually strings or
/// objects, partial playlist entries in particular.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A byte count printed with decimal units, e.g. `3.1 MB`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_size(self.0))
    }
}

pub fn fmt_size(bytes: u64) -> String {
    const UNIT: u64 = 1000;
    const PREFIXES: [char; 6] = ['k', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// What a SoundCloud link points at, with the path used for resolving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Track(String),
    Playlist(String),
    User(String),
}

/// Classifies a link by the shape of its path: `/<user>/sets/<name>` is a
/// playlist, `/<user>` a profile and everything else a track.
pub fn parse_link(input: &str) -> Result<Link> {
    let parsed =
        Url::parse(input).map_err(|e| Error::InvalidLink(format!("{}: {}", input, e)))?;

    // resolve encodes the path again, so it has to be decoded here
    let decoded = urlencoding::decode(parsed.path())
        .map_err(|e| Error::InvalidLink(format!("{}: {}", input, e)))?;

    let path = decoded.trim_start_matches('/').trim_end_matches('/');
    if path.is_empty() {
        return Err(Error::InvalidLink(format!("{}: empty path", input)));
    }

    let path = path.to_string();
    if path.contains("/sets/") {
        Ok(Link::Playlist(path))
    } else if !path.contains('/') {
        Ok(Link::User(path))
    } else {
        Ok(Link::Track(path))
    }
}

pub fn join_ids(missing: &[MissingTrack]) -> String {
    missing
        .iter()
        .map(|m| m.id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Artwork URLs point at the small `-large` variant; the 500x500 one lives
/// next to it.
pub fn large_artwork_url(artwork: &str) -> String {
    artwork.replacen("-large.", "-t500x500.", 1)
}

pub fn track_file_name(permalink: &str) -> String {
    format!("{}.mp3", permalink)
}
