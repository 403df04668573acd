//! ID3v2 tags for written tracks.
//!
//! The tag is rendered on its own and written in front of the raw MPEG
//! stream; lofty never sees the audio.

use chrono::{DateTime, Datelike};
use lofty::{
    config::WriteOptions,
    picture::{MimeType, Picture, PictureType},
    tag::{Accessor, Tag, TagExt, TagType},
};

use crate::{error::Result, soundcloud::artwork::Artwork, types::Track};

/// Metadata embedded into a downloaded track.
#[derive(Debug, Clone, Default)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub cover: Option<Artwork>,
}

impl TrackTags {
    pub fn from_track(track: &Track, cover: Option<Artwork>) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.author.username.clone(),
            genre: track.genre.clone().filter(|g| !g.is_empty()),
            year: track.created_at.as_deref().and_then(release_year),
            cover,
        }
    }
}

/// Year of a `created_at` timestamp. api-v2 sends RFC 3339, older payloads
/// use `2019/05/02 10:00:00 +0000`.
pub fn release_year(created_at: &str) -> Option<u32> {
    DateTime::parse_from_rfc3339(created_at)
        .or_else(|_| DateTime::parse_from_str(created_at, "%Y/%m/%d %H:%M:%S %z"))
        .ok()
        .and_then(|d| u32::try_from(d.year()).ok())
}

/// Renders an ID3v2 tag for `tags`.
pub fn render_id3(tags: &TrackTags) -> Result<Vec<u8>> {
    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_title(tags.title.clone());
    tag.set_artist(tags.artist.clone());

    if let Some(genre) = &tags.genre {
        tag.set_genre(genre.clone());
    }

    if let Some(year) = tags.year {
        tag.set_year(year);
    }

    if let Some(cover) = &tags.cover {
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(picture_mime_type(cover.mime_type.as_deref())),
            None,
            cover.data.clone(),
        ));
    }

    let mut rendered = Vec::new();
    tag.dump_to(&mut rendered, WriteOptions::default())?;
    Ok(rendered)
}

fn picture_mime_type(content_type: Option<&str>) -> MimeType {
    // drop parameters such as `; charset=binary`
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .unwrap_or("image/jpeg");

    match essence {
        "image/jpeg" | "image/jpg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/gif" => MimeType::Gif,
        "image/bmp" => MimeType::Bmp,
        "image/tiff" => MimeType::Tiff,
        other => MimeType::Unknown(other.to_string()),
    }
}
