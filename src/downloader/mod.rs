//! # Downloader
//!
//! Drives the three kinds of download on top of the [`SoundCloud`] client:
//!
//! - a single track, written into the output directory
//! - a playlist, written into `<output>/<playlist permalink>/`
//! - every upload of a user, written into `<output>/<user permalink>/`
//!
//! Each track goes through the same pipeline (pick a rendition, exchange it
//! for a manifest, rebuild the stream, tag, write) and the whole pipeline is
//! retried a few times on any failure. Playlists and users fan out over a
//! bounded set of concurrent tasks; one failing track never stops the
//! others, and every outcome ends up in the returned [`DownloadReport`].

mod fanout;
mod playlist;
mod track;
mod user;

use std::{path::PathBuf, sync::Arc};

pub use playlist::partition_tracks;

use crate::{
    error::{Error, Result},
    soundcloud::SoundCloud,
    success,
    types::Track,
    utils::{self, ByteSize},
    warning,
};

#[derive(Debug, Clone)]
pub struct Downloader {
    sc: Arc<SoundCloud>,
}

impl Downloader {
    pub fn new(sc: SoundCloud) -> Self {
        Self { sc: Arc::new(sc) }
    }
}

/// What happened to one track.
#[derive(Debug)]
pub struct TrackOutcome {
    pub id: i64,
    pub permalink: String,
    /// Bytes written (tag and audio) on success.
    pub result: Result<ByteSize>,
}

impl TrackOutcome {
    pub fn new(track: &Track, result: Result<ByteSize>) -> Self {
        Self {
            id: track.id,
            permalink: track.permalink.clone(),
            result,
        }
    }

    pub fn file_name(&self) -> String {
        utils::track_file_name(&self.permalink)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn log(&self) {
        match &self.result {
            Ok(written) => success!("Wrote {} to {}", written, self.file_name()),
            Err(e) => warning!("Failed to download {}: {}", self.permalink, e),
        }
    }
}

/// Outcome of a playlist or user download, one entry per track in the order
/// the tracks were scheduled.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub directory: Option<PathBuf>,
    pub outcomes: Vec<TrackOutcome>,
}

impl DownloadReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = (&TrackOutcome, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn get(&self, id: i64) -> Option<&TrackOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }
}
