use std::collections::HashSet;

use crate::{
    error::Result,
    info,
    types::{MissingTrack, Playlist, Track},
    warning,
};

use super::{DownloadReport, Downloader};

/// Splits playlist entries into fully populated tracks and references to the
/// partial ones, keeping each partial entry's position.
pub fn partition_tracks(entries: Vec<Track>) -> (Vec<Track>, Vec<MissingTrack>) {
    let mut tracks = Vec::with_capacity(entries.len());
    let mut missing = Vec::new();

    for (index, track) in entries.into_iter().enumerate() {
        if track.is_partial() {
            missing.push(MissingTrack {
                id: track.id,
                index,
            });
        } else {
            tracks.push(track);
        }
    }

    (tracks, missing)
}

impl Downloader {
    /// Resolves a playlist link and downloads all its tracks into
    /// `<output>/<playlist permalink>/`.
    pub async fn download_playlist(&self, path: &str) -> Result<DownloadReport> {
        let playlist: Playlist = self.sc.resolve(path).await?;
        let tracks = self.playlist_tracks(playlist.tracks).await?;

        if tracks.is_empty() {
            info!("No tracks in playlist");
            return Ok(DownloadReport::default());
        }

        let dir = self.sc.settings().output_dir.join(&playlist.permalink);
        self.download_tracks(&dir, tracks).await
    }

    /// Populated entries first, then the backfilled ones in the order the API
    /// returned them.
    pub async fn playlist_tracks(&self, entries: Vec<Track>) -> Result<Vec<Track>> {
        let (mut tracks, missing) = partition_tracks(entries);

        let mut remaining: &[MissingTrack] = &missing;
        while !remaining.is_empty() {
            let (fetched, rest) = self.sc.get_missing_tracks(remaining).await?;

            let requested = &remaining[..remaining.len() - rest.len()];
            warn_unreturned(requested, &fetched);

            tracks.extend(fetched);
            remaining = rest;
        }

        Ok(tracks)
    }
}

fn warn_unreturned(requested: &[MissingTrack], fetched: &[Track]) {
    let returned: HashSet<i64> = fetched.iter().map(|t| t.id).collect();
    for m in requested.iter().filter(|m| !returned.contains(&m.id)) {
        warning!(
            "Track {} at position {} was not returned by the API",
            m.id,
            m.index + 1
        );
    }
}
