use crate::{
    error::Result,
    info,
    types::{Track, User},
};

use super::{DownloadReport, Downloader};

// keeps a bogus track_count from reserving gigabytes up front
const MAX_PREALLOCATED_TRACKS: usize = 10_000;

impl Downloader {
    /// Resolves a profile link and downloads every upload into
    /// `<output>/<user permalink>/`.
    pub async fn download_user(&self, path: &str) -> Result<DownloadReport> {
        let user: User = self.sc.resolve(path).await?;
        let tracks = self.user_tracks(&user).await?;

        if tracks.is_empty() {
            info!("User has no tracks");
            return Ok(DownloadReport::default());
        }

        let dir = self.sc.settings().output_dir.join(&user.permalink);
        self.download_tracks(&dir, tracks).await
    }

    /// Walks the user's track listing to the end, skipping empty pages.
    pub async fn user_tracks(&self, user: &User) -> Result<Vec<Track>> {
        let capacity = usize::try_from(user.track_count)
            .unwrap_or(MAX_PREALLOCATED_TRACKS)
            .min(MAX_PREALLOCATED_TRACKS);
        let mut tracks = Vec::with_capacity(capacity);

        let mut cursor = self.sc.user_tracks(user.id);
        while !cursor.is_exhausted() {
            cursor.proceed(true).await?;
            tracks.append(&mut cursor.collection);
        }

        Ok(tracks)
    }
}
