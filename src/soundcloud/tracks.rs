use crate::{
    config::TRACK_BATCH_SIZE,
    error::Result,
    soundcloud::{SoundCloud, http},
    types::{MissingTrack, Track},
    utils,
};

/// Splits off the next batch of at most [`TRACK_BATCH_SIZE`] references.
pub fn split_batch(missing: &[MissingTrack]) -> (&[MissingTrack], &[MissingTrack]) {
    missing.split_at(missing.len().min(TRACK_BATCH_SIZE))
}

impl SoundCloud {
    /// Looks up tracks by a comma-separated id list.
    pub async fn get_tracks(&self, ids: &str) -> Result<Vec<Track>> {
        let url = self.api_endpoint("/tracks", &[("ids", ids)])?;

        http::fetch(&self.pools.api, &url)
            .await?
            .ensure_ok("tracks")?
            .json()
    }

    /// Fetches the first batch of `missing` and returns it together with the
    /// references still left. Call again with the remainder until it is
    /// empty.
    ///
    /// The API returns tracks in its own order, not in the order requested.
    pub async fn get_missing_tracks<'m>(
        &self,
        missing: &'m [MissingTrack],
    ) -> Result<(Vec<Track>, &'m [MissingTrack])> {
        let (batch, rest) = split_batch(missing);
        let tracks = self.get_tracks(&utils::join_ids(batch)).await?;
        Ok((tracks, rest))
    }
}
