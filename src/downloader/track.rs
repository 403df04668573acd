use std::{io, path::Path};

use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

use crate::{
    config::{DOWNLOAD_ATTEMPTS, TARGET_MIME_TYPE},
    error::{Error, Result},
    retry::retry_when,
    tagging::{self, TrackTags},
    types::Track,
    utils::{self, ByteSize},
};

use super::{Downloader, TrackOutcome};

impl Downloader {
    /// Resolves a track link and writes it into the output directory.
    ///
    /// Resolution errors (including a link that is not a track) are returned;
    /// a failed download is reported in the outcome.
    pub async fn download_by_path(&self, path: &str) -> Result<TrackOutcome> {
        let track: Track = self.sc.resolve(path).await?;
        let dir = self.sc.settings().output_dir.clone();
        let result = self.download(&dir, &track).await;
        Ok(TrackOutcome::new(&track, result))
    }

    /// Runs the single-track pipeline, starting over from the rendition
    /// choice on any failure, up to [`DOWNLOAD_ATTEMPTS`] times.
    pub async fn download(&self, dir: &Path, track: &Track) -> Result<ByteSize> {
        retry_when(DOWNLOAD_ATTEMPTS, || self.download_once(dir, track), |_| true).await
    }

    async fn download_once(&self, dir: &Path, track: &Track) -> Result<ByteSize> {
        let transcoding = track
            .media
            .select_compatible(TARGET_MIME_TYPE)
            .ok_or(Error::IncompatibleStream)?;

        let manifest = self.sc.get_stream(transcoding, &track.authorization).await?;
        let data = self.sc.download_hls(&manifest).await?;

        // two entries sharing a permalink must not overwrite each other
        let path = dir.join(utils::track_file_name(&track.permalink));
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .await?;

        match self.write_track(&mut file, track, &data).await {
            Ok(written) => Ok(written),
            Err(e) => {
                // the next attempt creates the file again
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                Err(e)
            }
        }
    }

    async fn write_track(&self, file: &mut File, track: &Track, data: &[u8]) -> Result<ByteSize> {
        let tag = self
            .render_tags(track)
            .await
            .map_err(|source| Error::Metadata {
                written: ByteSize(0),
                source: Box::new(source),
            })?;

        let (tag_written, res) = write_counted(file, &tag).await;
        res.map_err(|source| Error::Metadata {
            written: ByteSize(tag_written),
            source: Box::new(Error::Io(source)),
        })?;

        let (data_written, res) = write_counted(file, data).await;
        res.map_err(|source| Error::WriteTrack {
            written: ByteSize(data_written),
            source,
        })?;

        file.flush().await.map_err(|source| Error::WriteTrack {
            written: ByteSize(data_written),
            source,
        })?;

        Ok(ByteSize(tag_written + data_written))
    }

    async fn render_tags(&self, track: &Track) -> Result<Vec<u8>> {
        let cover = match track.artwork.as_deref().filter(|a| !a.is_empty()) {
            Some(artwork) => Some(self.sc.download_artwork(artwork).await?),
            None => None,
        };

        tagging::render_id3(&TrackTags::from_track(track, cover))
    }
}

/// Writes `buf` and reports how much of it made it to the file, even on
/// failure.
async fn write_counted(file: &mut File, buf: &[u8]) -> (u64, io::Result<()>) {
    let mut written = 0;

    while written < buf.len() {
        match file.write(&buf[written..]).await {
            Ok(0) => return (written as u64, Err(io::ErrorKind::WriteZero.into())),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return (written as u64, Err(e)),
        }
    }

    (written as u64, Ok(()))
}
