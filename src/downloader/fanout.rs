use std::{path::Path, sync::Arc};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::{
    error::{Error, Result},
    info,
    types::Track,
};

use super::{DownloadReport, Downloader, TrackOutcome};

impl Downloader {
    /// Downloads `tracks` into a new directory `dir`.
    ///
    /// The directory must not exist yet. Tracks run concurrently, at most
    /// `Settings::concurrency` at a time, each with its own retries. This
    /// returns once every track has finished, whatever the outcome.
    pub async fn download_tracks(&self, dir: &Path, tracks: Vec<Track>) -> Result<DownloadReport> {
        info!("Downloading {} tracks", tracks.len());
        async_fs::create_dir(dir).await?;

        let semaphore = Arc::new(Semaphore::new(self.sc.settings().concurrency.max(1)));

        let pb = ProgressBar::new(tracks.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.blue} {pos}/{len} tracks")
                .unwrap()
                .progress_chars("##-"),
        );

        let mut handles = Vec::with_capacity(tracks.len());
        for track in tracks {
            let downloader = self.clone();
            let dir = dir.to_path_buf();
            let semaphore = Arc::clone(&semaphore);
            let pb = pb.clone();
            let id = track.id;
            let permalink = track.permalink.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = TrackOutcome::new(&track, downloader.download(&dir, &track).await);
                pb.suspend(|| outcome.log());
                pb.inc(1);
                outcome
            });
            handles.push((id, permalink, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (id, permalink, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    let outcome = TrackOutcome {
                        id,
                        permalink,
                        result: Err(Error::Task(e)),
                    };
                    pb.suspend(|| outcome.log());
                    pb.inc(1);
                    outcomes.push(outcome);
                }
            }
        }

        pb.finish_and_clear();

        Ok(DownloadReport {
            directory: Some(dir.to_path_buf()),
            outcomes,
        })
    }
}
