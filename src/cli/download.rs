use tabled::Table;

use crate::{
    downloader::{DownloadReport, Downloader},
    error::Result,
    info, success,
    types::OutcomeTableRow,
    utils::{self, Link},
    warning,
};

/// Downloads whatever `link` points at. Failures are logged, never fatal.
pub async fn download(downloader: &Downloader, link: &str) {
    let link = match utils::parse_link(link) {
        Ok(link) => link,
        Err(e) => {
            warning!("{}", e);
            return;
        }
    };

    match link {
        Link::Track(path) => {
            info!("Resolving track {}", path);
            match downloader.download_by_path(&path).await {
                Ok(outcome) => outcome.log(),
                Err(e) => warning!("Failed to download {}: {}", path, e),
            }
        }
        Link::Playlist(path) => {
            info!("Resolving playlist {}", path);
            report(&path, downloader.download_playlist(&path).await);
        }
        Link::User(path) => {
            info!("Resolving user {}", path);
            report(&path, downloader.download_user(&path).await);
        }
    }
}

fn report(path: &str, result: Result<DownloadReport>) {
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            warning!("Failed to download {}: {}", path, e);
            return;
        }
    };

    if report.is_empty() {
        return;
    }

    let rows: Vec<OutcomeTableRow> = report
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(written) => OutcomeTableRow {
                track: o.file_name(),
                status: "ok".to_string(),
                detail: written.to_string(),
            },
            Err(e) => OutcomeTableRow {
                track: o.file_name(),
                status: "failed".to_string(),
                detail: e.to_string(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));

    let directory = report
        .directory
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    success!(
        "{} of {} tracks downloaded to {}",
        report.succeeded(),
        report.outcomes.len(),
        directory
    );
}
