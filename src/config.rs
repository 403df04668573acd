//! Configuration management for the SoundCloud fetcher.
//!
//! Values are read from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every setting has a built-in default, so a
//! bare invocation talks to the public SoundCloud hosts.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::warning;

/// Number of attempts the request executor makes before giving up on a
/// transient transport failure.
pub const REQUEST_ATTEMPTS: u32 = 10;

/// Number of times the whole single-track pipeline is run before a track is
/// reported as failed.
pub const DOWNLOAD_ATTEMPTS: u32 = 5;

/// Maximum number of ids sent to the batch track endpoint in one call.
pub const TRACK_BATCH_SIZE: usize = 50;

/// Page size requested when listing a user's tracks. 80k is the largest
/// value the API accepts.
pub const USER_TRACKS_LIMIT: u32 = 80_000;

/// MIME type of the only rendition the downloader knows how to write.
pub const TARGET_MIME_TYPE: &str = "audio/mpeg";

pub const DEFAULT_PLATFORM_URL: &str = "https://soundcloud.com";
pub const DEFAULT_API_URL: &str = "https://api-v2.soundcloud.com";
pub const DEFAULT_ASSET_HOST: &str = "https://a-v2.sndcdn.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.3";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/scfetch/.env`
/// - macOS: `~/Library/Application Support/scfetch/.env`
/// - Windows: `%LOCALAPPDATA%/scfetch/.env`
///
/// A missing file is fine; only an unreadable or malformed one is an error.
///
/// # Example
///
/// ```
/// use scfetch::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scfetch/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Runtime settings shared by the SoundCloud client and the downloader.
#[derive(Debug, Clone)]
pub struct Settings {
    pub platform_url: String,
    pub api_url: String,
    pub asset_host: String,
    pub user_agent: String,
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform_url: DEFAULT_PLATFORM_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            asset_host: DEFAULT_ASSET_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: PathBuf::from("."),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Builds the settings from the process environment, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            platform_url: platform_url(),
            api_url: api_url(),
            asset_host: asset_host(),
            user_agent: user_agent(),
            concurrency: concurrency(),
            output_dir: output_dir(),
            request_timeout: request_timeout(),
        }
    }

    /// Overrides the fan-out width. Zero is bumped to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Returns the SoundCloud web host, `SCFETCH_PLATFORM_URL`.
pub fn platform_url() -> String {
    trimmed_var("SCFETCH_PLATFORM_URL").unwrap_or_else(|| DEFAULT_PLATFORM_URL.to_string())
}

/// Returns the SoundCloud API host, `SCFETCH_API_URL`.
pub fn api_url() -> String {
    trimmed_var("SCFETCH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the host serving the web app's script bundles, `SCFETCH_ASSET_HOST`.
pub fn asset_host() -> String {
    trimmed_var("SCFETCH_ASSET_HOST").unwrap_or_else(|| DEFAULT_ASSET_HOST.to_string())
}

/// Returns the user agent sent with every request, `SCFETCH_USER_AGENT`.
pub fn user_agent() -> String {
    env::var("SCFETCH_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string())
}

/// Returns the fan-out width, `SCFETCH_CONCURRENCY`.
pub fn concurrency() -> usize {
    match env::var("SCFETCH_CONCURRENCY") {
        Ok(value) => match value.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                warning!(
                    "Ignoring SCFETCH_CONCURRENCY={}, using {}",
                    value,
                    DEFAULT_CONCURRENCY
                );
                DEFAULT_CONCURRENCY
            }
        },
        Err(_) => DEFAULT_CONCURRENCY,
    }
}

/// Returns the root directory for written files, `SCFETCH_OUTPUT_DIR`.
pub fn output_dir() -> PathBuf {
    env::var("SCFETCH_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the per-request transport timeout, `SCFETCH_REQUEST_TIMEOUT` in seconds.
pub fn request_timeout() -> Duration {
    let secs = env::var("SCFETCH_REQUEST_TIMEOUT")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn trimmed_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}
