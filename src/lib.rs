//! SoundCloud Fetcher Library
//!
//! This library resolves SoundCloud links (tracks, playlists and user profiles),
//! picks a compatible audio rendition for each track, rebuilds the segmented
//! stream into a single MP3 byte stream and writes it to disk with an ID3 tag.
//!
//! # Modules
//!
//! - `cli` - Command-line entry points
//! - `config` - Configuration management and environment variables
//! - `downloader` - Orchestration of single track, playlist and user downloads
//! - `error` - Error type shared across the crate
//! - `retry` - Bounded retry helpers
//! - `soundcloud` - SoundCloud API client implementation
//! - `tagging` - ID3 tag rendering for written tracks
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use scfetch::{config, soundcloud};
//!
//! #[tokio::main]
//! async fn main() -> scfetch::error::Result<()> {
//!     let settings = config::Settings::from_env();
//!     let client_id = soundcloud::credential::acquire(&settings).await?;
//!     let sc = soundcloud::SoundCloud::new(settings, client_id)?;
//!     // Use the downloader...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod downloader;
pub mod error;
pub mod retry;
pub mod soundcloud;
pub mod tagging;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Resolving {}", path);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Wrote {} to {}", size, file_name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for fatal startup errors, the process terminates with exit
/// code 1 right after printing.
///
/// # Example
///
/// ```
/// error!("Failed to get client id: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures such as a single track that could not be
/// downloaded while its siblings carry on.
///
/// # Example
///
/// ```
/// warning!("Failed to download {}: {}", permalink, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
