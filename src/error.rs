//! Error type for the SoundCloud fetcher.

use reqwest::StatusCode;
use thiserror::Error;

use crate::{types::Kind, utils::ByteSize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The landing page did not reference any script bundle.
    #[error("script not found")]
    ScriptNotFound,

    /// None of the script bundles contained a client id.
    #[error("client id not found")]
    CredentialNotFound,

    /// The resolved entity is not what the operation asked for.
    #[error("entity of incorrect kind: expected {expected}, got {found:?}")]
    KindNotCorrect { expected: Kind, found: String },

    /// The track has no segmented `audio/mpeg` rendition.
    #[error("incompatible stream")]
    IncompatibleStream,

    /// The stream exchange answered without a manifest URL.
    #[error("no url")]
    NoUrl,

    #[error("{context}: got status code {status}")]
    Status {
        context: &'static str,
        status: StatusCode,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tagging error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    #[error("failed to add metadata: {source} --- wrote {written}")]
    Metadata {
        written: ByteSize,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to write track: {source} --- wrote {written}")]
    WriteTrack {
        written: ByteSize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid link: {0}")]
    InvalidLink(String),

    #[error("download task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
