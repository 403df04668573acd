use reqwest::Url;

use crate::{
    error::{Error, Result},
    soundcloud::{SoundCloud, http},
    types::{Media, Protocol, Stream, Transcoding},
};

impl Media {
    /// First HLS rendition with the wanted MIME type, in listing order.
    pub fn select_compatible(&self, mime_type: &str) -> Option<&Transcoding> {
        self.transcodings
            .iter()
            .find(|t| t.format.protocol == Protocol::Hls && t.format.mime_type == mime_type)
    }
}

impl SoundCloud {
    /// Exchanges a rendition for the URL of its HLS manifest.
    ///
    /// The manifest URL is short-lived, so this is called again on every
    /// download attempt.
    pub async fn get_stream(&self, transcoding: &Transcoding, authorization: &str) -> Result<String> {
        let mut url = Url::parse(&transcoding.url)?;
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("track_authorization", authorization);

        let stream: Stream = http::fetch(&self.pools.api, &url)
            .await?
            .ensure_ok("getstream")?
            .json()?;

        if stream.url.is_empty() {
            return Err(Error::NoUrl);
        }

        Ok(stream.url)
    }
}
