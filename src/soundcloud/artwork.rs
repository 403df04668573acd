use reqwest::Url;

use crate::{
    error::Result,
    soundcloud::{SoundCloud, http},
    utils,
};

/// Cover image bytes with the MIME type the CDN reported.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

impl SoundCloud {
    /// Downloads the 500x500 variant of a track's artwork.
    pub async fn download_artwork(&self, artwork_url: &str) -> Result<Artwork> {
        let url = Url::parse(&utils::large_artwork_url(artwork_url))?;
        let fetched = http::fetch(&self.pools.image, &url)
            .await?
            .ensure_ok("artwork")?;

        Ok(Artwork {
            data: fetched.body,
            mime_type: fetched.content_type,
        })
    }
}
