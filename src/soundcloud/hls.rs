use reqwest::Url;

use crate::{
    error::Result,
    soundcloud::{SoundCloud, http},
};

/// Segment lines of an HLS manifest, in playback order. Blank lines and
/// `#` directives are dropped.
pub fn segment_urls(manifest: &str) -> Vec<&str> {
    manifest
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

impl SoundCloud {
    /// Downloads every segment listed by the manifest and returns their
    /// payloads concatenated in manifest order.
    ///
    /// Segments are fetched one at a time over the media pool. Any failing
    /// segment fails the whole stream; nothing partial is returned.
    pub async fn download_hls(&self, manifest_url: &str) -> Result<Vec<u8>> {
        let base = Url::parse(manifest_url)?;
        let manifest = http::fetch(&self.pools.media, &base)
            .await?
            .ensure_ok("hls manifest")?;
        let manifest = String::from_utf8_lossy(&manifest.body);

        let mut result = Vec::new();
        for segment in segment_urls(&manifest) {
            let url = base.join(segment)?;
            let part = http::fetch(&self.pools.media, &url)
                .await?
                .ensure_ok("hls segment")?;
            result.extend_from_slice(&part.body);
        }

        Ok(result)
    }
}
