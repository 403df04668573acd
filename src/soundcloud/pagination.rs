use serde::de::DeserializeOwned;

use crate::{
    config,
    error::Result,
    soundcloud::{SoundCloud, http},
    types::{Page, Track},
};

/// Position in a cursor-based listing.
///
/// `collection` holds the items of the page fetched last and `next` the URL
/// of the following page; an empty `next` means the listing is exhausted.
/// Callers drain `collection` after every [`Cursor::proceed`] until
/// [`Cursor::is_exhausted`].
pub struct Cursor<'a, T> {
    sc: &'a SoundCloud,
    pub collection: Vec<T>,
    pub next: String,
}

impl<'a, T: DeserializeOwned> Cursor<'a, T> {
    pub fn new(sc: &'a SoundCloud, first: impl Into<String>) -> Self {
        Self {
            sc,
            collection: Vec::new(),
            next: first.into(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_empty()
    }

    /// Fetches the page behind `next`.
    ///
    /// The API sometimes hands back the cursor it was called with; that is
    /// treated as the end of the listing. With `unfold`, empty pages that
    /// still carry a cursor are skipped until items show up or the listing
    /// ends.
    pub async fn proceed(&mut self, unfold: bool) -> Result<()> {
        loop {
            if self.next.is_empty() {
                self.collection.clear();
                return Ok(());
            }

            let url = self.sc.authorize(&self.next)?;
            let page: Page<T> = http::fetch(&self.sc.pools.api, &url)
                .await?
                .ensure_ok("paginated.proceed")?
                .json()?;

            let previous = std::mem::replace(&mut self.next, page.next_href.unwrap_or_default());
            self.collection = page.collection;

            // only the immediately previous cursor is compared
            if self.next == previous {
                self.next.clear();
            }

            if unfold && self.collection.is_empty() && !self.next.is_empty() {
                continue;
            }

            return Ok(());
        }
    }
}

impl SoundCloud {
    /// Cursor over every track uploaded by a user.
    pub fn user_tracks(&self, user_id: i64) -> Cursor<'_, Track> {
        Cursor::new(
            self,
            format!(
                "{}/users/{}/tracks?limit={}",
                self.settings.api_url,
                user_id,
                config::USER_TRACKS_LIMIT
            ),
        )
    }
}
