use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    soundcloud::{SoundCloud, http},
    types::Entity,
};

impl SoundCloud {
    /// Resolves a link path such as `artist/track-name` into an entity.
    ///
    /// The entity is decoded as `T` and its `kind` tag must match `T::KIND`;
    /// a track resolved where a playlist was expected fails with
    /// [`Error::KindNotCorrect`] instead of being coerced.
    pub async fn resolve<T>(&self, path: &str) -> Result<T>
    where
        T: Entity + DeserializeOwned,
    {
        let target = format!("{}/{}", self.settings.platform_url, path);
        let url = self.api_endpoint("/resolve", &[("url", target.as_str())])?;

        let entity: T = http::fetch(&self.pools.api, &url)
            .await?
            .ensure_ok("resolve")?
            .json()?;

        if entity.kind() != T::KIND.as_str() {
            return Err(Error::KindNotCorrect {
                expected: T::KIND,
                found: entity.kind().to_string(),
            });
        }

        Ok(entity)
    }
}
