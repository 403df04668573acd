use std::sync::LazyLock;

use regex::Regex;

use crate::{
    config::Settings,
    error::{Error, Result},
    soundcloud::{ClientId, http},
};

static CLIENT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\("client_id=([A-Za-z0-9]{32})"\)"#).expect("client id pattern is valid")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^<script crossorigin src="(.+\.js)"></script>$"#)
        .expect("script pattern is valid")
});

/// Lists the script bundles referenced by the landing page, in page order.
/// Only scripts served from `<asset_host>/assets/` are considered.
pub fn script_urls(html: &str, asset_host: &str) -> Vec<String> {
    let prefix = format!("{}/assets/", asset_host);

    SCRIPT_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|src| src.starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// Finds the `client_id=<32 alphanumerics>` invocation in a script bundle.
pub fn find_client_id(script: &str) -> Option<ClientId> {
    CLIENT_ID_RE
        .captures(script)
        .and_then(|c| c.get(1))
        .map(|m| ClientId::new(m.as_str()))
}

/// Scrapes a fresh client id from the web app.
///
/// The landing page is fetched once, without retry. Its script bundles are
/// then fetched one after the other until one of them contains a client id;
/// a bundle that fails to download is skipped.
///
/// # Errors
///
/// - [`Error::ScriptNotFound`] if the page references no bundle
/// - [`Error::CredentialNotFound`] if no bundle carries a client id
pub async fn acquire(settings: &Settings) -> Result<ClientId> {
    let client = http::build_client(settings)?;

    // `/h` is a tiny page that still ships the full set of bundles
    let landing = client
        .get(format!("{}/h", settings.platform_url))
        .send()
        .await?
        .text()
        .await?;

    let scripts = script_urls(&landing, &settings.asset_host);
    if scripts.is_empty() {
        return Err(Error::ScriptNotFound);
    }

    for script in scripts {
        let body = match client.get(&script).send().await {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(_) => continue,
            },
            Err(_) => continue,
        };

        if let Some(client_id) = find_client_id(&body) {
            return Ok(client_id);
        }
    }

    Err(Error::CredentialNotFound)
}
