use std::{error::Error as StdError, io};

use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::{
    config::{self, Settings},
    error::{Error, Result},
    retry::{IsTransient, retry_transport},
};

/// Timeouts, dropped keep-alive connections and broken pipes are worth
/// another attempt. Everything else (DNS, refused connections, TLS
/// failures, bad URLs) is not.
impl IsTransient for reqwest::Error {
    fn is_transient(&self) -> bool {
        if self.is_timeout() {
            return true;
        }

        let mut source = self.source();
        while let Some(err) = source {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                if matches!(
                    io_err.kind(),
                    io::ErrorKind::TimedOut
                        | io::ErrorKind::BrokenPipe
                        | io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::UnexpectedEof
                ) {
                    return true;
                }
            }

            // hyper reports a keep-alive connection closed under us this way
            let message = err.to_string();
            if message.contains("connection closed") || message == "timeout" {
                return true;
            }

            source = err.source();
        }

        false
    }
}

/// Connection pools for the three hosts the downloader talks to. Each one is
/// shared by every concurrent track.
#[derive(Debug, Clone)]
pub struct Pools {
    pub api: Client,
    pub media: Client,
    pub image: Client,
}

impl Pools {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            api: build_client(settings)?,
            media: build_client(settings)?,
            image: build_client(settings)?,
        })
    }
}

/// A client with the browser user agent, compressed transfer encodings
/// (gzip, deflate, br, zstd; decoded transparently) and idle connections kept
/// for the whole run.
pub fn build_client(settings: &Settings) -> Result<Client> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .pool_idle_timeout(None)
        .timeout(settings.request_timeout)
        .build()?;
    Ok(client)
}

/// A fully read response.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Fetched {
    /// Turns anything but `200 OK` into [`Error::Status`].
    pub fn ensure_ok(self, context: &'static str) -> Result<Self> {
        if self.status != StatusCode::OK {
            return Err(Error::Status {
                context,
                status: self.status,
            });
        }
        Ok(self)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Issues a GET on `client` and reads the whole body, retrying transient
/// transport failures up to [`config::REQUEST_ATTEMPTS`] times. The status
/// code is left for the caller to judge.
pub async fn fetch(client: &Client, url: &Url) -> Result<Fetched> {
    let fetched = retry_transport(config::REQUEST_ATTEMPTS, move || async move {
        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok::<_, reqwest::Error>(Fetched {
            status,
            content_type,
            body,
        })
    })
    .await?;

    Ok(fetched)
}
