use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, USER_AGENT};
use reqwest::Client;

use crate::core::types::FetchError;

/// Desktop-browser profile the site is served to. The listing pages render
/// fine without JS, so a plain GET with these headers is enough.
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Issues GETs with a fixed header set and a fixed per-request timeout.
/// One instance is shared by page fetches and resource downloads so both go
/// out under the identical transport contract.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Self {
        // Accept-Encoding (gzip, deflate) is negotiated by the client's
        // compression features; setting it by hand would turn off reqwest's
        // auto-decompression.
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// GET `url` and decode the body as UTF-8 text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get_checked(url).await?;
        response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })
    }

    /// GET `url` and return the raw body bytes, undecoded.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get_checked(url).await?;
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    url: url.to_string(),
                    source: e,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

/// Offline substitute for a page fetch: read a local fixture file instead of
/// touching the network.
pub async fn read_fixture(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::Fixture {
            path: path.to_path_buf(),
            source: e,
        })
}
