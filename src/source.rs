use std::future::Future;
use std::time::Duration;

use crate::error::{FlagdeckError, FlagdeckResult};

/// Default flag CDN endpoint serving 320px-wide PNG rasters.
pub const FLAGCDN_W320: &str = "https://flagcdn.com/w320";

/// Remote source of encoded flag rasters, keyed by country id.
///
/// Implementations make a single attempt per call; retry policy is the
/// caller's concern.
pub trait FlagSource {
    /// Fetch the encoded flag image for one country id.
    fn fetch(&self, country_id: &str) -> impl Future<Output = FlagdeckResult<Vec<u8>>> + Send;
}

/// Flag source backed by the flagcdn.com PNG API.
#[derive(Clone, Debug)]
pub struct FlagCdnSource {
    client: reqwest::Client,
    base_url: String,
}

impl FlagCdnSource {
    /// Construct a source against [`FLAGCDN_W320`].
    pub fn new() -> FlagdeckResult<Self> {
        Self::with_base_url(FLAGCDN_W320)
    }

    /// Construct a source against an alternate base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> FlagdeckResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FlagdeckError::fetch(format!("build http client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Base URL this source resolves flags against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL the flag for `country_id` is fetched from.
    pub fn flag_url(&self, country_id: &str) -> String {
        format!("{}/{}.png", self.base_url, country_id.to_lowercase())
    }
}

impl FlagSource for FlagCdnSource {
    async fn fetch(&self, country_id: &str) -> FlagdeckResult<Vec<u8>> {
        let url = self.flag_url(country_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FlagdeckError::fetch(format!("request {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(FlagdeckError::fetch(format!(
                "flag fetch for '{country_id}' returned HTTP {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FlagdeckError::fetch(format!("read body for '{country_id}': {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
