use anyhow::Context;

use crate::cache::{CacheError, RequestCache};
use crate::config::CacheConfig;

/// Advertisement line wttr.in appends to every report
const ADVERTISEMENT: &str = "Follow @igor_chubin for wttr.in updates";

/// Plain-text forecasts from a wttr.in compatible endpoint
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    cache: RequestCache<String>,
}

impl WeatherClient {
    pub fn new(client: reqwest::Client, base_url: &str, cache: &CacheConfig) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: RequestCache::from_config(cache),
        }
    }

    /// Forecast for `city`, with words already joined by `+`
    pub async fn forecast(&self, city: &str) -> Result<String, CacheError> {
        let client = self.client.clone();
        let url = self.forecast_url(city);
        tracing::debug!(city, "weather lookup");

        self.cache
            .fetch_with_cache(city, move || async move {
                let response = client
                    .get(url?)
                    .send()
                    .await
                    .context("Failed to send weather request")?;

                if !response.status().is_success() {
                    anyhow::bail!("Weather service error ({})", response.status());
                }

                let body = response
                    .text()
                    .await
                    .context("Failed to read weather response")?;
                Ok::<_, anyhow::Error>(strip_advertisement(&body))
            })
            .await
    }

    /// `{base}/{city}?ATm` with the city percent-encoded as one path segment
    fn forecast_url(&self, city: &str) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid weather service URL {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Weather service URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .push(city);
        url.set_query(Some("ATm"));
        Ok(url)
    }

    pub fn cache(&self) -> &RequestCache<String> {
        &self.cache
    }
}

fn strip_advertisement(report: &str) -> String {
    report.replacen(ADVERTISEMENT, "", 1)
}
