//! Clients for the external services some commands depend on
//!
//! Every client answers through a [`RequestCache`](crate::cache::RequestCache)
//! so repeated or concurrent lookups hit the network at most once per TTL.

mod github;
mod weather;

pub use github::{GitHubClient, GitHubStats, RepoStars};
pub use weather::WeatherClient;

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::{CacheConfig, ServicesConfig};

const USER_AGENT: &str = concat!("termfolio/", env!("CARGO_PKG_VERSION"));

pub struct Services {
    pub weather: WeatherClient,
    pub github: GitHubClient,
}

impl Services {
    pub fn from_config(services: &ServicesConfig, cache: &CacheConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(services.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            weather: WeatherClient::new(client.clone(), &services.weather_url, cache),
            github: GitHubClient::new(client, &services.github_api_url, cache),
        })
    }
}
