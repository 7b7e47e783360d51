use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheError, RequestCache};
use crate::config::CacheConfig;

const TOP_REPOS: usize = 5;

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStars {
    pub name: String,
    pub stars: u64,
}

/// Aggregate numbers over a user's public repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    pub total_stars: u64,
    pub total_forks: u64,
    pub public_repos: usize,
    pub top_repos: Vec<RepoStars>,
}

impl GitHubStats {
    fn from_repos(mut repos: Vec<Repo>) -> Self {
        let total_stars = repos.iter().map(|r| r.stargazers_count).sum();
        let total_forks = repos.iter().map(|r| r.forks_count).sum();
        let public_repos = repos.len();

        repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
        let top_repos = repos
            .into_iter()
            .take(TOP_REPOS)
            .map(|r| RepoStars {
                name: r.name,
                stars: r.stargazers_count,
            })
            .collect();

        Self {
            total_stars,
            total_forks,
            public_repos,
            top_repos,
        }
    }
}

pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    cache: RequestCache<GitHubStats>,
}

impl GitHubClient {
    pub fn new(client: reqwest::Client, api_url: &str, cache: &CacheConfig) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache: RequestCache::from_config(cache),
        }
    }

    pub fn cache_key(user: &str) -> String {
        format!("github-stats:{}", user)
    }

    /// Stats over the first hundred repositories of `user`, sorted by stars
    pub async fn stats(&self, user: &str) -> Result<GitHubStats, CacheError> {
        let client = self.client.clone();
        let url = format!(
            "{}/users/{}/repos?per_page=100&sort=stars",
            self.api_url, user
        );
        tracing::debug!(%url, "github stats lookup");

        self.cache
            .fetch_with_cache(&Self::cache_key(user), move || async move {
                let response = client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                    .send()
                    .await
                    .context("Failed to send request to GitHub")?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    anyhow::bail!("GitHub API error ({}): {}", status, error_text);
                }

                let repos: Vec<Repo> = response
                    .json()
                    .await
                    .context("Failed to parse GitHub repositories")?;
                Ok::<_, anyhow::Error>(GitHubStats::from_repos(repos))
            })
            .await
    }

    pub fn cache(&self) -> &RequestCache<GitHubStats> {
        &self.cache
    }
}
