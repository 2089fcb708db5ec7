use crate::error::{PortfolioError, Result};
use crate::models::{Profile, RateLimitState, Repository};
use crate::types::{GitHubRepo, GitHubUser};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;
const USER_AGENT: &str = "github-portfolio/0.1.0";
const LOW_RATE_LIMIT: u32 = 10;

/// Connection settings for [`GitHubClient`]
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct GitHubClient {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        // Url::join drops the last segment unless the base ends with a slash
        let mut base = config.api_base.trim_end_matches('/').to_string();
        base.push('/');
        let api_base = Url::parse(&base)?;

        Ok(GitHubClient {
            client,
            api_base,
            token: config.token,
        })
    }

    fn cannot_be_a_base(&self) -> PortfolioError {
        PortfolioError::ApiError(format!("API base cannot be a base: {}", self.api_base))
    }

    /// `{api_base}/users/{username}`
    pub fn profile_url(&self, username: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| self.cannot_be_a_base())?
            .pop_if_empty()
            .extend(["users", username]);
        Ok(url)
    }

    /// `{api_base}/users/{username}/repos?per_page=100&sort=updated`
    pub fn repositories_url(&self, username: &str) -> Result<Url> {
        let mut url = self.profile_url(username)?;
        url.path_segments_mut()
            .map_err(|_| self.cannot_be_a_base())?
            .push("repos");
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("sort", "updated");
        Ok(url)
    }

    /// Issues a single GET. Non-success statuses become errors; nothing is retried.
    async fn make_request(&self, url: Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;
        let rate_limit = self.get_rate_limit_state(&response);
        debug!(
            %url,
            status = %response.status(),
            remaining = rate_limit.remaining,
            limit = rate_limit.limit,
            "GitHub API response"
        );

        match response.status() {
            status if status.is_success() => {
                if rate_limit.remaining < LOW_RATE_LIMIT {
                    warn!(
                        remaining = rate_limit.remaining,
                        reset_time = %rate_limit.reset_time,
                        "GitHub rate limit is low"
                    );
                }
                Ok(response)
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(PortfolioError::NotFound(format!("Resource not found: {}", url)))
            }
            reqwest::StatusCode::FORBIDDEN if rate_limit.is_limited => {
                Err(PortfolioError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Reset at: {}",
                    rate_limit.reset_time
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(PortfolioError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    /// Rate limit state carried by a response's headers
    pub fn get_rate_limit_state(&self, response: &Response) -> RateLimitState {
        let headers = response.headers();
        let header_u32 = |name: &str| {
            headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u32>().ok())
        };

        let limit = header_u32("X-RateLimit-Limit").unwrap_or(60);
        // Servers that do not report a quota are treated as unlimited
        let remaining = header_u32("X-RateLimit-Remaining").unwrap_or(limit);

        let reset = headers
            .get("X-RateLimit-Reset")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

        RateLimitState {
            remaining,
            limit,
            reset_time: reset,
            is_limited: remaining == 0,
        }
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<Profile> {
        let url = self.profile_url(username)?;
        let response = self.make_request(url).await?;
        let body = response.text().await?;
        let user: GitHubUser = serde_json::from_str(&body)?;
        Ok(user.into())
    }

    /// Fetches one page of up to [`PER_PAGE`] repositories, most recently updated first.
    pub async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        let url = self.repositories_url(username)?;
        let response = self.make_request(url).await?;
        let body = response.text().await?;
        let repos: Vec<GitHubRepo> = serde_json::from_str(&body)?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }
}
