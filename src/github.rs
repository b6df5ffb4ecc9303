use crate::error::{AwesomeStarsError, Result};
use crate::models::RateLimitState;
use crate::types::GitHubRepo;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use std::future::Future;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, warn};

pub const API_BASE_URL: &str = "https://api.github.com";
const MAX_RETRIES: u32 = 3;
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Looks up repository metadata by `owner/name`.
pub trait RepoSource {
    fn repo_info(&self, full_name: &str) -> impl Future<Output = Result<GitHubRepo>>;
}

impl<S: RepoSource + ?Sized> RepoSource for &S {
    fn repo_info(&self, full_name: &str) -> impl Future<Output = Result<GitHubRepo>> {
        (**self).repo_info(full_name)
    }
}

/// Splits `owner/name` into its two halves.
pub fn split_full_name(full_name: &str) -> Result<(&str, &str)> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(AwesomeStarsError::InvalidRepoUrl(
            format!("Invalid repository name format: {}", full_name)
        )),
    }
}

pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("awesome-stars/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            token: token.filter(|t| !t.is_empty()),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Points the client at another API root, e.g. a GitHub Enterprise host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut retries = 0;

        loop {
            let mut request = self
                .client
                .get(url)
                .header("Accept", "application/vnd.github.v3+json");
            if let Some(token) = &self.token {
                request = request.header("Authorization", format!("token {}", token));
            }
            let response = request.send().await?;
            let rate_limit = self.get_rate_limit_state(&response);

            match response.status() {
                reqwest::StatusCode::OK => {
                    if rate_limit.remaining < 10 {
                        warn!(remaining = rate_limit.remaining, "Rate limit low, adding delay");
                        sleep(Duration::from_secs(1)).await;
                    }
                    return Ok(response);
                }
                reqwest::StatusCode::NOT_FOUND => {
                    return Err(AwesomeStarsError::NotFound(format!("Resource not found: {}", url)));
                }
                reqwest::StatusCode::UNAUTHORIZED => {
                    return Err(AwesomeStarsError::AuthError(
                        "GitHub rejected the provided token".to_string()
                    ));
                }
                reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    if rate_limit.is_limited {
                        let reset_time: SystemTime = rate_limit.reset_time.into();
                        let wait_time = reset_time
                            .duration_since(SystemTime::now())
                            .unwrap_or(Duration::from_secs(0));

                        if wait_time > MAX_RATE_LIMIT_WAIT {
                            return Err(AwesomeStarsError::RateLimitExceeded(
                                format!("API rate limit exceeded. Reset at: {}", rate_limit.reset_time)
                            ));
                        }
                        warn!(wait_seconds = wait_time.as_secs() + 1, "Rate limit reached, waiting");
                        sleep(wait_time + Duration::from_secs(1)).await;
                        continue;
                    }
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(AwesomeStarsError::ApiError(format!("Forbidden: {}", error_text)));
                }
                status if status.is_server_error() && retries < MAX_RETRIES => {
                    warn!(%status, attempt = retries + 1, "Server error, retrying in 2 seconds");
                    sleep(Duration::from_secs(2)).await;
                    retries += 1;
                    continue;
                }
                status => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(AwesomeStarsError::ApiError(
                        format!("API request failed with status {}: {}", status, error_text)
                    ));
                }
            }
        }
    }

    pub async fn get_repository_info(&self, owner: &str, repo: &str) -> Result<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);
        debug!(%url, "Fetching repository");
        let response = self.make_request(&url).await?;
        let repo_data: GitHubRepo = response.json().await?;
        Ok(repo_data)
    }

    /// Rate limit state carried by a response's headers
    pub fn get_rate_limit_state(&self, response: &Response) -> RateLimitState {
        let headers = response.headers();

        let remaining = headers
            .get("X-RateLimit-Remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok());

        let limit = headers
            .get("X-RateLimit-Limit")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(60);

        let reset = headers
            .get("X-RateLimit-Reset")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

        RateLimitState {
            remaining: remaining.unwrap_or(limit),
            limit,
            reset_time: reset,
            is_limited: remaining == Some(0),
        }
    }
}

impl RepoSource for GitHubClient {
    async fn repo_info(&self, full_name: &str) -> Result<GitHubRepo> {
        let (owner, repo) = split_full_name(full_name)?;
        self.get_repository_info(owner, repo).await
    }
}
