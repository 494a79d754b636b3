use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;

use crate::models::{GitHubProfile, Repo};
use crate::services::{RepoSource, ServiceError};
use crate::store::OwnerContext;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Fetches an owner's public, non-fork repositories from GitHub.
///
/// When GitHub refuses the request for rate limiting, the attached owner
/// context is flagged so sections can tell the user to wait. Any other
/// outcome clears the flag again.
pub struct GitHubRepoSource {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    owner: Option<OwnerContext>,
}

impl GitHubRepoSource {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            owner: None,
        }
    }

    pub fn with_owner_context(mut self, owner: OwnerContext) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Record whether the last fetch was refused for rate limiting.
    fn set_limited(&self, limited: bool) {
        let Some(owner) = &self.owner else {
            return;
        };
        if owner.with(|o| o.is_github_limited()) == limited {
            return;
        }
        owner.update(|o| o.github.get_or_insert_with(GitHubProfile::default).limited = limited);
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, username: &str) -> Result<Vec<Repo>, ServiceError> {
        let url = format!(
            "{}/users/{}/repos?per_page=100&sort=updated",
            self.api_base,
            urlencoding::encode(username)
        );

        let mut request = self
            .client
            .get(&url)
            .header(USER_AGENT, "folio/0.1")
            .header(ACCEPT, "application/vnd.github+json");

        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;

        if let Some(retry_after) = rate_limit_retry_after(&response) {
            tracing::warn!(retry_after, "github rate limit exceeded");
            return Err(ServiceError::RateLimited(retry_after));
        }

        let repos: Vec<Repo> = response.error_for_status()?.json().await?;
        let repos: Vec<Repo> = repos.into_iter().filter(|r| !r.fork).collect();

        tracing::info!(count = repos.len(), "fetched repositories");
        Ok(repos)
    }
}

fn rate_limit_retry_after(response: &reqwest::Response) -> Option<u64> {
    let headers = response.headers();
    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };

    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => Some(header_u64("retry-after").unwrap_or(60)),
        StatusCode::FORBIDDEN if header_u64("x-ratelimit-remaining") == Some(0) => {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            Some(
                header_u64("x-ratelimit-reset")
                    .map_or(3600, |reset| reset.saturating_sub(now)),
            )
        }
        _ => None,
    }
}

#[async_trait]
impl RepoSource for GitHubRepoSource {
    async fn get_repos_data(&self, username: &str) -> Result<Vec<Repo>, ServiceError> {
        let result = self.fetch(username).await;
        self.set_limited(matches!(result, Err(ServiceError::RateLimited(_))));
        result
    }
}
