#[cfg(feature = "http")]
pub mod github;
#[cfg(feature = "http")]
pub mod user;

use async_trait::async_trait;

use crate::models::{Owner, Repo, UpdateResponse, UserUpdate};

/// Remote owner record store
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<Owner, ServiceError>;

    async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<UpdateResponse, ServiceError>;
}

/// Source of an owner's repositories (GitHub)
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn get_repos_data(&self, username: &str) -> Result<Vec<Repo>, ServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("{0}")]
    Other(String),
}
