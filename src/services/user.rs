use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::models::{Owner, UpdateResponse, UserUpdate};
use crate::services::{ServiceError, UserService};

const CLIENT_USER_AGENT: &str = "folio/0.1";

/// User service speaking JSON over HTTP.
///
/// `GET {base}/users/{username}` returns the owner record and
/// `PATCH {base}/users/{username}` applies a partial update.
pub struct HttpUserService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn user_url(&self, username: &str) -> String {
        format!("{}/users/{}", self.base_url, urlencoding::encode(username))
    }
}

#[async_trait]
impl UserService for HttpUserService {
    #[tracing::instrument(skip(self))]
    async fn get_user(&self, username: &str) -> Result<Owner, ServiceError> {
        let owner = self
            .client
            .get(self.user_url(username))
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(owner)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<UpdateResponse, ServiceError> {
        let response = self
            .client
            .patch(self.user_url(username))
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .json(&update)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let body: UpdateResponse = response.json().await?;
        tracing::debug!(success = body.success, "user updated");
        Ok(body)
    }
}
