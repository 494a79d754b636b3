use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything held in an ordered section list.
///
/// Identifiers are unique within one list; position is the list index.
pub trait Identified {
    type Id: PartialEq + std::fmt::Debug + Clone + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// A blog post imported from Hashnode or dev.to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brief: Option<String>,
    pub url: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
}

impl Identified for Post {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

/// A GitHub repository, keeping the field names GitHub uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub homepage: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Repo {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashnodeProfile {
    #[serde(default)]
    pub publication_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubProfile {
    #[serde(default)]
    pub login: String,
    /// Set by the repository source when GitHub refused a request for rate limiting
    #[serde(default)]
    pub limited: bool,
}

/// The portfolio owner record, the source of truth for every section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Owner {
    pub username: String,
    pub show_blog: bool,
    pub has_hashnode: bool,
    pub hashnode: Option<HashnodeProfile>,
    pub has_devto: bool,
    pub github: Option<GitHubProfile>,
    pub posts: Vec<Post>,
    pub repos: Vec<Repo>,
}

impl Owner {
    pub fn github_login(&self) -> Option<&str> {
        self.github
            .as_ref()
            .map(|g| g.login.as_str())
            .filter(|login| !login.is_empty())
    }

    pub fn is_github_limited(&self) -> bool {
        self.github.as_ref().is_some_and(|g| g.limited)
    }
}

/// Partial owner update; only the fields that changed go on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<Repo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_blog: Option<bool>,
}

impl UserUpdate {
    pub fn posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Some(posts),
            ..Self::default()
        }
    }

    pub fn repos(repos: Vec<Repo>) -> Self {
        Self {
            repos: Some(repos),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            brief: None,
            url: format!("https://blog.example.com/{id}"),
            cover_image: None,
            date_added: None,
        }
    }

    pub fn repo(id: u64) -> Repo {
        Repo {
            id,
            name: format!("repo-{id}"),
            description: None,
            stargazers_count: 0,
            forks_count: 0,
            homepage: None,
            html_url: format!("https://github.com/octocat/repo-{id}"),
            language: Some("Rust".to_string()),
            fork: false,
            updated_at: None,
        }
    }
}
