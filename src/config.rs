use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::mode::BuildMode;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Build mode: "editor" for the interactive app, "generator" for static export
    #[serde(default)]
    pub mode: BuildMode,

    /// Production deployment; enables analytics events
    #[serde(default)]
    pub production: bool,

    /// Username of the portfolio owner the binary works on
    pub owner: Option<String>,

    /// User API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// GitHub configuration
    #[serde(default)]
    pub github: GitHubConfig,

    /// Projects section configuration
    #[serde(default)]
    pub projects: ProjectsConfig,

    /// Toast configuration
    #[serde(default)]
    pub toasts: ToastConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the user service
    #[serde(default = "default_api_base")]
    pub base_url: String,
}

fn default_api_base() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// REST API base
    #[serde(default = "default_github_api")]
    pub api_base: String,

    /// Prefix for profile links
    #[serde(default = "default_github_web")]
    pub web_base: String,

    /// Personal access token (optional, increases rate limits)
    pub token: Option<String>,
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_github_web() -> String {
    "https://github.com/".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api(),
            web_base: default_github_web(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectsConfig {
    /// Repositories shown in the grid and persisted
    #[serde(default = "default_grid_limit")]
    pub grid_limit: usize,
}

fn default_grid_limit() -> usize {
    6
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            grid_limit: default_grid_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToastConfig {
    /// How long a toast stays visible, in milliseconds
    #[serde(default = "default_toast_timeout")]
    pub timeout_ms: u64,
}

fn default_toast_timeout() -> u64 {
    5000
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_toast_timeout(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(#[from] figment::Error),

    #[error("invalid {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },

    #[error("projects.grid_limit must be at least 1")]
    EmptyGrid,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use a double underscore:
    /// - FOLIO_MODE
    /// - FOLIO_PRODUCTION
    /// - FOLIO_OWNER
    /// - FOLIO_API__BASE_URL
    /// - FOLIO_GITHUB__API_BASE
    /// - FOLIO_GITHUB__WEB_BASE
    /// - FOLIO_GITHUB__TOKEN (or GITHUB_TOKEN)
    /// - FOLIO_PROJECTS__GRID_LIMIT
    /// - FOLIO_TOASTS__TIMEOUT_MS
    pub fn load() -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(ConfigDefaults::default()))
            .merge(Env::prefixed("FOLIO_").split("__"));

        let mut config = Self::from_figment(&figment)?;

        if config.github.token.is_none() {
            config.github.token = std::env::var("GITHUB_TOKEN").ok();
        }

        Ok(config)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("github.api_base", &self.github.api_base),
            ("github.web_base", &self.github.web_base),
        ] {
            url::Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })?;
        }

        if self.projects.grid_limit == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        Ok(())
    }
}

/// Helper struct for default values in figment
#[derive(Debug, Serialize)]
struct ConfigDefaults {
    mode: BuildMode,
    production: bool,
    api: ApiConfig,
    github: GitHubConfig,
    projects: ProjectsConfig,
    toasts: ToastConfig,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            production: false,
            api: ApiConfig::default(),
            github: GitHubConfig::default(),
            projects: ProjectsConfig::default(),
            toasts: ToastConfig::default(),
        }
    }
}
