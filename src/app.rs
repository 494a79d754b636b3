use std::sync::Arc;
use std::time::Duration;

use crate::analytics::{LinkTracker, LogOpener, TracingAnalytics};
use crate::config::Config;
use crate::notify::Toasts;
use crate::sections::{BlogSection, ProjectsOptions, ProjectsSection};
use crate::services::{RepoSource, UserService};
use crate::store::OwnerContext;

/// Every section of one owner's portfolio, wired to shared owner state and toasts
pub struct App {
    pub config: Config,
    pub owner: OwnerContext,
    pub toasts: Toasts,
    pub blog: BlogSection,
    pub projects: ProjectsSection,
}

impl App {
    pub fn new(
        config: Config,
        owner: OwnerContext,
        service: Arc<dyn UserService>,
        source: Arc<dyn RepoSource>,
    ) -> Self {
        let toasts = Toasts::new(Duration::from_millis(config.toasts.timeout_ms));
        let links = LinkTracker::new(
            config.production,
            Arc::new(TracingAnalytics),
            Arc::new(LogOpener),
        );

        let blog = BlogSection::new(
            owner.clone(),
            service.clone(),
            Arc::new(toasts.clone()),
            links.clone(),
        );
        let projects = ProjectsSection::new(
            owner.clone(),
            service,
            source,
            Arc::new(toasts.clone()),
            links,
            ProjectsOptions {
                mode: config.mode,
                grid_limit: config.projects.grid_limit,
                github_web_base: config.github.web_base.clone(),
            },
        );

        Self {
            config,
            owner,
            toasts,
            blog,
            projects,
        }
    }

    /// Fetch the configured owner over HTTP and wire the sections to the live services.
    #[cfg(feature = "http")]
    #[tracing::instrument(skip(config))]
    pub async fn bootstrap(config: Config) -> Result<Self, crate::error::AppError> {
        use crate::error::AppError;
        use crate::services::github::GitHubRepoSource;
        use crate::services::user::HttpUserService;

        let username = config
            .owner
            .clone()
            .ok_or_else(|| AppError::NotFound("owner username (FOLIO_OWNER)".to_string()))?;

        let service = Arc::new(HttpUserService::new(config.api.base_url.clone()));
        let owner = OwnerContext::new(service.get_user(&username).await?);
        tracing::info!(
            posts = owner.with(|o| o.posts.len()),
            repos = owner.with(|o| o.repos.len()),
            "loaded owner"
        );

        let source = Arc::new(
            GitHubRepoSource::new(config.github.api_base.clone(), config.github.token.clone())
                .with_owner_context(owner.clone()),
        );

        Ok(Self::new(config, owner, service, source))
    }
}
