use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::analytics::LinkTracker;
use crate::mode::{BuildMode, Capabilities, Viewport};
use crate::models::{Owner, Repo, UserUpdate};
use crate::mutation::{MutationOutcome, Persister};
use crate::notify::{Notifier, ToastKind};
use crate::reorder::Direction;
use crate::sections::{ItemControls, ListSection};
use crate::services::{RepoSource, UserService};
use crate::store::{OwnerContext, Store};

const REPOS_UPDATED: &str = "Repos updated";
pub const RATE_LIMITED: &str = "Github API rate limit exceeded try again in 1 hour";
pub const FETCH_FAILED: &str = "Something went wrong, try again in 1 hour";

#[derive(Debug, Clone)]
pub struct ProjectsOptions {
    pub mode: BuildMode,
    /// Number of repositories shown and persisted
    pub grid_limit: usize,
    /// Prefix for the owner's GitHub profile link, e.g. `https://github.com/`
    pub github_web_base: String,
}

impl Default for ProjectsOptions {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            grid_limit: 6,
            github_web_base: "https://github.com/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Replaced {
        count: usize,
        persisted: MutationOutcome,
    },
    Failed {
        rate_limited: bool,
    },
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectsView {
    pub repos: Vec<Repo>,
    pub controls: Vec<ItemControls<u64>>,
    pub capabilities: Capabilities,
    pub show_more: Option<String>,
}

/// Controller behind the "My Projects" section
///
/// Must be used from within a Tokio runtime; persistence and fetches run on spawned tasks.
#[derive(Clone)]
pub struct ProjectsSection {
    list: ListSection<Repo>,
    owner: OwnerContext,
    persister: Persister,
    source: Arc<dyn RepoSource>,
    links: LinkTracker,
    options: ProjectsOptions,
    fetches: Arc<AtomicU64>,
}

impl ProjectsSection {
    pub fn new(
        owner: OwnerContext,
        service: Arc<dyn UserService>,
        source: Arc<dyn RepoSource>,
        notifier: Arc<dyn Notifier>,
        links: LinkTracker,
        options: ProjectsOptions,
    ) -> Self {
        let repos = owner.with(|o| o.repos.clone());
        Self {
            list: ListSection::new(repos),
            persister: Persister::new(service, notifier, owner.clone()),
            owner,
            source,
            links,
            options,
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn repos(&self) -> Vec<Repo> {
        self.list.items()
    }

    pub fn store(&self) -> &Store<Vec<Repo>> {
        self.list.store()
    }

    pub fn capabilities(&self, viewport: Viewport) -> Capabilities {
        Capabilities::resolve(self.options.mode, viewport)
    }

    #[tracing::instrument(skip(self))]
    pub fn move_item(
        &self,
        index: usize,
        direction: Direction,
    ) -> Option<JoinHandle<MutationOutcome>> {
        let repos = self.list.step(index, direction, self.options.grid_limit)?;
        Some(self.update_repos(repos))
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: u64) -> Option<JoinHandle<MutationOutcome>> {
        let repos = self.list.remove(&id)?;
        Some(self.update_repos(repos))
    }

    /// Finish a drag. `None` means the item was dropped outside the grid.
    #[tracing::instrument(skip(self))]
    pub fn drag_end(
        &self,
        viewport: Viewport,
        source: usize,
        destination: Option<usize>,
    ) -> Option<JoinHandle<MutationOutcome>> {
        if !self.capabilities(viewport).drag_and_drop {
            tracing::debug!("drop ignored, drag and drop disabled");
            return None;
        }
        let destination = destination?;
        let visible = self.list.len().min(self.options.grid_limit);
        if source >= visible || destination >= visible {
            tracing::debug!(visible, "drop outside the visible grid ignored");
            return None;
        }
        let repos = self.list.move_to(source, destination)?;
        Some(self.update_repos(repos))
    }

    /// Replace the list with the owner's current GitHub repositories.
    ///
    /// A newer call supersedes an older one still waiting on GitHub.
    pub fn fetch_external(&self) -> JoinHandle<FetchOutcome> {
        let ticket = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        let this = self.clone();
        tokio::spawn(async move { this.run_fetch(ticket).await })
    }

    #[tracing::instrument(skip(self))]
    async fn run_fetch(&self, ticket: u64) -> FetchOutcome {
        let username = self.owner.with(|o| o.username.clone());
        let result = self.source.get_repos_data(&username).await;

        if self.fetches.load(Ordering::SeqCst) != ticket {
            tracing::debug!("fetch superseded");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(repos) => {
                let count = repos.len();
                tracing::info!(count, "replacing repositories");
                self.list.replace(repos.clone());
                let persisted = self
                    .persister
                    .persist(self.capped(repos), REPOS_UPDATED)
                    .await;
                FetchOutcome::Replaced { count, persisted }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch repositories");
                let rate_limited = self.owner.with(Owner::is_github_limited);
                let message = if rate_limited { RATE_LIMITED } else { FETCH_FAILED };
                self.persister
                    .notifier()
                    .add_toast_with_timeout(ToastKind::Error, message);
                FetchOutcome::Failed { rate_limited }
            }
        }
    }

    /// Owner's GitHub profile, offered only when the grid hides some repositories.
    pub fn show_more_link(&self) -> Option<String> {
        if self.list.len() <= self.options.grid_limit {
            return None;
        }
        self.owner.with(|o| {
            o.github_login()
                .map(|login| format!("{}{login}", self.options.github_web_base))
        })
    }

    pub fn open_show_more(&self) {
        if let Some(url) = self.show_more_link() {
            self.links.click(&url);
        }
    }

    /// Open a repository's homepage when it has one, its GitHub page otherwise.
    pub fn open_repo(&self, index: usize) {
        let url = self.list.store().with(|repos| {
            repos.get(index).map(|r| {
                r.homepage
                    .clone()
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| r.html_url.clone())
            })
        });
        if let Some(url) = url {
            self.links.click(&url);
        }
    }

    pub fn view(&self, viewport: Viewport) -> ProjectsView {
        ProjectsView {
            repos: self
                .list
                .store()
                .with(|repos| repos.iter().take(self.options.grid_limit).cloned().collect()),
            controls: self.list.controls(self.options.grid_limit),
            capabilities: self.capabilities(viewport),
            show_more: self.show_more_link(),
        }
    }

    fn capped(&self, repos: Vec<Repo>) -> UserUpdate {
        UserUpdate::repos(repos.into_iter().take(self.options.grid_limit).collect())
    }

    fn update_repos(&self, repos: Vec<Repo>) -> JoinHandle<MutationOutcome> {
        self.persister.submit(self.capped(repos), REPOS_UPDATED)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::analytics::testing::Recorder;
    use crate::models::{fixtures, GitHubProfile};
    use crate::notify::Toasts;
    use crate::services::testing::{MockRepoSource, MockUserService};

    struct Harness {
        section: ProjectsSection,
        owner: OwnerContext,
        service: Arc<MockUserService>,
        source: Arc<MockRepoSource>,
        toasts: Toasts,
        recorder: Arc<Recorder>,
    }

    fn harness(count: u64, mode: BuildMode) -> Harness {
        let owner = OwnerContext::new(Owner {
            username: "octocat".to_string(),
            github: Some(GitHubProfile {
                login: "octocat".to_string(),
                limited: false,
            }),
            repos: (1..=count).map(fixtures::repo).collect(),
            ..Owner::default()
        });
        let service = Arc::new(MockUserService::default());
        let source = Arc::new(MockRepoSource::default());
        let toasts = Toasts::new(Duration::from_secs(60));
        let recorder = Arc::new(Recorder::default());
        let section = ProjectsSection::new(
            owner.clone(),
            service.clone(),
            source.clone(),
            Arc::new(toasts.clone()),
            LinkTracker::new(false, recorder.clone(), recorder.clone()),
            ProjectsOptions {
                mode,
                grid_limit: 3,
                github_web_base: "https://github.com/".to_string(),
            },
        );
        Harness {
            section,
            owner,
            service,
            source,
            toasts,
            recorder,
        }
    }

    fn ids(repos: &[Repo]) -> Vec<u64> {
        repos.iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn persists_only_grid_limit() {
        let h = harness(5, BuildMode::Editor);

        let outcome = h.section.move_item(0, Direction::Right).unwrap().await.unwrap();

        assert_eq!(outcome, MutationOutcome::Saved);
        assert_eq!(ids(&h.section.repos()), vec![2, 1, 3, 4, 5]);
        let updates = h.service.updates();
        assert_eq!(ids(updates[0].repos.as_ref().unwrap()), vec![2, 1, 3]);
        assert!(updates[0].posts.is_none());
        assert_eq!(h.toasts.current()[0].message, "Repos updated");
    }

    #[tokio::test]
    async fn cannot_move_past_grid_edge() {
        let h = harness(5, BuildMode::Editor);

        assert!(h.section.move_item(2, Direction::Right).is_none());
        assert!(h.section.move_item(0, Direction::Left).is_none());
        assert!(h.section.move_item(1, Direction::Right).is_some());
    }

    #[tokio::test]
    async fn delete_keeps_section_visible_and_caps_payload() {
        let h = harness(5, BuildMode::Editor);
        let owner_rx = h.owner.subscribe();

        h.section.delete(1).unwrap().await.unwrap();

        assert_eq!(ids(&h.section.repos()), vec![2, 3, 4, 5]);
        assert_eq!(ids(h.service.updates()[0].repos.as_ref().unwrap()), vec![2, 3, 4]);
        assert!(!owner_rx.has_changed().unwrap());
        assert!(h.section.delete(99).is_none());
    }

    #[tokio::test]
    async fn drag_end_reorders_on_desktop_editor() {
        let h = harness(3, BuildMode::Editor);

        assert!(h.section.drag_end(Viewport::Desktop, 0, None).is_none());
        assert!(h.section.drag_end(Viewport::Mobile, 0, Some(2)).is_none());

        h.section
            .drag_end(Viewport::Desktop, 0, Some(2))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(ids(&h.section.repos()), vec![2, 3, 1]);
        assert_eq!(h.service.updates().len(), 1);
    }

    #[tokio::test]
    async fn drag_end_stays_within_grid() {
        let h = harness(5, BuildMode::Editor);

        assert!(h.section.drag_end(Viewport::Desktop, 0, Some(3)).is_none());
        assert!(h.section.drag_end(Viewport::Desktop, 4, Some(0)).is_none());
        assert_eq!(ids(&h.section.repos()), vec![1, 2, 3, 4, 5]);

        h.section
            .drag_end(Viewport::Desktop, 0, Some(2))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(ids(&h.section.repos()), vec![2, 3, 1, 4, 5]);
        assert_eq!(h.service.updates().len(), 1);
    }

    #[tokio::test]
    async fn generator_mode_disables_drag() {
        let h = harness(3, BuildMode::Generator);

        assert!(h.section.drag_end(Viewport::Desktop, 0, Some(1)).is_none());
        let view = h.section.view(Viewport::Desktop);
        assert!(view.capabilities.fixed_grid);
        assert!(!view.capabilities.drag_and_drop);
    }

    #[tokio::test]
    async fn fetch_replaces_and_persists() {
        let h = harness(2, BuildMode::Editor);
        h.source.push(Ok((10..15).map(fixtures::repo).collect()));

        let outcome = h.section.fetch_external().await.unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::Replaced {
                count: 5,
                persisted: MutationOutcome::Saved
            }
        );
        assert_eq!(ids(&h.section.repos()), vec![10, 11, 12, 13, 14]);
        assert_eq!(
            ids(h.service.updates()[0].repos.as_ref().unwrap()),
            vec![10, 11, 12]
        );
    }

    #[tokio::test]
    async fn fetch_failure_distinguishes_rate_limit() {
        let h = harness(2, BuildMode::Editor);
        h.source.push(Err("boom".to_string()));

        let outcome = h.section.fetch_external().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Failed { rate_limited: false });
        assert_eq!(h.toasts.current()[0].message, FETCH_FAILED);

        h.owner.update(|o| {
            if let Some(github) = o.github.as_mut() {
                github.limited = true;
            }
        });
        h.source.push(Err("403".to_string()));

        let outcome = h.section.fetch_external().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Failed { rate_limited: true });
        assert_eq!(h.toasts.current()[1].message, RATE_LIMITED);
        assert_eq!(h.toasts.current()[1].kind, ToastKind::Error);

        assert_eq!(ids(&h.section.repos()), vec![1, 2]);
        assert!(h.service.updates().is_empty());
    }

    #[tokio::test]
    async fn newer_fetch_supersedes_older() {
        let h = harness(1, BuildMode::Editor);
        h.source.push(Ok(vec![fixtures::repo(100)]));
        let release = h.source.hold_next();

        let stale = h.section.fetch_external();
        tokio::task::yield_now().await;

        h.source.push(Ok(vec![fixtures::repo(200)]));
        let fresh = h.section.fetch_external().await.unwrap();
        assert!(matches!(fresh, FetchOutcome::Replaced { count: 1, .. }));

        release.send(()).unwrap();
        assert_eq!(stale.await.unwrap(), FetchOutcome::Superseded);
        assert_eq!(ids(&h.section.repos()), vec![200]);
        assert_eq!(h.service.updates().len(), 1);
    }

    #[tokio::test]
    async fn show_more_only_when_list_exceeds_grid() {
        let h = harness(3, BuildMode::Editor);
        assert_eq!(h.section.show_more_link(), None);
        h.section.open_show_more();
        assert!(h.recorder.opened.lock().unwrap().is_empty());

        let h = harness(4, BuildMode::Editor);
        assert_eq!(
            h.section.show_more_link().as_deref(),
            Some("https://github.com/octocat")
        );
        h.section.open_show_more();
        assert_eq!(
            *h.recorder.opened.lock().unwrap(),
            vec!["https://github.com/octocat"]
        );

        let view = h.section.view(Viewport::Desktop);
        assert_eq!(ids(&view.repos), vec![1, 2, 3]);
        assert_eq!(view.controls.len(), 3);
        assert!(!view.controls[2].can_move_right);
    }

    #[tokio::test]
    async fn open_repo_prefers_homepage() {
        let h = harness(2, BuildMode::Editor);
        h.section.store().update(|repos| {
            repos[0].homepage = Some("https://repo-1.dev".to_string());
        });

        h.section.open_repo(0);
        h.section.open_repo(1);
        h.section.open_repo(9);

        assert_eq!(
            *h.recorder.opened.lock().unwrap(),
            vec!["https://repo-1.dev", "https://github.com/octocat/repo-2"]
        );
    }
}
