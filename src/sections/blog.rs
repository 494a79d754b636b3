use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::analytics::LinkTracker;
use crate::mode::BuildMode;
use crate::models::{Owner, Post, UserUpdate};
use crate::mutation::{MutationOutcome, Persister};
use crate::notify::Notifier;
use crate::reorder::Direction;
use crate::sections::{ItemControls, ListSection};
use crate::services::UserService;
use crate::store::{OwnerContext, Store};

const POSTS_UPDATED: &str = "Posts updated";

/// Where "show more" sends the reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExternalLink {
    NoLink,
    DirectUrl(String),
}

impl ExternalLink {
    /// Link target as rendered; `#` when there is nowhere to go.
    pub fn href(&self) -> &str {
        match self {
            ExternalLink::NoLink => "#",
            ExternalLink::DirectUrl(url) => url,
        }
    }

    /// Pick the owner's blog home: custom Hashnode domain, then Hashnode
    /// profile, then dev.to profile.
    pub fn for_owner(owner: &Owner) -> Self {
        let publication_domain = owner
            .hashnode
            .as_ref()
            .and_then(|h| h.publication_domain.as_deref())
            .filter(|domain| !domain.is_empty());

        match (owner.has_hashnode, publication_domain, owner.has_devto) {
            (true, Some(domain), _) => Self::DirectUrl(format!("https://{domain}")),
            (true, None, _) => {
                Self::DirectUrl(format!("https://hashnode.com/@{}", owner.username))
            }
            (false, _, true) => Self::DirectUrl(format!("https://dev.to/{}", owner.username)),
            (false, _, false) => Self::NoLink,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlogView {
    /// Hidden section in a generator build: offer to turn it back on
    EnablePrompt { label: &'static str },
    List {
        posts: Vec<Post>,
        controls: Vec<ItemControls<String>>,
        show_more: ExternalLink,
    },
}

/// Controller behind the "Latest Blogs" section
///
/// Must be used from within a Tokio runtime; persistence runs on spawned tasks.
#[derive(Clone)]
pub struct BlogSection {
    list: ListSection<Post>,
    owner: OwnerContext,
    persister: Persister,
    links: LinkTracker,
}

impl BlogSection {
    pub fn new(
        owner: OwnerContext,
        service: Arc<dyn UserService>,
        notifier: Arc<dyn Notifier>,
        links: LinkTracker,
    ) -> Self {
        let posts = owner.with(|o| o.posts.clone());
        Self {
            list: ListSection::new(posts),
            persister: Persister::new(service, notifier, owner.clone()),
            owner,
            links,
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.list.items()
    }

    pub fn store(&self) -> &Store<Vec<Post>> {
        self.list.store()
    }

    pub fn loading(&self) -> &Store<bool> {
        self.persister.loading()
    }

    #[tracing::instrument(skip(self))]
    pub fn move_item(
        &self,
        index: usize,
        direction: Direction,
    ) -> Option<JoinHandle<MutationOutcome>> {
        let posts = self.list.step(index, direction, usize::MAX)?;
        Some(self.update_posts(posts))
    }

    /// Delete a post. Deleting the last one also hides the section.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Option<JoinHandle<MutationOutcome>> {
        let posts = self.list.remove(&id.to_string())?;
        if posts.is_empty() {
            tracing::info!("last post removed, hiding blog section");
            self.owner.update(|o| o.show_blog = false);
        }
        Some(self.update_posts(posts))
    }

    pub fn external_link(&self) -> ExternalLink {
        self.owner.with(ExternalLink::for_owner)
    }

    pub fn open_show_more(&self) {
        self.links.click(self.external_link().href());
    }

    pub fn open_post(&self, index: usize) {
        let url = self
            .list
            .store()
            .with(|posts| posts.get(index).map(|p| p.url.clone()));
        if let Some(url) = url {
            self.links.click(&url);
        }
    }

    /// Turn the section back on and restore the owner's posts.
    pub fn enable_section(&self) {
        self.owner.update(|o| o.show_blog = true);
        self.list.replace(self.owner.with(|o| o.posts.clone()));
    }

    pub fn view(&self, mode: BuildMode) -> BlogView {
        let (hidden, has_posts) = self.owner.with(|o| (!o.show_blog, !o.posts.is_empty()));

        if hidden && has_posts && mode == BuildMode::Generator {
            let label = if self.loading().get() {
                "Adding..."
            } else {
                "Add blog section"
            };
            return BlogView::EnablePrompt { label };
        }

        BlogView::List {
            posts: self.posts(),
            controls: self.list.controls(usize::MAX),
            show_more: self.external_link(),
        }
    }

    fn update_posts(&self, posts: Vec<Post>) -> JoinHandle<MutationOutcome> {
        self.persister
            .submit(UserUpdate::posts(posts), POSTS_UPDATED)
    }
}
