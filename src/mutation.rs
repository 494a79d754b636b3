//! Optimistic persistence of section edits.
//!
//! Sections change their local state first and then hand the change to a
//! [`Persister`], which sends it to the [`UserService`] in the background and
//! reports the result as a toast. Local state is never rolled back.
//!
//! Every submit takes a generation ticket. When a request completes after a
//! newer one was submitted, its result is discarded: no toast, and the
//! `loading` flag is left to the newer request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::models::UserUpdate;
use crate::notify::{Notifier, ToastKind};
use crate::services::UserService;
use crate::store::{OwnerContext, Store};

pub const GENERIC_ERROR: &str = "Something went wrong, try again later";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Saved,
    /// The service answered but reported failure
    Rejected,
    /// The request itself failed
    Failed,
    Superseded,
}

#[derive(Clone)]
pub struct Persister {
    service: Arc<dyn UserService>,
    notifier: Arc<dyn Notifier>,
    owner: OwnerContext,
    loading: Store<bool>,
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

impl Persister {
    pub fn new(
        service: Arc<dyn UserService>,
        notifier: Arc<dyn Notifier>,
        owner: OwnerContext,
    ) -> Self {
        Self {
            service,
            notifier,
            owner,
            loading: Store::new(false),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn loading(&self) -> &Store<bool> {
        &self.loading
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Send `update` in the background. The returned handle may be dropped.
    pub fn submit(&self, update: UserUpdate, success_message: &'static str) -> JoinHandle<MutationOutcome> {
        let ticket = self.issue();
        let this = self.clone();
        tokio::spawn(async move { this.run(ticket, update, success_message).await })
    }

    /// Send `update` and wait for the outcome, for callers already in a task.
    pub async fn persist(&self, update: UserUpdate, success_message: &'static str) -> MutationOutcome {
        let ticket = self.issue();
        self.run(ticket, update, success_message).await
    }

    /// Discard the effects of every request still in flight.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.loading.set(false);
    }

    fn issue(&self) -> Ticket {
        let ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.loading.set(true);
        ticket
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    #[tracing::instrument(skip(self, update), fields(generation = ticket.0))]
    async fn run(
        &self,
        ticket: Ticket,
        update: UserUpdate,
        success_message: &'static str,
    ) -> MutationOutcome {
        let username = self.owner.with(|o| o.username.clone());
        let result = self.service.update_user(&username, update).await;

        if !self.is_current(ticket) {
            tracing::debug!("superseded by a newer update");
            return MutationOutcome::Superseded;
        }
        self.loading.set(false);

        match result {
            Ok(response) if response.success => {
                self.notifier
                    .add_toast_with_timeout(ToastKind::Success, success_message);
                MutationOutcome::Saved
            }
            Ok(_) => {
                self.notifier
                    .add_toast_with_timeout(ToastKind::Error, GENERIC_ERROR);
                MutationOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to persist update");
                self.notifier
                    .add_toast_with_timeout(ToastKind::Error, GENERIC_ERROR);
                MutationOutcome::Failed
            }
        }
    }
}
