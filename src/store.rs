//! Observable state containers.
//!
//! A [`Store`] holds one value and notifies every subscriber when it changes.
//! Clones share the same value, so a store can be handed to spawned tasks and
//! to whatever renders the state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::Owner;

pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Store").field(&*self.tx.borrow()).finish()
    }
}

/// Shared owner record that every section reads from
pub type OwnerContext = Store<Owner>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let store = Store::new(1);
        let other = store.clone();

        other.set(2);
        assert_eq!(store.get(), 2);

        store.update(|v| *v += 3);
        assert_eq!(other.get(), 5);
        assert_eq!(store.with(|v| v * 2), 10);
    }

    #[test]
    fn subscribers_observe_changes() {
        let store = Store::new(vec![1, 2]);
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.update(|v| v.push(3));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec![1, 2, 3]);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn set_without_subscribers_keeps_value() {
        let store: Store<Option<&str>> = Store::default();
        store.set(Some("hello"));
        assert_eq!(store.get(), Some("hello"));
    }
}
