//! Persisted, observable session token storage.
//!
//! The store is the single source of truth for the session token inside a
//! running client. Every mutation is written to the key-value store first
//! and only then published, so the persisted and observable values never
//! disagree once `set` returns.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use stratus_domain::{ExecutionContext, SessionToken};
use tracing::debug;

use crate::ports::{KeyValueStore, StorageError};

/// Storage key holding the session token.
pub const TOKEN_STORAGE_KEY: &str = "jwt_token";

type Callback = Arc<dyn Fn(Option<&SessionToken>) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    context: ExecutionContext,
    current: RwLock<Option<SessionToken>>,
    subscribers: Mutex<Subscribers>,
    /// Serializes `set` so storage writes and publication happen in one order.
    writer: tokio::sync::Mutex<()>,
}

impl Inner {
    fn remove_subscriber(&self, id: u64) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Session token store shared by guards, fetch and use cases.
///
/// Cloning is cheap; clones share the same value and subscribers.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<Inner>,
}

impl TokenStore {
    /// Creates a store, reading the initial value from `storage` once when
    /// running in a client context. Outside a client context the store
    /// starts empty and never touches `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted value cannot be read.
    pub async fn load(
        storage: Arc<dyn KeyValueStore>,
        context: ExecutionContext,
    ) -> Result<Self, StorageError> {
        let initial = if context.is_client() {
            storage
                .get(TOKEN_STORAGE_KEY)
                .await?
                .and_then(SessionToken::new)
        } else {
            None
        };

        debug!(%context, present = initial.is_some(), "token store loaded");

        Ok(Self {
            inner: Arc::new(Inner {
                storage,
                context,
                current: RwLock::new(initial),
                subscribers: Mutex::new(Subscribers::default()),
                writer: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Returns the current token, if any.
    #[must_use]
    pub fn read(&self) -> Option<SessionToken> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the execution context the store was created for.
    #[must_use]
    pub fn context(&self) -> ExecutionContext {
        self.inner.context
    }

    /// Replaces the token (`None` removes it).
    ///
    /// In a client context the value is persisted first; if that fails the
    /// error is returned and the observable value is left untouched.
    /// Subscribers are then called synchronously, in subscription order.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent storage cannot be written.
    pub async fn set(&self, value: Option<SessionToken>) -> Result<(), StorageError> {
        let _writer = self.inner.writer.lock().await;

        if self.inner.context.is_client() {
            match &value {
                Some(token) => {
                    self.inner
                        .storage
                        .set(TOKEN_STORAGE_KEY, token.as_str())
                        .await?;
                }
                None => self.inner.storage.remove(TOKEN_STORAGE_KEY).await?,
            }
        }

        let callbacks: Vec<Callback> = {
            let subscribers = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *self
                .inner
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner) = value.clone();
            subscribers
                .entries
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        debug!(
            present = value.is_some(),
            subscribers = callbacks.len(),
            "session token updated"
        );

        for callback in callbacks {
            callback(value.as_ref());
        }

        Ok(())
    }

    /// Removes the token. Same as `set(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent storage cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.set(None).await
    }

    /// Registers a callback that receives the current value immediately and
    /// every later value.
    ///
    /// Delivery stops when the returned `Subscription` is dropped or
    /// `unsubscribe` is called.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&SessionToken>) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);

        let (id, current) = {
            let mut subscribers = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.push((id, Arc::clone(&callback)));
            (id, self.read())
        };

        callback(current.as_ref());

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("context", &self.inner.context)
            .field("token", &self.read())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Handle returned by [`TokenStore::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<Inner>,
}

impl Subscription {
    /// Stops delivery to this subscriber.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.remove_subscriber(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
