//! Loader collaborators for the stored todo entries.
//!
//! The screen only knows the [`TodoLoader`] trait. A loader calls the
//! completion it is given exactly once, with the full result set. Loading is
//! treated as infallible.

use std::time::Duration;

/// Callback receiving the loaded entries
///
/// `Send` because loaders may finish on another thread.
pub type LoadCompletion = Box<dyn FnOnce(Vec<String>) + Send>;

/// Source of stored todo entries
pub trait TodoLoader {
    /// Request the stored entries
    ///
    /// Implementations call `completion` exactly once, eventually, with every
    /// entry at once.
    fn request_todo_items(&self, completion: LoadCompletion);
}

/// Loader answering synchronously with a fixed list
///
/// The completion runs before `request_todo_items` returns.
#[derive(Clone, Debug, Default)]
pub struct StaticLoader {
    items: Vec<String>,
}

impl StaticLoader {
    /// Creates a loader returning `items`
    #[must_use]
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl TodoLoader for StaticLoader {
    fn request_todo_items(&self, completion: LoadCompletion) {
        tracing::debug!(count = self.items.len(), "Serving todo items synchronously");
        completion(self.items.clone());
    }
}

/// Loader answering after a delay, off the calling thread
///
/// Inside a Tokio runtime the wait runs as a spawned task; otherwise on a
/// dedicated thread. Either way the completion does not run on the caller's
/// stack, so results must be marshaled back to the store.
#[derive(Clone, Debug)]
pub struct DelayedLoader {
    items: Vec<String>,
    delay: Duration,
}

impl DelayedLoader {
    /// Creates a loader returning `items` after `delay`
    #[must_use]
    pub fn new<I, T>(items: I, delay: Duration) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            delay,
        }
    }
}

impl TodoLoader for DelayedLoader {
    fn request_todo_items(&self, completion: LoadCompletion) {
        let items = self.items.clone();
        let delay = self.delay;
        tracing::debug!(count = items.len(), ?delay, "Scheduling todo items");

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                completion(items);
            });
        } else {
            std::thread::spawn(move || {
                std::thread::sleep(delay);
                completion(items);
            });
        }
    }
}
