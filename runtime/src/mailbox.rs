//! Marshaling actions onto the store's thread.
//!
//! A [`Store`](crate::Store) is single-threaded. Side effects that finish on
//! another thread (a loader running on a worker, a Tokio task) must not
//! dispatch directly. They post the resulting action to a [`Mailbox`], which
//! is `Send`, and the owner of the store delivers everything waiting in the
//! matching [`Inbox`] from its own thread.
//!
//! # Example
//!
//! ```
//! use unidirection_core::reducer::from_fn;
//! use unidirection_runtime::{mailbox, Store};
//!
//! let store = Store::new(0_u32, from_fn(|n: &u32, add: u32| (n + add, None::<()>)));
//! let (mailbox, mut inbox) = mailbox::channel();
//!
//! std::thread::spawn(move || {
//!     let _ = mailbox.send(2);
//! })
//! .join()
//! .ok();
//!
//! inbox.drain_into(&store.handle()).ok();
//! assert_eq!(store.state(|n| *n), 2);
//! ```

use crate::error::StoreError;
use crate::metrics::names;
use crate::store::StoreHandle;
use tokio::sync::mpsc;
use unidirection_core::reducer::Reducer;

/// Create a connected mailbox/inbox pair
#[must_use]
pub fn channel<A>() -> (Mailbox<A>, Inbox<A>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Mailbox { tx }, Inbox { rx })
}

/// Sending side: cloneable, `Send` when the action is
#[derive(Debug)]
pub struct Mailbox<A> {
    tx: mpsc::UnboundedSender<A>,
}

impl<A> Mailbox<A> {
    /// Post an action for later delivery on the store's thread
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MailboxClosed`] if the inbox was dropped.
    pub fn send(&self, action: A) -> Result<(), StoreError> {
        self.tx.send(action).map_err(|_| {
            tracing::warn!("Mailbox send failed: inbox has been dropped");
            StoreError::MailboxClosed
        })
    }

    /// Whether the inbox has been dropped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<A> Clone for Mailbox<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Receiving side, owned by whoever owns the store
#[derive(Debug)]
pub struct Inbox<A> {
    rx: mpsc::UnboundedReceiver<A>,
}

impl<A> Inbox<A> {
    /// Take the next waiting action without blocking
    pub fn try_recv(&mut self) -> Option<A> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next action
    ///
    /// Returns `None` once every mailbox has been dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<A> {
        self.rx.recv().await
    }

    /// Dispatch every waiting action into the store, in arrival order
    ///
    /// Actions posted while delivering (for example by a subscriber reacting
    /// to a delivered action) are delivered in the same call.
    ///
    /// # Returns
    ///
    /// The number of actions dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreDropped`] if the store is gone. Waiting
    /// actions are discarded in that case.
    pub fn drain_into<R>(&mut self, handle: &StoreHandle<R>) -> Result<usize, StoreError>
    where
        R: Reducer<Action = A>,
    {
        if !handle.is_alive() {
            let mut discarded = 0_usize;
            while self.rx.try_recv().is_ok() {
                discarded += 1;
            }
            tracing::warn!(discarded, "Inbox not drained: store has been dropped");
            return Err(StoreError::StoreDropped);
        }

        let mut delivered = 0_usize;
        while let Ok(action) = self.rx.try_recv() {
            handle.dispatch(action)?;
            delivered += 1;
        }

        if delivered > 0 {
            tracing::debug!(delivered, "Delivered mailbox actions");
            metrics::counter!(names::MAILBOX_DELIVERED).increment(delivered as u64);
        }
        Ok(delivered)
    }
}
