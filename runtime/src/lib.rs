//! # Unidirection Runtime
//!
//! Runtime implementation for unidirectional data flow.
//!
//! This crate provides the Store runtime that owns the live state, runs the
//! reducer on every dispatched action and notifies a single subscriber of
//! each committed transition.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, serializes transitions through `dispatch`
//! - **`StoreHandle`**: Weak, liveness-checked way back into a store for
//!   completions and subscribers
//! - **Mailbox / Inbox**: Marshals actions produced on other threads back onto
//!   the thread that owns the store
//!
//! ## Example
//!
//! ```
//! use unidirection_core::reducer::from_fn;
//! use unidirection_runtime::Store;
//!
//! let store = Store::new(0_i64, from_fn(|count: &i64, delta: i64| (count + delta, None::<()>)));
//!
//! store.subscribe(|state, previous, _command| {
//!     println!("{previous} -> {state}");
//! });
//!
//! store.dispatch(5);
//! assert_eq!(store.state(|count| *count), 5);
//! ```

use unidirection_core::reducer::Reducer;

/// Marshaling actions from other threads onto the store's thread
pub mod mailbox;

/// Metric names and descriptions for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Contract violations (for example an out-of-range index handed to a
    /// reducer) are not represented here: they panic.
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreError {
        /// The store behind a [`StoreHandle`](crate::StoreHandle) was dropped
        ///
        /// Returned when a completion fires after its owner was torn down.
        #[error("Store has been dropped")]
        StoreDropped,

        /// The inbox side of a mailbox was dropped
        ///
        /// Nobody is left to deliver the action to the store.
        #[error("Mailbox closed: inbox has been dropped")]
        MailboxClosed,
    }
}

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use unidirection_runtime::StoreConfig;
///
/// let config = StoreConfig::new("todo-screen").with_max_reentrant_depth(8);
/// assert_eq!(config.name, "todo-screen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Label recorded on tracing events and metrics
    pub name: String,
    /// Optional cap on the nesting of `dispatch` calls made from inside a
    /// subscriber
    ///
    /// `None` (the default) leaves re-entrant dispatch unbounded. When set,
    /// exceeding the cap panics; use it in debug setups to catch subscribers
    /// that re-dispatch unconditionally.
    pub max_reentrant_depth: Option<usize>,
}

impl StoreConfig {
    /// Create a configuration with the given store name and default limits
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Cap the re-entrant dispatch depth
    #[must_use]
    pub const fn with_max_reentrant_depth(mut self, depth: usize) -> Self {
        self.max_reentrant_depth = Some(depth);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            max_reentrant_depth: None,
        }
    }
}

/// Store runtime for coordinating reducer execution and subscriber notification.
pub mod store {
    use super::{Reducer, StoreConfig, StoreError};
    use crate::metrics::names;
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};
    use std::time::Instant;
    use unidirection_core::subscriber::Subscriber;

    type SharedSubscriber<R> =
        Rc<Subscriber<<R as Reducer>::State, <R as Reducer>::Command>>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (a single immutable snapshot, replaced wholesale)
    /// 2. Reducer (business logic)
    /// 3. At most one subscriber, notified after every committed transition
    ///
    /// The store is single-threaded (`!Send`) and performs no locking. All
    /// dispatches must happen on the thread that owns it; work finishing on
    /// other threads comes back through a [`Mailbox`](crate::mailbox::Mailbox).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(TodoState::default(), TodoReducer::new());
    ///
    /// store.subscribe(|state, previous, command| {
    ///     // execute command, reconcile presentation from the diff
    /// });
    ///
    /// store.dispatch(TodoAction::UpdateText("milk".to_string()));
    /// ```
    pub struct Store<R: Reducer> {
        shared: Rc<Shared<R>>,
    }

    struct Shared<R: Reducer> {
        state: RefCell<Rc<R::State>>,
        reducer: R,
        subscriber: RefCell<Option<SharedSubscriber<R>>>,
        config: StoreConfig,
        depth: Cell<usize>,
    }

    /// Restores the dispatch depth when a dispatch unwinds or returns
    struct DepthGuard<'a>(&'a Cell<usize>);

    impl Drop for DepthGuard<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get().saturating_sub(1));
        }
    }

    impl<R: Reducer> Shared<R> {
        fn dispatch(&self, action: R::Action) {
            let depth = self.depth.get() + 1;
            if let Some(limit) = self.config.max_reentrant_depth {
                assert!(
                    depth <= limit,
                    "re-entrant dispatch depth {depth} exceeds the limit of {limit} on store `{}`",
                    self.config.name,
                );
            }
            self.depth.set(depth);
            let _depth = DepthGuard(&self.depth);

            tracing::debug!(store = %self.config.name, depth, "Processing action");
            metrics::counter!(names::DISPATCH_TOTAL, "store" => self.config.name.clone())
                .increment(1);

            let previous = Rc::clone(&self.state.borrow());

            let (next, command) = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = Instant::now();
                let reduction = self.reducer.reduce(&previous, action);
                metrics::histogram!(
                    names::REDUCER_DURATION_SECONDS,
                    "store" => self.config.name.clone()
                )
                .record(start.elapsed().as_secs_f64());
                reduction
            };

            let next = Rc::new(next);
            *self.state.borrow_mut() = Rc::clone(&next);
            tracing::trace!(has_command = command.is_some(), "State committed");

            if command.is_some() {
                metrics::counter!(names::COMMANDS_EMITTED, "store" => self.config.name.clone())
                    .increment(1);
            }

            // Clone the handler out so the subscriber may dispatch, subscribe
            // or unsubscribe without hitting an outstanding borrow.
            let subscriber = self.subscriber.borrow().clone();
            match subscriber {
                Some(subscriber) => subscriber(&next, &previous, command),
                None if command.is_some() => {
                    tracing::debug!(
                        store = %self.config.name,
                        "No subscriber registered, dropping command"
                    );
                    metrics::counter!(
                        names::COMMANDS_UNOBSERVED,
                        "store" => self.config.name.clone()
                    )
                    .increment(1);
                },
                None => {},
            }
        }
    }

    impl<R: Reducer> Store<R> {
        /// Create a new store with initial state and reducer
        ///
        /// The initial state becomes current without notifying anyone:
        /// construction is not a transition.
        #[must_use]
        pub fn new(initial_state: R::State, reducer: R) -> Self {
            Self::with_config(initial_state, reducer, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let store = Store::with_config(
        ///     TodoState::default(),
        ///     TodoReducer::new(),
        ///     StoreConfig::new("todo-screen"),
        /// );
        /// ```
        #[must_use]
        pub fn with_config(initial_state: R::State, reducer: R, config: StoreConfig) -> Self {
            Self {
                shared: Rc::new(Shared {
                    state: RefCell::new(Rc::new(initial_state)),
                    reducer,
                    subscriber: RefCell::new(None),
                    config,
                    depth: Cell::new(0),
                }),
            }
        }

        /// Dispatch an action to the store
        ///
        /// Synchronously:
        /// 1. Captures the current state as the previous state
        /// 2. Calls the reducer with `(state, action)`
        /// 3. Commits the returned state
        /// 4. Notifies the subscriber, if any, with `(state, previous, command)`
        ///
        /// Calling `dispatch` again from inside the subscriber is allowed; the
        /// nested call observes the already committed state as its previous
        /// state. No-op transitions are not suppressed.
        ///
        /// # Panics
        ///
        /// Panics if the reducer panics (contract violation), or if nested
        /// dispatches exceed [`StoreConfig::max_reentrant_depth`] when a cap
        /// is configured.
        #[tracing::instrument(skip_all, name = "store_dispatch")]
        pub fn dispatch(&self, action: R::Action) {
            self.shared.dispatch(action);
        }

        /// Register the subscriber, replacing any previous one
        ///
        /// There is no fan-out: a store notifies exactly one handler. Compose a
        /// broadcasting handler if several parties need to observe.
        pub fn subscribe<F>(&self, subscriber: F)
        where
            F: Fn(&R::State, &R::State, Option<R::Command>) + 'static,
        {
            let replaced = self
                .shared
                .subscriber
                .replace(Some(Rc::new(subscriber)))
                .is_some();
            tracing::debug!(store = %self.shared.config.name, replaced, "Subscriber registered");
        }

        /// Remove the subscriber
        ///
        /// Later dispatches still reduce and commit, but nobody is notified and
        /// emitted commands are dropped.
        pub fn unsubscribe(&self) {
            self.shared.subscriber.replace(None);
            tracing::debug!(store = %self.shared.config.name, "Subscriber removed");
        }

        /// Whether a subscriber is currently registered
        #[must_use]
        pub fn is_subscribed(&self) -> bool {
            self.shared.subscriber.borrow().is_some()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            let snapshot = self.snapshot();
            f(&snapshot)
        }

        /// Shared reference to the current state snapshot
        ///
        /// The snapshot never changes; later dispatches replace the store's
        /// state with a new value instead.
        #[must_use]
        pub fn snapshot(&self) -> Rc<R::State> {
            Rc::clone(&self.shared.state.borrow())
        }

        /// Weak handle for dispatching back into this store
        #[must_use]
        pub fn handle(&self) -> StoreHandle<R> {
            StoreHandle {
                shared: Rc::downgrade(&self.shared),
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.shared.config
        }
    }

    impl<R: Reducer> std::fmt::Debug for Store<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("name", &self.shared.config.name)
                .field("subscribed", &self.is_subscribed())
                .finish_non_exhaustive()
        }
    }

    /// Weak reference to a [`Store`]
    ///
    /// Completions and subscribers capture a handle instead of the store so
    /// they never keep it alive. Dispatching through a handle whose store is
    /// gone returns [`StoreError::StoreDropped`] instead of touching freed
    /// state.
    pub struct StoreHandle<R: Reducer> {
        shared: Weak<Shared<R>>,
    }

    impl<R: Reducer> StoreHandle<R> {
        /// Dispatch an action if the store is still alive
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::StoreDropped`] if the store was dropped.
        ///
        /// # Panics
        ///
        /// Same as [`Store::dispatch`].
        pub fn dispatch(&self, action: R::Action) -> Result<(), StoreError> {
            let Some(shared) = self.shared.upgrade() else {
                tracing::warn!("Dispatch through handle ignored: store has been dropped");
                metrics::counter!(names::HANDLE_DROPPED_DISPATCHES).increment(1);
                return Err(StoreError::StoreDropped);
            };
            shared.dispatch(action);
            Ok(())
        }

        /// Whether the store is still alive
        #[must_use]
        pub fn is_alive(&self) -> bool {
            self.shared.strong_count() > 0
        }

        /// Current state snapshot, if the store is still alive
        #[must_use]
        pub fn snapshot(&self) -> Option<Rc<R::State>> {
            self.shared
                .upgrade()
                .map(|shared| Rc::clone(&shared.state.borrow()))
        }
    }

    impl<R: Reducer> Clone for StoreHandle<R> {
        fn clone(&self) -> Self {
            Self {
                shared: Weak::clone(&self.shared),
            }
        }
    }

    impl<R: Reducer> std::fmt::Debug for StoreHandle<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("StoreHandle")
                .field("alive", &self.is_alive())
                .finish()
        }
    }
}

// Re-export commonly used items
pub use error::StoreError;
pub use mailbox::{Inbox, Mailbox};
pub use store::{Store, StoreHandle};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    // Test state
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    struct TestState {
        value: i32,
    }

    // Test action
    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        RequestEcho(i32),
    }

    // Test command
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestCommand {
        Echo(i32),
    }

    // Test reducer
    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Command = TestCommand;

        fn reduce(
            &self,
            state: &Self::State,
            action: Self::Action,
        ) -> (Self::State, Option<Self::Command>) {
            match action {
                TestAction::Increment => (TestState { value: state.value + 1 }, None),
                TestAction::Decrement => (TestState { value: state.value - 1 }, None),
                TestAction::NoOp => (state.clone(), None),
                TestAction::RequestEcho(n) => (state.clone(), Some(TestCommand::Echo(n))),
            }
        }
    }

    type Log = Rc<RefCell<Vec<(i32, i32, Option<TestCommand>)>>>;

    fn recording(store: &Store<TestReducer>) -> Log {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        store.subscribe(move |state, previous, command| {
            sink.borrow_mut().push((state.value, previous.value, command));
        });
        log
    }

    #[test]
    fn test_store_creation() {
        let store = Store::new(TestState { value: 3 }, TestReducer);
        assert_eq!(store.state(|s| s.value), 3);
        assert!(!store.is_subscribed());
        assert_eq!(store.config(), &StoreConfig::default());
    }

    #[test]
    fn test_subscribe_does_not_notify() {
        let store = Store::new(TestState::default(), TestReducer);
        let log = recording(&store);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_dispatch_notifies_after_commit() {
        let store = Store::new(TestState::default(), TestReducer);
        let handle = store.handle();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        store.subscribe(move |state, _previous, _command| {
            let committed = handle.snapshot().unwrap();
            *sink.borrow_mut() = Some((state.value, committed.value));
        });

        store.dispatch(TestAction::Increment);

        assert_eq!(*seen.borrow(), Some((1, 1)));
    }

    #[test]
    fn test_multiple_actions() {
        let store = Store::new(TestState::default(), TestReducer);
        let log = recording(&store);

        store.dispatch(TestAction::Increment);
        store.dispatch(TestAction::Increment);
        store.dispatch(TestAction::Decrement);

        assert_eq!(store.state(|s| s.value), 1);
        assert_eq!(
            *log.borrow(),
            vec![(1, 0, None), (2, 1, None), (1, 2, None)]
        );
    }

    #[test]
    fn test_command_passed_to_subscriber() {
        let store = Store::new(TestState::default(), TestReducer);
        let log = recording(&store);

        store.dispatch(TestAction::RequestEcho(9));

        assert_eq!(*log.borrow(), vec![(0, 0, Some(TestCommand::Echo(9)))]);
    }

    #[test]
    fn test_noop_dispatch_still_notifies() {
        let store = Store::new(TestState { value: 4 }, TestReducer);
        let log = recording(&store);

        store.dispatch(TestAction::NoOp);

        assert_eq!(*log.borrow(), vec![(4, 4, None)]);
    }

    #[test]
    fn test_subscribe_replaces_previous_subscriber() {
        let store = Store::new(TestState::default(), TestReducer);
        let first = recording(&store);
        let second = recording(&store);

        store.dispatch(TestAction::Increment);

        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe_still_reduces() {
        let store = Store::new(TestState::default(), TestReducer);
        let log = recording(&store);
        store.unsubscribe();

        store.dispatch(TestAction::Increment);
        store.dispatch(TestAction::RequestEcho(1));

        assert!(log.borrow().is_empty());
        assert!(!store.is_subscribed());
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_reentrant_dispatch_from_subscriber() {
        let store = Store::new(TestState::default(), TestReducer);
        let handle = store.handle();
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        store.subscribe(move |state, previous, command| {
            sink.borrow_mut().push((state.value, previous.value, command.clone()));
            if let Some(TestCommand::Echo(times)) = command {
                for _ in 0..times {
                    handle.dispatch(TestAction::Increment).unwrap();
                }
            }
        });

        store.dispatch(TestAction::RequestEcho(2));

        assert_eq!(store.state(|s| s.value), 2);
        assert_eq!(
            *log.borrow(),
            vec![
                (0, 0, Some(TestCommand::Echo(2))),
                (1, 0, None),
                (2, 1, None),
            ]
        );
    }

    #[test]
    fn test_snapshot_is_stable() {
        let store = Store::new(TestState::default(), TestReducer);
        let before = store.snapshot();

        store.dispatch(TestAction::Increment);

        assert_eq!(before.value, 0);
        assert_eq!(store.snapshot().value, 1);
    }

    #[test]
    fn test_handle_after_drop() {
        let store = Store::new(TestState::default(), TestReducer);
        let handle = store.handle();
        assert!(handle.is_alive());

        drop(store);

        assert!(!handle.is_alive());
        assert!(handle.snapshot().is_none());
        assert_eq!(
            handle.dispatch(TestAction::Increment),
            Err(StoreError::StoreDropped)
        );
    }

    #[test]
    #[should_panic(expected = "re-entrant dispatch depth 3 exceeds the limit of 2")]
    fn test_runaway_reentrancy_panics() {
        let store = Store::with_config(
            TestState::default(),
            TestReducer,
            StoreConfig::new("runaway").with_max_reentrant_depth(2),
        );
        let handle = store.handle();
        store.subscribe(move |_state, _previous, _command| {
            let _ = handle.dispatch(TestAction::Increment);
        });

        store.dispatch(TestAction::Increment);
    }

    #[test]
    fn test_depth_resets_between_dispatches() {
        let store = Store::with_config(
            TestState::default(),
            TestReducer,
            StoreConfig::new("flat").with_max_reentrant_depth(1),
        );

        for _ in 0..5 {
            store.dispatch(TestAction::Increment);
        }

        assert_eq!(store.state(|s| s.value), 5);
    }

    #[test]
    fn test_deep_finite_reentrancy_under_default_config() {
        let store = Store::new(TestState { value: 100 }, TestReducer);
        let handle = store.handle();
        let notified = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&notified);
        store.subscribe(move |state, _previous, _command| {
            *sink.borrow_mut() += 1;
            if state.value > 0 {
                handle.dispatch(TestAction::Decrement).unwrap();
            }
        });

        store.dispatch(TestAction::NoOp);

        assert_eq!(store.state(|s| s.value), 0);
        assert_eq!(*notified.borrow(), 101);
        assert_eq!(store.config().max_reentrant_depth, None);
    }

    #[test]
    fn test_store_debug() {
        let store = Store::with_config(TestState::default(), TestReducer, StoreConfig::new("dbg"));
        let rendered = format!("{store:?}");
        assert!(rendered.contains("dbg"));
        assert!(rendered.contains("subscribed: false"));
    }
}
