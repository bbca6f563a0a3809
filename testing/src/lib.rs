//! # Unidirection Testing
//!
//! Testing utilities and helpers for unidirectional data flow.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`NotificationRecorder`]: A subscriber that records every notification
//! - Property-based testing utilities
//! - Assertion helpers for reducers and subscribers
//!
//! ## Example
//!
//! ```ignore
//! use unidirection_testing::NotificationRecorder;
//! use unidirection_runtime::Store;
//!
//! #[test]
//! fn test_add_flow() {
//!     let store = Store::new(TodoState::default(), TodoReducer::new());
//!     let recorder = NotificationRecorder::new();
//!     store.subscribe(recorder.subscriber());
//!
//!     store.dispatch(TodoAction::AddTodos(vec!["milk".to_string()]));
//!
//!     assert_eq!(recorder.len(), 1);
//!     assert_eq!(recorder.last_state().unwrap().todos, ["milk"]);
//! }
//! ```


/// Subscriber probes
///
/// Records notifications so tests can assert on the order and content of
/// transitions a store reports.
pub mod recorder {
    use std::cell::{Ref, RefCell};
    use std::rc::Rc;

    /// One notification as received by a subscriber
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Notification<S, C> {
        /// The committed state
        pub state: S,
        /// The state before the dispatch
        pub previous: S,
        /// The emitted command, moved out of the store
        pub command: Option<C>,
    }

    /// Records every notification it receives
    ///
    /// Cloning the recorder shares the same log.
    #[derive(Debug)]
    pub struct NotificationRecorder<S, C> {
        log: Rc<RefCell<Vec<Notification<S, C>>>>,
    }

    impl<S, C> NotificationRecorder<S, C>
    where
        S: Clone + 'static,
        C: 'static,
    {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self {
                log: Rc::new(RefCell::new(Vec::new())),
            }
        }

        /// A subscriber closure appending to this recorder's log
        pub fn subscriber(&self) -> impl Fn(&S, &S, Option<C>) + use<S, C> {
            let log = Rc::clone(&self.log);
            move |state: &S, previous: &S, command: Option<C>| {
                log.borrow_mut().push(Notification {
                    state: state.clone(),
                    previous: previous.clone(),
                    command,
                });
            }
        }

        /// Number of notifications received
        #[must_use]
        pub fn len(&self) -> usize {
            self.log.borrow().len()
        }

        /// Whether no notification was received
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.log.borrow().is_empty()
        }

        /// Borrow the recorded notifications
        #[must_use]
        pub fn notifications(&self) -> Ref<'_, Vec<Notification<S, C>>> {
            self.log.borrow()
        }

        /// The state of the most recent notification
        #[must_use]
        pub fn last_state(&self) -> Option<S> {
            self.log.borrow().last().map(|n| n.state.clone())
        }

        /// Remove and return the commands recorded so far, in order
        ///
        /// Commands are not `Clone` in general (they may carry completions),
        /// so they are taken out of the log.
        pub fn take_commands(&self) -> Vec<C> {
            self.log
                .borrow_mut()
                .iter_mut()
                .filter_map(|n| n.command.take())
                .collect()
        }
    }

    impl<S, C> Default for NotificationRecorder<S, C>
    where
        S: Clone + 'static,
        C: 'static,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<S, C> Clone for NotificationRecorder<S, C> {
        fn clone(&self) -> Self {
            Self {
                log: Rc::clone(&self.log),
            }
        }
    }

    /// Assert the notification chaining property
    ///
    /// The `previous` of every notification must equal the `state` of the one
    /// before it, and the first `previous` must equal `initial`.
    ///
    /// # Panics
    ///
    /// Panics if the chain is broken.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_chained<S, C>(notifications: &[Notification<S, C>], initial: &S)
    where
        S: PartialEq + std::fmt::Debug,
    {
        let mut expected_previous = initial;
        for (index, notification) in notifications.iter().enumerate() {
            assert_eq!(
                &notification.previous, expected_previous,
                "notification {index} did not start from the previously committed state"
            );
            expected_previous = &notification.state;
        }
    }
}

/// Property-based testing utilities
///
/// Helpers shared by proptest suites of individual features.
pub mod properties {
    use unidirection_core::reducer::Reducer;

    /// Assert that reducing the same input twice yields equal results
    ///
    /// Commands are compared by value; commands carrying completions compare
    /// by variant and remaining payload.
    ///
    /// # Panics
    ///
    /// Panics if the two reductions differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_deterministic<R>(reducer: &R, state: &R::State, action: &R::Action)
    where
        R: Reducer,
        R::State: PartialEq + std::fmt::Debug,
        R::Action: Clone,
        R::Command: PartialEq + std::fmt::Debug,
    {
        let first = reducer.reduce(state, action.clone());
        let second = reducer.reduce(state, action.clone());
        assert_eq!(first, second, "Reducer produced different results for identical input");
    }

    /// Strategy for short lists of short strings
    ///
    /// Duplicates are allowed, matching list-like domains where repeated
    /// entries are valid.
    pub fn short_strings(max_len: usize) -> impl proptest::strategy::Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-z]{0,6}", 0..=max_len)
    }
}

// Re-export commonly used items
pub use recorder::{Notification, NotificationRecorder};
pub use reducer_test::{ReducerTest, assertions};
