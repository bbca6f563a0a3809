//! # Unidirection Core
//!
//! Core traits and types for unidirectional data flow.
//!
//! This crate provides the abstractions that every feature built on the
//! [`Store`](https://docs.rs/unidirection-runtime) runtime shares:
//!
//! ## Core Concepts
//!
//! - **State**: Immutable snapshot of everything the presentation needs
//! - **Action**: Closed set of mutation requests, consumed once by the reducer
//! - **Command**: Closed set of side-effect requests emitted next to a transition
//! - **Reducer**: Pure function `(State, Action) → (State, Option<Command>)`
//! - **Subscriber**: The single handler notified after every committed transition
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow: `dispatch` is the only way in, the notification
//!   the only way out
//! - Explicit Commands (no hidden I/O inside reducers)
//! - Exhaustive handling: actions and commands are enums matched without
//!   wildcard arms, so adding a variant fails to compile until it is handled
//!
//! ## Example
//!
//! ```
//! use unidirection_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Command = ();
//!
//!     fn reduce(&self, state: &CounterState, action: CounterAction) -> (CounterState, Option<()>) {
//!         match action {
//!             CounterAction::Increment => (CounterState { count: state.count + 1 }, None),
//!             CounterAction::Reset => (CounterState::default(), None),
//!         }
//!     }
//! }
//!
//! let (next, command) = CounterReducer.reduce(&CounterState::default(), CounterAction::Increment);
//! assert_eq!(next.count, 1);
//! assert!(command.is_none());
//! ```

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action) → (State, Option<Command>)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use std::marker::PhantomData;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The immutable snapshot this reducer transforms
    /// - `Action`: The closed set of actions this reducer processes
    /// - `Command`: The closed set of side-effect requests it may emit
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = TodoAction;
    ///     type Command = TodoCommand;
    ///
    ///     fn reduce(&self, state: &TodoState, action: TodoAction) -> (TodoState, Option<TodoCommand>) {
    ///         match action {
    ///             TodoAction::UpdateText(text) => (state.with_text(text), None),
    ///             // every other variant, no wildcard arm
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The command type this reducer may emit
        type Command;

        /// Reduce an action into the next state and an optional command
        ///
        /// This is a pure function that:
        /// 1. Reads the current state without mutating it
        /// 2. Builds the next state as a fresh value
        /// 3. Describes (never performs) any side effect as a command
        ///
        /// # Arguments
        ///
        /// - `state`: The current state snapshot
        /// - `action`: The action to process, consumed
        ///
        /// # Returns
        ///
        /// The next state and, if a side effect is needed, the command for it
        fn reduce(
            &self,
            state: &Self::State,
            action: Self::Action,
        ) -> (Self::State, Option<Self::Command>);
    }

    /// Reducer backed by a plain function or closure
    ///
    /// Created with [`from_fn`].
    pub struct FnReducer<S, A, C, F> {
        f: F,
        _marker: PhantomData<fn(&S, A) -> (S, Option<C>)>,
    }

    impl<S, A, C, F> std::fmt::Debug for FnReducer<S, A, C, F> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "FnReducer(<fn>)")
        }
    }

    impl<S, A, C, F: Clone> Clone for FnReducer<S, A, C, F> {
        fn clone(&self) -> Self {
            Self {
                f: self.f.clone(),
                _marker: PhantomData,
            }
        }
    }

    impl<S, A, C, F> Reducer for FnReducer<S, A, C, F>
    where
        F: Fn(&S, A) -> (S, Option<C>),
    {
        type State = S;
        type Action = A;
        type Command = C;

        fn reduce(&self, state: &S, action: A) -> (S, Option<C>) {
            (self.f)(state, action)
        }
    }

    /// Wrap a function into a [`Reducer`]
    ///
    /// ```
    /// use unidirection_core::reducer::{from_fn, Reducer};
    ///
    /// let reducer = from_fn(|state: &i32, delta: i32| (state + delta, None::<()>));
    /// assert_eq!(reducer.reduce(&1, 2).0, 3);
    /// ```
    #[must_use]
    pub const fn from_fn<S, A, C, F>(f: F) -> FnReducer<S, A, C, F>
    where
        F: Fn(&S, A) -> (S, Option<C>),
    {
        FnReducer {
            f,
            _marker: PhantomData,
        }
    }
}

/// Command module - Deferred side-effect descriptions
///
/// Commands are values returned from reducers and executed by whoever
/// subscribes to the store. A command that needs to report back carries a
/// [`Completion`](command::Completion): a pure mapping from the effect's
/// result to the action that must be dispatched next.
pub mod command {
    /// Maps the result of an asynchronous side effect to the action that
    /// feeds it back into the store
    ///
    /// The completion never touches the store itself. Whoever executes the
    /// command calls [`Completion::complete`] and dispatches the returned
    /// action, keeping the reducer free of I/O.
    ///
    /// Completions are `Send` so the result can be produced on another thread
    /// and marshaled back to the store's thread.
    ///
    /// # Equality
    ///
    /// Closures have no observable payload, so any two completions compare
    /// equal. Commands holding one therefore compare by variant and by their
    /// remaining payload.
    pub struct Completion<T, A> {
        map: Box<dyn FnOnce(T) -> A + Send>,
    }

    impl<T, A> Completion<T, A> {
        /// Create a completion from the mapping function
        #[must_use]
        pub fn new<F>(map: F) -> Self
        where
            F: FnOnce(T) -> A + Send + 'static,
        {
            Self { map: Box::new(map) }
        }

        /// Consume the completion and produce the action to dispatch
        pub fn complete(self, value: T) -> A {
            (self.map)(value)
        }
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<T, A> std::fmt::Debug for Completion<T, A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Completion(<fn>)")
        }
    }

    impl<T, A> PartialEq for Completion<T, A> {
        fn eq(&self, _other: &Self) -> bool {
            true
        }
    }

    impl<T, A> Eq for Completion<T, A> {}
}

/// Subscriber module - Post-transition notification contract
///
/// A subscriber receives `(state, previous_state, command)` exactly once per
/// dispatch, after the new state has been committed.
pub mod subscriber {
    /// Signature of the single handler a store notifies
    ///
    /// Arguments are the committed state, the state before the dispatch, and
    /// the command the reducer emitted (moved to the subscriber, which is
    /// responsible for executing it).
    pub type Subscriber<S, C> = dyn Fn(&S, &S, Option<C>);
}
