//! Domain types for the todo screen.
//!
//! A todo screen is an ordered list of entries plus the text currently typed
//! into the input row. Everything the presentation shows is derived from
//! [`TodoState`].

use serde::{Deserialize, Serialize};
use unidirection_core::command::Completion;

/// State of the todo screen
///
/// An immutable snapshot: the reducer never edits one in place, it builds the
/// next value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// Entries in display order (first entry is shown on top)
    ///
    /// Duplicates are allowed.
    pub todos: Vec<String>,
    /// Current content of the input row, possibly empty
    pub text: String,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            text: String::new(),
        }
    }

    /// Creates a state holding the given entries and an empty input
    #[must_use]
    pub fn with_todos<I, T>(todos: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            todos: todos.into_iter().map(Into::into).collect(),
            text: String::new(),
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Returns the todo at a display position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.todos.get(index).map(String::as_str)
    }
}

/// Actions the screen can dispatch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Replace the input text
    UpdateText(String),
    /// Insert entries on top of the list, keeping their order
    AddTodos(Vec<String>),
    /// Remove the entry at a display position
    ///
    /// The position must be in range; anything else is a programming error.
    RemoveTodo(usize),
    /// Ask for the stored entries to be loaded
    LoadTodos,
}

/// Side effects the reducer can request
#[derive(Debug, PartialEq, Eq)]
pub enum TodoCommand {
    /// Load the stored entries
    ///
    /// The completion turns the loaded entries into the action to dispatch
    /// back into the same store.
    LoadTodos(Completion<Vec<String>, TodoAction>),
}
