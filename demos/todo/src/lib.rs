//! Todo screen demonstrating unidirectional data flow.
//!
//! This example rebuilds a classic todo list screen around a single
//! [`Store`](unidirection_runtime::Store). It demonstrates:
//!
//! - A closed action set and a pure reducer
//! - A command (`LoadTodos`) carrying a completion instead of doing I/O
//! - A consumer that executes commands and reconciles its presentation from
//!   the state diff
//! - Marshaling results from another thread through a mailbox
//!
//! # Quick Start
//!
//! ```
//! use todo::{ScreenModel, StaticLoader, TodoScreen, TodoScreenConfig};
//!
//! let mut screen = TodoScreen::new(
//!     ScreenModel::default(),
//!     StaticLoader::new(["Buy milk"]),
//!     TodoScreenConfig::default(),
//! );
//!
//! screen.load();
//! screen.process_pending().ok();
//!
//! screen.presentation_mut().input_text = "Write docs".to_string();
//! screen.text_changed("Write docs");
//! screen.add_pressed();
//!
//! assert_eq!(screen.presentation().title, "TODO - (2)");
//! assert_eq!(screen.state().todos, ["Write docs", "Buy milk"]);
//! ```

pub mod loader;
pub mod reducer;
pub mod screen;
pub mod types;

// Re-export commonly used types
pub use loader::{DelayedLoader, LoadCompletion, StaticLoader, TodoLoader};
pub use reducer::TodoReducer;
pub use screen::{Presentation, ScreenModel, TodoScreen, TodoScreenConfig, reconcile};
pub use types::{TodoAction, TodoCommand, TodoState};
