//! Headless todo screen driving a [`Store`].
//!
//! [`TodoScreen`] is the consumer side of the loop: it turns input events into
//! actions, executes the commands the reducer emits, and reconciles a
//! [`Presentation`] from the difference between the previous and the new
//! state. Nothing else writes to the presentation.

use crate::loader::TodoLoader;
use crate::reducer::TodoReducer;
use crate::types::{TodoAction, TodoCommand, TodoState};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt::Write as _;
use std::rc::Rc;
use unidirection_runtime::{Inbox, Mailbox, Store, StoreConfig, StoreError, mailbox};

/// Configuration for the todo screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoScreenConfig {
    /// Minimum number of characters before "add" is enabled
    ///
    /// Default: 3
    pub min_text_len: usize,

    /// Text in front of the count in the title
    ///
    /// Default: `"TODO"`, giving titles like `TODO - (2)`
    pub title_prefix: String,
}

impl TodoScreenConfig {
    /// Set the minimum text length for enabling "add"
    #[must_use]
    pub const fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    /// Set the title prefix
    #[must_use]
    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }

    /// Title shown for a list of `count` entries
    #[must_use]
    pub fn title(&self, count: usize) -> String {
        format!("{} - ({count})", self.title_prefix)
    }

    /// Whether "add" is available for the given input
    #[must_use]
    pub fn add_enabled(&self, text: &str) -> bool {
        text.chars().count() >= self.min_text_len
    }
}

impl Default for TodoScreenConfig {
    fn default() -> Self {
        Self {
            min_text_len: 3,
            title_prefix: "TODO".to_string(),
        }
    }
}

/// Presentation collaborator
///
/// Implemented by whatever renders the screen. It is written to only by
/// [`reconcile`].
pub trait Presentation {
    /// Redraw the whole list
    fn reload_list(&mut self, todos: &[String]);
    /// Show a new title
    fn set_title(&mut self, title: &str);
    /// Enable or disable the "add" control
    fn set_add_enabled(&mut self, enabled: bool);
    /// Text currently shown in the input row
    fn input_text(&self) -> &str;
    /// Replace the text shown in the input row
    fn set_input_text(&mut self, text: &str);
}

/// Bring a presentation in line with `state`
///
/// `previous` is `None` for the first synchronization, which refreshes
/// everything. Afterwards only the regions whose source field changed are
/// touched.
pub fn reconcile<P>(
    presentation: &mut P,
    state: &TodoState,
    previous: Option<&TodoState>,
    config: &TodoScreenConfig,
) where
    P: Presentation + ?Sized,
{
    if previous.is_none_or(|previous| previous.todos != state.todos) {
        presentation.reload_list(&state.todos);
        presentation.set_title(&config.title(state.count()));
    }

    if previous.is_none_or(|previous| previous.text != state.text) {
        presentation.set_add_enabled(config.add_enabled(&state.text));
        if presentation.input_text() != state.text {
            presentation.set_input_text(&state.text);
        }
    }
}

/// In-memory presentation
///
/// Keeps what a real screen would display, plus counters used to check that
/// reconciliation only refreshes what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenModel {
    /// Title bar
    pub title: String,
    /// List rows, top to bottom
    pub rows: Vec<String>,
    /// Whether "add" is enabled
    pub add_enabled: bool,
    /// Text in the input row
    pub input_text: String,
    /// How often the list was redrawn
    pub list_reloads: usize,
    /// How often the input row was overwritten by the screen
    pub input_writes: usize,
}

impl ScreenModel {
    /// Plain-text rendering of the screen
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let add = if self.add_enabled { "[+]" } else { "[ ]" };
        let _ = writeln!(out, "{}  {add}", self.title);
        let _ = writeln!(out, "> {}", self.input_text);
        for (position, row) in self.rows.iter().enumerate() {
            let _ = writeln!(out, "  {position}. {row}");
        }
        out
    }
}

impl Presentation for ScreenModel {
    fn reload_list(&mut self, todos: &[String]) {
        self.rows = todos.to_vec();
        self.list_reloads += 1;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_add_enabled(&mut self, enabled: bool) {
        self.add_enabled = enabled;
    }

    fn input_text(&self) -> &str {
        &self.input_text
    }

    fn set_input_text(&mut self, text: &str) {
        self.input_text = text.to_string();
        self.input_writes += 1;
    }
}

/// The todo screen
///
/// Owns the store and the presentation. Completions of loads come back
/// through a mailbox and are delivered by [`TodoScreen::process_pending`] or
/// [`TodoScreen::wait_for_pending`] on the screen's thread.
pub struct TodoScreen<P: Presentation + 'static> {
    store: Store<TodoReducer>,
    presentation: Rc<RefCell<P>>,
    inbox: Inbox<TodoAction>,
    config: Rc<TodoScreenConfig>,
    in_flight: Rc<Cell<usize>>,
}

impl<P: Presentation + 'static> TodoScreen<P> {
    /// Build the screen, synchronize the presentation once and subscribe
    pub fn new<L>(presentation: P, loader: L, config: TodoScreenConfig) -> Self
    where
        L: TodoLoader + 'static,
    {
        let store = Store::with_config(
            TodoState::new(),
            TodoReducer::new(),
            StoreConfig::new("todo-screen"),
        );
        let presentation = Rc::new(RefCell::new(presentation));
        let config = Rc::new(config);
        let (mailbox, inbox) = mailbox::channel();

        reconcile(
            &mut *presentation.borrow_mut(),
            &store.snapshot(),
            None,
            &config,
        );

        let in_flight = Rc::new(Cell::new(0));
        let subscribed_presentation = Rc::clone(&presentation);
        let subscribed_config = Rc::clone(&config);
        let subscribed_in_flight = Rc::clone(&in_flight);
        store.subscribe(move |state, previous, command| {
            if let Some(command) = command {
                subscribed_in_flight.set(subscribed_in_flight.get() + 1);
                execute(&loader, &mailbox, command);
            }
            reconcile(
                &mut *subscribed_presentation.borrow_mut(),
                state,
                Some(previous),
                &subscribed_config,
            );
        });

        Self {
            store,
            presentation,
            inbox,
            config,
            in_flight,
        }
    }

    /// Ask for the stored entries
    pub fn load(&self) {
        self.store.dispatch(TodoAction::LoadTodos);
    }

    /// The input row changed
    pub fn text_changed(&self, text: impl Into<String>) {
        self.store.dispatch(TodoAction::UpdateText(text.into()));
    }

    /// "Add" was pressed
    ///
    /// Adds the current text on top of the list and clears the input. Returns
    /// `false` without dispatching when "add" is disabled for the current text.
    pub fn add_pressed(&self) -> bool {
        let text = self.store.state(|state| state.text.clone());
        if !self.config.add_enabled(&text) {
            tracing::debug!(len = text.chars().count(), "Add ignored: text too short");
            return false;
        }
        self.store.dispatch(TodoAction::AddTodos(vec![text]));
        self.store.dispatch(TodoAction::UpdateText(String::new()));
        true
    }

    /// The entry at `position` was selected for removal
    ///
    /// # Panics
    ///
    /// Panics if `position` is not a row of the current list.
    pub fn remove_at(&self, position: usize) {
        self.store.dispatch(TodoAction::RemoveTodo(position));
    }

    /// Deliver every completion that has already arrived
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from delivery; cannot happen while the
    /// screen owns its store.
    pub fn process_pending(&mut self) -> Result<usize, StoreError> {
        let delivered = self.inbox.drain_into(&self.store.handle())?;
        self.settle(delivered);
        Ok(delivered)
    }

    /// Wait for the next completion, then deliver everything that arrived
    ///
    /// Returns the number of actions delivered, or `0` at once when no load
    /// is in flight. A loader that never calls its completion makes this
    /// wait forever; wrap it in `tokio::time::timeout` if that can happen.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from delivery.
    pub async fn wait_for_pending(&mut self) -> Result<usize, StoreError> {
        if self.in_flight.get() == 0 {
            tracing::debug!("No load in flight, nothing to wait for");
            return Ok(0);
        }
        // The screen's own subscriber holds a sender, so the channel stays open
        let Some(action) = self.inbox.recv().await else {
            return Ok(0);
        };
        self.settle(1);
        self.store.dispatch(action);
        Ok(1 + self.process_pending()?)
    }

    /// Number of loads whose completion has not been delivered yet
    #[must_use]
    pub fn loads_in_flight(&self) -> usize {
        self.in_flight.get()
    }

    fn settle(&self, delivered: usize) {
        self.in_flight.set(self.in_flight.get().saturating_sub(delivered));
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> Rc<TodoState> {
        self.store.snapshot()
    }

    /// Borrow the presentation
    #[must_use]
    pub fn presentation(&self) -> Ref<'_, P> {
        self.presentation.borrow()
    }

    /// Mutably borrow the presentation, for simulating widget input
    #[must_use]
    pub fn presentation_mut(&self) -> RefMut<'_, P> {
        self.presentation.borrow_mut()
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &Store<TodoReducer> {
        &self.store
    }
}

fn execute<L: TodoLoader>(loader: &L, mailbox: &Mailbox<TodoAction>, command: TodoCommand) {
    match command {
        TodoCommand::LoadTodos(completion) => {
            tracing::debug!("Executing LoadTodos");
            let mailbox = mailbox.clone();
            loader.request_todo_items(Box::new(move |items| {
                let action = completion.complete(items);
                if let Err(error) = mailbox.send(action) {
                    tracing::warn!(%error, "Loaded todo items arrived after the screen was closed");
                }
            }));
        },
    }
}
