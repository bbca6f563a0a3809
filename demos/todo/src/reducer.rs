//! Reducer logic for the todo screen.
//!
//! Every transition of the screen goes through [`TodoReducer::reduce`]. Loading
//! is not performed here: the reducer only describes it as a command.

use crate::types::{TodoAction, TodoCommand, TodoState};
use unidirection_core::{command::Completion, reducer::Reducer};

/// Reducer for the todo screen
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn prepend(items: Vec<String>, existing: &[String]) -> Vec<String> {
        let mut todos = items;
        todos.extend_from_slice(existing);
        todos
    }

    fn remove_at(existing: &[String], index: usize) -> Vec<String> {
        assert!(
            index < existing.len(),
            "RemoveTodo index {index} out of bounds for {} todos",
            existing.len()
        );
        let mut todos = existing.to_vec();
        todos.remove(index);
        todos
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Command = TodoCommand;

    /// # Panics
    ///
    /// Panics on `RemoveTodo` with an index outside the list. That index can
    /// only come from a presentation out of sync with the state, which must
    /// not be papered over.
    fn reduce(
        &self,
        state: &Self::State,
        action: Self::Action,
    ) -> (Self::State, Option<Self::Command>) {
        match action {
            TodoAction::UpdateText(text) => (
                TodoState {
                    todos: state.todos.clone(),
                    text,
                },
                None,
            ),

            TodoAction::AddTodos(items) => (
                TodoState {
                    todos: Self::prepend(items, &state.todos),
                    text: state.text.clone(),
                },
                None,
            ),

            TodoAction::RemoveTodo(index) => (
                TodoState {
                    todos: Self::remove_at(&state.todos, index),
                    text: state.text.clone(),
                },
                None,
            ),

            TodoAction::LoadTodos => (
                state.clone(),
                Some(TodoCommand::LoadTodos(Completion::new(TodoAction::AddTodos))),
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/panic
mod tests {
    use super::*;
    use proptest::prelude::*;
    use unidirection_testing::{ReducerTest, assertions, properties};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_add_todos_prepends() {
        ReducerTest::new(TodoReducer::new())
            .given_state(TodoState::with_todos(["b"]))
            .when_action(TodoAction::AddTodos(strings(&["a"])))
            .then_state(|state| {
                assert_eq!(state.todos, strings(&["a", "b"]));
                assert_eq!(state.text, "");
            })
            .then_command(assertions::assert_no_command)
            .run();
    }

    #[test]
    fn test_add_todos_keeps_item_order_and_text() {
        ReducerTest::new(TodoReducer::new())
            .given_state(TodoState {
                todos: strings(&["c"]),
                text: "draft".to_string(),
            })
            .when_action(TodoAction::AddTodos(strings(&["a", "b", "a"])))
            .then_state(|state| {
                assert_eq!(state.todos, strings(&["a", "b", "a", "c"]));
                assert_eq!(state.text, "draft");
            })
            .run();
    }

    #[test]
    fn test_remove_todo() {
        ReducerTest::new(TodoReducer::new())
            .given_state(TodoState::with_todos(["a", "b", "c"]))
            .when_action(TodoAction::RemoveTodo(1))
            .then_state(|state| {
                assert_eq!(state.todos, strings(&["a", "c"]));
            })
            .then_command(assertions::assert_no_command)
            .run();
    }

    #[test]
    fn test_remove_last_todo() {
        ReducerTest::new(TodoReducer::new())
            .given_state(TodoState::with_todos(["only"]))
            .when_action(TodoAction::RemoveTodo(0))
            .then_state(|state| assert!(state.is_empty()))
            .run();
    }

    #[test]
    #[should_panic(expected = "RemoveTodo index 3 out of bounds for 3 todos")]
    fn test_remove_todo_out_of_range() {
        let _ = TodoReducer::new().reduce(
            &TodoState::with_todos(["a", "b", "c"]),
            TodoAction::RemoveTodo(3),
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds for 0 todos")]
    fn test_remove_todo_from_empty_list() {
        let _ = TodoReducer::new().reduce(&TodoState::new(), TodoAction::RemoveTodo(0));
    }

    #[test]
    fn test_update_text_leaves_todos() {
        ReducerTest::new(TodoReducer::new())
            .given_state(TodoState {
                todos: strings(&["a"]),
                text: "x".to_string(),
            })
            .when_action(TodoAction::UpdateText("xyz".to_string()))
            .then_state(|state| {
                assert_eq!(state.todos, strings(&["a"]));
                assert_eq!(state.text, "xyz");
            })
            .then_command(assertions::assert_no_command)
            .run();
    }

    #[test]
    fn test_load_todos_defers_to_command() {
        let given = TodoState {
            todos: strings(&["old"]),
            text: "typing".to_string(),
        };
        let (next, command) = TodoReducer::new().reduce(&given, TodoAction::LoadTodos);

        assert_eq!(next, given);
        let Some(TodoCommand::LoadTodos(completion)) = command else {
            panic!("LoadTodos must emit the LoadTodos command");
        };

        let follow_up = completion.complete(strings(&["p", "q"]));
        assert_eq!(follow_up, TodoAction::AddTodos(strings(&["p", "q"])));

        let (loaded, command) = TodoReducer::new().reduce(&next, follow_up);
        assert_eq!(loaded.todos, strings(&["p", "q", "old"]));
        assert!(command.is_none());
    }

    #[test]
    fn test_load_command_equality_ignores_completion() {
        let (_, first) = TodoReducer::new().reduce(&TodoState::new(), TodoAction::LoadTodos);
        let (_, second) = TodoReducer::new().reduce(&TodoState::new(), TodoAction::LoadTodos);
        assert_eq!(first, second);
    }

    fn arb_state() -> impl Strategy<Value = TodoState> {
        (properties::short_strings(6), "[a-z ]{0,8}")
            .prop_map(|(todos, text)| TodoState { todos, text })
    }

    fn arb_valid_action(len: usize) -> BoxedStrategy<TodoAction> {
        let mut choices = vec![
            "[a-z ]{0,8}".prop_map(TodoAction::UpdateText).boxed(),
            properties::short_strings(4)
                .prop_map(TodoAction::AddTodos)
                .boxed(),
            Just(TodoAction::LoadTodos).boxed(),
        ];
        if len > 0 {
            choices.push((0..len).prop_map(TodoAction::RemoveTodo).boxed());
        }
        proptest::strategy::Union::new(choices).boxed()
    }

    proptest! {
        #[test]
        fn prop_reduce_is_deterministic(
            (state, action) in arb_state().prop_flat_map(|state| {
                let len = state.todos.len();
                (Just(state), arb_valid_action(len))
            })
        ) {
            properties::assert_deterministic(&TodoReducer::new(), &state, &action);
        }

        #[test]
        fn prop_add_todos_prefix(state in arb_state(), items in properties::short_strings(4)) {
            let (next, _) = TodoReducer::new().reduce(&state, TodoAction::AddTodos(items.clone()));
            prop_assert_eq!(&next.todos[..items.len()], &items[..]);
            prop_assert_eq!(&next.todos[items.len()..], &state.todos[..]);
            prop_assert_eq!(next.text, state.text);
        }

        #[test]
        fn prop_remove_todo_excises_one(
            (state, index) in arb_state()
                .prop_filter("needs at least one todo", |s| !s.todos.is_empty())
                .prop_flat_map(|state| {
                    let len = state.todos.len();
                    (Just(state), 0..len)
                })
        ) {
            let (next, _) = TodoReducer::new().reduce(&state, TodoAction::RemoveTodo(index));
            let mut expected = state.todos.clone();
            expected.remove(index);
            prop_assert_eq!(next.todos, expected);
        }
    }
}
