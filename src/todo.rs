//! Todo items as served by the remote endpoint.

use serde::{Deserialize, Serialize};

/// A single todo entry.
///
/// Field names follow the JSON payload (`userId`, `id`, `title`, `completed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(default)]
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    pub fn status(&self) -> TodoStatus {
        if self.completed {
            TodoStatus::Done
        } else {
            TodoStatus::Pending
        }
    }
}

/// Completion status of a todo, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    Done,
    Pending,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Done => "Done",
            TodoStatus::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which todos the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    #[default]
    All,
    Done,
    Pending,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Done => todo.completed,
            TodoFilter::Pending => !todo.completed,
        }
    }

    /// Advance to the next filter: All -> Done -> Pending -> All.
    pub fn cycle(&mut self) {
        *self = match self {
            TodoFilter::All => TodoFilter::Done,
            TodoFilter::Done => TodoFilter::Pending,
            TodoFilter::Pending => TodoFilter::All,
        };
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoFilter::All => "all",
            TodoFilter::Done => "done",
            TodoFilter::Pending => "pending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: u64, completed: bool) -> Todo {
        Todo {
            user_id: 1,
            id,
            title: format!("todo {}", id),
            completed,
        }
    }

    #[test]
    fn test_decode_payload() {
        let payload = r#"[
            {"userId": 1, "id": 1, "title": "delectus aut autem", "completed": false},
            {"userId": 1, "id": 4, "title": "et porro tempora", "completed": true}
        ]"#;
        let todos: Vec<Todo> = serde_json::from_str(payload).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].title, "delectus aut autem");
        assert_eq!(todos[1].id, 4);
        assert!(todos[1].completed);
    }

    #[test]
    fn test_decode_without_user_id() {
        let todos: Vec<Todo> =
            serde_json::from_str(r#"[{"id": 7, "title": "x", "completed": true}]"#).unwrap();
        assert_eq!(todos[0].user_id, 0);
    }

    #[test]
    fn test_decode_rejects_missing_completed() {
        let result: Result<Vec<Todo>, _> = serde_json::from_str(r#"[{"id": 7, "title": "x"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_status() {
        assert_eq!(todo(1, true).status(), TodoStatus::Done);
        assert_eq!(todo(2, false).status(), TodoStatus::Pending);
        assert_eq!(TodoStatus::Pending.to_string(), "Pending");
    }

    #[test]
    fn test_filter_matches_and_cycles() {
        let done = todo(1, true);
        let pending = todo(2, false);

        let mut filter = TodoFilter::default();
        assert!(filter.matches(&done) && filter.matches(&pending));

        filter.cycle();
        assert_eq!(filter, TodoFilter::Done);
        assert!(filter.matches(&done));
        assert!(!filter.matches(&pending));

        filter.cycle();
        assert_eq!(filter, TodoFilter::Pending);
        assert!(!filter.matches(&done));
        assert!(filter.matches(&pending));

        filter.cycle();
        assert_eq!(filter, TodoFilter::All);
    }
}
