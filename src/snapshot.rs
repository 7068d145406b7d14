//! Locally held view of the last fetched todo list.

use crate::todo::Todo;
use chrono::{DateTime, Local};

/// The last successfully fetched list plus poll metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Items in remote response order
    pub items: Vec<Todo>,
    /// When `items` was last replaced
    pub last_updated: Option<DateTime<Local>>,
    /// Whether a poll is currently dispatched
    pub in_flight: bool,
}

impl Snapshot {
    /// Replace the list wholesale and finish the poll.
    pub fn apply_success(&mut self, items: Vec<Todo>, at: DateTime<Local>) {
        self.items = items;
        self.last_updated = Some(at);
        self.in_flight = false;
    }

    /// Finish the poll without touching the list or the timestamp.
    pub fn apply_failure(&mut self) {
        self.in_flight = false;
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }
}
