//! Application state management for the TUI.

use crate::poller::PollEvent;
use crate::snapshot::Snapshot;
use crate::todo::{Todo, TodoFilter};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application state
pub struct App {
    /// Latest copy of the poller snapshot
    pub snapshot: Snapshot,
    /// Which todos are listed
    pub filter: TodoFilter,
    /// Index of the first visible row
    pub scroll: usize,
    /// Rows that fit in the list panel (set from render layout)
    pub list_height: usize,
    /// Mirrors whether the poll timer is armed
    pub auto_refresh: bool,
    /// Message of the most recent failed poll, cleared on success
    pub last_error: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new App instance.
    pub fn new(auto_refresh: bool) -> Self {
        Self {
            snapshot: Snapshot::default(),
            filter: TodoFilter::All,
            scroll: 0,
            list_height: 10, // Updated from the actual layout before the first draw
            auto_refresh,
            last_error: None,
            should_quit: false,
        }
    }

    /// Replace the displayed snapshot.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.clamp_scroll();
    }

    /// Fold a poller event into the status line.
    pub fn apply_event(&mut self, event: &PollEvent) {
        match event {
            PollEvent::Started => {}
            PollEvent::Updated { .. } => self.last_error = None,
            PollEvent::Failed(message) => self.last_error = Some(message.clone()),
        }
    }

    /// Todos that pass the active filter, in snapshot order.
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.snapshot
            .items
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .collect()
    }

    pub fn set_filter(&mut self, filter: TodoFilter) {
        self.filter = filter;
        self.scroll = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.filter.cycle();
        self.scroll = 0;
    }

    fn max_scroll(&self) -> usize {
        self.visible_todos().len().saturating_sub(self.list_height)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scroll the list up.
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the list down.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Update the list height using the same layout as render.rs.
    pub fn update_list_height(&mut self, frame_area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // List
                Constraint::Length(3), // Footer
            ])
            .split(frame_area);

        // Borders take two rows, the table header one more
        self.list_height = chunks[1].height.saturating_sub(3).max(1) as usize;
        self.clamp_scroll();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(true)
    }
}
