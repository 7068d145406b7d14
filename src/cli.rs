//! CLI entry point and command definitions.

use crate::config::{
    PollerConfig, DEFAULT_ENDPOINT, DEFAULT_INTERVAL_MS, DEFAULT_LIMIT, DEFAULT_TIMEOUT_SECS,
};
use crate::logging::{self, LogTarget, DEFAULT_LOG_FILE};
use crate::poller::{PollEvent, Poller};
use crate::source::{HttpTodoSource, TodoSource};
use crate::todo::{Todo, TodoFilter};
use crate::ui::{self, App};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{
        disable_raw_mode, enable_raw_mode, BeginSynchronizedUpdate, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

/// Todo Poller - keeps a live view of a todo REST endpoint.
#[derive(Parser)]
#[command(name = "todo-poller")]
#[command(version = "0.1.0")]
#[command(about = "Keeps a live view of a todo REST endpoint")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how often todos are fetched.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Todo endpoint URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub url: String,
    /// Number of todos requested per poll
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
    /// Milliseconds between automatic refreshes
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl SourceArgs {
    fn build(&self) -> PollerConfig {
        PollerConfig {
            endpoint: self.url.clone(),
            limit: self.limit,
            interval: Duration::from_millis(self.interval_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Configuration for continuous polling.
    pub fn to_config(&self) -> Result<PollerConfig> {
        let config = self.build();
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Configuration for a single fetch; the interval is not used.
    pub fn to_request_config(&self) -> Result<PollerConfig> {
        let config = self.build();
        config.validate_request().context("Invalid configuration")?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the live todo dashboard
    Watch {
        #[command(flatten)]
        source: SourceArgs,
        /// Start with the refresh timer disarmed
        #[arg(long)]
        no_auto_refresh: bool,
        /// File that log output is appended to
        #[arg(long, default_value = DEFAULT_LOG_FILE)]
        log_file: PathBuf,
    },
    /// Fetch the todo list once and print it
    Fetch {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the raw list as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle the watch command.
pub fn handle_watch(source: &SourceArgs, no_auto_refresh: bool, log_file: PathBuf) -> Result<()> {
    let config = source.to_config()?;
    let _log_guard = logging::init(&LogTarget::File(log_file))?;

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let http = HttpTodoSource::new(&config).context("Failed to create HTTP client")?;
    info!(endpoint = http.endpoint(), limit = config.limit, "starting watch");

    let mut poller = Poller::new(Arc::new(http), config.interval, runtime.handle().clone());
    let events = poller.subscribe();
    if no_auto_refresh {
        poller.refresh();
    } else {
        poller.start();
    }

    run_monitor(&mut poller, events)
}

/// Handle the fetch command.
pub fn handle_fetch(source: &SourceArgs, json: bool) -> Result<()> {
    let config = source.to_request_config()?;
    let _log_guard = logging::init(&LogTarget::Stderr)?;

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let http = HttpTodoSource::new(&config).context("Failed to create HTTP client")?;
    let todos = runtime
        .block_on(http.fetch())
        .with_context(|| format!("Failed to fetch todos from {}", http.endpoint()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&todos)?);
    } else {
        print!("{}", format_todos(&todos));
    }

    Ok(())
}

/// Plain-text listing used by the fetch command.
fn format_todos(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos\n".to_string();
    }

    todos
        .iter()
        .map(|todo| format!("  [{}] {}: {}\n", todo.status(), todo.id, todo.title))
        .collect()
}

/// Run the monitor UI. The poller is stopped on every exit path.
fn run_monitor(poller: &mut Poller, events: Receiver<PollEvent>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(poller.is_auto_refresh());

    let result = run_event_loop(&mut terminal, &mut app, poller, &events);

    // Cleanup
    poller.stop();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poller: &mut Poller,
    events: &Receiver<PollEvent>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // Handle poller events (non-blocking)
        while let Ok(event) = events.try_recv() {
            app.apply_event(&event);
        }
        app.set_snapshot(poller.snapshot());
        app.auto_refresh = poller.is_auto_refresh();

        let size = terminal.size()?;
        app.update_list_height(Rect::new(0, 0, size.width, size.height));

        // Draw UI with synchronized update (prevents flicker in tmux and other terminals)
        queue!(terminal.backend_mut(), BeginSynchronizedUpdate)?;
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        {
            let backend = terminal.backend_mut();
            queue!(backend, EndSynchronizedUpdate)?;
            std::io::Write::flush(backend)?;
        }

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key.code, key.modifiers, app, poller);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(code: KeyCode, modifiers: KeyModifiers, app: &mut App, poller: &mut Poller) {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('r') => {
            poller.refresh();
        }
        KeyCode::Char('a') => {
            let enabled = !poller.is_auto_refresh();
            poller.set_auto_refresh(enabled);
            info!(enabled, "auto refresh toggled");
        }
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('1') => app.set_filter(TodoFilter::All),
        KeyCode::Char('2') => app.set_filter(TodoFilter::Done),
        KeyCode::Char('3') => app.set_filter(TodoFilter::Pending),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),
        _ => {}
    }
}
