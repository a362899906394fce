//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! fetch completions, and periodic ticks.

use crate::app::App;
use crate::orchestrator::FetchEvent;
use anyhow::Result;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex three event sources:
/// - **Terminal input**: Key presses from crossterm's async event stream
/// - **Fetch tasks**: subcategory and video results via the `FetchEvent` channel
/// - **Periodic tick**: 250ms timer for status expiry and the loading spinner
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
///
/// # Arguments
///
/// * `app` - Mutable application state (owns the orchestrator)
/// * `event_rx` - Receiver paired with the orchestrator's event sender
pub async fn run(app: &mut App, mut event_rx: mpsc::Receiver<FetchEvent>) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    // PERF-012: Use interval instead of sleep for consistent periodic ticks
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    let mut signals = ShutdownSignals::install()?;

    loop {
        // PERF-010: Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // PERF-013: Drain finished fetches before handling more input so a
        // burst of key presses cannot starve result delivery.
        while let Ok(event) = event_rx.try_recv() {
            app.handle_fetch_event(event);
        }

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            name = signals.recv() => {
                tracing::info!(signal = name, "Shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                let Some(event) = maybe_event else { break };
                match event {
                    Ok(event) => {
                        if handle_terminal_event(app, event) == Action::Quit {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Terminal event stream error"),
                }
            }

            Some(event) = event_rx.recv() => {
                app.handle_fetch_event(event);
            }

            _ = tick_interval.tick() => {
                app.tick();
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Route one crossterm event.
fn handle_terminal_event(app: &mut App, event: Event) -> Action {
    match event {
        // Windows reports both press and release
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            app.needs_redraw = true;
            handle_input(app, key.code, key.modifiers)
        }
        Event::Resize(_, _) => {
            app.needs_redraw = true;
            Action::Continue
        }
        _ => Action::Continue,
    }
}

/// SIGTERM and SIGINT on Unix, Ctrl-C elsewhere.
struct ShutdownSignals {
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(unix)]
    interrupt: Signal,
}

impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
            #[cfg(unix)]
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next shutdown request; returns the signal name.
    #[cfg(unix)]
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "Ctrl-C",
            // No handler means no signal will ever come
            Err(_) => std::future::pending().await,
        }
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
