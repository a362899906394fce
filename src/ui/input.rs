//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on the current view and focus.

use crate::app::{App, Focus, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::validate_url_for_open;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Lines moved by PageDown / PageUp in the player.
const PAGE_LINES: usize = 20;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current overlay and view.
pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    match app.view() {
        View::Browse => handle_browse_input(app, code, modifiers),
        View::Player => handle_player_input(app, code, modifiers),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in browse view (categories + chips + videos).
fn handle_browse_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let context = app.key_context();
    let action = app.keybindings.action_for_key(code, modifiers, context);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::CycleFocus) => app.cycle_focus(),
        Some(KbAction::Back) => {
            if app.focus == Focus::Videos {
                app.focus = Focus::Categories;
            }
        }
        Some(KbAction::Select) => match app.focus {
            Focus::Categories => {
                app.select_category_at_cursor();
                app.focus = Focus::Videos;
            }
            Focus::Videos => app.play_video_at_cursor(),
        },
        Some(KbAction::NextChip) => app.step_chip(true),
        Some(KbAction::PrevChip) => app.step_chip(false),
        Some(KbAction::Reload) => app.reload(),
        Some(KbAction::OpenInBrowser) => open_current_video(app),
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the player view.
fn handle_player_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Player);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => app.close_player(),
        Some(KbAction::ScrollDown) => app.scroll_down(1),
        Some(KbAction::ScrollUp) => app.scroll_up(1),
        Some(KbAction::PageDown) => app.scroll_down(PAGE_LINES),
        Some(KbAction::PageUp) => app.scroll_up(PAGE_LINES),
        Some(KbAction::OpenInBrowser) => open_current_video(app),
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        _ => {}
    }
    Action::Continue
}

/// Open the current video's watch page in the system browser.
fn open_current_video(app: &mut App) {
    let Some(video) = app.current_video() else {
        app.set_status("No video selected");
        return;
    };
    let url = video.watch_url();
    let title = video.title.clone();

    // SEC: Validate URL before open::that() to prevent command injection
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(valid) => {
            if let Err(e) = open::that(valid.as_str()) {
                tracing::warn!(url = %valid, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status(format!("Opening {}...", title));
            }
        }
    }
}
