//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{categories, chips, help, player, status, videos};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Braille spinner, one glyph per tick.
const SPINNER: [&str; crate::app::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current spinner glyph.
pub(super) fn spinner(app: &App) -> &'static str {
    SPINNER[app.spinner_frame % SPINNER.len()]
}

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application state.
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    // EDGE-001: Minimum terminal size check for usable UI
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    match app.view() {
        View::Browse => render_browse(f, app, chunks[1]),
        View::Player => player::render(f, app, chunks[1]),
    }
    status::render(f, app, chunks[2]);

    // Render help overlay on top of any view when active
    if app.show_help {
        help::render(f, app);
    }
}

/// One-line title with the current breadcrumb.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let sel = app.selection();
    let category = sel.category();

    let mut crumbs = vec![format!("{} {}", category.icon, category.name)];
    if let Some(language) = sel.language() {
        crumbs.push(language.name.to_string());
    } else if let Some(sub) = sel.subcategory() {
        crumbs.push(sub.to_string());
    }
    if let Some(video) = sel.selected_video() {
        crumbs.push(video.title.clone());
    }

    let line = Line::from(vec![
        Span::styled(" brackets.tv ", app.style("header_title")),
        Span::styled(crumbs.join(" › "), app.style("video_meta")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Render the browse view: category sidebar left, chips above videos right.
fn render_browse(f: &mut Frame, app: &App, area: Rect) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    categories::render(f, app, main_chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(main_chunks[1]);

    chips::render(f, app, right[0]);
    videos::render(f, app, right[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{category_by_slug, CatalogClient, Video};
    use crate::orchestrator::{FetchEvent, Orchestrator};
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn test_app(slug: &str) -> (App, mpsc::Receiver<FetchEvent>) {
        let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (tx, rx) = mpsc::channel(16);
        let mut orchestrator = Orchestrator::new(client, category_by_slug(slug).unwrap(), tx);
        orchestrator.start();
        (App::new(orchestrator), rx)
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_too_small_terminal() {
        let (mut app, _rx) = test_app("dsa");
        let screen = draw(&mut app, 40, 8);
        assert!(screen.contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_browse_shows_categories_and_loading() {
        let (mut app, _rx) = test_app("dsa");
        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("Categories"));
        assert!(screen.contains("System Design"));
        assert!(screen.contains("Loading"));
    }

    #[tokio::test]
    async fn test_browse_shows_videos_and_chips() {
        let (mut app, _rx) = test_app("system_design");
        let tag = app.selection().pending_subcategories().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::SubcategoriesLoaded {
            tag,
            result: Ok(vec!["Scalability".to_string(), "Databases".to_string()]),
        });
        let tag = app.selection().pending_videos().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::VideosLoaded {
            tag,
            result: Ok(vec![Video {
                id: "abc".to_string(),
                title: "Consistent Hashing Explained".to_string(),
                channel: "ByteByteGo".to_string(),
                published_at: Utc.with_ymd_and_hms(2023, 5, 2, 0, 0, 0).unwrap(),
                view_count: Some(1_250_000),
                thumbnail_url: String::new(),
                description: None,
            }]),
        });

        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("Scalability"));
        assert!(screen.contains("Databases"));
        assert!(screen.contains("Consistent Hashing Explained"));
        assert!(screen.contains("1.2M views"));
    }

    #[tokio::test]
    async fn test_empty_subcategories_state() {
        let (mut app, _rx) = test_app("dsa");
        let tag = app.selection().pending_subcategories().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::SubcategoriesLoaded {
            tag,
            result: Ok(Vec::new()),
        });
        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("No subcategories"));
    }

    #[tokio::test]
    async fn test_retry_hint_uses_remapped_key() {
        let (mut app, _rx) = test_app("dsa");
        let overrides = std::collections::HashMap::from([("reload".to_string(), "F5".to_string())]);
        assert!(app.keybindings.apply_overrides(&overrides).is_empty());

        let tag = app.selection().pending_subcategories().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::SubcategoriesLoaded {
            tag,
            result: Ok(vec!["Arrays".to_string()]),
        });
        let tag = app.selection().pending_videos().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::VideosLoaded {
            tag,
            result: Err(crate::catalog::CatalogError::HttpStatus(502)),
        });

        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("Press F5 to retry"));
        assert!(!screen.contains("Press r to retry"));
    }

    #[tokio::test]
    async fn test_language_hint_uses_remapped_keys() {
        let (mut app, _rx) = test_app("languages");
        let overrides = std::collections::HashMap::from([("prev_chip".to_string(), "p".to_string())]);
        assert!(app.keybindings.apply_overrides(&overrides).is_empty());

        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("Pick a language with p and ]"));
    }

    #[tokio::test]
    async fn test_help_overlay_lists_contexts() {
        let (mut app, _rx) = test_app("dsa");
        app.show_help = true;
        let screen = draw(&mut app, 100, 40);
        assert!(screen.contains("Help"));
        assert!(screen.contains("-- General --"));
    }
}
