use crate::catalog::{Video, CATEGORIES, LANGUAGES};
use crate::config::Config;
use crate::keybindings::{Action, Context, KeybindingRegistry};
use crate::orchestrator::{FetchEvent, Orchestrator};
use crate::selection::{Msg, Selection};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum scroll offset for the player view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode, derived from the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse, // Categories + chips + video list
    Player, // Full-screen playback view for the selected video
}

/// Which panel has focus in Browse view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Videos,
}

// ============================================================================
// App
// ============================================================================

/// Central application state.
///
/// Everything about *what* is being browsed lives in the orchestrator's
/// `Selection`. `App` only adds presentation state: cursors, focus, scroll,
/// theme and the status line.
pub struct App {
    pub orchestrator: Orchestrator,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    pub focus: Focus,
    /// Highlighted row in the category sidebar (not necessarily the selected category).
    pub category_cursor: usize,
    /// Highlighted row in the video list.
    pub video_cursor: usize,
    pub player_scroll: usize,
    /// Player viewport height and wrapped content height, updated on render.
    pub player_visible_lines: usize,
    pub player_content_lines: usize,

    // P-8: Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// PERF-010: Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner (0..SPINNER_FRAMES).
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(orchestrator: Orchestrator) -> Self {
        let category = orchestrator.selection().category();
        let category_cursor = CATEGORIES
            .iter()
            .position(|c| c.slug == category.slug)
            .unwrap_or(0);

        Self {
            orchestrator,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            focus: Focus::Categories,
            category_cursor,
            video_cursor: 0,
            player_scroll: 0,
            player_visible_lines: 0,
            player_content_lines: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    /// Apply theme and keybinding settings from the config file.
    ///
    /// Returns human-readable warnings for settings that could not be applied.
    pub fn apply_config(&mut self, config: &Config) -> Vec<String> {
        let mut warnings = self.keybindings.apply_overrides(&config.keybindings);
        match ThemeVariant::from_str_name(&config.theme) {
            Some(variant) => self.set_theme(variant),
            None => warnings.push(format!("Unknown theme '{}', using Dark", config.theme)),
        }
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Config setting ignored");
        }
        warnings
    }

    pub fn selection(&self) -> &Selection {
        self.orchestrator.selection()
    }

    pub fn view(&self) -> View {
        if self.selection().selected_video().is_some() {
            View::Player
        } else {
            View::Browse
        }
    }

    /// Keybinding context that key presses are looked up in right now.
    pub fn key_context(&self) -> Context {
        match (self.view(), self.focus) {
            (View::Player, _) => Context::Player,
            (View::Browse, Focus::Categories) => Context::Categories,
            (View::Browse, Focus::Videos) => Context::Videos,
        }
    }

    /// Key label for `action` in the current context, `?` if nothing reaches it.
    pub fn key_hint(&self, action: Action) -> String {
        self.keybindings
            .key_label(action, self.key_context())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for the status bar.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ========================================================================
    // Selection intents
    // ========================================================================

    /// Send a message through the reducer and keep cursors in range.
    pub fn dispatch(&mut self, msg: Msg) {
        let resets_list = matches!(
            msg,
            Msg::SelectCategory(_) | Msg::SelectLanguage(_) | Msg::SelectSubcategory(_)
        );
        if matches!(msg, Msg::SelectVideo(_) | Msg::ClearVideo) {
            self.player_scroll = 0;
        }
        self.orchestrator.dispatch(msg);
        if resets_list {
            self.video_cursor = 0;
        }
        self.clamp_selections();
        self.needs_redraw = true;
    }

    /// Route a completed fetch into the selection.
    pub fn handle_fetch_event(&mut self, event: FetchEvent) {
        let previous_error = self.selection().error().cloned();
        if !self.orchestrator.handle_event(event) {
            return;
        }
        self.clamp_selections();
        self.needs_redraw = true;

        if let Some(err) = self.selection().error() {
            if previous_error.as_ref() != Some(err) {
                let msg = err.to_string();
                self.set_status(msg);
            }
        }
    }

    /// Select the category under the sidebar cursor.
    pub fn select_category_at_cursor(&mut self) {
        if let Some(category) = CATEGORIES.get(self.category_cursor) {
            self.dispatch(Msg::SelectCategory(category));
        }
    }

    /// Start playback of the highlighted video.
    pub fn play_video_at_cursor(&mut self) {
        if let Some(video) = self.selection().videos().get(self.video_cursor).cloned() {
            self.dispatch(Msg::SelectVideo(video));
        }
    }

    /// Leave the player, keeping the rest of the selection.
    pub fn close_player(&mut self) {
        if self.view() == View::Player {
            self.dispatch(Msg::ClearVideo);
        }
    }

    /// Retry whatever list failed or is shown.
    pub fn reload(&mut self) {
        self.dispatch(Msg::Reload);
        let sel = self.selection();
        if sel.subcategories_loading() || sel.videos_loading() {
            self.set_status("Reloading...");
        }
    }

    // ========================================================================
    // Chip row (subcategories, or languages on the hub)
    // ========================================================================

    /// Labels shown in the chip row.
    pub fn chip_labels(&self) -> Vec<&str> {
        let sel = self.selection();
        if sel.is_language_hub() {
            LANGUAGES.iter().map(|l| l.name).collect()
        } else {
            sel.subcategories().iter().map(String::as_str).collect()
        }
    }

    /// Index of the active chip, if any.
    pub fn active_chip(&self) -> Option<usize> {
        let sel = self.selection();
        if sel.is_language_hub() {
            let language = sel.language()?;
            LANGUAGES.iter().position(|l| l.slug == language.slug)
        } else {
            let active = sel.subcategory()?;
            sel.subcategories().iter().position(|s| s == active)
        }
    }

    /// Move the active chip one step, selecting it immediately.
    ///
    /// With no active chip, forward picks the first and backward the last.
    /// Stops at either end.
    pub fn step_chip(&mut self, forward: bool) {
        let len = self.chip_labels().len();
        if len == 0 {
            return;
        }
        let current = self.active_chip();
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        if current == Some(next) {
            return;
        }

        let sel = self.selection();
        let msg = if sel.is_language_hub() {
            Msg::SelectLanguage(&LANGUAGES[next])
        } else {
            match sel.subcategories().get(next) {
                Some(label) => Msg::SelectSubcategory(label.clone()),
                None => return,
            }
        };
        self.dispatch(msg);
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Categories => {
                self.category_cursor = self.category_cursor.saturating_sub(1);
            }
            Focus::Videos => {
                self.video_cursor = self.video_cursor.saturating_sub(1);
            }
        }
    }

    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Categories => {
                let max_index = CATEGORIES.len().saturating_sub(1);
                self.category_cursor = self.category_cursor.saturating_add(1).min(max_index);
            }
            Focus::Videos => {
                let max_index = self.selection().videos().len().saturating_sub(1);
                self.video_cursor = self.video_cursor.saturating_add(1).min(max_index);
            }
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Categories => Focus::Videos,
            Focus::Videos => Focus::Categories,
        };
    }

    /// Keep cursors inside their lists after the lists change.
    pub fn clamp_selections(&mut self) {
        let max_video = self.selection().videos().len().saturating_sub(1);
        self.video_cursor = self.video_cursor.min(max_video);
        self.category_cursor = self
            .category_cursor
            .min(CATEGORIES.len().saturating_sub(1));
    }

    /// The video a browser-open would target: the one playing, or the
    /// highlighted row when the video list has focus.
    pub fn current_video(&self) -> Option<&Video> {
        let sel = self.selection();
        match self.view() {
            View::Player => sel.selected_video(),
            View::Browse if self.focus == Focus::Videos => sel.videos().get(self.video_cursor),
            View::Browse => None,
        }
    }

    // ========================================================================
    // Player scrolling
    // ========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        self.player_scroll = self.player_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.player_scroll = self.player_scroll.saturating_add(lines);
        self.clamp_scroll();
    }

    /// Clamp the player scroll to the last rendered content size.
    pub fn clamp_scroll(&mut self) {
        let max_scroll = self
            .player_content_lines
            .saturating_sub(self.player_visible_lines);
        self.player_scroll = self.player_scroll.min(max_scroll).min(MAX_SCROLL);
    }

    // ========================================================================
    // Status and ticks
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if it is older than 3 seconds.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Advance the spinner while anything is loading.
    pub fn tick(&mut self) {
        let sel = self.selection();
        if sel.subcategories_loading() || sel.videos_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            self.needs_redraw = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{category_by_slug, CatalogClient};
    use crate::orchestrator::FetchEvent;
    use crate::selection::FetchRequest;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time;

    /// App on an unreachable service; tests feed fetch events by hand.
    fn test_app(slug: &str) -> (App, mpsc::Receiver<FetchEvent>) {
        let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (tx, rx) = mpsc::channel(16);
        let orchestrator = Orchestrator::new(client, category_by_slug(slug).unwrap(), tx);
        (App::new(orchestrator), rx)
    }

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            channel: "Channel".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            view_count: Some(10),
            thumbnail_url: String::new(),
            description: None,
        }
    }

    /// Resolve the pending subcategory fetch, then the video fetch.
    fn populate(app: &mut App, subcategories: &[&str], videos: &[&str]) {
        let tag = app.selection().pending_subcategories().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::SubcategoriesLoaded {
            tag,
            result: Ok(subcategories.iter().map(|s| s.to_string()).collect()),
        });
        if let Some(tag) = app.selection().pending_videos().cloned() {
            app.handle_fetch_event(FetchEvent::VideosLoaded {
                tag,
                result: Ok(videos.iter().map(|id| video(id)).collect()),
            });
        }
    }

    #[tokio::test]
    async fn test_new_places_cursor_on_start_category() {
        let (app, _rx) = test_app("behavioral");
        assert_eq!(CATEGORIES[app.category_cursor].slug, "behavioral");
        assert_eq!(app.view(), View::Browse);
        assert_eq!(app.focus, Focus::Categories);
    }

    #[tokio::test]
    async fn test_nav_clamps_to_lists() {
        let (mut app, _rx) = test_app("dsa");
        app.orchestrator.start();
        populate(&mut app, &["Most Watched"], &["a", "b"]);

        app.focus = Focus::Videos;
        app.nav_up();
        assert_eq!(app.video_cursor, 0);
        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.video_cursor, 1);

        app.focus = Focus::Categories;
        for _ in 0..20 {
            app.nav_down();
        }
        assert_eq!(app.category_cursor, CATEGORIES.len() - 1);
    }

    #[tokio::test]
    async fn test_play_and_close_player() {
        let (mut app, _rx) = test_app("dsa");
        app.orchestrator.start();
        populate(&mut app, &["Most Watched"], &["a", "b"]);

        app.focus = Focus::Videos;
        app.nav_down();
        app.play_video_at_cursor();
        assert_eq!(app.view(), View::Player);
        assert_eq!(app.current_video().map(|v| v.id.as_str()), Some("b"));

        app.close_player();
        assert_eq!(app.view(), View::Browse);
        assert_eq!(app.selection().subcategory(), Some("Most Watched"));
        assert_eq!(app.video_cursor, 1);
    }

    #[tokio::test]
    async fn test_current_video_requires_video_focus() {
        let (mut app, _rx) = test_app("dsa");
        app.orchestrator.start();
        populate(&mut app, &["Most Watched"], &["a"]);
        assert!(app.current_video().is_none());
        app.focus = Focus::Videos;
        assert_eq!(app.current_video().unwrap().id, "a");
    }

    #[tokio::test]
    async fn test_step_chip_selects_subcategory() {
        let (mut app, _rx) = test_app("system_design");
        app.orchestrator.start();
        populate(&mut app, &["Scalability", "Databases", "Caching"], &["a"]);
        app.focus = Focus::Videos;
        assert_eq!(app.active_chip(), Some(0));

        app.step_chip(true);
        assert_eq!(app.selection().subcategory(), Some("Databases"));
        assert!(app.selection().videos_loading());
        assert_eq!(app.video_cursor, 0);

        app.step_chip(false);
        app.step_chip(false);
        assert_eq!(app.selection().subcategory(), Some("Scalability"));
    }

    #[tokio::test]
    async fn test_step_chip_on_language_hub() {
        let (mut app, _rx) = test_app("languages");
        app.orchestrator.start();
        assert_eq!(app.chip_labels().len(), LANGUAGES.len());
        assert_eq!(app.active_chip(), None);

        app.step_chip(false);
        let last = &LANGUAGES[LANGUAGES.len() - 1];
        assert_eq!(app.selection().language().map(|l| l.slug), Some(last.slug));
        assert_eq!(app.active_chip(), Some(LANGUAGES.len() - 1));
    }

    #[tokio::test]
    async fn test_step_chip_without_chips_is_noop() {
        let (mut app, _rx) = test_app("dsa");
        app.orchestrator.start();
        let before = app.selection().clone();
        app.step_chip(true);
        assert_eq!(app.selection(), &before);
    }

    #[tokio::test]
    async fn test_select_category_at_cursor() {
        let (mut app, _rx) = test_app("dsa");
        app.orchestrator.start();
        populate(&mut app, &["Most Watched"], &["a"]);

        app.category_cursor = CATEGORIES
            .iter()
            .position(|c| c.slug == "ai_ml")
            .unwrap();
        app.select_category_at_cursor();
        assert_eq!(app.selection().category().slug, "ai_ml");
        assert!(app.selection().videos().is_empty());
        assert!(app.selection().subcategories_loading());
    }

    #[tokio::test]
    async fn test_failure_sets_status_once() {
        let (mut app, _rx) = test_app("dsa");
        app.orchestrator.start();
        let tag = app.selection().pending_subcategories().cloned().unwrap();
        app.handle_fetch_event(FetchEvent::TaskPanicked {
            request: FetchRequest::Subcategories(tag),
            error: "boom".to_string(),
        });
        let (msg, _) = app.status_message.clone().unwrap();
        assert!(msg.contains("subcategories"), "status was {:?}", msg);
    }

    #[tokio::test]
    async fn test_scroll_clamps_to_content() {
        let (mut app, _rx) = test_app("dsa");
        app.player_content_lines = 30;
        app.player_visible_lines = 10;
        app.scroll_down(50);
        assert_eq!(app.player_scroll, 20);
        app.scroll_up(25);
        assert_eq!(app.player_scroll, 0);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let (mut app, _rx) = test_app("dsa");
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_cycle_theme_round_trip() {
        let (mut app, _rx) = test_app("dsa");
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(
            app.style("status_bar"),
            ThemeVariant::Light.palette().status_bar
        );
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[tokio::test]
    async fn test_apply_config_reports_bad_settings() {
        let (mut app, _rx) = test_app("dsa");
        let mut config = Config {
            theme: "light".to_string(),
            ..Config::default()
        };
        assert!(app.apply_config(&config).is_empty());
        assert_eq!(app.theme_variant, ThemeVariant::Light);

        config.theme = "neon".to_string();
        config
            .keybindings
            .insert("fly".to_string(), "x".to_string());
        let warnings = app.apply_config(&config);
        assert_eq!(warnings.len(), 2);
    }

    #[tokio::test]
    async fn test_tick_animates_only_while_loading() {
        let (mut app, _rx) = test_app("dsa");
        app.tick();
        assert_eq!(app.spinner_frame, 0);

        app.orchestrator.start();
        app.tick();
        assert_eq!(app.spinner_frame, 1);
    }
}
