//! Keybinding registry: maps key events to actions, with config overrides.
//!
//! Bindings are data rather than match arms so `[keybindings]` in
//! config.toml can remap any action and the help overlay can list them.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Back,
    Select,
    NextChip,
    PrevChip,
    Reload,
    OpenInBrowser,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::CycleFocus => "Switch between categories and videos",
            Self::Back => "Go back / dismiss",
            Self::Select => "Select category / play video",
            Self::NextChip => "Next subcategory or language",
            Self::PrevChip => "Previous subcategory or language",
            Self::Reload => "Retry the current list",
            Self::OpenInBrowser => "Open video in browser",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "cycle_focus" | "cyclefocus" | "tab" => Some(Action::CycleFocus),
        "back" => Some(Action::Back),
        "select" | "enter" | "play" => Some(Action::Select),
        "next_chip" | "nextchip" | "next_subcategory" => Some(Action::NextChip),
        "prev_chip" | "prevchip" | "prev_subcategory" => Some(Action::PrevChip),
        "reload" | "retry" | "refresh" => Some(Action::Reload),
        "open_in_browser" | "openinbrowser" | "open" => Some(Action::OpenInBrowser),
        "scroll_down" | "scrolldown" => Some(Action::ScrollDown),
        "scroll_up" | "scrollup" => Some(Action::ScrollUp),
        "page_down" | "pagedown" => Some(Action::PageDown),
        "page_up" | "pageup" => Some(Action::PageUp),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: which panel or view the key arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Categories,
    Videos,
    Player,
}

// ============================================================================
// Key Parsing
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Accepts single characters ("q", "]"), named keys ("Enter", "Esc", "Tab",
/// arrows, "Backspace", "Space", "PageUp", "PageDown"), "Ctrl+<char>" and
/// "F1" through "F12".
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix('F')
        .or_else(|| s.strip_prefix('f'))
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=12)
            .contains(&n)
            .then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Context-aware keybinding table.
///
/// The same key can mean different things in different contexts: `j` moves
/// the cursor in the lists but scrolls the description in the player.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    /// Create a registry with the default bindings.
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_all(&mut self, context: Context, keys: &[KeySpec], action: Action) {
        for &key in keys {
            self.bind(context, key, action);
        }
    }

    fn register_defaults(&mut self) {
        use crossterm::event::KeyCode::{Char, Down, Enter, Esc, Left, Right, Tab, Up};
        let p = KeySpec::plain;

        // === Browse (lists) ===
        self.bind(Context::Global, p(Char('q')), Action::Quit);
        self.bind_all(Context::Global, &[p(Char('j')), p(Down)], Action::NavDown);
        self.bind_all(Context::Global, &[p(Char('k')), p(Up)], Action::NavUp);
        self.bind(Context::Global, p(Tab), Action::CycleFocus);
        self.bind(Context::Global, p(Esc), Action::Back);
        self.bind(Context::Global, p(Enter), Action::Select);
        self.bind_all(Context::Global, &[p(Char(']')), p(Char('l')), p(Right)], Action::NextChip);
        self.bind_all(Context::Global, &[p(Char('[')), p(Char('h')), p(Left)], Action::PrevChip);
        self.bind(Context::Global, p(Char('r')), Action::Reload);
        self.bind(Context::Global, p(Char('T')), Action::CycleTheme);
        self.bind(Context::Global, p(Char('?')), Action::ShowHelp);

        // Only a highlighted video can be opened
        self.bind(Context::Videos, p(Char('o')), Action::OpenInBrowser);

        // === Player view ===
        self.bind(Context::Player, p(Char('q')), Action::Quit);
        self.bind_all(Context::Player, &[p(Esc), p(Char('b'))], Action::Back);
        self.bind_all(Context::Player, &[p(Char('j')), p(Down)], Action::ScrollDown);
        self.bind_all(Context::Player, &[p(Char('k')), p(Up)], Action::ScrollUp);
        self.bind(Context::Player, KeySpec::ctrl('d'), Action::PageDown);
        self.bind(Context::Player, KeySpec::ctrl('u'), Action::PageUp);
        self.bind(Context::Player, p(Char('o')), Action::OpenInBrowser);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys are action names ("quit", "next_chip"), values are key strings
    /// ("q", "Ctrl+d", "F5"). An override replaces every binding of the
    /// action and re-binds the new key in each context the action had.
    ///
    /// Returns warnings for unknown actions or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted for deterministic results when two overrides collide
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        for (action_name, key_str) in entries {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shifted characters arrive already uppercased ('T', '?')
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        self.resolve(KeySpec::new(code, modifiers), context)
    }

    fn resolve(&self, key: KeySpec, context: Context) -> Option<Action> {
        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// Label of the first key that triggers `action` in `context`, for hints.
    ///
    /// `None` when every key of the action is shadowed in that context.
    pub fn key_label(&self, action: Action, context: Context) -> Option<String> {
        self.bindings
            .iter()
            .filter(|(ctx, _, a)| *a == action && (*ctx == context || *ctx == Context::Global))
            .find(|(_, key, _)| self.resolve(*key, context) == Some(action))
            .map(|(_, key, _)| format_key(key))
    }

    /// All bindings for the help screen as (context, key, action, description).
    ///
    /// Bindings shadowed by a later override of the same key are skipped.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .filter(|(ctx, key, action)| self.lookup.get(&(*ctx, *key)) == Some(action))
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
