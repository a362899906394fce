//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! picks the Dark or Light palette and `StyleMap` resolves role names to
//! concrete styles at render time.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Category sidebar --
    pub category_normal: Style,
    pub category_selected: Style,
    pub category_active: Style,

    // -- Chip row (subcategories / languages) --
    pub chip_normal: Style,
    pub chip_active: Style,

    // -- Video list --
    pub video_title: Style,
    pub video_meta: Style,
    pub video_selected: Style,

    // -- Player --
    pub player_title: Style,
    pub player_meta: Style,
    pub player_body: Style,
    pub player_link: Style,

    // -- List states --
    pub state_loading: Style,
    pub state_error: Style,
    pub state_empty: Style,

    // -- Chrome --
    pub header_title: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        let selected = Style::default().bg(Color::DarkGray).fg(Color::White);
        Self {
            category_normal: Style::default(),
            category_selected: selected,
            category_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            chip_normal: Style::default().fg(Color::Gray),
            chip_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            video_title: Style::default().add_modifier(Modifier::BOLD),
            video_meta: Style::default().fg(Color::DarkGray),
            video_selected: selected,

            player_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            player_meta: Style::default().fg(Color::DarkGray),
            player_body: Style::default(),
            player_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            state_loading: Style::default().fg(Color::Yellow),
            state_error: Style::default().fg(Color::Red),
            state_empty: Style::default().fg(Color::DarkGray),

            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            status_bar: selected,
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        let selected = Style::default().bg(Color::Blue).fg(Color::White);
        Self {
            category_normal: Style::default().fg(Color::Black),
            category_selected: selected,
            category_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            chip_normal: Style::default().fg(Color::DarkGray),
            chip_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            video_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            video_meta: Style::default().fg(Color::DarkGray),
            video_selected: selected,

            player_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            player_meta: Style::default().fg(Color::DarkGray),
            player_body: Style::default().fg(Color::Black),
            player_link: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),

            state_loading: Style::default().fg(Color::Magenta),
            state_error: Style::default().fg(Color::Red),
            state_empty: Style::default().fg(Color::DarkGray),

            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup used by the render functions.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_COUNT: usize = 19;

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; ROLE_COUNT] = [
    "category_normal",
    "category_selected",
    "category_active",
    "chip_normal",
    "chip_active",
    "video_title",
    "video_meta",
    "video_selected",
    "player_title",
    "player_meta",
    "player_body",
    "player_link",
    "state_loading",
    "state_error",
    "state_empty",
    "header_title",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; ROLE_COUNT] = [
            p.category_normal,
            p.category_selected,
            p.category_active,
            p.chip_normal,
            p.chip_active,
            p.video_title,
            p.video_meta,
            p.video_selected,
            p.player_title,
            p.player_meta,
            p.player_body,
            p.player_link,
            p.state_loading,
            p.state_error,
            p.state_empty,
            p.header_title,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_selection_and_focus() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.video_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
        assert_eq!(
            palette.panel_border_focused,
            Style::default().fg(Color::Cyan)
        );
        assert_eq!(palette.state_error, Style::default().fg(Color::Red));
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.video_selected, light.video_selected);
        assert_ne!(dark.chip_active, light.chip_active);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("DARK"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next().name(), "Dark");
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Light.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("chip_active"), palette.chip_active);
        assert_eq!(sm.resolve("player_link"), palette.player_link);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_eq!(sm.resolve("no_such_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing", name);
        }
    }
}
