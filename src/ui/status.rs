use crate::app::{App, Focus, View};
use crate::keybindings::Action;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Borrow the status message; hints are built from the live keymap
    let text: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
        None => Cow::Owned(hints(app)),
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

const CATEGORY_HINTS: &[(&[Action], &str)] = &[
    (&[Action::Select], "select"),
    (&[Action::PrevChip, Action::NextChip], "subcategory"),
    (&[Action::CycleFocus], "videos"),
    (&[Action::Reload], "retry"),
    (&[Action::ShowHelp], "help"),
    (&[Action::Quit], "quit"),
];

const VIDEO_HINTS: &[(&[Action], &str)] = &[
    (&[Action::Select], "play"),
    (&[Action::OpenInBrowser], "open"),
    (&[Action::PrevChip, Action::NextChip], "subcategory"),
    (&[Action::CycleFocus], "categories"),
    (&[Action::Reload], "retry"),
    (&[Action::ShowHelp], "help"),
    (&[Action::Quit], "quit"),
];

const PLAYER_HINTS: &[(&[Action], &str)] = &[
    (&[Action::Back], "back"),
    (&[Action::ScrollDown, Action::ScrollUp], "scroll"),
    (&[Action::PageDown, Action::PageUp], "page"),
    (&[Action::OpenInBrowser], "open in browser"),
    (&[Action::Quit], "quit"),
];

/// Context hints such as `[Enter]select [q]quit`.
fn hints(app: &App) -> String {
    let entries = match (app.view(), app.focus) {
        (View::Browse, Focus::Categories) => CATEGORY_HINTS,
        (View::Browse, Focus::Videos) => VIDEO_HINTS,
        (View::Player, _) => PLAYER_HINTS,
    };

    entries
        .iter()
        .map(|(actions, label)| {
            let keys: Vec<String> = actions.iter().map(|a| app.key_hint(*a)).collect();
            format!("[{}]{}", keys.join("/"), label)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
