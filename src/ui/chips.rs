//! Chip row: the subcategories of the current category, or the languages
//! when browsing the language hub.

use crate::app::App;
use crate::keybindings::Action;
use crate::selection::ListStatus;
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::render::spinner;

/// Gap between chips, in columns.
const CHIP_GAP: usize = 1;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let sel = app.selection();
    let title = if sel.is_language_hub() {
        "Languages [ ]"
    } else {
        "Subcategories [ ]"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;

    let line = match sel.subcategories_status() {
        ListStatus::Loading => Line::from(Span::styled(
            format!("{} Loading subcategories...", spinner(app)),
            app.style("state_loading"),
        )),
        ListStatus::Failed => Line::from(Span::styled(
            format!(
                "Could not load subcategories ({} to retry)",
                app.key_hint(Action::Reload)
            ),
            app.style("state_error"),
        )),
        ListStatus::Empty | ListStatus::Idle => Line::from(Span::styled(
            "No subcategories",
            app.style("state_empty"),
        )),
        ListStatus::Populated => {
            let labels = app.chip_labels();
            chip_line(app, &labels, app.active_chip(), inner_width)
        }
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Lay out chips left to right, scrolled so the active chip is visible.
fn chip_line(app: &App, labels: &[&str], active: Option<usize>, width: usize) -> Line<'static> {
    let chips: Vec<String> = labels
        .iter()
        .map(|label| format!(" {} ", truncate_to_width(label, width.saturating_sub(2))))
        .collect();
    let widths: Vec<usize> = chips.iter().map(|c| display_width(c)).collect();
    let start = first_visible(&widths, active.unwrap_or(0), width);

    let mut spans = Vec::with_capacity(chips.len() * 2 + 1);
    if start > 0 {
        spans.push(Span::styled("‹", app.style("chip_normal")));
    }
    for (i, chip) in chips.into_iter().enumerate().skip(start) {
        let style = if Some(i) == active {
            app.style("chip_active")
        } else {
            app.style("chip_normal")
        };
        spans.push(Span::styled(chip, style));
        spans.push(Span::raw(" ".repeat(CHIP_GAP)));
    }
    Line::from(spans)
}

/// Index of the first chip to draw so that chip `active` ends within `width`.
fn first_visible(widths: &[usize], active: usize, width: usize) -> usize {
    if widths.is_empty() {
        return 0;
    }
    let active = active.min(widths.len() - 1);
    let mut start = 0;
    loop {
        // One column for the "‹" marker once scrolled
        let lead = usize::from(start > 0);
        let used: usize = widths[start..=active]
            .iter()
            .map(|w| w + CHIP_GAP)
            .sum::<usize>()
            + lead;
        if used <= width || start == active {
            return start;
        }
        start += 1;
    }
}
