//! Help overlay listing every key binding, grouped by where it applies.
//!
//! Reads the live registry, so `[keybindings]` overrides show up here.

use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

/// Group order and headings.
const CONTEXT_ORDER: [(Context, &str); 4] = [
    (Context::Global, "General"),
    (Context::Categories, "Category List"),
    (Context::Videos, "Video List"),
    (Context::Player, "Player"),
];

/// One row of the help table.
#[derive(Debug, PartialEq)]
enum HelpRow {
    Heading(&'static str),
    Binding { key: String, description: &'static str },
    Spacer,
}

/// Flatten the registry into grouped rows, skipping empty groups.
fn help_rows(bindings: &[(Context, String, Action, &'static str)]) -> Vec<HelpRow> {
    let mut rows = Vec::with_capacity(bindings.len() + CONTEXT_ORDER.len() * 2);
    for (ctx, heading) in CONTEXT_ORDER {
        let mut group = bindings.iter().filter(|(c, ..)| *c == ctx).peekable();
        if group.peek().is_none() {
            continue;
        }
        if !rows.is_empty() {
            rows.push(HelpRow::Spacer);
        }
        rows.push(HelpRow::Heading(heading));
        rows.extend(group.map(|(_, key, _, description)| HelpRow::Binding {
            key: key.clone(),
            description: *description,
        }));
    }
    rows
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let rows = help_rows(&app.keybindings.all_bindings());

    // Borders and the header row
    let visible_height = overlay.height.saturating_sub(3) as usize;
    let max_scroll = rows.len().saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let heading_style = app.style("header_title").add_modifier(Modifier::BOLD);
    let table_rows: Vec<Row> = rows
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .map(|row| match row {
            HelpRow::Heading(text) => Row::new(vec![
                Line::from(Span::styled(format!("-- {} --", text), heading_style)),
                Line::from(""),
            ]),
            HelpRow::Binding { key, description } => {
                Row::new(vec![format!("  {}", key), description.to_string()])
            }
            HelpRow::Spacer => Row::new(vec![String::new(), String::new()]),
        })
        .collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(table_rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("player_body"));
    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.bottom().saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                " j/k to scroll, ? or Esc to close ",
                app.style("video_meta"),
            )),
            hint_area,
        );
    }
}

/// A rect covering the given percentages of `area`, centered in it.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeybindingRegistry;

    #[test]
    fn test_rows_grouped_in_context_order() {
        let rows = help_rows(&KeybindingRegistry::new().all_bindings());
        let headings: Vec<&str> = rows
            .iter()
            .filter_map(|r| match r {
                HelpRow::Heading(h) => Some(*h),
                _ => None,
            })
            .collect();
        // Categories has no bindings of its own
        assert_eq!(headings, vec!["General", "Video List", "Player"]);
        assert_eq!(rows[0], HelpRow::Heading("General"));
        assert!(!matches!(rows.last(), Some(HelpRow::Spacer)));
    }

    #[test]
    fn test_rows_show_formatted_keys() {
        let rows = help_rows(&KeybindingRegistry::new().all_bindings());
        assert!(rows.contains(&HelpRow::Binding {
            key: "Ctrl+d".to_string(),
            description: Action::PageDown.describe(),
        }));
    }

    #[test]
    fn test_no_bindings_no_rows() {
        assert!(help_rows(&[]).is_empty());
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }
}
