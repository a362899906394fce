use crate::app::{App, Focus};
use crate::catalog::CATEGORIES;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the category sidebar.
///
/// The cursor row is highlighted; the category actually being browsed is
/// marked even when the cursor is elsewhere.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Categories;
    let active_slug = app.selection().category().slug;

    let style_selected = app.style("category_selected");
    let style_active = app.style("category_active");
    let style_normal = app.style("category_normal");

    // Borders plus the "▸ " marker
    let max_name = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let is_active = category.slug == active_slug;
            let style = if i == app.category_cursor && is_focused {
                style_selected
            } else if is_active {
                style_active
            } else {
                style_normal
            };

            let marker = if is_active { "▸ " } else { "  " };
            let label = format!("{} {}", category.icon, category.name);
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(truncate_to_width(&label, max_name).into_owned(), style),
            ]))
        })
        .collect();

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Categories"),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.category_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
