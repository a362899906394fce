use crate::app::{App, Focus};
use crate::keybindings::Action;
use crate::selection::{ListStatus, Stage};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::render::spinner;

/// Render the video list panel, or the state message standing in for it.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let sel = app.selection();
    let is_focused = app.focus == Focus::Videos;
    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let title = match sel.videos_status() {
        ListStatus::Populated => format!("Videos ({})", sel.videos().len()),
        _ => "Videos".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let placeholder = match sel.videos_status() {
        ListStatus::Populated => None,
        ListStatus::Loading => {
            let what = if sel.subcategories_loading() {
                "subcategories"
            } else {
                "videos"
            };
            Some(vec![Line::from(Span::styled(
                format!("{} Loading {}...", spinner(app), what),
                app.style("state_loading"),
            ))])
        }
        ListStatus::Failed => {
            let mut lines = Vec::with_capacity(3);
            if let Some(err) = sel.error() {
                let headline = match err.stage {
                    Stage::Subcategories => "Could not load subcategories",
                    Stage::Videos => "Could not load videos",
                };
                lines.push(Line::from(Span::styled(headline, app.style("state_error"))));
                lines.push(Line::from(Span::styled(
                    format!("{}: {}", err.kind.label(), err.message),
                    app.style("video_meta"),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "Press {} to retry",
                app.key_hint(Action::Reload)
            )));
            Some(lines)
        }
        ListStatus::Empty => Some(vec![Line::from(Span::styled(
            "No videos in this subcategory yet",
            app.style("state_empty"),
        ))]),
        ListStatus::Idle => {
            let hint = if sel.subcategories().is_empty() && !sel.is_language_hub() {
                "No subcategories in this category".to_string()
            } else {
                format!(
                    "Pick a {} with {} and {}",
                    if sel.is_language_hub() { "language" } else { "subcategory" },
                    app.key_hint(Action::PrevChip),
                    app.key_hint(Action::NextChip)
                )
            };
            Some(vec![Line::from(Span::styled(hint, app.style("state_empty")))])
        }
    };

    if let Some(lines) = placeholder {
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let max_width = area.width.saturating_sub(4) as usize;
    let style_selected = app.style("video_selected");
    let style_title = app.style("video_title");
    let style_meta = app.style("video_meta");

    let items: Vec<ListItem> = sel
        .videos()
        .iter()
        .enumerate()
        .map(|(i, video)| {
            let highlighted = is_focused && i == app.video_cursor;
            let (title_style, meta_style) = if highlighted {
                (style_selected, style_selected)
            } else {
                (style_title, style_meta)
            };

            let title = strip_control_chars(&video.title);
            let mut meta = vec![strip_control_chars(&video.channel).into_owned()];
            let views = video.views_label();
            if !views.is_empty() {
                meta.push(views);
            }
            meta.push(video.published_label());

            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate_to_width(&title, max_width).into_owned(),
                    title_style,
                )),
                Line::from(Span::styled(
                    format!("  {}", truncate_to_width(&meta.join(" · "), max_width.saturating_sub(2))),
                    meta_style,
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.video_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
