//! Playback view for the selected video.
//!
//! A terminal cannot host the embedded player, so the view shows the video's
//! metadata, its watch and embed links, and the description. `o` hands the
//! watch link to the system browser.

use crate::app::App;
use crate::catalog::Video;
use crate::theme::StyleMap;
use crate::util::{display_width, strip_control_chars};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the player view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(video) = app.selection().selected_video() else {
        let paragraph = Paragraph::new("No video selected")
            .block(Block::default().borders(Borders::ALL).title("Player"));
        f.render_widget(paragraph, area);
        return;
    };

    let lines = build_player_lines(video, &app.theme);
    let inner_width = area.width.saturating_sub(2) as usize;

    // Update viewport metrics, then clamp before drawing so a resize never
    // renders one frame past the end.
    app.player_content_lines = wrapped_height(&lines, inner_width);
    app.player_visible_lines = area.height.saturating_sub(2) as usize;
    app.clamp_scroll();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title("Player"),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.player_scroll as u16, 0));

    f.render_widget(paragraph, area);
}

/// Build the player text for `video`.
fn build_player_lines(video: &Video, theme: &StyleMap) -> Vec<Line<'static>> {
    let meta_style = theme.resolve("player_meta");
    let link_style = theme.resolve("player_link");
    let body_style = theme.resolve("player_body");

    let mut meta = vec![strip_control_chars(&video.channel).into_owned()];
    let views = video.views_label();
    if !views.is_empty() {
        meta.push(views);
    }
    meta.push(video.published_label());

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&video.title).into_owned(),
            theme.resolve("player_title"),
        )),
        Line::from(Span::styled(meta.join(" · "), meta_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Watch  ", meta_style),
            Span::styled(video.watch_url(), link_style),
        ]),
        Line::from(vec![
            Span::styled("Embed  ", meta_style),
            Span::styled(video.embed_url(), link_style),
        ]),
        Line::from(""),
    ];

    let description = video
        .description
        .as_deref()
        .map(strip_control_chars)
        .filter(|d| !d.trim().is_empty());

    match description {
        Some(text) => {
            lines.extend(
                text.lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), body_style))),
            );
        }
        None => lines.push(Line::from(Span::styled(
            "No description available.",
            theme.resolve("state_empty"),
        ))),
    }

    lines
}

/// Rows the lines occupy once wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeVariant;
    use chrono::{TimeZone, Utc};

    fn theme() -> StyleMap {
        StyleMap::from_palette(&ThemeVariant::Dark.palette())
    }

    fn video(description: Option<&str>) -> Video {
        Video {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Two Pointers\u{7} Pattern".to_string(),
            channel: "NeetCode".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap(),
            view_count: Some(1_500),
            thumbnail_url: String::new(),
            description: description.map(str::to_string),
        }
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_lines() {
        let lines = build_player_lines(&video(None), &theme());
        assert_eq!(text_of(&lines[0]), "Two Pointers Pattern");
        assert_eq!(text_of(&lines[1]), "NeetCode · 1.5K views · Mar 14, 2024");
        assert_eq!(
            text_of(&lines[3]),
            "Watch  https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert!(text_of(&lines[4]).starts_with("Embed  https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_missing_description_placeholder() {
        let lines = build_player_lines(&video(Some("  ")), &theme());
        assert_eq!(text_of(lines.last().unwrap()), "No description available.");
    }

    #[test]
    fn test_description_keeps_angle_brackets() {
        let desc = "Learn Vec<T> and Option<T> in Rust.\nUse a < b && b > c.\n<p> stays too";
        let lines = build_player_lines(&video(Some(desc)), &theme());
        let body: Vec<String> = lines[6..].iter().map(text_of).collect();
        assert_eq!(
            body,
            vec![
                "Learn Vec<T> and Option<T> in Rust.",
                "Use a < b && b > c.",
                "<p> stays too",
            ]
        );
    }

    #[test]
    fn test_description_control_chars_stripped() {
        let lines = build_player_lines(&video(Some("0:00 Intro\x1b[31m\n3:10 Code")), &theme());
        let body: Vec<String> = lines[6..].iter().map(text_of).collect();
        assert_eq!(body, vec!["0:00 Intro", "3:10 Code"]);
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("a".repeat(25)), Line::from(""), Line::from("abc")];
        assert_eq!(wrapped_height(&lines, 10), 3 + 1 + 1);
        assert_eq!(wrapped_height(&lines, 0), 3);
    }
}
