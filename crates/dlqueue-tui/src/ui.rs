//! Frame layout and list drawing.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::action::{Bucket, Pane};
use crate::dashboard::Dashboard;
use crate::theme::{
    class_style, style_focused_border, style_secondary, style_selected, style_selected_focused,
    style_unfocused_border, C_BADGE, C_KEY_HINT, C_MUTED,
};
use crate::view::{ListView, Row};
use crate::widgets::confirm::draw_confirm;
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::status_bar::{draw_keys_bar, draw_now_playing};
use crate::widgets::truncate_to_width;

pub fn draw(frame: &mut Frame, dash: &mut Dashboard) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // URL field
            Constraint::Length(1), // message
            Constraint::Percentage(45),
            Constraint::Min(5), // downloaded files
            Constraint::Length(1), // now playing
            Constraint::Length(1), // keys
        ])
        .split(area);

    draw_url_field(frame, chunks[0], dash);
    dash.messages().draw(frame, chunks[1]);
    draw_buckets(frame, chunks[2], dash);
    draw_files(frame, chunks[3], dash);
    draw_now_playing(frame, chunks[4], dash.now_playing());
    draw_keys_bar(frame, chunks[5], dash.input_mode(), dash.is_submitting());

    if let Some(filename) = dash.pending_delete() {
        draw_confirm(frame, area, &format!("Delete {}?", filename));
    }
}

fn draw_url_field(frame: &mut Frame, area: Rect, dash: &Dashboard) {
    let focused = dash.focus() == Pane::UrlInput && dash.pending_delete().is_none();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            style_focused_border()
        } else {
            style_unfocused_border()
        })
        .title(Span::styled(" Add URL ", Style::default().fg(C_MUTED)));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    dash.url_input().draw(frame, inner, focused);
}

fn draw_buckets(frame: &mut Frame, area: Rect, dash: &mut Dashboard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (bucket, column) in Bucket::ALL.into_iter().zip(columns.iter()) {
        let list = dash.bucket_mut(bucket);
        let count = real_rows(list);
        let badge = (count > 0).then(|| Badge {
            text: count.to_string(),
            color: C_KEY_HINT,
        });
        let block = pane_chrome(bucket.title(), false, badge);
        let inner = block.inner(*column);
        frame.render_widget(block, *column);
        draw_rows(frame, inner, list, false);
    }
}

fn draw_files(frame: &mut Frame, area: Rect, dash: &mut Dashboard) {
    let focused = dash.focus() == Pane::Files && dash.pending_delete().is_none();
    let badge = Badge {
        text: format!("{} MP3", dash.mp3_count()),
        color: C_BADGE,
    };
    let block = pane_chrome("Downloaded files", focused, Some(badge));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let show_filter = dash.filter_open() || !dash.filter_text().is_empty();
    let (list_area, filter_area) = if show_filter && inner.height > 1 {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        (split[0], Some(split[1]))
    } else {
        (inner, None)
    };

    draw_rows(frame, list_area, dash.files_mut(), focused);
    if let Some(filter_area) = filter_area {
        let filter_open = dash.filter_open();
        dash.filter_input().draw(frame, filter_area, filter_open);
    }
}

/// Rows that are not the placeholder.
fn real_rows(list: &ListView) -> usize {
    list.rows().iter().filter(|r| !r.is_placeholder()).count()
}

fn draw_rows(frame: &mut Frame, area: Rect, list: &mut ListView, focused: bool) {
    if area.height == 0 {
        return;
    }
    let height = area.height as usize;
    list.ensure_visible(height);
    let selected = list.selected();
    let width = area.width as usize;

    let lines: Vec<Line> = list
        .window(height)
        .into_iter()
        .map(|(idx, row)| row_line(row, focused && idx == selected, width))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn row_line(row: &Row, cursor: bool, width: usize) -> Line<'static> {
    let base = if cursor {
        style_selected_focused()
    } else {
        class_style(row.class)
    };

    let controls = if cursor && !row.controls.is_empty() {
        let labels: Vec<String> = row
            .controls
            .iter()
            .map(|c| format!("[{}]", c.kind.label()))
            .collect();
        format!(" {}", labels.join(" "))
    } else {
        String::new()
    };

    let marker = if cursor { "▸ " } else { "  " };
    let reserved = marker.width() + controls.width();
    let room = width.saturating_sub(reserved);

    let mut spans = vec![Span::styled(marker, base)];
    match &row.detail {
        Some(detail) => {
            let text_room = room.min(row.text.width()).min(room * 2 / 3);
            let text = truncate_to_width(&row.text, text_room.max(1));
            let detail_room = room.saturating_sub(text.width() + 1);
            spans.push(Span::styled(text, base));
            if detail_room > 0 {
                spans.push(Span::styled(
                    format!(" {}", truncate_to_width(detail, detail_room)),
                    style_secondary(),
                ));
            }
        }
        None => spans.push(Span::styled(truncate_to_width(&row.text, room), base)),
    }
    if !controls.is_empty() {
        spans.push(Span::styled(controls, style_selected()));
    }
    Line::from(spans)
}
