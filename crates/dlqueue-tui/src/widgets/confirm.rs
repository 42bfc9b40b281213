//! Modal yes/no prompt drawn over the dashboard.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::{style_focused_border, C_ACCENT, C_MUTED, C_PRIMARY};

pub fn draw_confirm(frame: &mut Frame, area: Rect, question: &str) {
    let popup = centered_rect(60, 5, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_focused_border())
        .title(Span::styled(
            " Confirm ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::from(Span::styled(question, Style::default().fg(C_PRIMARY))),
        Line::from(vec![
            Span::styled("y", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(" yes   ", Style::default().fg(C_MUTED)),
            Span::styled("n", Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)),
            Span::styled(" no", Style::default().fg(C_MUTED)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
