//! Status bar: now-playing line and the keybindings footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::truncate_to_width;
use crate::theme::{C_FILTER_FG, C_KEY_HINT, C_MUTED, C_PLAYING, C_PRIMARY, C_QUEUED};

/// What the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Url,
    Files,
    Filter,
    Confirm,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Files => "FILES",
            Self::Filter => "FILTER",
            Self::Confirm => "CONFIRM",
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Url => " type a URL  Enter add  Tab files  Ctrl-C quit",
            Self::Files => concat!(
                " ↑↓/jk select  Enter/p play  s stop  d delete",
                "  / filter  r refresh  Tab url  q quit"
            ),
            Self::Filter => " type to filter  Enter keep  Esc clear+close",
            Self::Confirm => " y delete  n/Esc keep",
        }
    }
}

pub fn draw_now_playing(frame: &mut Frame, area: Rect, now_playing: Option<&str>) {
    let line = match now_playing {
        Some(name) => {
            let room = (area.width as usize).saturating_sub(14);
            Line::from(vec![
                Span::styled(" ▶ ", Style::default().fg(C_PLAYING)),
                Span::styled("Now playing: ", Style::default().fg(C_MUTED)),
                Span::styled(
                    truncate_to_width(name, room),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ),
            ])
        }
        None => Line::from(Span::styled(" ■ Nothing playing", Style::default().fg(C_MUTED))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, submitting: bool) {
    let label_color = match mode {
        InputMode::Filter | InputMode::Confirm => C_FILTER_FG,
        InputMode::Url | InputMode::Files => C_KEY_HINT,
    };
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(label_color).add_modifier(Modifier::BOLD),
    )];
    if submitting {
        spans.push(Span::styled("⣾ adding ", Style::default().fg(C_QUEUED)));
    }
    spans.push(Span::styled(mode.keys(), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
