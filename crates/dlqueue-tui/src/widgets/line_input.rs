//! LineInput: tui-input wrapper used for the URL field and the filter bar.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Changed(String),
    /// Enter. The line is left as-is; the caller decides whether to clear it.
    Submitted(String),
    Cancelled,
    None,
}

pub struct LineInput {
    input: Input,
    prompt: &'static str,
    placeholder: String,
}

impl LineInput {
    pub fn new(prompt: &'static str, placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            prompt,
            placeholder: placeholder.into(),
        }
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Enter => InputAction::Submitted(self.text().to_string()),
            KeyCode::Esc => InputAction::Cancelled,
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if before != self.input.value() {
                    InputAction::Changed(self.text().to_string())
                } else {
                    InputAction::None
                }
            }
        }
    }

    /// Draw the line into `area`. The cursor is only placed when `focused`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let prefix = format!("{} ", self.prompt);
        let prefix_width = prefix.chars().count() as u16;
        let width = area.width.saturating_sub(prefix_width + 1) as usize;
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();

        let body = if value.is_empty() {
            Span::styled(self.placeholder.as_str(), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(visible, Style::default().fg(C_FILTER_FG))
        };
        let line = Line::from(vec![
            Span::styled(prefix, Style::default().fg(C_MUTED)),
            body,
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_FILTER_BG)),
            area,
        );

        if focused && area.width > 0 {
            let cursor_x = area.x + prefix_width + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_reports_changes_and_enter_submits() {
        let mut input = LineInput::new(">", "url");
        assert_eq!(
            input.handle_key(key(KeyCode::Char('h'))),
            InputAction::Changed("h".into())
        );
        input.handle_key(key(KeyCode::Char('i')));
        assert_eq!(
            input.handle_key(key(KeyCode::Enter)),
            InputAction::Submitted("hi".into())
        );
        assert_eq!(input.text(), "hi");

        assert_eq!(
            input.handle_key(key(KeyCode::Backspace)),
            InputAction::Changed("h".into())
        );
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputAction::Cancelled);
    }
}
