//! Message bar: one transient status message at a time.

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::time::Instant;

use crate::theme::{C_MESSAGE_ERROR, C_MESSAGE_INFO};

pub const DEFAULT_DISPLAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
    expires: Instant,
}

/// Last write wins: a new message replaces the current one and restarts
/// the expiry. There is no queue.
///
/// Uses tokio's clock so paused-time tests can drive expiry.
pub struct MessageBus {
    current: Option<Message>,
    display_for: Duration,
}

impl MessageBus {
    pub fn new(display_for: Duration) -> Self {
        Self {
            current: None,
            display_for,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, severity: Severity) {
        self.current = Some(Message {
            text: text.into(),
            severity,
            expires: Instant::now() + self.display_for,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.show(text, Severity::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text, Severity::Error);
    }

    pub fn current(&self) -> Option<&Message> {
        self.current.as_ref()
    }

    /// Drop the message once it has expired. Call each UI tick.
    pub fn tick(&mut self) {
        if self
            .current
            .as_ref()
            .is_some_and(|m| m.expires <= Instant::now())
        {
            self.current = None;
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = &self.current else {
            return;
        };
        let (icon, color) = match message.severity {
            Severity::Info => ("✓", C_MESSAGE_INFO),
            Severity::Error => ("✗", C_MESSAGE_ERROR),
        };
        let line = Line::from(Span::styled(
            format!(" {} {}", icon, message.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn message_expires_after_display_time() {
        let mut bus = MessageBus::default();
        bus.info("hello");

        tokio::time::advance(Duration::from_millis(3_999)).await;
        bus.tick();
        assert_eq!(bus.current().unwrap().text, "hello");

        tokio::time::advance(Duration::from_millis(1)).await;
        bus.tick();
        assert!(bus.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_replaces_and_resets_expiry() {
        let mut bus = MessageBus::new(Duration::from_secs(4));
        bus.info("first");
        tokio::time::advance(Duration::from_secs(3)).await;

        bus.error("second");
        tokio::time::advance(Duration::from_secs(3)).await;
        bus.tick();

        let current = bus.current().unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.severity, Severity::Error);

        tokio::time::advance(Duration::from_secs(1)).await;
        bus.tick();
        assert!(bus.current().is_none());
    }
}
