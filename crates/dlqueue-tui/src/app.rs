//! App: terminal shell around the dashboard.
//!
//! Architecture:
//! - `Dashboard` owns all view state and turns keys and results into `Effect`s.
//! - `App` runs those effects: spawned network calls report back through an
//!   `AppMessage` channel, poll results arrive through the poller's channel.
//! - The event loop is the only place the dashboard is mutated.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use dlqueue_proto::config::Config;
use dlqueue_proto::protocol::ApiReply;
use ratatui::crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::action::Effect;
use crate::api::ServerApi;
use crate::dashboard::Dashboard;
use crate::error::ClientError;
use crate::file_actions::{FileActionController, Player};
use crate::poller::{PollEvent, StatusPoller};
use crate::submit::SubmissionController;
use crate::ui;

pub enum AppMessage {
    Event(Event),
    Submitted(Result<ApiReply, ClientError>),
    Deleted {
        filename: String,
        result: Result<(), ClientError>,
    },
}

/// Receiving ends of the two channels feeding the event loop.
pub struct Inbox {
    messages: mpsc::Receiver<AppMessage>,
    polls: mpsc::Receiver<PollEvent>,
}

pub enum Inbound {
    App(AppMessage),
    Poll(PollEvent),
}

impl Inbox {
    pub async fn recv(&mut self) -> Option<Inbound> {
        tokio::select! {
            Some(msg) = self.messages.recv() => Some(Inbound::App(msg)),
            Some(event) = self.polls.recv() => Some(Inbound::Poll(event)),
            else => None,
        }
    }
}

pub struct App {
    dashboard: Dashboard,
    poller: StatusPoller,
    submitter: SubmissionController,
    file_actions: FileActionController,
    tx: mpsc::Sender<AppMessage>,
}

impl App {
    pub fn new(api: Arc<dyn ServerApi>, player: Box<dyn Player>, config: &Config) -> (Self, Inbox) {
        let (tx, messages) = mpsc::channel(1024);
        let (poll_tx, polls) = mpsc::channel(64);

        let poller = StatusPoller::new(api.clone(), config.polling.interval(), poll_tx);
        let dashboard = Dashboard::new(poller.sequencers(), config.messages.display_for());
        let app = Self {
            dashboard,
            poller,
            submitter: SubmissionController::new(api.clone()),
            file_actions: FileActionController::new(api, player),
            tx,
        };
        (app, Inbox { messages, polls })
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut inbox: Inbox) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        self.poller.start();
        info!("dlq started");

        // Message expiry check.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(250));
        ui_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let result: anyhow::Result<()> = loop {
            if let Err(e) = terminal.draw(|f| ui::draw(f, &mut self.dashboard)) {
                break Err(e.into());
            }
            if self.dashboard.should_quit() {
                break Ok(());
            }

            tokio::select! {
                inbound = inbox.recv() => match inbound {
                    Some(inbound) => self.handle_inbound(inbound),
                    None => break Ok(()),
                },
                _ = ui_tick.tick() => self.dashboard.tick(),
            }
        };

        // ── Teardown ──────────────────────────────────────────────────────────
        self.poller.stop();
        self.file_actions.stop();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("dlq stopped");

        result
    }

    // ── Message handling ──────────────────────────────────────────────────────

    pub fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::App(msg) => self.handle_message(msg),
            Inbound::Poll(event) => self.dashboard.apply_poll(event),
        }
    }

    fn handle_message(&mut self, msg: AppMessage) {
        let effects = match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                let actions = self.dashboard.handle_key(key);
                actions
                    .into_iter()
                    .flat_map(|a| self.dashboard.apply_action(a))
                    .collect()
            }
            AppMessage::Event(_) => return,
            AppMessage::Submitted(result) => self.dashboard.on_submitted(result),
            AppMessage::Deleted { filename, result } => {
                self.dashboard.on_deleted(&filename, result)
            }
        };
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            debug!("[app] effect {:?}", effect);
            match effect {
                Effect::Submit(url) => {
                    let request = self.submitter.submit(url);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = request.await;
                        let _ = tx.send(AppMessage::Submitted(result)).await;
                    });
                }
                Effect::PollNow => self.poller.poll_now(),
                Effect::RefreshFiles => self.poller.refresh_files_now(),
                Effect::Delete(filename) => {
                    let request = self.file_actions.delete(&filename);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = request.await;
                        let _ = tx.send(AppMessage::Deleted { filename, result }).await;
                    });
                }
                Effect::Play(filename) => {
                    let result = self.file_actions.play(&filename);
                    self.dashboard.on_played(&filename, result);
                }
                Effect::StopPlayback => {
                    self.file_actions.stop();
                    self.dashboard.on_stopped();
                }
                Effect::Quit => self.poller.stop(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Bucket;
    use crate::testing::{files_snapshot, queue_snapshot, FakeApi, RecordingPlayer};
    use crate::widgets::message_bar::Severity;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        app.handle_inbound(Inbound::App(AppMessage::Event(Event::Key(key))));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn pump(app: &mut App, inbox: &mut Inbox) {
        let inbound = inbox.recv().await.unwrap();
        app.handle_inbound(inbound);
    }

    fn app_with(api: Arc<FakeApi>, player: RecordingPlayer) -> (App, Inbox) {
        App::new(api, Box::new(player), &Config::default())
    }

    #[tokio::test]
    async fn submit_round_trip_triggers_immediate_poll() {
        let api = FakeApi::new();
        api.state().status_fallback = Ok(queue_snapshot(&[], &["http://example.com/a"], &[]));
        let (mut app, mut inbox) = app_with(api.clone(), RecordingPlayer::default());

        type_text(&mut app, "http://example.com/a");
        press(&mut app, KeyCode::Enter);
        // A second Enter before the answer is ignored.
        press(&mut app, KeyCode::Enter);

        pump(&mut app, &mut inbox).await; // Submitted
        assert_eq!(api.state().added, vec!["http://example.com/a"]);
        assert!(app.dashboard().url_input().is_empty());

        pump(&mut app, &mut inbox).await; // PollNow cycle
        assert_eq!(
            app.dashboard().bucket(Bucket::Queued).texts(),
            vec!["http://example.com/a"]
        );
        assert_eq!(api.state().status_calls, 1);
    }

    #[tokio::test]
    async fn confirmed_delete_round_trip_refreshes_only_files() {
        let api = FakeApi::new();
        api.set_files(&["song.mp3"]);
        let player = RecordingPlayer::default();
        let (mut app, mut inbox) = app_with(api.clone(), player.clone());
        app.dashboard_mut().apply_files(&files_snapshot(&["song.mp3"]));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.dashboard().now_playing(), Some("song.mp3"));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        api.set_files(&[]);

        pump(&mut app, &mut inbox).await; // Deleted
        assert_eq!(api.state().deleted, vec!["song.mp3"]);
        assert_eq!(app.dashboard().now_playing(), None);
        assert_eq!(
            player.calls(),
            vec!["load http://fake/downloads/song.mp3", "play", "stop"]
        );

        pump(&mut app, &mut inbox).await; // Files refresh
        assert_eq!(app.dashboard().files().texts(), vec!["None"]);
        assert_eq!(api.state().status_calls, 0);
    }

    #[tokio::test]
    async fn locked_file_stays_after_rejected_delete() {
        let api = FakeApi::new();
        api.set_files(&["song.mp3"]);
        api.state().delete_reply = Ok(ApiReply::failed("locked"));
        let (mut app, mut inbox) = app_with(api.clone(), RecordingPlayer::default());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('r'));
        pump(&mut app, &mut inbox).await;
        assert_eq!(app.dashboard().files().texts(), vec!["song.mp3"]);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        pump(&mut app, &mut inbox).await;

        let message = app.dashboard().messages().current().unwrap();
        assert_eq!(message.text, "locked");
        assert_eq!(message.severity, Severity::Error);

        press(&mut app, KeyCode::Char('r'));
        pump(&mut app, &mut inbox).await;
        assert_eq!(app.dashboard().files().texts(), vec!["song.mp3"]);
    }
}
