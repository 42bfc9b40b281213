//! Dashboard: the reconciler.
//!
//! Owns every view node and all client-local state (filter text, playback
//! target, current message, pending confirmation). Poll results and
//! controller outcomes are applied here and only here, one at a time, so a
//! frame never shows half of a poll cycle. Anything that needs the network
//! or the player is returned as an `Effect` for the shell to run.

use std::sync::Arc;
use std::time::Duration;

use dlqueue_proto::protocol::{ApiReply, FileListSnapshot, QueueSnapshot};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::action::{Action, Bucket, Effect, Pane};
use crate::error::ClientError;
use crate::filter::SearchFilter;
use crate::poller::{PollEvent, Sequencers};
use crate::render::{render_entries, render_files};
use crate::submit::{SubmissionController, SUBMIT_SUCCESS};
use crate::view::{ControlKind, ItemClass, ListView};
use crate::widgets::line_input::{InputAction, LineInput};
use crate::widgets::message_bar::MessageBus;
use crate::widgets::status_bar::InputMode;

pub const STATUS_ERROR: &str = "Error updating queue status.";

pub struct Dashboard {
    downloading: ListView,
    queued: ListView,
    completed: ListView,
    failed: ListView,
    files: ListView,
    mp3_count: usize,
    url_input: LineInput,
    filter_input: LineInput,
    filter: SearchFilter,
    filter_open: bool,
    messages: MessageBus,
    now_playing: Option<String>,
    pending_delete: Option<String>,
    submitting: bool,
    focus: Pane,
    seqs: Arc<Sequencers>,
    should_quit: bool,
}

impl Dashboard {
    pub fn new(seqs: Arc<Sequencers>, message_display: Duration) -> Self {
        Self {
            downloading: ListView::new(),
            queued: ListView::new(),
            completed: ListView::new(),
            failed: ListView::new(),
            files: ListView::new(),
            mp3_count: 0,
            url_input: LineInput::new(">", "paste a URL and press Enter"),
            filter_input: LineInput::new("/", "filter..."),
            filter: SearchFilter::new(),
            filter_open: false,
            messages: MessageBus::new(message_display),
            now_playing: None,
            pending_delete: None,
            submitting: false,
            focus: Pane::UrlInput,
            seqs,
            should_quit: false,
        }
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn bucket(&self, bucket: Bucket) -> &ListView {
        match bucket {
            Bucket::Downloading => &self.downloading,
            Bucket::Queued => &self.queued,
            Bucket::Completed => &self.completed,
            Bucket::Failed => &self.failed,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut ListView {
        match bucket {
            Bucket::Downloading => &mut self.downloading,
            Bucket::Queued => &mut self.queued,
            Bucket::Completed => &mut self.completed,
            Bucket::Failed => &mut self.failed,
        }
    }

    pub fn files(&self) -> &ListView {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut ListView {
        &mut self.files
    }

    pub fn mp3_count(&self) -> usize {
        self.mp3_count
    }

    pub fn messages(&self) -> &MessageBus {
        &self.messages
    }

    pub fn url_input(&self) -> &LineInput {
        &self.url_input
    }

    pub fn filter_input(&self) -> &LineInput {
        &self.filter_input
    }

    pub fn filter_open(&self) -> bool {
        self.filter_open
    }

    pub fn filter_text(&self) -> &str {
        self.filter.text()
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn input_mode(&self) -> InputMode {
        if self.pending_delete.is_some() {
            InputMode::Confirm
        } else if self.filter_open {
            InputMode::Filter
        } else {
            match self.focus {
                Pane::UrlInput => InputMode::Url,
                Pane::Files => InputMode::Files,
            }
        }
    }

    // ── Poll results ─────────────────────────────────────────────────────────

    pub fn apply_poll(&mut self, event: PollEvent) {
        match event {
            PollEvent::Cycle { queue, files } => {
                if self.seqs.queue.is_latest(queue.seq) {
                    self.apply_queue(&queue.value);
                } else {
                    debug!(
                        "[dashboard] discarding stale status #{} (latest #{})",
                        queue.seq,
                        self.seqs.queue.latest()
                    );
                }
                if let Some(files) = files {
                    self.apply_stamped_files(files.seq, &files.value);
                }
            }
            PollEvent::StatusFailed { seq, error } => {
                debug!("[dashboard] status #{} failed: {}", seq, error);
                self.messages.error(STATUS_ERROR);
            }
            PollEvent::Files(files) => self.apply_stamped_files(files.seq, &files.value),
        }
    }

    fn apply_stamped_files(&mut self, seq: u64, snapshot: &FileListSnapshot) {
        if self.seqs.files.is_latest(seq) {
            self.apply_files(snapshot);
        } else {
            debug!(
                "[dashboard] discarding stale file list #{} (latest #{})",
                seq,
                self.seqs.files.latest()
            );
        }
    }

    /// Render all four buckets from one snapshot.
    pub fn apply_queue(&mut self, snapshot: &QueueSnapshot) {
        render_entries(&mut self.downloading, &snapshot.downloading, ItemClass::Downloading);
        render_entries(&mut self.queued, &snapshot.queued, ItemClass::Queued);
        render_entries(&mut self.completed, &snapshot.completed, ItemClass::Completed);
        render_entries(&mut self.failed, &snapshot.failed, ItemClass::Failed);
    }

    /// Render the file list, update the counter, then re-run the filter
    /// over the new rows.
    pub fn apply_files(&mut self, snapshot: &FileListSnapshot) {
        render_files(&mut self.files, &snapshot.files);
        self.mp3_count = snapshot.mp3_count;
        self.filter.apply(&mut self.files);
    }

    // ── Keys ─────────────────────────────────────────────────────────────────

    /// Translate a key press into actions. Text typed into the URL field or
    /// the filter bar is applied to the field directly.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        match self.input_mode() {
            InputMode::Confirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => vec![Action::Confirm(true)],
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    vec![Action::Confirm(false)]
                }
                _ => vec![],
            },
            InputMode::Filter => match key.code {
                KeyCode::Up => vec![Action::SelectUp],
                KeyCode::Down => vec![Action::SelectDown],
                KeyCode::Tab => vec![Action::KeepFilter, Action::FocusNext],
                _ => match self.filter_input.handle_key(key) {
                    InputAction::Changed(text) => vec![Action::FilterChanged(text)],
                    InputAction::Submitted(_) => vec![Action::KeepFilter],
                    InputAction::Cancelled => vec![Action::CancelFilter],
                    InputAction::None => vec![],
                },
            },
            InputMode::Url => match key.code {
                KeyCode::Tab | KeyCode::BackTab => vec![Action::FocusNext],
                _ => match self.url_input.handle_key(key) {
                    InputAction::Submitted(_) => vec![Action::Submit],
                    _ => vec![],
                },
            },
            InputMode::Files => match key.code {
                KeyCode::Tab | KeyCode::BackTab => vec![Action::FocusNext],
                KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectUp],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectDown],
                KeyCode::Enter | KeyCode::Char('p') => vec![Action::Play],
                KeyCode::Char('d') | KeyCode::Delete => vec![Action::Delete],
                KeyCode::Char('s') => vec![Action::StopPlayback],
                KeyCode::Char('/') => vec![Action::OpenFilter],
                KeyCode::Char('r') => vec![Action::Refresh],
                KeyCode::Char('q') => vec![Action::Quit],
                _ => vec![],
            },
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    pub fn apply_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::FocusNext => {
                self.focus = self.focus.next();
                vec![]
            }
            Action::Submit => self.submit(),
            Action::SelectUp => {
                self.files.select_up(1);
                vec![]
            }
            Action::SelectDown => {
                self.files.select_down(1);
                vec![]
            }
            Action::Play => match self.files.selected_tag(ControlKind::Play) {
                Some(filename) => vec![Effect::Play(filename.to_string())],
                None => vec![],
            },
            Action::Delete => {
                if let Some(filename) = self.files.selected_tag(ControlKind::Delete) {
                    self.pending_delete = Some(filename.to_string());
                }
                vec![]
            }
            Action::Confirm(yes) => match self.pending_delete.take() {
                Some(filename) if yes => vec![Effect::Delete(filename)],
                Some(filename) => {
                    debug!("[dashboard] delete of {} declined", filename);
                    vec![]
                }
                None => vec![],
            },
            Action::OpenFilter => {
                self.filter_open = true;
                vec![]
            }
            Action::FilterChanged(text) => {
                self.filter.set_text(&text);
                self.filter.apply(&mut self.files);
                vec![]
            }
            Action::KeepFilter => {
                self.filter_open = false;
                vec![]
            }
            Action::CancelFilter => {
                self.filter_open = false;
                self.filter_input.clear();
                self.filter.set_text("");
                self.filter.apply(&mut self.files);
                vec![]
            }
            Action::StopPlayback => {
                if self.now_playing.is_some() {
                    vec![Effect::StopPlayback]
                } else {
                    vec![]
                }
            }
            Action::Refresh => vec![Effect::PollNow],
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.submitting {
            debug!("[dashboard] submit already in flight, ignoring Enter");
            return vec![];
        }
        match SubmissionController::validate(self.url_input.text()) {
            Ok(url) => {
                self.submitting = true;
                vec![Effect::Submit(url)]
            }
            Err(e) => {
                self.messages.error(e.to_string());
                vec![]
            }
        }
    }

    // ── Controller outcomes ──────────────────────────────────────────────────

    pub fn on_submitted(&mut self, result: Result<ApiReply, ClientError>) -> Vec<Effect> {
        self.submitting = false;
        match result {
            Ok(_) => {
                self.url_input.clear();
                self.messages.info(SUBMIT_SUCCESS);
                vec![Effect::PollNow]
            }
            Err(e) => {
                self.messages.error(e.to_string());
                vec![]
            }
        }
    }

    /// The view is left alone until the follow-up refresh lands.
    pub fn on_deleted(&mut self, filename: &str, result: Result<(), ClientError>) -> Vec<Effect> {
        match result {
            Ok(()) => {
                self.messages.info(format!("Deleted {}.", filename));
                let mut effects = vec![Effect::RefreshFiles];
                if self.now_playing.as_deref() == Some(filename) {
                    effects.push(Effect::StopPlayback);
                }
                effects
            }
            Err(e) => {
                self.messages.error(e.to_string());
                vec![]
            }
        }
    }

    pub fn on_played(&mut self, filename: &str, result: anyhow::Result<String>) {
        match result {
            Ok(_) => self.now_playing = Some(filename.to_string()),
            Err(e) => self.messages.error(format!("Playback failed: {}", e)),
        }
    }

    pub fn on_stopped(&mut self) {
        self.now_playing = None;
    }

    /// Per-frame housekeeping.
    pub fn tick(&mut self) {
        self.messages.tick();
    }
}
