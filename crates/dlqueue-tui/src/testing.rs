//! In-memory `ServerApi` and `Player` used by the engine tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use dlqueue_proto::protocol::{ApiReply, FileListSnapshot, QueueEntry, QueueSnapshot};

use crate::api::ServerApi;
use crate::error::ClientError;
use crate::file_actions::Player;

type Scripted<T> = (Duration, Result<T, ClientError>);

/// Scripted answers are consumed first; once a script runs dry the
/// fallback answer is returned with no delay.
pub(crate) struct FakeState {
    pub status_script: VecDeque<Scripted<QueueSnapshot>>,
    pub status_fallback: Result<QueueSnapshot, ClientError>,
    pub files_script: VecDeque<Scripted<FileListSnapshot>>,
    pub files_fallback: Result<FileListSnapshot, ClientError>,
    pub add_reply: Result<ApiReply, ClientError>,
    pub delete_reply: Result<ApiReply, ClientError>,
    pub status_calls: usize,
    pub files_calls: usize,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            status_script: VecDeque::new(),
            status_fallback: Ok(QueueSnapshot::default()),
            files_script: VecDeque::new(),
            files_fallback: Ok(FileListSnapshot::default()),
            add_reply: Ok(ApiReply::default()),
            delete_reply: Ok(ApiReply::ok()),
            status_calls: 0,
            files_calls: 0,
            added: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn script_status(&self, delay: Duration, snapshot: QueueSnapshot) {
        self.state().status_script.push_back((delay, Ok(snapshot)));
    }

    pub fn set_files(&self, files: &[&str]) {
        self.state().files_fallback = Ok(files_snapshot(files));
    }
}

#[async_trait]
impl ServerApi for FakeApi {
    async fn queue_status(&self) -> Result<QueueSnapshot, ClientError> {
        let (delay, answer) = {
            let mut state = self.state();
            state.status_calls += 1;
            match state.status_script.pop_front() {
                Some(scripted) => scripted,
                None => (Duration::ZERO, state.status_fallback.clone()),
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    async fn downloaded_files(&self) -> Result<FileListSnapshot, ClientError> {
        let (delay, answer) = {
            let mut state = self.state();
            state.files_calls += 1;
            match state.files_script.pop_front() {
                Some(scripted) => scripted,
                None => (Duration::ZERO, state.files_fallback.clone()),
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    async fn add_url(&self, url: &str) -> Result<ApiReply, ClientError> {
        let mut state = self.state();
        state.added.push(url.to_string());
        state.add_reply.clone()
    }

    async fn delete_file(&self, filename: &str) -> Result<ApiReply, ClientError> {
        let mut state = self.state();
        state.deleted.push(filename.to_string());
        state.delete_reply.clone()
    }

    fn resolve(&self, path: &str) -> String {
        format!("http://fake{}", path)
    }
}

pub(crate) fn files_snapshot(files: &[&str]) -> FileListSnapshot {
    FileListSnapshot::from_files(files.iter().map(|f| f.to_string()).collect())
}

/// Snapshot with one URL per non-empty bucket name.
pub(crate) fn queue_snapshot(
    downloading: &[&str],
    queued: &[&str],
    completed: &[&str],
) -> QueueSnapshot {
    let urls = |items: &[&str]| -> Vec<QueueEntry> {
        items.iter().map(|u| QueueEntry::Url(u.to_string())).collect()
    };
    QueueSnapshot {
        downloading: urls(downloading),
        queued: urls(queued),
        completed: urls(completed),
        failed: Vec::new(),
    }
}

/// Records what it was asked to play.
#[derive(Clone, Default)]
pub(crate) struct RecordingPlayer {
    pub log: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlayer {
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Player for RecordingPlayer {
    fn load(&mut self, source: &str) {
        self.log.lock().unwrap().push(format!("load {}", source));
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.log.lock().unwrap().push("play".to_string());
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push("stop".to_string());
    }
}
