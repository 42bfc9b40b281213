//! StatusPoller: periodic and on-demand snapshot fetching.
//!
//! The poller never touches the view. Each fetch is stamped with a sequence
//! number taken before the request goes out, and the result is sent to the
//! event loop as a `PollEvent`. The loop applies a result only if its stamp
//! is still the newest issued for that resource, so overlapping polls can
//! finish in any order without an older answer overwriting a newer one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dlqueue_proto::protocol::{FileListSnapshot, QueueSnapshot};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::ServerApi;
use crate::error::ClientError;

/// Monotonically increasing request counter for one resource.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: AtomicU64,
}

impl Sequencer {
    /// Take the next number. The first call returns 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest()
    }
}

#[derive(Debug, Default)]
pub struct Sequencers {
    pub queue: Sequencer,
    pub files: Sequencer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped<T> {
    pub seq: u64,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A full cycle. `files` is `None` when the file-list fetch failed.
    Cycle {
        queue: Stamped<QueueSnapshot>,
        files: Option<Stamped<FileListSnapshot>>,
    },
    /// The queue-status fetch failed; the file list was not fetched.
    StatusFailed { seq: u64, error: ClientError },
    /// A file-list-only refresh.
    Files(Stamped<FileListSnapshot>),
}

pub struct StatusPoller {
    api: Arc<dyn ServerApi>,
    interval: Duration,
    events: mpsc::Sender<PollEvent>,
    seqs: Arc<Sequencers>,
    periodic: Option<JoinHandle<()>>,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn ServerApi>,
        interval: Duration,
        events: mpsc::Sender<PollEvent>,
    ) -> Self {
        Self {
            api,
            interval,
            events,
            seqs: Arc::new(Sequencers::default()),
            periodic: None,
        }
    }

    /// Shared with the reconciler, which checks stamps against it.
    pub fn sequencers(&self) -> Arc<Sequencers> {
        self.seqs.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the periodic task: one poll right away, then one per interval.
    ///
    /// Each tick's poll runs in its own task. A tick that arrives while the
    /// previous periodic poll is still outstanding is skipped, so a server
    /// slower than the interval cannot pile up requests whose answers would
    /// all be superseded before they land.
    pub fn start(&mut self) {
        if self.periodic.is_some() {
            return;
        }
        info!("[poller] starting, interval {:?}", self.interval);

        let api = self.api.clone();
        let events = self.events.clone();
        let seqs = self.seqs.clone();
        let interval = self.interval;
        let busy = Arc::new(AtomicBool::new(false));

        self.periodic = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if events.is_closed() {
                    break;
                }
                if busy.swap(true, Ordering::AcqRel) {
                    debug!("[poller] previous poll still running, skipping tick");
                    continue;
                }
                let api = api.clone();
                let events = events.clone();
                let seqs = seqs.clone();
                let busy = busy.clone();
                tokio::spawn(async move {
                    let event = run_cycle(api.as_ref(), &seqs).await;
                    let _ = events.send(event).await;
                    busy.store(false, Ordering::Release);
                });
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.periodic.take() {
            handle.abort();
            info!("[poller] stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.periodic.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Run one cycle and deliver its event before returning.
    pub async fn poll(&self) {
        let event = run_cycle(self.api.as_ref(), &self.seqs).await;
        let _ = self.events.send(event).await;
    }

    /// Spawn one extra cycle outside the timer.
    pub fn poll_now(&self) {
        let api = self.api.clone();
        let events = self.events.clone();
        let seqs = self.seqs.clone();
        tokio::spawn(async move {
            let event = run_cycle(api.as_ref(), &seqs).await;
            let _ = events.send(event).await;
        });
    }

    /// Fetch only the file list. Failures are logged, nothing is sent.
    pub async fn refresh_files(&self) {
        if let Some(files) = fetch_files(self.api.as_ref(), &self.seqs).await {
            let _ = self.events.send(PollEvent::Files(files)).await;
        }
    }

    pub fn refresh_files_now(&self) {
        let api = self.api.clone();
        let events = self.events.clone();
        let seqs = self.seqs.clone();
        tokio::spawn(async move {
            if let Some(files) = fetch_files(api.as_ref(), &seqs).await {
                let _ = events.send(PollEvent::Files(files)).await;
            }
        });
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Status first; the file list only once status has succeeded.
async fn run_cycle(api: &dyn ServerApi, seqs: &Sequencers) -> PollEvent {
    let seq = seqs.queue.issue();
    let queue = match api.queue_status().await {
        Ok(queue) => queue,
        Err(error) => {
            warn!("[poller] status fetch #{} failed: {}", seq, error);
            return PollEvent::StatusFailed { seq, error };
        }
    };
    let files = fetch_files(api, seqs).await;
    PollEvent::Cycle {
        queue: Stamped { seq, value: queue },
        files,
    }
}

async fn fetch_files(api: &dyn ServerApi, seqs: &Sequencers) -> Option<Stamped<FileListSnapshot>> {
    let seq = seqs.files.issue();
    match api.downloaded_files().await {
        Ok(value) => Some(Stamped { seq, value }),
        Err(e) => {
            warn!("[poller] file list fetch #{} failed: {}", seq, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{queue_snapshot, FakeApi};

    fn poller(api: Arc<FakeApi>, interval: Duration) -> (StatusPoller, mpsc::Receiver<PollEvent>) {
        let (tx, rx) = mpsc::channel(64);
        (StatusPoller::new(api, interval, tx), rx)
    }

    #[test]
    fn sequencer_issues_increasing_numbers() {
        let seq = Sequencer::default();
        assert_eq!(seq.latest(), 0);
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert!(seq.is_latest(b));
        assert!(!seq.is_latest(a));
    }

    #[tokio::test]
    async fn poll_emits_one_cycle_with_both_snapshots() {
        let api = FakeApi::new();
        api.script_status(Duration::ZERO, queue_snapshot(&["http://a"], &[], &[]));
        api.set_files(&["x.mp3"]);
        let (poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.poll().await;

        match rx.recv().await.unwrap() {
            PollEvent::Cycle { queue, files } => {
                assert_eq!(queue.seq, 1);
                assert_eq!(queue.value.downloading.len(), 1);
                let files = files.unwrap();
                assert_eq!(files.value.files, vec!["x.mp3"]);
                assert_eq!(files.value.mp3_count, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn status_failure_skips_file_fetch() {
        let api = FakeApi::new();
        api.state().status_fallback = Err(ClientError::Server {
            path: "/api/status".into(),
            status: 500,
            message: None,
        });
        let (poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.poll().await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            PollEvent::StatusFailed { seq: 1, .. }
        ));
        assert_eq!(api.state().files_calls, 0);
    }

    #[tokio::test]
    async fn file_failure_still_delivers_queue() {
        let api = FakeApi::new();
        api.state().files_fallback = Err(ClientError::Transport {
            path: "/api/downloaded_files".into(),
            detail: "connection refused".into(),
        });
        let (poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.poll().await;

        match rx.recv().await.unwrap() {
            PollEvent::Cycle { files, .. } => assert!(files.is_none()),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn refresh_files_fetches_file_list_only() {
        let api = FakeApi::new();
        api.set_files(&["a.mp3", "b.ogg"]);
        let (poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.refresh_files().await;

        match rx.recv().await.unwrap() {
            PollEvent::Files(files) => assert_eq!(files.value.files.len(), 2),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(api.state().status_calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_polls_immediately_then_every_interval() {
        let api = FakeApi::new();
        let (mut poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.start();
        assert!(poller.is_running());
        rx.recv().await.unwrap();
        assert_eq!(api.state().status_calls, 1);

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(api.state().status_calls, 1);

        rx.recv().await.unwrap();
        assert_eq!(api.state().status_calls, 2);

        poller.stop();
        assert!(!poller.is_running());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(api.state().status_calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_periodic_poll_suppresses_overlapping_ticks() {
        let api = FakeApi::new();
        // First answer takes longer than two intervals.
        api.script_status(Duration::from_secs(7), queue_snapshot(&[], &["slow"], &[]));
        let (mut poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.start();
        let first = rx.recv().await.unwrap();
        match first {
            PollEvent::Cycle { queue, .. } => {
                assert_eq!(queue.seq, 1);
                assert_eq!(queue.value.queued[0].url(), "slow");
            }
            other => panic!("unexpected event {:?}", other),
        }
        // Ticks at 3s and 6s found the first poll busy and were skipped.
        assert_eq!(api.state().status_calls, 1);

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, PollEvent::Cycle { ref queue, .. } if queue.seq == 2));
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_on_demand_polls_stamp_in_issue_order() {
        let api = FakeApi::new();
        api.script_status(Duration::from_secs(2), queue_snapshot(&["old"], &[], &[]));
        api.script_status(Duration::ZERO, queue_snapshot(&["new"], &[], &[]));
        let (poller, mut rx) = poller(api.clone(), Duration::from_secs(3));

        poller.poll_now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        poller.poll_now();

        // The newer request completes first.
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        let seqs = poller.sequencers();
        match (first, second) {
            (PollEvent::Cycle { queue: a, .. }, PollEvent::Cycle { queue: b, .. }) => {
                assert_eq!(a.value.downloading[0].url(), "new");
                assert!(seqs.queue.is_latest(a.seq));
                assert_eq!(b.value.downloading[0].url(), "old");
                assert!(!seqs.queue.is_latest(b.seq));
            }
            other => panic!("unexpected events {:?}", other),
        }
    }
}
