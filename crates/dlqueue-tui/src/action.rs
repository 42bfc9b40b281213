//! User intents and the side effects they ask the shell to perform.

/// The two panes that take keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    UrlInput,
    Files,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Self::UrlInput => Self::Files,
            Self::Files => Self::UrlInput,
        }
    }
}

/// Queue buckets in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Downloading,
    Queued,
    Completed,
    Failed,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Downloading,
        Bucket::Queued,
        Bucket::Completed,
        Bucket::Failed,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Downloading => "Downloading",
            Self::Queued => "Queued",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// Produced by key handling, consumed by `Dashboard::apply_action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FocusNext,
    Submit,
    SelectUp,
    SelectDown,
    Play,
    Delete,
    /// Answer to the delete confirmation.
    Confirm(bool),
    OpenFilter,
    FilterChanged(String),
    /// Close the filter bar, keeping the current text.
    KeepFilter,
    /// Close the filter bar and clear the text.
    CancelFilter,
    StopPlayback,
    Refresh,
    Quit,
}

/// Work the dashboard cannot do itself: network calls and the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit(String),
    PollNow,
    RefreshFiles,
    Delete(String),
    Play(String),
    StopPlayback,
    Quit,
}
