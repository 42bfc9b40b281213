//! Turns snapshot buckets into `ListView` rows.

use dlqueue_proto::protocol::{FailureRecord, QueueEntry};

use crate::view::{ControlKind, ItemClass, ListView, Row};

/// Text of the single row shown for an empty list.
pub const PLACEHOLDER: &str = "None";

/// Prefix the server puts in front of failure reasons.
pub const FAILED_PREFIX: &str = "failed: ";

/// One thing to render. The shape decides the row layout, not the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderItem {
    Plain(String),
    Failure(FailureRecord),
    /// A downloaded file with Play and Delete controls.
    Playable(String),
}

impl From<QueueEntry> for RenderItem {
    fn from(entry: QueueEntry) -> Self {
        match entry {
            QueueEntry::Url(url) => Self::Plain(url),
            QueueEntry::Failed(record) => Self::Failure(record),
        }
    }
}

/// Strip one leading `"failed: "`. Any other prefix is left alone.
pub fn strip_failure_prefix(error: &str) -> &str {
    error.strip_prefix(FAILED_PREFIX).unwrap_or(error)
}

/// Replace the contents of `container` with `items`.
/// The cursor stays on the same row text when that row is still there.
pub fn render(container: &mut ListView, items: &[RenderItem], class: ItemClass) {
    let anchor = container.selection_anchor();
    container.clear();

    if items.is_empty() {
        container.push(Row::new(PLACEHOLDER, ItemClass::Placeholder));
        container.clamp_selection();
        return;
    }

    for item in items {
        let row = match item {
            RenderItem::Plain(text) => Row::new(text.as_str(), class),
            RenderItem::Failure(record) => Row::new(record.url.as_str(), class)
                .with_detail(strip_failure_prefix(&record.error)),
            RenderItem::Playable(filename) => Row::new(filename.as_str(), class)
                .with_control(ControlKind::Play, filename.as_str())
                .with_control(ControlKind::Delete, filename.as_str()),
        };
        container.push(row);
    }
    container.restore_selection(anchor.as_deref());
}

/// Render a queue bucket, converting each wire entry by its shape.
pub fn render_entries(container: &mut ListView, entries: &[QueueEntry], class: ItemClass) {
    let items: Vec<RenderItem> = entries.iter().cloned().map(RenderItem::from).collect();
    render(container, &items, class);
}

/// Render the downloaded-files list.
pub fn render_files(container: &mut ListView, files: &[String]) {
    let items: Vec<RenderItem> = files.iter().cloned().map(RenderItem::Playable).collect();
    render(container, &items, ItemClass::Downloaded);
}
