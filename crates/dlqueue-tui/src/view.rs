//! Retained view nodes: the rows a list pane shows.
//!
//! A `ListView` is the container the renderer writes into and the filter
//! toggles. It holds no terminal state, so the whole reconcile path can run
//! without a terminal.

/// Which list a row belongs to; drives its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemClass {
    Downloading,
    Queued,
    Completed,
    Failed,
    Downloaded,
    Placeholder,
}

/// A per-row action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Play,
    Delete,
}

impl ControlKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Delete => "Delete",
        }
    }
}

/// A control tagged with the filename it acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub kind: ControlKind,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Primary text; also what the filter matches against.
    pub text: String,
    /// Subordinate text shown after the primary text (failure reason).
    pub detail: Option<String>,
    pub class: ItemClass,
    pub controls: Vec<Control>,
    pub hidden: bool,
}

impl Row {
    pub fn new(text: impl Into<String>, class: ItemClass) -> Self {
        Self {
            text: text.into(),
            detail: None,
            class,
            controls: Vec::new(),
            hidden: false,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_control(mut self, kind: ControlKind, tag: impl Into<String>) -> Self {
        self.controls.push(Control {
            kind,
            tag: tag.into(),
        });
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.class == ItemClass::Placeholder
    }

    pub fn control(&self, kind: ControlKind) -> Option<&Control> {
        self.controls.iter().find(|c| c.kind == kind)
    }
}

/// An ordered list of rows with a cursor over the visible ones.
///
/// `selected` and `scroll_offset` index into the *visible* rows, so hiding
/// rows never leaves the cursor on something the user can't see.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    rows: Vec<Row>,
    selected: usize,
    scroll_offset: usize,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every row. The cursor position is kept; callers re-anchor it with
    /// `restore_selection` once the new rows are in.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Primary text of every row, hidden ones included.
    pub fn texts(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.hidden)
    }

    pub fn visible_len(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.visible_rows().nth(self.selected)
    }

    /// Text of the selected row, used to find it again after the rows change.
    /// The placeholder is never an anchor.
    pub fn selection_anchor(&self) -> Option<String> {
        self.selected_row()
            .filter(|row| !row.is_placeholder())
            .map(|row| row.text.clone())
    }

    /// Put the cursor back on the visible row whose text is `anchor`.
    /// Falls back to clamping the old position when that row is gone.
    pub fn restore_selection(&mut self, anchor: Option<&str>) {
        let found = anchor.and_then(|text| self.visible_rows().position(|row| row.text == text));
        if let Some(index) = found {
            self.selected = index;
        }
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + n).min(len - 1);
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_len().saturating_sub(1);
    }

    /// Adjust the scroll window so the cursor is inside `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Visible rows inside the current scroll window, paired with their
    /// position among the visible rows.
    pub fn window(&self, height: usize) -> Vec<(usize, &Row)> {
        self.visible_rows()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .collect()
    }

    /// The tag of `kind` on the selected row.
    pub fn selected_tag(&self, kind: ControlKind) -> Option<&str> {
        self.selected_row()?.control(kind).map(|c| c.tag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(names: &[&str]) -> ListView {
        let mut list = ListView::new();
        for name in names {
            list.push(
                Row::new(*name, ItemClass::Downloaded)
                    .with_control(ControlKind::Play, *name)
                    .with_control(ControlKind::Delete, *name),
            );
        }
        list
    }

    #[test]
    fn cursor_walks_visible_rows_only() {
        let mut list = list_of(&["a", "b", "c"]);
        list.rows_mut()[1].hidden = true;

        list.select_down(1);
        assert_eq!(list.selected_row().unwrap().text, "c");
        list.select_down(5);
        assert_eq!(list.selected(), 1);
        list.select_up(9);
        assert_eq!(list.selected_row().unwrap().text, "a");
    }

    #[test]
    fn clamp_after_rows_shrink() {
        let mut list = list_of(&["a", "b", "c"]);
        list.select_last();
        list.clear();
        list.push(Row::new("only", ItemClass::Downloaded));
        list.clamp_selection();
        assert_eq!(list.selected(), 0);
        assert_eq!(list.selected_row().unwrap().text, "only");
    }

    #[test]
    fn cursor_follows_row_when_rows_shift() {
        let mut list = list_of(&["b.mp3", "a.mp3"]);
        list.select_down(1);
        let anchor = list.selection_anchor();

        list.clear();
        for row in list_of(&["c.mp3", "b.mp3", "a.mp3"]).rows() {
            list.push(row.clone());
        }
        list.restore_selection(anchor.as_deref());

        assert_eq!(list.selected(), 2);
        assert_eq!(list.selected_tag(ControlKind::Play), Some("a.mp3"));
    }

    #[test]
    fn missing_anchor_clamps_old_position() {
        let mut list = list_of(&["a", "b", "c"]);
        list.select_last();
        let anchor = list.selection_anchor();

        list.clear();
        for row in list_of(&["a", "b"]).rows() {
            list.push(row.clone());
        }
        list.restore_selection(anchor.as_deref());
        assert_eq!(list.selected_row().unwrap().text, "b");
    }

    #[test]
    fn selected_tag_reads_control() {
        let mut list = list_of(&["x.mp3", "y.mp3"]);
        list.select_down(1);
        assert_eq!(list.selected_tag(ControlKind::Delete), Some("y.mp3"));

        let mut plain = ListView::new();
        plain.push(Row::new("http://q", ItemClass::Queued));
        assert_eq!(plain.selected_tag(ControlKind::Play), None);
    }

    #[test]
    fn window_follows_cursor() {
        let mut list = list_of(&["a", "b", "c", "d", "e"]);
        list.select_down(3);
        list.ensure_visible(2);
        let shown: Vec<&str> = list.window(2).iter().map(|(_, r)| r.text.as_str()).collect();
        assert_eq!(shown, vec!["c", "d"]);
    }
}
