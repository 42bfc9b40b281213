//! Client-side substring filter over an already-rendered list.

use crate::view::ListView;

/// Case-insensitive substring filter. The text persists across re-renders;
/// call `apply` again after every render of the filtered list.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: &str) {
        self.needle = text.to_lowercase();
    }

    pub fn text(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, text: &str) -> bool {
        self.needle.is_empty() || text.to_lowercase().contains(&self.needle)
    }

    /// Toggle row visibility. Rows are never removed, and the cursor stays
    /// on the same row while it remains visible.
    pub fn apply(&self, list: &mut ListView) {
        let anchor = list.selection_anchor();
        for row in list.rows_mut() {
            // "None" reports an empty list, not a match, so it stays visible.
            row.hidden = !row.is_placeholder() && !self.matches(&row.text);
        }
        list.restore_selection(anchor.as_deref());
    }
}
