use crate::model::{AppRecord, SortOrder};
use crate::presentation::AppList;

/// Terminal lines taken by one list row.
pub const ROW_HEIGHT: u16 = 2;

pub struct UiState {
    pub apps: AppList,
    pub sort_order: SortOrder,
    pub selected: usize,
    pub scroll_offset: usize,
    /// Rows that fit in the list viewport, updated from the terminal size every frame.
    pub viewport_rows: usize,
    pub scanning: bool,
    pub loaded_once: bool,
    pub show_help: bool,
    pub info: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            apps: AppList::default(),
            sort_order: SortOrder::default(),
            selected: 0,
            scroll_offset: 0,
            viewport_rows: 10,
            scanning: false,
            loaded_once: false,
            show_help: false,
            info: String::new(),
        }
    }
}

impl UiState {
    pub fn selected_app(&self) -> Option<&AppRecord> {
        self.apps.get(self.selected)
    }

    /// Replace the list with a fresh discovery pass, keeping the highlight on the
    /// same identifier when it is still present.
    pub fn apply_apps(&mut self, apps: Vec<AppRecord>) {
        let keep = self.selected_app().map(|a| a.identifier.clone());
        self.apps = AppList::new(apps, self.sort_order);
        self.scanning = false;
        self.loaded_once = true;

        self.selected = keep
            .and_then(|id| self.apps.rows().iter().position(|a| a.identifier == id))
            .unwrap_or(0);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.apps.is_empty() {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }
        self.selected = self.selected.min(self.apps.len() - 1);
        self.ensure_visible();
    }

    /// Adjust the scroll offset so the highlighted row is inside the viewport.
    pub fn ensure_visible(&mut self) {
        let rows = self.viewport_rows.max(1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + rows {
            self.scroll_offset = self.selected + 1 - rows;
        }
        let max_offset = self.apps.len().saturating_sub(rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_visible();
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.apps.len() {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    pub fn page_down(&mut self) {
        if self.apps.is_empty() {
            return;
        }
        self.selected = (self.selected + self.viewport_rows.max(1)).min(self.apps.len() - 1);
        self.ensure_visible();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.viewport_rows.max(1));
        self.ensure_visible();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.ensure_visible();
    }

    pub fn select_last(&mut self) {
        self.selected = self.apps.len().saturating_sub(1);
        self.ensure_visible();
    }

    /// Row index under a line offset measured from the top of the list viewport.
    pub fn row_at(&self, line: u16) -> Option<usize> {
        let row = usize::from(line / ROW_HEIGHT);
        let index = self.scroll_offset + row;
        (index < self.apps.len() && row < self.viewport_rows).then_some(index)
    }
}
