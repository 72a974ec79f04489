use crate::ui::item::{ActionHandler, ActionOutcome, Item};
use crate::ui::viewport::{clamp_selection, ViewportState};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// What happens when relative movement runs past either end of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Stop at the first/last item.
    #[default]
    Clamp,
    /// Continue from the other end.
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// The message shown in the status row.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub kind: StatusKind,
    pub message: String,
    pub at: DateTime<Local>,
}

impl SessionStatus {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Local::now(),
        }
    }
}

/// Items, selection and scroll position for one session.
///
/// Every operation that moves the selection re-anchors the viewport before
/// returning, so the selected item is always inside the visible window.
#[derive(Debug, Clone)]
pub struct MenuModel {
    title: String,
    items: Vec<Item>,
    selected_index: usize,
    viewport: ViewportState,
    edge_policy: EdgePolicy,
    pub status: Option<SessionStatus>,
}

impl MenuModel {
    pub fn new(
        title: impl Into<String>,
        items: Vec<Item>,
        page_size: usize,
        edge_policy: EdgePolicy,
    ) -> Self {
        Self {
            title: title.into(),
            items,
            selected_index: 0,
            viewport: ViewportState::new(page_size),
            edge_policy,
            status: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.selected_index)
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Resize the list window, keeping the selection visible.
    pub fn set_page_size(&mut self, page_size: usize) {
        let scroll_offset = self.viewport.scroll_offset;
        self.viewport = ViewportState::new(page_size);
        self.viewport.scroll_offset = scroll_offset;
        self.viewport.follow(self.selected_index, self.items.len());
    }

    /// Swap in a freshly enumerated list, keeping the selection index where
    /// the new list allows it.
    pub fn replace_items(&mut self, title: impl Into<String>, items: Vec<Item>) {
        self.title = title.into();
        self.items = items;
        self.set_selected(self.selected_index as isize);
    }

    /// Move by `delta` items under the configured edge policy. Returns
    /// whether the selection changed.
    pub fn move_relative(&mut self, delta: isize) -> bool {
        self.move_with_policy(delta, self.edge_policy)
    }

    /// Move a page up (`-1`) or down (`1`). Never wraps.
    pub fn move_page(&mut self, direction: isize) -> bool {
        let page = isize::try_from(self.viewport.page_size).unwrap_or(isize::MAX);
        let delta = direction.saturating_mul(page);
        self.move_with_policy(delta, EdgePolicy::Clamp)
    }

    /// Mouse wheel movement. Never wraps.
    pub fn scroll_wheel(&mut self, delta: isize) -> bool {
        self.move_with_policy(delta, EdgePolicy::Clamp)
    }

    /// Jump to the first or last item.
    pub fn move_to_edge(&mut self, is_end: bool) -> bool {
        let before = self.selected_index;
        let target = if is_end {
            self.items.len() as isize - 1
        } else {
            0
        };
        self.set_selected(target);
        before != self.selected_index
    }

    /// Select the item drawn on 1-based screen `visual_row`, where the first
    /// list row is `header_offset`. Rows outside the list area, and list
    /// rows without an item, select nothing.
    pub fn select_at(&mut self, visual_row: usize, header_offset: usize) -> Option<usize> {
        let slot = visual_row.checked_sub(header_offset)?;
        if slot >= self.viewport.page_size {
            return None;
        }
        let candidate = slot + self.viewport.scroll_offset;
        if candidate >= self.items.len() {
            return None;
        }
        self.set_selected(candidate as isize);
        Some(candidate)
    }

    /// Apply the selected item's action and record the outcome as the
    /// session status. Does nothing on an empty list.
    pub fn activate(&mut self, handler: &mut dyn ActionHandler) -> Option<ActionOutcome> {
        let item = self.items.get(self.selected_index)?;
        let outcome = handler.apply(item);
        if outcome.success {
            log::info!("applied '{}': {}", item.label, outcome.message);
        } else {
            log::warn!("action for '{}' failed: {}", item.label, outcome.message);
        }
        if !outcome.message.is_empty() {
            let kind = if outcome.success {
                StatusKind::Success
            } else {
                StatusKind::Error
            };
            self.set_status(kind, outcome.message.clone());
        }
        Some(outcome)
    }

    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some(SessionStatus::new(kind, message));
    }

    fn move_with_policy(&mut self, delta: isize, policy: EdgePolicy) -> bool {
        let count = self.items.len();
        if count == 0 {
            return false;
        }
        let before = self.selected_index;
        let target = (self.selected_index as isize).saturating_add(delta);
        match policy {
            EdgePolicy::Clamp => self.set_selected(target),
            EdgePolicy::Wrap => self.set_selected(target.rem_euclid(count as isize)),
        }
        before != self.selected_index
    }

    fn set_selected(&mut self, index: isize) {
        self.selected_index = clamp_selection(index, self.items.len());
        self.viewport.follow(self.selected_index, self.items.len());
    }
}
