//! # Viewport
//!
//! Pure scroll-window arithmetic. The list shows at most `page_size` items;
//! `scroll_offset` is the index of the first visible one. After every
//! selection change [`recompute_scroll`] must run before the next draw so
//! the selected item is always inside the window.

use std::ops::Range;

/// Scroll position of the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub scroll_offset: usize,
    pub page_size: usize,
}

impl ViewportState {
    /// A viewport at the top of the list. A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            scroll_offset: 0,
            page_size: page_size.max(1),
        }
    }

    /// Re-anchor the window around `selected` for a list of `item_count`.
    pub fn follow(&mut self, selected: usize, item_count: usize) {
        self.scroll_offset =
            recompute_scroll(selected, self.scroll_offset, item_count, self.page_size);
    }

    /// Indices currently on screen.
    pub fn visible(&self, item_count: usize) -> Range<usize> {
        visible_range(self.scroll_offset, item_count, self.page_size)
    }
}

/// Clamp a selection into `[0, item_count)`, or 0 for an empty list.
pub fn clamp_selection(selected: isize, item_count: usize) -> usize {
    if item_count == 0 || selected <= 0 {
        return 0;
    }
    (selected as usize).min(item_count - 1)
}

/// Scroll offset that keeps `selected` visible, starting from `scroll_offset`.
pub fn recompute_scroll(
    selected: usize,
    scroll_offset: usize,
    item_count: usize,
    page_size: usize,
) -> usize {
    let page_size = page_size.max(1);
    let mut offset = scroll_offset;

    if selected < offset {
        offset = selected;
    } else if selected >= offset.saturating_add(page_size) {
        offset = selected + 1 - page_size;
    }

    offset.min(item_count.saturating_sub(page_size))
}

/// Half-open range of indices inside the window.
pub fn visible_range(scroll_offset: usize, item_count: usize, page_size: usize) -> Range<usize> {
    let start = scroll_offset.min(item_count);
    start..scroll_offset.saturating_add(page_size).min(item_count)
}
