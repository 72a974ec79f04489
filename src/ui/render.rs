use crate::ui::ansi::{
    center, fit_to_width, pad_to_width, printable, strip_escapes, visual_length,
};
use crate::ui::app::{MenuModel, StatusKind};
use crate::ui::item::Item;
use crate::ui::theme::Theme;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

const FOOTER_HELP: &str =
    "↑↓/jk move · PgUp/PgDn page · Home/End · Enter apply · r rescan · q quit";

/// Box geometry shared by the renderer and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Columns between the left and right border.
    pub inner_width: usize,
    /// Item rows in the list area.
    pub page_size: usize,
    /// Rows of preview text above the status row.
    pub preview_rows: usize,
}

impl Layout {
    /// Top border, title and separator.
    pub const HEADER_ROWS: usize = 3;

    /// 1-based screen row of the first list row.
    pub fn header_offset(&self) -> usize {
        Self::HEADER_ROWS + 1
    }

    /// Total rows drawn for a list of `item_count` items, footer included.
    pub fn frame_height(&self, item_count: usize) -> usize {
        let indicator = usize::from(item_count > self.page_size);
        Self::HEADER_ROWS + self.page_size + indicator + 1 + self.preview_rows + 1 + 1 + 1
    }
}

/// One drawn frame: every line is exactly `inner_width + 2` columns wide,
/// except the footer below the box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    lines: Vec<String>,
}

impl RenderFrame {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Overwrite the screen from the top-left corner.
    ///
    /// Each line clears whatever is left of the previous frame to its right,
    /// and everything below the frame is cleared once at the end, so the
    /// screen is never blanked between frames.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, MoveTo(0, 0))?;
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                queue!(out, Print("\r\n"))?;
            }
            queue!(out, Print(line), Clear(ClearType::UntilNewLine))?;
        }
        queue!(out, Clear(ClearType::FromCursorDown))?;
        out.flush()
    }
}

/// Compose the frame for the current model state.
pub fn render(model: &MenuModel, layout: &Layout, theme: &Theme, preview: &[String]) -> RenderFrame {
    let w = layout.inner_width;
    let count = model.item_count();
    let viewport = model.viewport();
    let visible = viewport.visible(count);
    let mut lines = Vec::with_capacity(layout.frame_height(count));

    let rule = "─".repeat(w);
    let boxed = |content: &str| {
        let bar = "│".with(theme.border);
        format!("{}{}{}", bar, pad_to_width(content, w), bar)
    };

    lines.push(format!("┌{}┐", rule).with(theme.border).to_string());
    let title = fit_to_width(&printable(model.title()), w.saturating_sub(2));
    lines.push(boxed(&center(
        &title.as_str().with(theme.title).bold().to_string(),
        w,
    )));
    lines.push(format!("├{}┤", rule).with(theme.border).to_string());

    for slot in 0..layout.page_size {
        let index = visible.start + slot;
        let content = match model.items().get(index) {
            Some(item) => item_line(item, index == model.selected_index(), w, theme),
            _ if count == 0 && slot == 0 => "   (no items)".with(theme.fg_dim).to_string(),
            _ => String::new(),
        };
        lines.push(boxed(&content));
    }

    if count > layout.page_size {
        let above = visible.start;
        let below = count - visible.end;
        let left = format!(" ↑ {}  ↓ {}", above, below);
        let right = format!("{}/{} ", model.selected_index() + 1, count);
        let gap = w.saturating_sub(visual_length(&left) + visual_length(&right));
        let indicator = fit_to_width(&format!("{}{}{}", left, " ".repeat(gap), right), w);
        lines.push(boxed(&indicator.as_str().with(theme.fg_dim).to_string()));
    }

    lines.push(format!("├{}┤", rule).with(theme.border).to_string());

    for row in 0..layout.preview_rows {
        let text = preview
            .get(row)
            .map(|line| format!(" {}", fit_to_width(&printable(line), w.saturating_sub(2))))
            .unwrap_or_default();
        lines.push(boxed(&text));
    }
    lines.push(boxed(&status_line(model, w, theme)));

    lines.push(format!("└{}┘", rule).with(theme.border).to_string());
    lines.push(
        fit_to_width(FOOTER_HELP, w + 2)
            .as_str()
            .with(theme.fg_dim)
            .to_string(),
    );

    RenderFrame { lines }
}

fn item_line(item: &Item, selected: bool, w: usize, theme: &Theme) -> String {
    // " ▸ " in front, one column of breathing room at the end
    let avail = w.saturating_sub(4);
    let label = fit_to_width(&printable(&item.label), avail);
    let room = avail.saturating_sub(visual_length(&label) + 2);
    let secondary = item
        .secondary
        .as_deref()
        .filter(|_| room >= 3)
        .map(|s| fit_to_width(&printable(s), room));

    if selected {
        // Inner resets would cut the highlight short, so the row is plain
        // text styled as a whole.
        let mut text = format!(" ▸ {}", strip_escapes(&label));
        if let Some(secondary) = secondary {
            text.push_str("  ");
            text.push_str(&strip_escapes(&secondary));
        }
        pad_to_width(&text, w)
            .with(theme.highlight_fg)
            .on(theme.highlight_bg)
            .bold()
            .to_string()
    } else {
        let mut text = format!("   {}", label.as_str().with(theme.fg));
        if let Some(secondary) = secondary {
            text.push_str("  ");
            text.push_str(&secondary.as_str().with(theme.fg_dim).to_string());
        }
        text
    }
}

fn status_line(model: &MenuModel, w: usize, theme: &Theme) -> String {
    let avail = w.saturating_sub(2);
    match &model.status {
        Some(status) => {
            let (icon, color) = match status.kind {
                StatusKind::Success => ("✔", theme.success),
                StatusKind::Error => ("✖", theme.error),
                StatusKind::Info => ("•", theme.fg),
            };
            let text = format!(
                "{} [{}] {}",
                icon,
                status.at.format("%H:%M:%S"),
                printable(first_line(&status.message))
            );
            format!(" {}", fit_to_width(&text, avail).with(color))
        }
        None => {
            let text = format!("{} items", model.item_count());
            format!(" {}", text.with(theme.fg_dim))
        }
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
