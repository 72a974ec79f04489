//! # UI Module
//!
//! The terminal menu engine: a bordered list box with a preview area and a
//! status row, driven by keyboard and SGR mouse input.
//!
//! ## Components
//!
//! - [`MenuModel`] - items, selection, scroll position, status
//! - [`mod@render`] - composes a [`RenderFrame`] for the current state
//! - [`mod@input`] - decodes raw terminal bytes into [`InputEvent`]s
//! - [`Session`] - the draw / read / dispatch loop
//! - [`TerminalGuard`] - raw mode, alternate screen and mouse reporting
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────┐   row 1
//! │            Title             │   row 2
//! ├──────────────────────────────┤   row 3
//! │ ▸ first item   secondary     │   row 4  (header offset)
//! │   second item                │
//! │   ...                        │   page_size rows
//! │ ↑ 0  ↓ 12               1/22 │   only when the list overflows
//! ├──────────────────────────────┤
//! │ preview                      │   preview_rows rows
//! │ ✔ [12:04:31] status          │
//! └──────────────────────────────┘
//!  ↑↓/jk move · ... · q quit         footer
//! ```

pub mod ansi;
pub mod app;
pub mod config;
pub mod input;
pub mod item;
pub mod render;
pub mod session;
pub mod terminal;
pub mod theme;
pub mod viewport;

pub use app::{EdgePolicy, MenuModel, StatusKind};
pub use config::Config;
pub use input::{InputDecoder, InputEvent, NamedKey, StdinBytes};
pub use item::{ActionHandler, ActionOutcome, Item, ItemSource};
pub use render::{render, Layout, RenderFrame};
pub use session::{Dispatch, Session};
pub use terminal::TerminalGuard;
pub use theme::Theme;
