//! # Activation History Module
//!
//! Remembers how often each catalog item has been applied and when, so the
//! preview area can show it.
//!
//! ## Storage
//!
//! History is stored in XDG-compliant locations:
//! - Linux: `~/.local/share/boxmenu/history/`
//! - macOS: `~/Library/Application Support/boxmenu/history/`
//! - Windows: `%APPDATA%\boxmenu\history\`
//!
//! Each catalog has its own history file, keyed by a hash of the catalog path.
//!
//! ## Data Format
//!
//! ```json
//! {
//!   "catalog_path": "/home/user/.config/boxmenu/menu.json",
//!   "entries": {
//!     "Firefox": {
//!       "label": "Firefox",
//!       "count": 3,
//!       "last_used": "2026-02-05T10:30:00Z"
//!     }
//!   }
//! }
//! ```

mod storage;

pub use storage::{ActivationHistory, CatalogHistory, HistoryEntry};
