//! # Catalog Module
//!
//! Everything the menu engine treats as opaque: where items come from and
//! what activating one does.
//!
//! ## Catalog file
//!
//! ```json
//! {
//!   "title": "Window rules",
//!   "items": [
//!     {
//!       "label": "Firefox",
//!       "detail": "float",
//!       "action": { "type": "append", "path": "~/rules.conf", "text": "windowrule = float, firefox" }
//!     }
//!   ]
//! }
//! ```
//!
//! ## Actions
//!
//! | `type`    | Fields         | Effect                                        |
//! |-----------|----------------|-----------------------------------------------|
//! | `append`  | `path`, `text` | append `text` and a newline to `path`         |
//! | `copy`    | `text`         | pipe `text` to the clipboard command          |
//! | `command` | `run`          | `sh -c run`, output captured                  |
//! | `quit`    |                | end the session                               |

mod actions;
mod source;

pub use actions::{expand_home, find_in_path, ActionSpec, CatalogActions};
pub use source::{load_catalog, parse_catalog, CatalogEntry, CatalogFile, CatalogSource};
