//! # Menu items and their collaborators
//!
//! The engine never looks inside an item's action payload. Enumerating
//! items and carrying out their actions is delegated to an [`ItemSource`]
//! and an [`ActionHandler`]; the engine only needs a label to draw and an
//! [`ActionOutcome`] to report.

use anyhow::Result;
use serde_json::Value;

/// One selectable entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub label: String,
    /// Dimmed text drawn after the label (a class, a target, a hint).
    pub secondary: Option<String>,
    /// Opaque to the engine; interpreted by the [`ActionHandler`].
    pub action: Value,
}

impl Item {
    pub fn new(label: impl Into<String>, action: Value) -> Self {
        Self {
            label: label.into(),
            secondary: None,
            action,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }
}

/// Result of applying an item's action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    /// End the session once the outcome has been recorded.
    pub quit: bool,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            quit: false,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            success: true,
            message: String::new(),
            quit: true,
        }
    }
}

/// Produces the item list, at session start and again on every rescan.
pub trait ItemSource {
    /// Title drawn at the top of the box.
    fn title(&self) -> &str;

    fn enumerate(&mut self) -> Result<Vec<Item>>;
}

/// Carries out item actions and describes what they would do.
pub trait ActionHandler {
    fn apply(&mut self, item: &Item) -> ActionOutcome;

    /// Lines for the preview area while `item` is selected.
    fn preview(&self, _item: &Item) -> Vec<String> {
        Vec::new()
    }
}
