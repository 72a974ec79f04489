//! boxmenu - a keyboard- and mouse-driven list menu for the terminal
//!
//! The [`ui`] module is a self-contained menu engine that works with any
//! [`ui::ItemSource`] and [`ui::ActionHandler`]. The [`catalog`] and
//! [`history`] modules provide the JSON catalog those traits are
//! implemented for in the `boxmenu` binary.

pub mod catalog;
pub mod history;
pub mod ui;
