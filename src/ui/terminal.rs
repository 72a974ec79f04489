//! # Terminal ownership
//!
//! [`TerminalGuard`] puts the terminal into the state the menu needs (raw
//! input, alternate screen, hidden cursor, SGR mouse reporting) and puts it
//! back when dropped.
//!
//! Restoration is reachable from three places, all funnelled through
//! [`restore_terminal`]:
//!
//! - the guard's `Drop` (normal quit, or an error propagated with `?`)
//! - a panic hook (the hook runs before unwinding reaches the guard)
//! - a SIGINT/SIGTERM/SIGHUP handler, which restores and exits with 130
//!
//! The hooks are installed before the terminal is touched, and a
//! process-wide latch makes sure the restore sequence is emitted once.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    Command,
};
use std::fmt;
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

/// Set while the terminal is in menu mode and still needs restoring.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);
static HOOKS: Once = Once::new();

/// Exit status used when a signal ends the session.
const SIGNAL_EXIT_CODE: i32 = 130;

/// Report button presses, drags and wheel as SGR (`ESC [ < b ; x ; y M`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableMouseReporting;

impl Command for EnableMouseReporting {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[?1000h\x1b[?1002h\x1b[?1006h")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Undo [`EnableMouseReporting`], in reverse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisableMouseReporting;

impl Command for DisableMouseReporting {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[?1006l\x1b[?1002l\x1b[?1000l")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Holds the terminal in menu mode for as long as it lives.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enter menu mode. On failure whatever was already changed is undone
    /// before the error is returned.
    pub fn acquire() -> Result<Self> {
        install_restore_hooks();
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
        // From here on, dropping `guard` (including via `?`) restores.
        let guard = Self { _private: () };

        enable_raw_mode().context("Failed to enable raw mode for terminal")?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            Hide,
            EnableMouseReporting
        )
        .context("Failed to setup terminal")?;

        log::info!("terminal acquired");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if restore_terminal() {
            log::info!("terminal restored");
        }
    }
}

/// Leave menu mode if it is active. Returns whether anything was restored.
///
/// Every step is attempted even if an earlier one fails.
pub fn restore_terminal() -> bool {
    if !TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
        return false;
    }
    let _ = execute!(
        io::stdout(),
        DisableMouseReporting,
        LeaveAlternateScreen,
        Show
    );
    let _ = disable_raw_mode();
    true
}

fn install_restore_hooks() {
    HOOKS.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            restore_terminal();
            original_hook(panic_info);
        }));

        // Raw mode turns Ctrl+C into a plain byte, so this mostly catches
        // SIGTERM/SIGHUP sent from outside.
        if let Err(e) = ctrlc::set_handler(|| {
            if restore_terminal() {
                log::warn!("terminated by signal, terminal restored");
            }
            std::process::exit(SIGNAL_EXIT_CODE);
        }) {
            log::warn!("Could not install signal handler: {}", e);
        }
    });
}
