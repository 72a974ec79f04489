//! # Catalog Actions
//!
//! Interprets the `action` payload of catalog items. The payload is decoded
//! on every activation, so a malformed action only fails when it is used and
//! the failure is reported in the status row instead of ending the session.
//!
//! `command` actions run with stdin closed and their output captured: the
//! menu owns the terminal while it is open.

use crate::history::ActivationHistory;
use crate::ui::item::{ActionHandler, ActionOutcome, Item};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum ActionSpec {
    /// Append `text` and a newline to the file at `path`.
    Append { path: String, text: String },
    /// Send `text` to the clipboard command's stdin.
    Copy { text: String },
    /// Run `sh -c run`.
    Command { run: String },
    Quit,
}

impl ActionSpec {
    pub fn from_item(item: &Item) -> Result<Self> {
        serde_json::from_value(item.action.clone())
            .with_context(|| format!("Invalid action for '{}'", item.label))
    }
}

/// Carries out catalog actions.
#[derive(Debug)]
pub struct CatalogActions {
    clipboard_command: Vec<String>,
    history: Option<ActivationHistory>,
}

impl CatalogActions {
    pub fn new(clipboard_command: Vec<String>) -> Self {
        Self {
            clipboard_command,
            history: None,
        }
    }

    /// Record successful activations in `history`.
    pub fn with_history(mut self, history: ActivationHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn history(&self) -> Option<&ActivationHistory> {
        self.history.as_ref()
    }

    /// Check that every item's action can run in this environment.
    ///
    /// Malformed payloads are left for activation time.
    pub fn preflight(&self, items: &[Item]) -> Result<()> {
        for item in items {
            match ActionSpec::from_item(item) {
                Ok(ActionSpec::Copy { .. }) => {
                    let program = self
                        .clipboard_command
                        .first()
                        .context("Clipboard command is empty")?;
                    if find_in_path(program).is_none() {
                        anyhow::bail!(
                            "'{}' copies to the clipboard but '{}' was not found in PATH",
                            item.label,
                            program
                        );
                    }
                }
                Ok(ActionSpec::Append { path, .. }) => {
                    let target = expand_home(&path)?;
                    let dir = match target.parent() {
                        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                        _ => PathBuf::from("."),
                    };
                    if !dir.is_dir() {
                        anyhow::bail!(
                            "'{}' appends to {} but directory {} does not exist",
                            item.label,
                            target.display(),
                            dir.display()
                        );
                    }
                }
                Ok(ActionSpec::Command { .. } | ActionSpec::Quit) | Err(_) => {}
            }
        }
        Ok(())
    }

    fn run(&self, spec: &ActionSpec) -> Result<ActionOutcome> {
        match spec {
            ActionSpec::Append { path, text } => {
                let target = expand_home(path)?;
                append_line(&target, text)?;
                Ok(ActionOutcome::ok(format!("Appended to {}", target.display())))
            }
            ActionSpec::Copy { text } => {
                copy_to_clipboard(&self.clipboard_command, text)?;
                Ok(ActionOutcome::ok("Copied to clipboard"))
            }
            ActionSpec::Command { run } => run_command(run),
            ActionSpec::Quit => Ok(ActionOutcome::quit()),
        }
    }
}

impl ActionHandler for CatalogActions {
    fn apply(&mut self, item: &Item) -> ActionOutcome {
        let outcome = match ActionSpec::from_item(item).and_then(|spec| self.run(&spec)) {
            Ok(outcome) => outcome,
            Err(e) => return ActionOutcome::failed(format!("{:#}", e)),
        };

        if outcome.success && !outcome.quit {
            if let Some(history) = self.history.as_mut() {
                if let Err(e) = history.record(&item.label) {
                    log::warn!("Could not record history for '{}': {:#}", item.label, e);
                }
            }
        }
        outcome
    }

    fn preview(&self, item: &Item) -> Vec<String> {
        let mut lines = match ActionSpec::from_item(item) {
            Ok(ActionSpec::Append { path, text }) => {
                vec![format!("+ {}", text), format!("→ {}", path)]
            }
            Ok(ActionSpec::Copy { text }) => vec![format!("⧉ {}", text)],
            Ok(ActionSpec::Command { run }) => vec![format!("$ {}", run)],
            Ok(ActionSpec::Quit) => vec!["Leave the menu".to_string()],
            Err(e) => vec![format!("{:#}", e)],
        };

        if let Some(entry) = self.history.as_ref().and_then(|h| h.entry(&item.label)) {
            lines.push(entry.describe());
        }
        lines
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };
    let dirs = directories::BaseDirs::new().context("Could not determine home directory")?;
    Ok(dirs.home_dir().join(rest))
}

/// Locate `program` the way a shell would: as given if it contains a path
/// separator, otherwise in each `PATH` entry.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|full| full.is_file())
}

fn append_line(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{}", text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn copy_to_clipboard(argv: &[String], text: &str) -> Result<()> {
    let (program, args) = argv.split_first().context("Clipboard command is empty")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run clipboard command '{}'", program))?;

    // Close stdin before waiting so the clipboard program sees EOF.
    {
        let mut stdin = child
            .stdin
            .take()
            .context("Clipboard command has no stdin")?;
        match stdin.write_all(text.as_bytes()) {
            // It exited early; its status says why.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            result => {
                result.with_context(|| format!("Failed to write to '{}'", program))?;
            }
        }
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for '{}'", program))?;
    if !status.success() {
        anyhow::bail!("'{}' {}", program, describe_exit(status.code()));
    }
    Ok(())
}

fn run_command(run: &str) -> Result<ActionOutcome> {
    if run.trim().is_empty() {
        anyhow::bail!("Command cannot be empty");
    }

    let output = Command::new("sh")
        .arg("-c")
        .arg(run)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to execute '{}'", run))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map_or_else(|| describe_exit(output.status.code()), ToString::to_string);

    Ok(if output.status.success() {
        ActionOutcome::ok(message)
    } else {
        ActionOutcome::failed(message)
    })
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    }
}
