//! # History Storage
//!
//! ```text
//! ~/.local/share/boxmenu/history/
//! ├── <catalog-hash-1>.json
//! ├── <catalog-hash-2>.json
//! └── ...
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How often one item has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: String,
    pub count: u64,
    pub last_used: DateTime<Utc>,
}

impl HistoryEntry {
    /// One-line summary for the preview area, in local time.
    pub fn describe(&self) -> String {
        format!(
            "applied {}× · last {}",
            self.count,
            self.last_used
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
        )
    }
}

/// History for a single catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogHistory {
    pub catalog_path: PathBuf,
    /// Map of label -> entry
    pub entries: HashMap<String, HistoryEntry>,
}

impl CatalogHistory {
    pub fn new(catalog_path: PathBuf) -> Self {
        Self {
            catalog_path,
            entries: HashMap::new(),
        }
    }

    pub fn record_activation(&mut self, label: &str) {
        let now = Utc::now();
        let entry = self
            .entries
            .entry(label.to_string())
            .or_insert_with(|| HistoryEntry {
                label: label.to_string(),
                count: 0,
                last_used: now,
            });
        entry.count += 1;
        entry.last_used = now;
    }
}

/// Activation history with persistent storage.
#[derive(Debug)]
pub struct ActivationHistory {
    storage_dir: PathBuf,
    history: CatalogHistory,
}

impl ActivationHistory {
    /// Open the history for `catalog_path` in the user's data directory.
    /// A missing or unreadable history file starts an empty history.
    pub fn new(catalog_path: &Path) -> Result<Self> {
        Self::with_storage_dir(catalog_path, get_storage_dir()?)
    }

    /// Open the history for `catalog_path` under `storage_dir`.
    pub fn with_storage_dir(catalog_path: &Path, storage_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&storage_dir).with_context(|| {
            format!(
                "Failed to create history directory: {}",
                storage_dir.display()
            )
        })?;

        let catalog_path =
            fs::canonicalize(catalog_path).unwrap_or_else(|_| catalog_path.to_path_buf());
        let history_file = get_history_file_path(&storage_dir, &catalog_path);
        let history = if history_file.exists() {
            load_history(&history_file).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable history: {:#}", e);
                CatalogHistory::new(catalog_path.clone())
            })
        } else {
            CatalogHistory::new(catalog_path.clone())
        };

        Ok(Self {
            storage_dir,
            history,
        })
    }

    /// Record an activation and save to disk.
    pub fn record(&mut self, label: &str) -> Result<()> {
        self.history.record_activation(label);
        self.save()
    }

    pub fn entry(&self, label: &str) -> Option<&HistoryEntry> {
        self.history.entries.get(label)
    }

    pub fn catalog_path(&self) -> &Path {
        &self.history.catalog_path
    }

    fn save(&self) -> Result<()> {
        let history_file = get_history_file_path(&self.storage_dir, &self.history.catalog_path);
        let json =
            serde_json::to_string_pretty(&self.history).context("Failed to serialize history")?;

        fs::write(&history_file, json).with_context(|| {
            format!("Failed to write history file: {}", history_file.display())
        })?;

        Ok(())
    }
}

fn get_storage_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", "boxmenu")
        .context("Failed to determine application data directory")?;

    Ok(proj_dirs.data_dir().join("history"))
}

fn get_history_file_path(storage_dir: &Path, catalog_path: &Path) -> PathBuf {
    let hash = simple_hash(catalog_path.to_string_lossy().as_ref());
    storage_dir.join(format!("{:016x}.json", hash))
}

fn simple_hash(s: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

fn load_history(path: &Path) -> Result<CatalogHistory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))
}
