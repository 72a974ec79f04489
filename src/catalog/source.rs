use crate::ui::item::{Item, ItemSource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default = "default_title")]
    pub title: String,
    pub items: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    #[serde(default)]
    pub detail: Option<String>,
    pub action: Value,
}

fn default_title() -> String {
    "Menu".to_string()
}

impl CatalogFile {
    pub fn into_items(self) -> Vec<Item> {
        self.items
            .into_iter()
            .map(|entry| Item {
                label: entry.label,
                secondary: entry.detail.filter(|d| !d.is_empty()),
                action: entry.action,
            })
            .collect()
    }
}

/// Parse catalog JSON. `origin` is only used in error messages.
pub fn parse_catalog(content: &str, origin: &Path) -> Result<CatalogFile> {
    let catalog: CatalogFile = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse catalog: {}", origin.display()))?;

    if let Some(position) = catalog
        .items
        .iter()
        .position(|entry| entry.label.trim().is_empty())
    {
        anyhow::bail!(
            "Item {} in catalog {} has an empty label",
            position + 1,
            origin.display()
        );
    }

    Ok(catalog)
}

pub fn load_catalog(path: &Path) -> Result<CatalogFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    parse_catalog(&content, path)
}

/// Items read from a catalog file. Every enumeration re-reads the file, so a
/// rescan picks up edits made while the menu is open.
#[derive(Debug)]
pub struct CatalogSource {
    path: PathBuf,
    title: String,
}

impl CatalogSource {
    /// Open `path`, failing early if it cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let catalog = load_catalog(&path)?;
        Ok(Self {
            path,
            title: catalog.title,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemSource for CatalogSource {
    fn title(&self) -> &str {
        &self.title
    }

    fn enumerate(&mut self) -> Result<Vec<Item>> {
        let catalog = load_catalog(&self.path)?;
        log::debug!(
            "catalog {}: {} items",
            self.path.display(),
            catalog.items.len()
        );
        self.title = catalog.title.clone();
        Ok(catalog.into_items())
    }
}
