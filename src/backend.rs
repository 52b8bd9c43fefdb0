// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Menu persistence backends
//!
//! The workspace menu service owns the menus. `FileBackend` keeps one JSON
//! document per workspace in a data directory; `HttpBackend` talks to a
//! running service.

use crate::error::{MenuError, MenuResult};
use crate::tree::nest_flat_items;
use crate::types::{ExpansionState, MenuDocument, MenuItem};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Operations the editor needs from the menu service
pub trait MenuBackend {
    /// Fetch the menu of a workspace (flat or nested)
    fn fetch_menu(&self, workspace: &str) -> MenuResult<Vec<MenuItem>>;

    /// Replace the whole menu of a workspace
    fn replace_menu(&self, workspace: &str, items: &[MenuItem]) -> MenuResult<()>;

    /// Store a batch of changed items
    fn bulk_update(&self, workspace: &str, changed: &[MenuItem]) -> MenuResult<()>;

    /// Store a new item
    fn create_item(&self, workspace: &str, item: &MenuItem) -> MenuResult<()>;

    /// Remove items by ID
    fn delete_items(&self, workspace: &str, ids: &[String]) -> MenuResult<()>;
}

fn file_stem(workspace: &str) -> String {
    workspace
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> MenuResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path).map_err(|source| MenuError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| MenuError::Json {
        context: path.display().to_string(),
        source,
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> MenuResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| MenuError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| MenuError::Json {
        context: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| MenuError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// File Backend
// =============================================================================

/// One `<workspace>.menu.json` per workspace
#[derive(Debug, Clone)]
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    /// Backend rooted at a data directory
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of a workspace document
    #[must_use]
    pub fn menu_path(&self, workspace: &str) -> PathBuf {
        self.data_dir.join(format!("{}.menu.json", file_stem(workspace)))
    }

    fn load_document(&self, workspace: &str) -> MenuResult<MenuDocument> {
        let mut document: MenuDocument = read_json(&self.menu_path(workspace))?;
        if document.workspace_name.is_empty() {
            document.workspace_name = workspace.to_string();
        }
        Ok(document)
    }

    fn save_document(&self, workspace: &str, document: &MenuDocument) -> MenuResult<()> {
        let path = self.menu_path(workspace);
        write_json(&path, document)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl MenuBackend for FileBackend {
    fn fetch_menu(&self, workspace: &str) -> MenuResult<Vec<MenuItem>> {
        Ok(self.load_document(workspace)?.menu_items)
    }

    fn replace_menu(&self, workspace: &str, items: &[MenuItem]) -> MenuResult<()> {
        let document = MenuDocument {
            workspace_name: workspace.to_string(),
            menu_items: items.iter().map(MenuItem::without_children).collect(),
        };
        self.save_document(workspace, &document)?;
        info!("Saved {} menu item(s) for {}", items.len(), workspace);
        Ok(())
    }

    fn bulk_update(&self, workspace: &str, changed: &[MenuItem]) -> MenuResult<()> {
        let mut document = self.load_document(workspace)?;
        for update in changed {
            let id = update
                .id()
                .ok_or_else(|| MenuError::MissingId(update.name.clone()))?;
            let stored = document
                .menu_items
                .iter_mut()
                .find(|i| i.id() == Some(id))
                .ok_or_else(|| MenuError::ItemNotFound(id.to_string()))?;
            *stored = update.without_children();
        }
        self.save_document(workspace, &document)?;
        info!("Updated {} menu item(s) for {}", changed.len(), workspace);
        Ok(())
    }

    fn create_item(&self, workspace: &str, item: &MenuItem) -> MenuResult<()> {
        let mut document = self.load_document(workspace)?;
        if let Some(id) = item.id() {
            if document.menu_items.iter().any(|i| i.id() == Some(id)) {
                return Err(MenuError::DuplicateId(id.to_string()));
            }
        }
        document.menu_items.push(item.without_children());
        self.save_document(workspace, &document)
    }

    fn delete_items(&self, workspace: &str, ids: &[String]) -> MenuResult<()> {
        let mut document = self.load_document(workspace)?;
        document
            .menu_items
            .retain(|i| i.id().map_or(true, |id| !ids.iter().any(|d| d == id)));
        self.save_document(workspace, &document)
    }
}

// =============================================================================
// HTTP Backend
// =============================================================================

/// Blocking client for the workspace menu service
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBackend {
    /// Client for a service base URL
    pub fn new(base_url: &str) -> MenuResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the menu items collection of a workspace
    #[must_use]
    pub fn menu_url(&self, workspace: &str, suffix: &str) -> String {
        format!("{}/workspaces/{}/menuItems{}", self.base_url, workspace, suffix)
    }
}

impl MenuBackend for HttpBackend {
    fn fetch_menu(&self, workspace: &str) -> MenuResult<Vec<MenuItem>> {
        let url = self.menu_url(workspace, "/tree");
        debug!("GET {}", url);
        let items = self.client.get(&url).send()?.error_for_status()?.json()?;
        Ok(items)
    }

    fn replace_menu(&self, workspace: &str, items: &[MenuItem]) -> MenuResult<()> {
        let url = self.menu_url(workspace, "/tree");
        debug!("PUT {}", url);
        let nested = nest_flat_items(items.to_vec());
        self.client.put(&url).json(&nested).send()?.error_for_status()?;
        Ok(())
    }

    fn bulk_update(&self, workspace: &str, changed: &[MenuItem]) -> MenuResult<()> {
        let url = self.menu_url(workspace, "");
        debug!("PATCH {} ({} item(s))", url, changed.len());
        self.client.patch(&url).json(changed).send()?.error_for_status()?;
        Ok(())
    }

    fn create_item(&self, workspace: &str, item: &MenuItem) -> MenuResult<()> {
        let url = self.menu_url(workspace, "");
        debug!("POST {}", url);
        self.client.post(&url).json(item).send()?.error_for_status()?;
        Ok(())
    }

    fn delete_items(&self, workspace: &str, ids: &[String]) -> MenuResult<()> {
        for id in ids {
            let url = self.menu_url(workspace, &format!("/{id}"));
            debug!("DELETE {}", url);
            self.client.delete(&url).send()?.error_for_status()?;
        }
        Ok(())
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Path of the expansion side file of a workspace
#[must_use]
pub fn expansion_path(data_dir: &Path, workspace: &str) -> PathBuf {
    data_dir.join(format!("{}.expansion.json", file_stem(workspace)))
}

/// Load the saved expansion state; missing file means all collapsed
pub fn load_expansion(data_dir: &Path, workspace: &str) -> MenuResult<ExpansionState> {
    read_json(&expansion_path(data_dir, workspace))
}

/// Save the expansion state
pub fn save_expansion(data_dir: &Path, workspace: &str, state: &ExpansionState) -> MenuResult<()> {
    write_json(&expansion_path(data_dir, workspace), state)
}
