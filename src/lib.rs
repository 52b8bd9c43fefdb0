// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Portal menu library - menu tree editing for portal workspaces
//!
//! This crate provides the reconciliation core behind a workspace menu
//! editor: mapping menu items to a renderable tree, recomputing sibling
//! positions after drag-and-drop moves, and an editing session that keeps
//! the flat parent-pointer list consistent.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod positions;
pub mod tree;

/// Core data types shared by the mapper, the recalculator and the editor
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use sha2::{Digest, Sha256};
    use std::collections::{BTreeMap, HashMap};

    // =========================================================================
    // Menu Items
    // =========================================================================

    /// Where a menu item is visible
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum MenuScope {
        /// Visible everywhere in the workspace
        Workspace,
        /// Visible inside one application
        App,
        /// Visible on a single page
        Page,
    }

    /// A menu item as stored by the workspace service.
    ///
    /// The same type carries both the flat form (parent pointers only) and
    /// the nested form (`children` filled in) used by hierarchical payloads.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MenuItem {
        /// Stable identifier assigned by the store
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        /// Parent item ID; `None` means root level
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parent_item_id: Option<String>,
        /// Business key, unique within a workspace
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub key: Option<String>,
        /// Fallback display name
        #[serde(default)]
        pub name: String,
        /// Localized labels by language code
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub i18n: BTreeMap<String, String>,
        /// Icon name shown next to the label
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub badge: Option<String>,
        /// Disabled items stay in the menu but cannot be selected
        #[serde(default)]
        pub disabled: bool,
        /// Target URL
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub url: Option<String>,
        /// Opens the URL outside the shell
        #[serde(default)]
        pub external: bool,
        /// Free text description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        /// Visibility scope
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub scope: Option<MenuScope>,
        /// Owning workspace
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub workspace_name: Option<String>,
        /// Zero-based rank among siblings
        #[serde(default)]
        pub position: i32,
        /// Nested children (hierarchical payloads only)
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<MenuItem>,
    }

    impl MenuItem {
        /// Create an item with an ID, a name and a position
        #[must_use]
        pub fn new(id: impl Into<String>, name: impl Into<String>, position: i32) -> Self {
            Self {
                id: Some(id.into()),
                name: name.into(),
                position,
                ..Self::default()
            }
        }

        /// Builder-style parent assignment
        #[must_use]
        pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
            self.parent_item_id = Some(parent_id.into());
            self
        }

        /// Builder-style children assignment
        #[must_use]
        pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
            self.children = children;
            self
        }

        /// Builder-style label assignment
        #[must_use]
        pub fn with_label(mut self, lang: impl Into<String>, label: impl Into<String>) -> Self {
            self.i18n.insert(lang.into(), label.into());
            self
        }

        /// ID as a string slice
        #[must_use]
        pub fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        /// Display label for a language, falling back to `name`
        #[must_use]
        pub fn label(&self, lang: &str) -> &str {
            match self.i18n.get(lang) {
                Some(label) if !label.is_empty() => label,
                _ => &self.name,
            }
        }

        /// Copy of this item without its nested children
        #[must_use]
        pub fn without_children(&self) -> Self {
            Self {
                children: Vec::new(),
                ..self.clone()
            }
        }

        /// Generate a deterministic ID for a new item
        #[must_use]
        pub fn generate_id(workspace: &str, key: &str, nonce: u64) -> String {
            let mut hasher = Sha256::new();
            hasher.update(workspace.as_bytes());
            hasher.update(key.as_bytes());
            hasher.update(nonce.to_le_bytes());
            let hash = hex::encode(hasher.finalize());
            format!("menu:{}", &hash[..16])
        }
    }

    // =========================================================================
    // Reconciliation Results
    // =========================================================================

    /// A newly computed position for one item
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NewPosition {
        /// Item ID
        pub id: String,
        /// Zero-based position within its sibling group
        pub position: i32,
    }

    impl NewPosition {
        /// Create a new position entry
        #[must_use]
        pub fn new(id: impl Into<String>, position: i32) -> Self {
            Self {
                id: id.into(),
                position,
            }
        }
    }

    /// The drag-and-drop move a position update belongs to
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MoveTarget {
        /// The dragged item
        pub item_id: String,
        /// Its parent after the drop
        pub new_parent_id: Option<String>,
    }

    // =========================================================================
    // Expansion State
    // =========================================================================

    /// Expand/collapse state per node key.
    ///
    /// Session-only UI state; never part of the menu payload.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ExpansionState {
        expanded: HashMap<String, bool>,
    }

    impl ExpansionState {
        /// Create an empty state (everything collapsed)
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Whether a node is expanded; unknown nodes are collapsed
        #[must_use]
        pub fn is_expanded(&self, key: &str) -> bool {
            self.expanded.get(key).copied().unwrap_or(false)
        }

        /// Record the state of a node
        pub fn set(&mut self, key: impl Into<String>, expanded: bool) {
            self.expanded.insert(key.into(), expanded);
        }

        /// Flip the state of a node and return the new value
        pub fn toggle(&mut self, key: &str) -> bool {
            let next = !self.is_expanded(key);
            self.expanded.insert(key.to_string(), next);
            next
        }

        /// Forget a node
        pub fn remove(&mut self, key: &str) {
            self.expanded.remove(key);
        }

        /// Collapse everything
        pub fn clear(&mut self) {
            self.expanded.clear();
        }

        /// Number of expanded nodes
        #[must_use]
        pub fn expanded_count(&self) -> usize {
            self.expanded.values().filter(|v| **v).count()
        }
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Export/import document for one workspace menu
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MenuSnapshot {
        /// Workspace the menu belongs to
        pub workspace_name: String,
        /// When the snapshot was taken
        pub exported_at: DateTime<Utc>,
        /// Menu in nested form
        #[serde(default)]
        pub menu_items: Vec<MenuItem>,
    }

    /// On-disk form of a workspace menu (flat, parent pointers)
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MenuDocument {
        /// Workspace the menu belongs to
        pub workspace_name: String,
        /// Flat menu items
        #[serde(default)]
        pub menu_items: Vec<MenuItem>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{MenuError, MenuResult};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
