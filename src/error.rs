// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for menu reconciliation and storage

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for library operations
pub type MenuResult<T> = Result<T, MenuError>;

/// Errors raised by the menu core and its backends
#[derive(Error, Debug)]
pub enum MenuError {
    /// A parent referenced by a move is not in the tree
    #[error("Parent item not found in tree: {0}")]
    ParentNotFound(String),

    /// An item referenced by ID does not exist
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    /// Another item already uses this key
    #[error("Menu item key already in use: {0}")]
    DuplicateKey(String),

    /// Two items share an ID
    #[error("Duplicate menu item ID: {0}")]
    DuplicateId(String),

    /// A move would make an item its own ancestor
    #[error("Cannot move {item} below itself (target parent {parent})")]
    Cycle {
        /// Item being moved
        item: String,
        /// Requested parent
        parent: String,
    },

    /// An operation needs an item ID that is missing
    #[error("Menu item has no ID: {0}")]
    MissingId(String),

    /// File access failed
    #[error("Failed to access {path}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A payload could not be (de)serialized
    #[error("Invalid menu JSON in {context}")]
    Json {
        /// What was being read or written
        context: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP backend failed
    #[error("Menu service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl MenuError {
    /// Whether this error means a referenced item does not exist
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::ParentNotFound(_) | Self::ItemNotFound(_))
    }
}
