// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod expand;
pub mod export;
pub mod item;
pub mod view;

use crate::backend::{load_expansion, save_expansion, MenuBackend};
use crate::config::Config;
use crate::editor::MenuEditor;
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;

/// Output options shared by all commands
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print JSON instead of text
    pub json: bool,
    /// Use terminal colors
    pub color: bool,
}

/// Open the backend and load a workspace menu into an editing session
pub(crate) fn open_session(
    config: &Config,
    workspace: &str,
) -> Result<(Box<dyn MenuBackend>, MenuEditor)> {
    let backend = config.open_backend()?;
    let items = backend
        .fetch_menu(workspace)
        .with_context(|| format!("Failed to load menu of workspace {workspace}"))?;
    let expansion = load_expansion(&config.data_dir, workspace)
        .with_context(|| format!("Failed to load expansion state of {workspace}"))?;

    let editor = MenuEditor::load(workspace, items, config.preview_language.clone())
        .with_expansion(expansion);
    Ok((backend, editor))
}

/// Persist the session-only state of an editor
pub(crate) fn save_session(config: &Config, editor: &MenuEditor) -> Result<()> {
    save_expansion(&config.data_dir, editor.workspace(), editor.expansion())
        .with_context(|| format!("Failed to save expansion state of {}", editor.workspace()))
}

/// Resolve an item reference (ID or key) to an ID
pub(crate) fn resolve_id(editor: &MenuEditor, reference: &str) -> Result<String> {
    editor
        .resolve(reference)
        .and_then(|item| item.id.clone())
        .ok_or_else(|| anyhow!("Menu item not found: {}", reference))
}

/// Parse `lang=label` pairs
pub(crate) fn parse_labels(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let (lang, label) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid label '{}', expected LANG=TEXT", pair))?;
            let lang = lang.trim();
            if lang.is_empty() {
                return Err(anyhow!("Invalid label '{}', language is empty", pair));
            }
            Ok((lang.to_string(), label.to_string()))
        })
        .collect()
}
