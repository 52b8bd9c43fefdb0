// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Menu item commands: add, edit, move, remove

use super::{open_session, parse_labels, resolve_id, save_session, Output};
use crate::config::Config;
use crate::editor::{MenuItemDraft, MenuItemPatch};
use anyhow::{bail, Context, Result};
use tracing::info;

/// Arguments for `add`
#[derive(Debug, Default)]
pub struct AddArgs {
    /// Business key
    pub key: String,
    /// Display name
    pub name: String,
    /// Parent item (ID or key)
    pub parent: Option<String>,
    /// Target URL
    pub url: Option<String>,
    /// Icon name
    pub badge: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Labels as LANG=TEXT
    pub labels: Vec<String>,
    /// Create disabled
    pub disabled: bool,
    /// Open outside the shell
    pub external: bool,
}

/// Arguments for `edit`
#[derive(Debug, Default)]
pub struct EditArgs {
    /// New display name
    pub name: Option<String>,
    /// New URL
    pub url: Option<String>,
    /// New icon name
    pub badge: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Labels as LANG=TEXT (empty TEXT removes)
    pub labels: Vec<String>,
    /// Disable the item
    pub disable: bool,
    /// Enable the item
    pub enable: bool,
    /// Open outside the shell
    pub external: Option<bool>,
}

/// Create a menu item
pub fn run_add(config: &Config, workspace: &str, args: AddArgs, output: Output) -> Result<()> {
    let (backend, mut editor) = open_session(config, workspace)?;

    let parent_id = args
        .parent
        .as_deref()
        .map(|parent| resolve_id(&editor, parent))
        .transpose()?;

    let item = editor.create_item(MenuItemDraft {
        key: args.key,
        name: args.name,
        parent_id,
        url: args.url,
        badge: args.badge,
        description: args.description,
        i18n: parse_labels(&args.labels)?,
        disabled: args.disabled,
        external: args.external,
        scope: None,
    })?;

    backend
        .create_item(workspace, &item)
        .context("Failed to store new menu item")?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!(
            "Created menu item: {} ({})",
            item.name,
            item.id().unwrap_or_default()
        );
        println!("  position: {}", item.position);
    }

    Ok(())
}

/// Change fields of a menu item
pub fn run_edit(
    config: &Config,
    workspace: &str,
    reference: &str,
    args: EditArgs,
    output: Output,
) -> Result<()> {
    if args.disable && args.enable {
        bail!("--disable and --enable cannot be combined");
    }

    let (backend, mut editor) = open_session(config, workspace)?;
    let id = resolve_id(&editor, reference)?;

    let patch = MenuItemPatch {
        name: args.name,
        url: args.url,
        badge: args.badge,
        description: args.description,
        disabled: match (args.disable, args.enable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
        external: args.external,
        labels: parse_labels(&args.labels)?,
    };

    if patch.is_empty() {
        println!("Nothing to change for {reference}.");
        return Ok(());
    }

    let item = editor.update_item(&id, patch)?;
    backend
        .bulk_update(workspace, std::slice::from_ref(&item))
        .context("Failed to store menu item")?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("Updated menu item: {} ({})", item.name, id);
    }

    Ok(())
}

/// Move a menu item under a new parent (or to root) at an index
pub fn run_move(
    config: &Config,
    workspace: &str,
    reference: &str,
    parent: Option<&str>,
    index: Option<usize>,
    dry_run: bool,
    output: Output,
) -> Result<()> {
    let (backend, mut editor) = open_session(config, workspace)?;
    let id = resolve_id(&editor, reference)?;
    let parent_id = parent.map(|p| resolve_id(&editor, p)).transpose()?;

    let outcome = editor.move_item(&id, parent_id.as_deref(), index.unwrap_or(usize::MAX))?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&outcome.positions)?);
    } else {
        let verb = if dry_run { "Would move" } else { "Moved" };
        println!(
            "{} {} to {} ({} position update(s))",
            verb,
            id,
            parent_id.as_deref().unwrap_or("<root>"),
            outcome.positions.len()
        );
        for position in &outcome.positions {
            println!("  {} -> {}", position.id, position.position);
        }
    }

    if dry_run {
        return Ok(());
    }

    backend
        .bulk_update(workspace, &outcome.batch)
        .context("Failed to store new positions")?;
    save_session(config, &editor)?;
    info!("Stored {} repositioned item(s)", outcome.batch.len());

    Ok(())
}

/// Delete a menu item and its descendants
pub fn run_remove(config: &Config, workspace: &str, reference: &str, output: Output) -> Result<()> {
    let (backend, mut editor) = open_session(config, workspace)?;
    let id = resolve_id(&editor, reference)?;

    let outcome = editor.delete_item(&id)?;

    backend
        .delete_items(workspace, &outcome.removed)
        .context("Failed to delete menu items")?;
    if !outcome.batch.is_empty() {
        backend
            .bulk_update(workspace, &outcome.batch)
            .context("Failed to store new positions")?;
    }
    save_session(config, &editor)?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&outcome.removed)?);
    } else {
        println!("Deleted {} menu item(s):", outcome.removed.len());
        for removed in &outcome.removed {
            println!("  {removed}");
        }
    }

    Ok(())
}
