// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export and import of workspace menus

use super::{open_session, save_session};
use crate::config::Config;
use crate::types::MenuSnapshot;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export a menu snapshot to a file or stdout
pub fn run_export(config: &Config, workspace: &str, output: Option<PathBuf>) -> Result<()> {
    info!("Exporting menu of {}", workspace);

    let (_backend, editor) = open_session(config, workspace)?;
    if editor.is_empty() {
        eprintln!("Warning: menu of {workspace} is empty.");
    }

    let content = serde_json::to_string_pretty(&editor.export_snapshot())
        .context("Failed to serialize menu snapshot")?;

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported {} item(s) to {}", editor.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Replace a menu with the content of a snapshot file
pub fn run_import(config: &Config, workspace: &str, input: &Path) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let snapshot: MenuSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let (backend, mut editor) = open_session(config, workspace)?;
    let count = editor.import_snapshot(snapshot)?;

    backend
        .replace_menu(workspace, editor.items())
        .context("Failed to store imported menu")?;
    save_session(config, &editor)?;

    println!("Imported {count} menu item(s) into {workspace}");

    Ok(())
}
