// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Structural checks of a workspace menu

use super::{open_session, Output};
use crate::config::Config;
use crate::positions::{check_invariants, normalize_positions, Violation};
use anyhow::{bail, Context, Result};

/// Report broken structure; with `fix`, renumber sibling positions.
///
/// Only position gaps can be fixed. Dangling parents, cycles and duplicate
/// IDs fail the command without touching the store.
pub fn run(config: &Config, workspace: &str, fix: bool, output: Output) -> Result<()> {
    let (backend, editor) = open_session(config, workspace)?;
    let violations = editor.stored_violations().to_vec();

    if output.json {
        let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if violations.is_empty() {
        println!("Menu of {} is consistent ({} items).", workspace, editor.len());
    } else {
        println!("Problems in menu of {} ({}):", workspace, violations.len());
        for violation in &violations {
            println!("  - {violation}");
        }
    }

    if violations.is_empty() {
        return Ok(());
    }
    if !fix {
        bail!("{} problem(s) found in menu of {}", violations.len(), workspace);
    }

    let structural = violations
        .iter()
        .filter(|v| !matches!(v, Violation::NonContiguous { .. }))
        .count();
    if structural > 0 {
        bail!(
            "{} problem(s) in menu of {} cannot be fixed by renumbering",
            structural,
            workspace
        );
    }

    let mut items = editor.into_items();
    let changed = normalize_positions(&mut items);

    let remaining = check_invariants(&items);
    if !remaining.is_empty() {
        bail!(
            "{} problem(s) remain in menu of {} after renumbering",
            remaining.len(),
            workspace
        );
    }

    if !changed.is_empty() {
        backend
            .bulk_update(workspace, &changed)
            .context("Failed to store renumbered positions")?;
    }
    println!("Renumbered {} item(s).", changed.len());

    Ok(())
}
