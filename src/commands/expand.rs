// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Expand and collapse tree nodes

use super::{open_session, resolve_id, save_session};
use crate::config::Config;
use anyhow::{bail, Result};

/// Expand (`expand = true`) or collapse one node or the whole tree
pub fn run(
    config: &Config,
    workspace: &str,
    reference: Option<&str>,
    all: bool,
    expand: bool,
) -> Result<()> {
    let (_backend, mut editor) = open_session(config, workspace)?;

    match (reference, all) {
        (Some(_), true) => bail!("Give either an item or --all, not both"),
        (None, false) => bail!("Give an item or --all"),
        (None, true) => {
            if expand {
                editor.expand_all();
            } else {
                editor.collapse_all();
            }
        }
        (Some(reference), false) => {
            let id = resolve_id(&editor, reference)?;
            editor.set_expanded(&id, expand)?;
        }
    }

    save_session(config, &editor)?;

    println!(
        "{} node(s) expanded in {}",
        editor.expansion().expanded_count(),
        workspace
    );

    Ok(())
}
