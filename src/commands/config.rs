// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Print a resolved value, or write one to the config file
pub fn run(resolved: &Config, config_path: Option<&Path>, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(value) => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => config::default_config_path()
                    .context("No config directory available, pass --config")?,
            };
            config::set(&path, key, &value)?;
            tracing::info!("Setting {} = {}", key, value);
            println!("{} = {} ({})", key, value, path.display());
        }
        None => match resolved.get(key)? {
            Some(value) => println!("{value}"),
            None => println!("{key} is not set"),
        },
    }
    Ok(())
}
