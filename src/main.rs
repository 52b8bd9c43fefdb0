// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Portal menu CLI - edit the navigation menus of portal workspaces

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use portal_menu::commands::{self, item::AddArgs, item::EditArgs, Output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal-menu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "PORTAL_MENU_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, env = "PORTAL_MENU_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Preview language for labels
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu as a tree
    Tree {
        /// Workspace name
        workspace: String,

        /// Show collapsed branches too
        #[arg(short, long)]
        all: bool,
    },

    /// Show the menu as a flat list
    List {
        /// Workspace name
        workspace: String,
    },

    /// List the languages used by labels
    Languages {
        /// Workspace name
        workspace: String,
    },

    /// Create a menu item
    Add {
        /// Workspace name
        workspace: String,

        /// Business key
        key: String,

        /// Display name
        name: String,

        /// Parent item (ID or key)
        #[arg(short, long)]
        parent: Option<String>,

        /// Target URL
        #[arg(long)]
        url: Option<String>,

        /// Icon name
        #[arg(long)]
        badge: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Localized label, LANG=TEXT (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Create the item disabled
        #[arg(long)]
        disabled: bool,

        /// Open the URL outside the shell
        #[arg(long)]
        external: bool,
    },

    /// Change a menu item
    Edit {
        /// Workspace name
        workspace: String,

        /// Item (ID or key)
        item: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New URL
        #[arg(long)]
        url: Option<String>,

        /// New icon name
        #[arg(long)]
        badge: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Localized label, LANG=TEXT; empty TEXT removes it (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Disable the item
        #[arg(long)]
        disable: bool,

        /// Enable the item
        #[arg(long)]
        enable: bool,

        /// Open the URL outside the shell (true/false)
        #[arg(long)]
        external: Option<bool>,
    },

    /// Move a menu item under another parent or within its group
    Move {
        /// Workspace name
        workspace: String,

        /// Item (ID or key)
        item: String,

        /// New parent (ID or key); omit for root level
        #[arg(short, long)]
        parent: Option<String>,

        /// Index among the new siblings (default: last)
        #[arg(short, long)]
        index: Option<usize>,

        /// Show the position updates without storing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a menu item and its descendants
    Remove {
        /// Workspace name
        workspace: String,

        /// Item (ID or key)
        item: String,
    },

    /// Expand a node (or all nodes) in the tree view
    Expand {
        /// Workspace name
        workspace: String,

        /// Item (ID or key)
        item: Option<String>,

        /// Expand every branch
        #[arg(long)]
        all: bool,
    },

    /// Collapse a node (or all nodes) in the tree view
    Collapse {
        /// Workspace name
        workspace: String,

        /// Item (ID or key)
        item: Option<String>,

        /// Collapse every branch
        #[arg(long)]
        all: bool,
    },

    /// Check menu structure (IDs, parents, positions)
    Check {
        /// Workspace name
        workspace: String,

        /// Renumber sibling positions when they are not contiguous
        #[arg(long)]
        fix: bool,
    },

    /// Export a menu snapshot
    Export {
        /// Workspace name
        workspace: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace a menu with a snapshot
    Import {
        /// Workspace name
        workspace: String,

        /// Snapshot file
        file: PathBuf,
    },

    /// Get or set configuration
    Config {
        /// Configuration key
        key: String,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = portal_menu::config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(lang) = cli.lang {
        config.preview_language = lang;
    }
    tracing::debug!("Using data directory {}", config.data_dir.display());

    let output = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Tree { workspace, all } => {
            commands::view::run_tree(&config, &workspace, all, output)
        }
        Commands::List { workspace } => {
            commands::view::run_list(&config, &workspace, output)
        }
        Commands::Languages { workspace } => {
            commands::view::run_languages(&config, &workspace, output)
        }
        Commands::Add { workspace, key, name, parent, url, badge, description, labels, disabled, external } => {
            let args = AddArgs { key, name, parent, url, badge, description, labels, disabled, external };
            commands::item::run_add(&config, &workspace, args, output)
        }
        Commands::Edit { workspace, item, name, url, badge, description, labels, disable, enable, external } => {
            let args = EditArgs { name, url, badge, description, labels, disable, enable, external };
            commands::item::run_edit(&config, &workspace, &item, args, output)
        }
        Commands::Move { workspace, item, parent, index, dry_run } => {
            commands::item::run_move(&config, &workspace, &item, parent.as_deref(), index, dry_run, output)
        }
        Commands::Remove { workspace, item } => {
            commands::item::run_remove(&config, &workspace, &item, output)
        }
        Commands::Expand { workspace, item, all } => {
            commands::expand::run(&config, &workspace, item.as_deref(), all, true)
        }
        Commands::Collapse { workspace, item, all } => {
            commands::expand::run(&config, &workspace, item.as_deref(), all, false)
        }
        Commands::Check { workspace, fix } => {
            commands::check::run(&config, &workspace, fix, output)
        }
        Commands::Export { workspace, output: file } => {
            commands::export::run_export(&config, &workspace, file)
        }
        Commands::Import { workspace, file } => {
            commands::export::run_import(&config, &workspace, &file)
        }
        Commands::Config { key, value } => {
            commands::config::run(&config, cli.config.as_deref(), &key, value)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
