// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Read-only views of a workspace menu: tree, flat list, languages

use super::{open_session, Output};
use crate::config::Config;
use crate::tree::{flatten_to_list, TreeNode};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// Render tree nodes as indented text.
///
/// Collapsed branches hide their children unless `all` is set.
#[must_use]
pub fn render_tree(nodes: &[TreeNode<'_>], all: bool, color: bool) -> String {
    fn render(nodes: &[TreeNode<'_>], depth: usize, all: bool, color: bool, out: &mut String) {
        for node in nodes {
            let marker = if node.leaf {
                "•"
            } else if node.expanded || all {
                "▾"
            } else {
                "▸"
            };
            let label = match (color, node.disabled, node.leaf) {
                (false, _, _) => node.label.clone(),
                (true, true, _) => node.label.dimmed().to_string(),
                (true, false, false) => node.label.bold().to_string(),
                (true, false, true) => node.label.clone(),
            };

            out.push_str(&"  ".repeat(depth));
            out.push_str(marker);
            out.push(' ');
            out.push_str(&label);
            if let Some(key) = node.key() {
                out.push_str(&format!(" [{key}]"));
            }
            if node.disabled {
                out.push_str(" (disabled)");
            }
            out.push('\n');

            if node.expanded || all {
                render(&node.children, depth + 1, all, color, out);
            }
        }
    }

    let mut out = String::new();
    render(nodes, 0, all, color, &mut out);
    out
}

/// Show the menu as a tree
pub fn run_tree(config: &Config, workspace: &str, all: bool, output: Output) -> Result<()> {
    let (_backend, editor) = open_session(config, workspace)?;

    if output.json {
        let json = serde_json::to_string_pretty(&editor.nested())
            .context("Failed to serialize menu")?;
        println!("{json}");
        return Ok(());
    }

    if editor.is_empty() {
        println!("Menu of {workspace} is empty. Use 'portal-menu add {workspace} <key> <name>' to create an item.");
        return Ok(());
    }

    let mut nested = editor.nested();
    let tree = editor.tree(&mut nested);
    print!("{}", render_tree(&tree, all, output.color));

    Ok(())
}

/// Show the menu as a flat list in tree order
pub fn run_list(config: &Config, workspace: &str, output: Output) -> Result<()> {
    let (_backend, editor) = open_session(config, workspace)?;
    let flat = flatten_to_list(&editor.nested());

    if output.json {
        let json = serde_json::to_string_pretty(&flat).context("Failed to serialize menu")?;
        println!("{json}");
        return Ok(());
    }

    println!("Menu items ({}):", flat.len());
    for item in &flat {
        println!(
            "  {:<24} {:<24} pos {:<3} {}",
            item.id().unwrap_or("-"),
            item.parent_item_id.as_deref().unwrap_or("<root>"),
            item.position,
            item.label(editor.preview_language())
        );
    }

    Ok(())
}

/// Show the languages used by menu labels
pub fn run_languages(config: &Config, workspace: &str, output: Output) -> Result<()> {
    let (_backend, editor) = open_session(config, workspace)?;
    let languages = editor.languages();

    if output.json {
        println!("{}", serde_json::to_string(&languages)?);
    } else if languages.is_empty() {
        println!("No translated labels.");
    } else {
        println!("{}", languages.join(" "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree_respects_expansion() {
        let mut collapsed = TreeNode::new("a").with_children(vec![TreeNode::new("b")]);
        collapsed.label = "A".into();
        let mut open = TreeNode::new("c").with_children(vec![TreeNode::new("d")]);
        open.expanded = true;

        let text = render_tree(&[collapsed.clone(), open.clone()], false, false);
        assert_eq!(text, "▸ A [a]\n▾ c [c]\n  • d [d]\n");

        let text = render_tree(&[collapsed, open], true, false);
        assert!(text.contains("  • b [b]"));
    }
}
