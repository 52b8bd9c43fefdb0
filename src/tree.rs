// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Mapping between menu items and the renderable tree
//!
//! The flat parent-pointer list is the source of truth. The nested form and
//! the `TreeNode` view are derived from it and can be rebuilt at any time.

use crate::types::{ExpansionState, MenuItem};
use std::collections::{BTreeMap, HashSet};

/// A node of the rendered menu tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<'a> {
    /// Mirrors `MenuItem::id`
    pub key: Option<String>,
    /// Label resolved for the preview language
    pub label: String,
    /// The item this node was built from
    pub data: Option<&'a MenuItem>,
    /// Restored from the session's expansion state
    pub expanded: bool,
    /// Child nodes ordered by position
    pub children: Vec<TreeNode<'a>>,
    /// Icon derived from the item badge
    pub icon: Option<String>,
    /// Leaf nodes have no children
    pub leaf: bool,
    /// Mirrors `MenuItem::disabled`
    pub disabled: bool,
}

impl<'a> TreeNode<'a> {
    /// Bare node with a key and no backing item
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key: Some(key),
            data: None,
            expanded: false,
            children: Vec::new(),
            icon: None,
            leaf: true,
            disabled: false,
        }
    }

    /// Builder-style children assignment
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode<'a>>) -> Self {
        self.leaf = children.is_empty();
        self.children = children;
        self
    }

    /// Key as a string slice
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// CSS-style class used by renderers
    #[must_use]
    pub fn style_class(&self) -> &'static str {
        match (self.leaf, self.disabled) {
            (true, false) => "menu-tree-leaf",
            (true, true) => "menu-tree-leaf menu-tree-disabled",
            (false, false) => "menu-tree-branch",
            (false, true) => "menu-tree-branch menu-tree-disabled",
        }
    }
}

/// Map menu items to tree nodes.
///
/// Sorts `items` (and every nested `children` list) in place by position.
/// The sort is stable, so items sharing a position keep their input order.
pub fn map_to_tree_nodes<'a>(
    items: &'a mut [MenuItem],
    preview_language: &str,
    expansion: &ExpansionState,
) -> Vec<TreeNode<'a>> {
    sort_by_position(items);
    let items: &'a [MenuItem] = items;
    build_nodes(items, preview_language, expansion)
}

fn sort_by_position(items: &mut [MenuItem]) {
    items.sort_by_key(|item| item.position);
    for item in items.iter_mut() {
        sort_by_position(&mut item.children);
    }
}

fn build_nodes<'a>(
    items: &'a [MenuItem],
    preview_language: &str,
    expansion: &ExpansionState,
) -> Vec<TreeNode<'a>> {
    items
        .iter()
        .map(|item| {
            let children = build_nodes(&item.children, preview_language, expansion);
            TreeNode {
                key: item.id.clone(),
                label: item.label(preview_language).to_string(),
                data: Some(item),
                expanded: item
                    .id()
                    .is_some_and(|id| expansion.is_expanded(id)),
                leaf: children.is_empty(),
                children,
                icon: item.badge.as_ref().map(|b| format!("pi pi-{b}")),
                disabled: item.disabled,
            }
        })
        .collect()
}

/// Flatten a nested structure depth-first, parents before descendants.
///
/// Emitted items carry no children.
#[must_use]
pub fn flatten_to_list(items: &[MenuItem]) -> Vec<MenuItem> {
    fn collect(items: &[MenuItem], out: &mut Vec<MenuItem>) {
        for item in items {
            out.push(item.without_children());
            collect(&item.children, out);
        }
    }

    let mut out = Vec::new();
    collect(items, &mut out);
    out
}

/// Fill `parent_item_id` of every nested child from its position in the
/// nesting. Root items keep whatever parent they carry.
pub fn link_parents(items: &mut [MenuItem]) {
    for item in items.iter_mut() {
        let parent_id = item.id.clone();
        for child in &mut item.children {
            child.parent_item_id.clone_from(&parent_id);
        }
        link_parents(&mut item.children);
    }
}

/// Take the children of `item` out of `groups`, recursively
fn attach(mut item: MenuItem, groups: &mut BTreeMap<Option<String>, Vec<MenuItem>>) -> MenuItem {
    if let Some(mut children) = item.id.clone().and_then(|id| groups.remove(&Some(id))) {
        children.sort_by_key(|c| c.position);
        item.children = children.into_iter().map(|c| attach(c, groups)).collect();
    }
    item
}

/// Build the nested form from a flat parent-pointer list.
///
/// Children are ordered by position. Items whose parent is not in the list
/// are placed at root level. Items caught in a parent cycle are appended at
/// root level after the regular roots.
#[must_use]
pub fn nest_flat_items(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let ids: HashSet<String> = items.iter().filter_map(|i| i.id.clone()).collect();

    let mut groups: BTreeMap<Option<String>, Vec<MenuItem>> = BTreeMap::new();
    for mut item in items {
        item.children.clear();
        let parent = match &item.parent_item_id {
            Some(parent) if ids.contains(parent) => Some(parent.clone()),
            Some(parent) => {
                tracing::warn!(
                    "Menu item {:?} references missing parent {}, placing it at root",
                    item.id,
                    parent
                );
                None
            }
            None => None,
        };
        groups.entry(parent).or_default().push(item);
    }

    let mut roots = groups.remove(&None).unwrap_or_default();
    roots.sort_by_key(|r| r.position);
    let mut nested: Vec<MenuItem> = roots.into_iter().map(|r| attach(r, &mut groups)).collect();

    // Whatever is left is only reachable through a parent cycle
    while let Some(parent) = groups.keys().next().cloned() {
        let stranded = groups.remove(&parent).unwrap_or_default();
        tracing::warn!(
            "{} menu item(s) under {:?} are part of a parent cycle, placing them at root",
            stranded.len(),
            parent
        );
        for item in stranded {
            let item = attach(item, &mut groups);
            nested.push(item);
        }
    }

    nested
}

/// Find a node by key, depth-first, first match wins
#[must_use]
pub fn find_node_by_key<'t, 'a>(tree: &'t [TreeNode<'a>], key: &str) -> Option<&'t TreeNode<'a>> {
    for node in tree {
        if node.key() == Some(key) {
            return Some(node);
        }
        if let Some(found) = find_node_by_key(&node.children, key) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_node_by_key`]
pub fn find_node_by_key_mut<'t, 'a>(
    tree: &'t mut [TreeNode<'a>],
    key: &str,
) -> Option<&'t mut TreeNode<'a>> {
    for node in tree.iter_mut() {
        if node.key() == Some(key) {
            return Some(node);
        }
        if let Some(found) = find_node_by_key_mut(&mut node.children, key) {
            return Some(found);
        }
    }
    None
}

/// Detach a node (with its subtree) from wherever it sits in the tree
pub fn take_node_by_key<'a>(tree: &mut Vec<TreeNode<'a>>, key: &str) -> Option<TreeNode<'a>> {
    if let Some(index) = tree.iter().position(|n| n.key() == Some(key)) {
        return Some(tree.remove(index));
    }
    for node in tree.iter_mut() {
        if let Some(taken) = take_node_by_key(&mut node.children, key) {
            node.leaf = node.children.is_empty();
            return Some(taken);
        }
    }
    None
}

/// Find an item in a nested structure by ID
#[must_use]
pub fn find_item<'a>(items: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    for item in items {
        if item.id() == Some(id) {
            return Some(item);
        }
        if let Some(found) = find_item(&item.children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<MenuItem> {
        vec![
            MenuItem::new("item1", "Item 1", 1)
                .with_children(vec![MenuItem::new("subitem1", "Subitem 1.1", 2)]),
            MenuItem::new("item2", "Item 2", 5),
        ]
    }

    #[test]
    fn test_map_to_tree_nodes() {
        let mut items = sample_items();
        let tree = map_to_tree_nodes(&mut items, "en", &ExpansionState::new());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].key(), Some("item1"));
        assert_eq!(tree[1].key(), Some("item2"));
        assert!(!tree[0].leaf);
        assert_eq!(tree[0].style_class(), "menu-tree-branch");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].key(), Some("subitem1"));
        assert!(tree[1].leaf);
    }

    #[test]
    fn test_map_empty() {
        let mut items: Vec<MenuItem> = vec![];
        assert!(map_to_tree_nodes(&mut items, "en", &ExpansionState::new()).is_empty());
    }

    #[test]
    fn test_map_sorts_by_position_stably() {
        let mut items = vec![
            MenuItem::new("c", "C", 2),
            MenuItem::new("a1", "A1", 0),
            MenuItem::new("b", "B", 1),
            MenuItem::new("a2", "A2", 0),
        ];
        let tree = map_to_tree_nodes(&mut items, "en", &ExpansionState::new());
        let keys: Vec<_> = tree.iter().filter_map(TreeNode::key).collect();
        assert_eq!(keys, vec!["a1", "a2", "b", "c"]);
        // Sort happens in place
        assert_eq!(items[0].id(), Some("a1"));
    }

    #[test]
    fn test_label_prefers_preview_language() {
        let mut items = vec![
            MenuItem::new("a", "Home", 0).with_label("de", "Startseite"),
            MenuItem::new("b", "Help", 1).with_label("de", ""),
        ];
        let tree = map_to_tree_nodes(&mut items, "de", &ExpansionState::new());
        assert_eq!(tree[0].label, "Startseite");
        assert_eq!(tree[1].label, "Help");
    }

    #[test]
    fn test_expansion_restored() {
        let mut expansion = ExpansionState::new();
        expansion.set("item1", true);
        expansion.set("item2", false);

        let mut items = sample_items();
        let tree = map_to_tree_nodes(&mut items, "en", &expansion);
        assert!(tree[0].expanded);
        assert!(!tree[1].expanded);
        assert!(!tree[0].children[0].expanded);
    }

    #[test]
    fn test_icon_and_disabled_style() {
        let mut item = MenuItem::new("a", "A", 0);
        item.badge = Some("home".into());
        item.disabled = true;
        let mut items = vec![item];
        let tree = map_to_tree_nodes(&mut items, "en", &ExpansionState::new());
        assert_eq!(tree[0].icon.as_deref(), Some("pi pi-home"));
        assert_eq!(tree[0].style_class(), "menu-tree-leaf menu-tree-disabled");
    }

    #[test]
    fn test_missing_id_tolerated() {
        let mut items = vec![MenuItem {
            name: "Anonymous".into(),
            ..MenuItem::default()
        }];
        let tree = map_to_tree_nodes(&mut items, "en", &ExpansionState::new());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].key(), None);
        assert_eq!(tree[0].label, "Anonymous");
    }

    #[test]
    fn test_flatten_pre_order() {
        let items = vec![
            MenuItem::new("1", "1", 0).with_children(vec![
                MenuItem::new("1.1", "1.1", 0)
                    .with_children(vec![MenuItem::new("1.1.1", "1.1.1", 0)]),
                MenuItem::new("1.2", "1.2", 1),
            ]),
            MenuItem::new("2", "2", 1),
        ];

        let flat = flatten_to_list(&items);
        let ids: Vec<_> = flat.iter().filter_map(MenuItem::id).collect();
        assert_eq!(ids, vec!["1", "1.1", "1.1.1", "1.2", "2"]);
        assert!(flat.iter().all(|i| i.children.is_empty()));
    }

    #[test]
    fn test_link_parents() {
        let mut items = sample_items();
        link_parents(&mut items);
        assert_eq!(items[0].parent_item_id, None);
        assert_eq!(items[0].children[0].parent_item_id.as_deref(), Some("item1"));
    }

    #[test]
    fn test_nest_flat_items() {
        let flat = vec![
            MenuItem::new("child-b", "B", 1).with_parent("root"),
            MenuItem::new("root", "Root", 0),
            MenuItem::new("child-a", "A", 0).with_parent("root"),
            MenuItem::new("other", "Other", 1),
        ];

        let nested = nest_flat_items(flat);
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].id(), Some("root"));
        let kids: Vec<_> = nested[0].children.iter().filter_map(MenuItem::id).collect();
        assert_eq!(kids, vec!["child-a", "child-b"]);
        assert_eq!(nested[1].id(), Some("other"));
    }

    #[test]
    fn test_nest_orphan_goes_to_root() {
        let flat = vec![
            MenuItem::new("a", "A", 0),
            MenuItem::new("lost", "Lost", 1).with_parent("gone"),
        ];
        let nested = nest_flat_items(flat);
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[1].id(), Some("lost"));
    }

    #[test]
    fn test_nest_cycle_does_not_lose_items() {
        let flat = vec![
            MenuItem::new("a", "A", 0).with_parent("b"),
            MenuItem::new("b", "B", 0).with_parent("a"),
        ];
        let nested = nest_flat_items(flat);
        assert_eq!(flatten_to_list(&nested).len(), 2);
    }

    #[test]
    fn test_find_node_by_key() {
        let tree = vec![
            TreeNode::new("a").with_children(vec![TreeNode::new("dup")]),
            TreeNode::new("dup"),
        ];
        let found = find_node_by_key(&tree, "dup").unwrap();
        // Depth-first: the nested one comes first
        assert!(std::ptr::eq(found, &tree[0].children[0]));
        assert!(find_node_by_key(&tree, "missing").is_none());
    }

    #[test]
    fn test_find_item_in_nested_payload() {
        let items = vec![
            MenuItem::new("help", "Help", 0)
                .with_children(vec![MenuItem::new("faq", "FAQ", 0).with_label("de", "Fragen")]),
        ];
        assert_eq!(find_item(&items, "faq").map(|i| i.label("de")), Some("Fragen"));
        assert!(find_item(&items, "ghost").is_none());
    }

    #[test]
    fn test_take_node_by_key() {
        let mut tree = vec![
            TreeNode::new("a").with_children(vec![TreeNode::new("b")]),
            TreeNode::new("c"),
        ];
        let taken = take_node_by_key(&mut tree, "b").unwrap();
        assert_eq!(taken.key(), Some("b"));
        assert!(tree[0].children.is_empty());
        assert!(tree[0].leaf);
        assert!(take_node_by_key(&mut tree, "b").is_none());
    }
}
