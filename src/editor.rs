// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Menu editing session
//!
//! Owns the flat item list of one workspace menu for the duration of an
//! edit, together with the UI-only expansion state. Every mutation keeps the
//! sibling positions contiguous and returns the batch of items that has to
//! be sent to the backend.

use crate::error::{MenuError, MenuResult};
use crate::positions::{
    apply_new_positions, calculate_new_positions, check_invariants, normalize_positions,
    to_position, Violation,
};
use crate::tree::{
    find_node_by_key_mut, flatten_to_list, link_parents, map_to_tree_nodes, nest_flat_items,
    take_node_by_key, TreeNode,
};
use crate::types::{ExpansionState, MenuItem, MenuScope, MenuSnapshot, MoveTarget, NewPosition};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Fields for a new menu item
#[derive(Debug, Clone, Default)]
pub struct MenuItemDraft {
    /// Business key (must be unique in the workspace)
    pub key: String,
    /// Display name
    pub name: String,
    /// Parent item; `None` for root level
    pub parent_id: Option<String>,
    /// Target URL
    pub url: Option<String>,
    /// Icon name
    pub badge: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Localized labels
    pub i18n: BTreeMap<String, String>,
    /// Create disabled
    pub disabled: bool,
    /// Open outside the shell
    pub external: bool,
    /// Visibility scope
    pub scope: Option<MenuScope>,
}

/// Changes to an existing menu item; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct MenuItemPatch {
    /// New display name
    pub name: Option<String>,
    /// New URL
    pub url: Option<String>,
    /// New icon name
    pub badge: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Enable or disable
    pub disabled: Option<bool>,
    /// Toggle external navigation
    pub external: Option<bool>,
    /// Label changes; an empty label removes the language
    pub labels: BTreeMap<String, String>,
}

impl MenuItemPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.badge.is_none()
            && self.description.is_none()
            && self.disabled.is_none()
            && self.external.is_none()
            && self.labels.is_empty()
    }
}

/// Result of a move
#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    /// Positions computed for the drop
    pub positions: Vec<NewPosition>,
    /// Items to submit as one bulk update
    pub batch: Vec<MenuItem>,
    /// Position updates that matched no item
    pub orphaned: usize,
}

/// Result of a delete
#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    /// IDs removed (the item and its descendants)
    pub removed: Vec<String>,
    /// Remaining siblings whose position changed
    pub batch: Vec<MenuItem>,
}

/// An editing session over one workspace menu
#[derive(Debug, Clone)]
pub struct MenuEditor {
    workspace: String,
    items: Vec<MenuItem>,
    expansion: ExpansionState,
    preview_language: String,
    stored_violations: Vec<Violation>,
}

impl MenuEditor {
    /// Start an empty session
    #[must_use]
    pub fn new(workspace: impl Into<String>, preview_language: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            items: Vec::new(),
            expansion: ExpansionState::new(),
            preview_language: preview_language.into(),
            stored_violations: Vec::new(),
        }
    }

    /// Start a session from a fetched payload.
    ///
    /// Accepts the flat form, the nested form, or a mix of both. Items the
    /// tree would draw at root (missing parent, parent cycle) are re-homed
    /// there in the flat list too, so every edit sees the rendered structure.
    #[must_use]
    pub fn load(
        workspace: impl Into<String>,
        mut payload: Vec<MenuItem>,
        preview_language: impl Into<String>,
    ) -> Self {
        link_parents(&mut payload);
        let stored = flatten_to_list(&payload);

        let mut editor = Self::new(workspace, preview_language);
        editor.stored_violations = check_invariants(&stored);
        for violation in &editor.stored_violations {
            warn!("Menu of {}: {}", editor.workspace, violation);
        }

        editor.items = rehome_stranded(stored);
        debug!("Loaded {} menu item(s) for {}", editor.items.len(), editor.workspace);
        editor
    }

    /// Problems found in the menu as it was stored, before re-homing
    #[must_use]
    pub fn stored_violations(&self) -> &[Violation] {
        &self.stored_violations
    }

    /// Attach a previously saved expansion state
    #[must_use]
    pub fn with_expansion(mut self, expansion: ExpansionState) -> Self {
        self.expansion = expansion;
        self
    }

    /// Workspace name
    #[must_use]
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Flat item list
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Consume the session and return the flat item list
    #[must_use]
    pub fn into_items(self) -> Vec<MenuItem> {
        self.items
    }

    /// Expansion state of the session
    #[must_use]
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Language used for tree labels
    #[must_use]
    pub fn preview_language(&self) -> &str {
        &self.preview_language
    }

    /// Switch the preview language
    pub fn set_preview_language(&mut self, lang: impl Into<String>) {
        self.preview_language = lang.into();
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Menu in nested form
    #[must_use]
    pub fn nested(&self) -> Vec<MenuItem> {
        nest_flat_items(self.items.clone())
    }

    /// Build the tree view over a nested copy of the menu.
    ///
    /// `nested` must come from [`MenuEditor::nested`].
    pub fn tree<'a>(&self, nested: &'a mut [MenuItem]) -> Vec<TreeNode<'a>> {
        map_to_tree_nodes(nested, &self.preview_language, &self.expansion)
    }

    /// Look up an item by ID
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id() == Some(id))
    }

    /// Look up an item by ID or by key
    #[must_use]
    pub fn resolve(&self, id_or_key: &str) -> Option<&MenuItem> {
        self.get(id_or_key)
            .or_else(|| self.items.iter().find(|i| i.key.as_deref() == Some(id_or_key)))
    }

    /// Children of a parent ordered by position
    #[must_use]
    pub fn children_of(&self, parent_id: Option<&str>) -> Vec<&MenuItem> {
        let mut children: Vec<&MenuItem> = self
            .items
            .iter()
            .filter(|i| i.parent_item_id.as_deref() == parent_id)
            .collect();
        children.sort_by_key(|i| i.position);
        children
    }

    /// IDs of all descendants of an item
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut result = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut to_visit = vec![id.to_string()];

        while let Some(current) = to_visit.pop() {
            for child in self.children_of(Some(&current)) {
                if let Some(child_id) = child.id() {
                    if seen.insert(child_id.to_string()) {
                        to_visit.push(child_id.to_string());
                        result.push(child_id.to_string());
                    }
                }
            }
        }

        result
    }

    /// Move an item under a new parent (or to root) at a sibling index.
    ///
    /// The drop is performed on the derived tree, positions are recomputed
    /// for the affected groups and patched into the flat list.
    pub fn move_item(
        &mut self,
        item_id: &str,
        new_parent_id: Option<&str>,
        index: usize,
    ) -> MenuResult<MoveOutcome> {
        let item = self
            .get(item_id)
            .ok_or_else(|| MenuError::ItemNotFound(item_id.to_string()))?;

        let old_parent_id = item.parent_item_id.clone();

        if let Some(parent) = new_parent_id {
            if parent == item_id || self.descendants(item_id).iter().any(|d| d == parent) {
                return Err(MenuError::Cycle {
                    item: item_id.to_string(),
                    parent: parent.to_string(),
                });
            }
            if self.get(parent).is_none() {
                return Err(MenuError::ParentNotFound(parent.to_string()));
            }
        }

        let positions = {
            let mut nested = self.nested();
            let mut tree = self.tree(&mut nested);

            let node = take_node_by_key(&mut tree, item_id)
                .ok_or_else(|| MenuError::ItemNotFound(item_id.to_string()))?;

            let siblings = match new_parent_id {
                Some(parent) => {
                    let parent_node = find_node_by_key_mut(&mut tree, parent)
                        .ok_or_else(|| MenuError::ParentNotFound(parent.to_string()))?;
                    parent_node.leaf = false;
                    &mut parent_node.children
                }
                None => &mut tree,
            };
            let index = index.min(siblings.len());
            siblings.insert(index, node);

            calculate_new_positions(old_parent_id.as_deref(), new_parent_id, &tree)?
        };

        let target = MoveTarget {
            item_id: item_id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
        };
        let outcome = apply_new_positions(&mut self.items, &positions, Some(&target));

        if let Some(parent) = new_parent_id {
            self.expansion.set(parent, true);
        }

        info!(
            "Moved {} from {:?} to {:?} ({} item(s) to update)",
            item_id,
            old_parent_id,
            new_parent_id,
            outcome.changed.len()
        );

        Ok(MoveOutcome {
            positions,
            batch: outcome.changed,
            orphaned: outcome.orphaned,
        })
    }

    /// Add a new item at the end of its sibling group
    pub fn create_item(&mut self, draft: MenuItemDraft) -> MenuResult<MenuItem> {
        if let Some(parent) = draft.parent_id.as_deref() {
            if self.get(parent).is_none() {
                return Err(MenuError::ParentNotFound(parent.to_string()));
            }
        }
        if self.items.iter().any(|i| i.key.as_deref() == Some(draft.key.as_str())) {
            return Err(MenuError::DuplicateKey(draft.key));
        }

        let mut nonce = self.items.len() as u64;
        let id = loop {
            let candidate = MenuItem::generate_id(&self.workspace, &draft.key, nonce);
            if self.get(&candidate).is_none() {
                break candidate;
            }
            nonce += 1;
        };

        let position = to_position(self.children_of(draft.parent_id.as_deref()).len());
        let item = MenuItem {
            id: Some(id),
            parent_item_id: draft.parent_id,
            key: Some(draft.key),
            name: draft.name,
            i18n: draft.i18n,
            badge: draft.badge,
            disabled: draft.disabled,
            url: draft.url,
            external: draft.external,
            description: draft.description,
            scope: draft.scope,
            workspace_name: Some(self.workspace.clone()),
            position,
            children: Vec::new(),
        };

        info!("Created menu item {:?} in {}", item.id, self.workspace);
        self.items.push(item.clone());
        Ok(item)
    }

    /// Change fields of an existing item
    pub fn update_item(&mut self, id: &str, patch: MenuItemPatch) -> MenuResult<MenuItem> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id() == Some(id))
            .ok_or_else(|| MenuError::ItemNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(url) = patch.url {
            item.url = Some(url);
        }
        if let Some(badge) = patch.badge {
            item.badge = Some(badge);
        }
        if let Some(description) = patch.description {
            item.description = Some(description);
        }
        if let Some(disabled) = patch.disabled {
            item.disabled = disabled;
        }
        if let Some(external) = patch.external {
            item.external = external;
        }
        for (lang, label) in patch.labels {
            if label.is_empty() {
                item.i18n.remove(&lang);
            } else {
                item.i18n.insert(lang, label);
            }
        }

        info!("Updated menu item {}", id);
        Ok(item.clone())
    }

    /// Remove an item with all its descendants and close the gap it leaves
    pub fn delete_item(&mut self, id: &str) -> MenuResult<DeleteOutcome> {
        let item = self
            .get(id)
            .ok_or_else(|| MenuError::ItemNotFound(id.to_string()))?;
        let parent = item.parent_item_id.clone();

        let mut removed = vec![id.to_string()];
        removed.extend(self.descendants(id));
        let doomed: HashSet<&str> = removed.iter().map(String::as_str).collect();

        self.items
            .retain(|i| i.id().map_or(true, |item_id| !doomed.contains(item_id)));
        for gone in &removed {
            self.expansion.remove(gone);
        }

        let mut group: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.parent_item_id == parent)
            .map(|(index, _)| index)
            .collect();
        group.sort_by_key(|&index| self.items[index].position);

        let mut batch = Vec::new();
        for (rank, index) in group.into_iter().enumerate() {
            let position = to_position(rank);
            if self.items[index].position != position {
                self.items[index].position = position;
                batch.push(self.items[index].clone());
            }
        }

        info!("Deleted {} menu item(s) starting at {}", removed.len(), id);
        Ok(DeleteOutcome { removed, batch })
    }

    /// Flip the expansion of a node
    pub fn toggle_expanded(&mut self, id: &str) -> MenuResult<bool> {
        if self.get(id).is_none() {
            return Err(MenuError::ItemNotFound(id.to_string()));
        }
        Ok(self.expansion.toggle(id))
    }

    /// Set the expansion of a node
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> MenuResult<()> {
        if self.get(id).is_none() {
            return Err(MenuError::ItemNotFound(id.to_string()));
        }
        self.expansion.set(id, expanded);
        Ok(())
    }

    /// Expand every node that has children
    pub fn expand_all(&mut self) {
        let parents: BTreeSet<String> = self
            .items
            .iter()
            .filter_map(|i| i.parent_item_id.clone())
            .collect();
        for parent in parents {
            if self.get(&parent).is_some() {
                self.expansion.set(parent, true);
            }
        }
    }

    /// Collapse every node
    pub fn collapse_all(&mut self) {
        self.expansion.clear();
    }

    /// Languages used by any label, sorted
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.items
            .iter()
            .flat_map(|i| i.i18n.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Structural problems in the current menu
    #[must_use]
    pub fn check(&self) -> Vec<Violation> {
        check_invariants(&self.items)
    }

    /// Snapshot of the menu for export
    #[must_use]
    pub fn export_snapshot(&self) -> MenuSnapshot {
        MenuSnapshot {
            workspace_name: self.workspace.clone(),
            exported_at: Utc::now(),
            menu_items: self.nested(),
        }
    }

    /// Replace the menu with an imported snapshot.
    ///
    /// Items are re-homed to this workspace and positions renumbered.
    /// Returns the number of imported items.
    pub fn import_snapshot(&mut self, snapshot: MenuSnapshot) -> MenuResult<usize> {
        let mut payload = snapshot.menu_items;
        link_parents(&mut payload);
        let items = flatten_to_list(&payload);

        let mut ids = HashSet::new();
        for item in &items {
            let id = item
                .id()
                .ok_or_else(|| MenuError::MissingId(item.name.clone()))?;
            if !ids.insert(id.to_string()) {
                return Err(MenuError::DuplicateId(id.to_string()));
            }
        }

        let mut items = rehome_stranded(items);
        for item in &mut items {
            item.workspace_name = Some(self.workspace.clone());
        }
        normalize_positions(&mut items);

        if snapshot.workspace_name != self.workspace {
            info!(
                "Importing menu of {} into {}",
                snapshot.workspace_name, self.workspace
            );
        }

        let count = items.len();
        self.items = items;
        self.stored_violations.clear();
        self.expansion.clear();
        Ok(count)
    }
}

/// Move items that nesting strands at root (missing parent or parent cycle)
/// to root in the flat list and renumber the root group in tree order.
fn rehome_stranded(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut nested = nest_flat_items(items.clone());
    if nested.iter().all(|root| root.parent_item_id.is_none()) {
        return items;
    }

    for (rank, root) in nested.iter_mut().enumerate() {
        if let Some(parent) = root.parent_item_id.take() {
            warn!(
                "Menu item {:?} moved to root level, parent {} is missing or part of a cycle",
                root.id, parent
            );
        }
        root.position = to_position(rank);
    }
    link_parents(&mut nested);

    flatten_to_list(&nested)
}
