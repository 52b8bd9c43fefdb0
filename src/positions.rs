// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Sibling position reconciliation
//!
//! Every sibling group (items sharing a parent, including the root group)
//! must hold the positions `0..k-1` after a reconciliation.

use crate::error::{MenuError, MenuResult};
use crate::tree::{find_node_by_key, TreeNode};
use crate::types::{MenuItem, MoveTarget, NewPosition};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Compute the positions to persist after a drag-and-drop move.
///
/// `tree` must already reflect the drop. Emission order is: the group the
/// item left (only when the parent changed), the group it joined, then the
/// whole root group whenever either side of the move is root level.
/// An ID can be emitted twice; applying in order makes the last one win.
pub fn calculate_new_positions(
    old_parent_id: Option<&str>,
    new_parent_id: Option<&str>,
    tree: &[TreeNode<'_>],
) -> MenuResult<Vec<NewPosition>> {
    let mut positions = Vec::new();

    if let Some(old_parent) = old_parent_id {
        if new_parent_id != Some(old_parent) {
            let node = find_node_by_key(tree, old_parent)
                .ok_or_else(|| MenuError::ParentNotFound(old_parent.to_string()))?;
            push_group(&node.children, &mut positions);
        }
    }

    if let Some(new_parent) = new_parent_id {
        let node = find_node_by_key(tree, new_parent)
            .ok_or_else(|| MenuError::ParentNotFound(new_parent.to_string()))?;
        push_group(&node.children, &mut positions);
    }

    if old_parent_id.is_none() || new_parent_id.is_none() {
        push_group(tree, &mut positions);
    }

    tracing::debug!(
        "Computed {} position(s) for move {:?} -> {:?}",
        positions.len(),
        old_parent_id,
        new_parent_id
    );

    Ok(positions)
}

/// Keyless nodes keep their slot but cannot be addressed
fn push_group(group: &[TreeNode<'_>], out: &mut Vec<NewPosition>) {
    for (index, node) in group.iter().enumerate() {
        if let Some(key) = node.key() {
            out.push(NewPosition::new(key, to_position(index)));
        }
    }
}

pub(crate) fn to_position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Result of applying computed positions to the item list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    /// Touched items with their final values, each once, in first-touch order
    pub changed: Vec<MenuItem>,
    /// Position updates whose ID is not in the list
    pub orphaned: usize,
}

/// Apply positions to a flat item list.
///
/// The moved item also receives its new parent. Updates for unknown IDs are
/// skipped and counted.
pub fn apply_new_positions(
    items: &mut [MenuItem],
    positions: &[NewPosition],
    moved: Option<&MoveTarget>,
) -> ApplyOutcome {
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        if let Some(id) = item.id() {
            index.entry(id.to_string()).or_insert(i);
        }
    }

    let mut touched: Vec<usize> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut orphaned = 0;

    for update in positions {
        let Some(&i) = index.get(&update.id) else {
            tracing::debug!("Skipping position update for unknown item {}", update.id);
            orphaned += 1;
            continue;
        };

        let item = &mut items[i];
        item.position = update.position;
        if let Some(target) = moved {
            if target.item_id == update.id {
                item.parent_item_id.clone_from(&target.new_parent_id);
            }
        }

        if seen.insert(i) {
            touched.push(i);
        }
    }

    ApplyOutcome {
        changed: touched.into_iter().map(|i| items[i].without_children()).collect(),
        orphaned,
    }
}

/// Renumber every sibling group of a flat list to `0..k-1`.
///
/// Relative order inside a group is kept (stable by position). Returns the
/// items whose position changed.
pub fn normalize_positions(items: &mut [MenuItem]) -> Vec<MenuItem> {
    let mut groups: BTreeMap<Option<String>, Vec<usize>> = BTreeMap::new();
    for (i, item) in items.iter().enumerate() {
        groups.entry(item.parent_item_id.clone()).or_default().push(i);
    }

    let mut changed = Vec::new();
    for indices in groups.values_mut() {
        indices.sort_by_key(|&i| items[i].position);
        for (rank, &i) in indices.iter().enumerate() {
            let position = to_position(rank);
            if items[i].position != position {
                items[i].position = position;
                changed.push(items[i].without_children());
            }
        }
    }
    changed
}

/// A broken structural rule in a flat menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two items share an ID
    DuplicateId(String),
    /// An item points at a parent that does not exist
    DanglingParent {
        /// The item
        item: String,
        /// The missing parent
        parent: String,
    },
    /// An item is its own ancestor
    ParentCycle(String),
    /// A sibling group is not numbered `0..k-1`
    NonContiguous {
        /// Parent of the group (`None` for root)
        parent: Option<String>,
        /// Positions found, sorted
        positions: Vec<i32>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate id {id}"),
            Self::DanglingParent { item, parent } => {
                write!(f, "{item} references missing parent {parent}")
            }
            Self::ParentCycle(id) => write!(f, "{id} is its own ancestor"),
            Self::NonContiguous { parent, positions } => write!(
                f,
                "children of {} have positions {:?}",
                parent.as_deref().unwrap_or("<root>"),
                positions
            ),
        }
    }
}

/// Check a flat list against the structural rules
#[must_use]
pub fn check_invariants(items: &[MenuItem]) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    for item in items {
        if let Some(id) = item.id() {
            if parents.insert(id, item.parent_item_id.as_deref()).is_some() {
                violations.push(Violation::DuplicateId(id.to_string()));
            }
        }
    }

    for item in items {
        let (Some(id), Some(parent)) = (item.id(), item.parent_item_id.as_deref()) else {
            continue;
        };
        if !parents.contains_key(parent) {
            violations.push(Violation::DanglingParent {
                item: id.to_string(),
                parent: parent.to_string(),
            });
        }
    }

    let mut ids: Vec<&str> = parents.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        let mut seen = HashSet::new();
        let mut current = parents.get(id).copied().flatten();
        while let Some(parent) = current {
            if parent == id {
                violations.push(Violation::ParentCycle(id.to_string()));
                break;
            }
            if !seen.insert(parent) {
                break;
            }
            current = parents.get(parent).copied().flatten();
        }
    }

    let mut groups: BTreeMap<Option<&str>, Vec<i32>> = BTreeMap::new();
    for item in items {
        groups
            .entry(item.parent_item_id.as_deref())
            .or_default()
            .push(item.position);
    }
    for (parent, mut positions) in groups {
        positions.sort_unstable();
        let contiguous = positions
            .iter()
            .enumerate()
            .all(|(i, &p)| p == to_position(i));
        if !contiguous {
            violations.push(Violation::NonContiguous {
                parent: parent.map(str::to_string),
                positions,
            });
        }
    }

    violations
}
