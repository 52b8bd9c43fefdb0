// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
//! Arbitrary menu documents must map, flatten and reconcile without panicking

#![no_main]

use libfuzzer_sys::fuzz_target;
use portal_menu::positions::{calculate_new_positions, check_invariants};
use portal_menu::tree::{flatten_to_list, map_to_tree_nodes, nest_flat_items};
use portal_menu::types::{ExpansionState, MenuDocument};

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<MenuDocument>(data) else {
        return;
    };

    let flat = flatten_to_list(&doc.menu_items);
    let _ = check_invariants(&flat);

    let mut nested = nest_flat_items(flat.clone());
    assert_eq!(flatten_to_list(&nested).len(), flat.len());

    let tree = map_to_tree_nodes(&mut nested, "en", &ExpansionState::new());
    let first = flat.first().and_then(|item| item.id.as_deref());
    let _ = calculate_new_positions(first, None, &tree);
    let _ = calculate_new_positions(None, first, &tree);
});
