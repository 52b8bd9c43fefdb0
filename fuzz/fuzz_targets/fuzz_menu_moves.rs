// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
//! Arbitrary move sequences must keep sibling positions contiguous, also on
//! menus loaded with missing parents or parent cycles

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use portal_menu::editor::MenuEditor;
use portal_menu::types::MenuItem;
use std::collections::HashMap;

#[derive(Debug, Arbitrary)]
struct Move {
    item: u8,
    parent: Option<u8>,
    index: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    parents: Vec<Option<u8>>,
    moves: Vec<Move>,
}

fuzz_target!(|input: Input| {
    let count = input.parents.len().min(64);
    if count == 0 {
        return;
    }

    // Parent values past `count` name missing items; the rest may form cycles
    let mut next: HashMap<Option<u8>, i32> = HashMap::new();
    let items: Vec<MenuItem> = input.parents[..count]
        .iter()
        .enumerate()
        .map(|(i, &parent)| {
            let slot = next.entry(parent).or_insert(0);
            let position = *slot;
            *slot += 1;
            let item = MenuItem::new(format!("n{i}"), format!("Node {i}"), position);
            match parent {
                Some(p) => item.with_parent(format!("n{p}")),
                None => item,
            }
        })
        .collect();

    let mut editor = MenuEditor::load("fuzz", items, "en");
    assert!(editor.check().is_empty());
    for m in input.moves.iter().take(32) {
        let item = format!("n{}", usize::from(m.item) % count);
        let parent = m.parent.map(|p| format!("n{}", usize::from(p) % count));
        let _ = editor.move_item(&item, parent.as_deref(), usize::from(m.index));
        assert!(editor.check().is_empty());
    }
});
