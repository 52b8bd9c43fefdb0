// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for tree mapping and position recalculation

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use portal_menu::editor::MenuEditor;
use portal_menu::positions::calculate_new_positions;
use portal_menu::tree::{flatten_to_list, map_to_tree_nodes, nest_flat_items};
use portal_menu::types::{ExpansionState, MenuItem};

/// `groups` root items with `per_group` children each, stored in reverse order
fn flat_menu(groups: usize, per_group: usize) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(groups * (per_group + 1));
    for g in (0..groups).rev() {
        items.push(MenuItem::new(format!("g{g}"), format!("Group {g}"), g as i32));
        for c in (0..per_group).rev() {
            items.push(
                MenuItem::new(format!("g{g}c{c}"), format!("Item {g}.{c}"), c as i32)
                    .with_parent(format!("g{g}")),
            );
        }
    }
    items
}

fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_to_tree_nodes");

    for (groups, per_group) in [(10, 10), (50, 20), (200, 50)] {
        let nested = nest_flat_items(flat_menu(groups, per_group));
        let expansion = ExpansionState::new();
        group.bench_with_input(
            BenchmarkId::from_parameter(groups * (per_group + 1)),
            &nested,
            |b, nested| {
                b.iter_batched(
                    || nested.clone(),
                    |mut items| {
                        let tree = map_to_tree_nodes(&mut items, "en", &expansion);
                        black_box(tree.len());
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_new_positions");

    let mut nested = nest_flat_items(flat_menu(200, 50));
    let tree = map_to_tree_nodes(&mut nested, "en", &ExpansionState::new());

    group.bench_function("between_parents", |b| {
        b.iter(|| calculate_new_positions(black_box(Some("g3")), black_box(Some("g197")), &tree));
    });
    group.bench_function("into_root", |b| {
        b.iter(|| calculate_new_positions(black_box(Some("g197")), black_box(None), &tree));
    });

    group.finish();
}

fn bench_flatten(c: &mut Criterion) {
    let nested = nest_flat_items(flat_menu(200, 50));

    c.bench_function("flatten_to_list", |b| {
        b.iter(|| black_box(flatten_to_list(&nested).len()));
    });
}

fn bench_move(c: &mut Criterion) {
    let editor = MenuEditor::load("bench", flat_menu(50, 20), "en");

    c.bench_function("editor_move_item", |b| {
        b.iter_batched(
            || editor.clone(),
            |mut editor| {
                let outcome = editor.move_item("g10c5", Some("g40"), 3);
                black_box(outcome.map(|o| o.batch.len()))
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_mapping, bench_positions, bench_flatten, bench_move);
criterion_main!(benches);
