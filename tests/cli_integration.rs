// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the portal-menu CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const ADMIN_MENU: &str = r#"{
    "workspaceName": "admin",
    "menuItems": [
        { "id": "home", "key": "HOME", "name": "Home", "position": 0 },
        {
            "id": "admin",
            "key": "ADMIN",
            "name": "Admin",
            "position": 1,
            "i18n": { "de": "Verwaltung" }
        },
        { "id": "users", "key": "USERS", "name": "Users", "parentItemId": "admin", "position": 0 },
        { "id": "roles", "key": "ROLES", "name": "Roles", "parentItemId": "admin", "position": 1 }
    ]
}"#;

/// Data directory seeded with the `admin` workspace menu
fn seeded_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("admin.menu.json"), ADMIN_MENU).unwrap();
    dir
}

/// portal-menu isolated from the user's config and environment
fn portal_menu(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portal-menu").unwrap();
    cmd.env("PORTAL_MENU_DATA_DIR", data_dir.path())
        .env("HOME", data_dir.path())
        .env("XDG_CONFIG_HOME", data_dir.path().join("config"))
        .env_remove("PORTAL_MENU_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn stored_items(data_dir: &TempDir, workspace: &str) -> Vec<Value> {
    let content = fs::read_to_string(data_dir.path().join(format!("{workspace}.menu.json"))).unwrap();
    let doc: Value = serde_json::from_str(&content).unwrap();
    doc["menuItems"].as_array().cloned().unwrap_or_default()
}

fn stored_item(data_dir: &TempDir, workspace: &str, id: &str) -> Value {
    stored_items(data_dir, workspace)
        .into_iter()
        .find(|item| item["id"] == id)
        .unwrap_or_else(|| panic!("item {id} not stored"))
}

#[test]
fn test_tree_shows_collapsed_and_expanded_branches() {
    let dir = seeded_dir();

    portal_menu(&dir)
        .args(["tree", "admin"])
        .assert()
        .success()
        .stdout("• Home [home]\n▸ Admin [admin]\n");

    portal_menu(&dir)
        .args(["tree", "admin", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▾ Admin [admin]\n  • Users [users]\n  • Roles [roles]\n"));

    portal_menu(&dir)
        .args(["--lang", "de", "tree", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verwaltung [admin]"));
}

#[test]
fn test_empty_workspace() {
    let dir = TempDir::new().unwrap();

    portal_menu(&dir)
        .args(["tree", "unknown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Menu of unknown is empty"));
}

#[test]
fn test_expand_state_persists() {
    let dir = seeded_dir();

    portal_menu(&dir)
        .args(["expand", "admin", "ADMIN"])
        .assert()
        .success()
        .stdout("1 node(s) expanded in admin\n");

    portal_menu(&dir)
        .args(["tree", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▾ Admin [admin]\n  • Users [users]"));

    portal_menu(&dir)
        .args(["collapse", "admin", "--all"])
        .assert()
        .success()
        .stdout("0 node(s) expanded in admin\n");

    portal_menu(&dir)
        .args(["expand", "admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Give an item or --all"));
}

#[test]
fn test_move_within_parent() {
    let dir = seeded_dir();

    portal_menu(&dir)
        .args(["move", "admin", "roles", "--parent", "admin", "--index", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved roles to admin (2 position update(s))"))
        .stdout(predicate::str::contains("  roles -> 0\n  users -> 1\n"));

    assert_eq!(stored_item(&dir, "admin", "roles")["position"], 0);
    assert_eq!(stored_item(&dir, "admin", "users")["position"], 1);

    portal_menu(&dir).args(["check", "admin"]).assert().success();
}

#[test]
fn test_move_to_root_renumbers_both_groups() {
    let dir = seeded_dir();

    portal_menu(&dir)
        .args(["move", "admin", "USERS", "--index", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  roles -> 0\n  users -> 0\n  home -> 1\n  admin -> 2\n"));

    let users = stored_item(&dir, "admin", "users");
    assert!(users.get("parentItemId").is_none());
    assert_eq!(users["position"], 0);
    assert_eq!(stored_item(&dir, "admin", "roles")["position"], 0);
    assert_eq!(stored_item(&dir, "admin", "admin")["position"], 2);

    portal_menu(&dir).args(["check", "admin"]).assert().success();
}

#[test]
fn test_move_dry_run_stores_nothing() {
    let dir = seeded_dir();
    let before = fs::read_to_string(dir.path().join("admin.menu.json")).unwrap();

    portal_menu(&dir)
        .args(["move", "admin", "home", "--parent", "admin", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would move home to admin"));

    let after = fs::read_to_string(dir.path().join("admin.menu.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_move_below_itself_fails() {
    let dir = seeded_dir();

    portal_menu(&dir)
        .args(["move", "admin", "admin", "--parent", "users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below itself"));

    portal_menu(&dir)
        .args(["move", "admin", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Menu item not found: ghost"));
}

#[test]
fn test_item_lifecycle() {
    let dir = seeded_dir();

    portal_menu(&dir)
        .args([
            "add", "admin", "AUDIT", "Audit log", "--parent", "ADMIN", "--url", "/admin/audit",
            "--label", "de=Protokoll",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created menu item: Audit log"))
        .stdout(predicate::str::contains("position: 2"));

    portal_menu(&dir)
        .args(["add", "admin", "AUDIT", "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key already in use"));

    portal_menu(&dir)
        .args(["edit", "admin", "AUDIT", "--name", "Audit trail", "--disable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated menu item: Audit trail"));

    portal_menu(&dir)
        .args(["tree", "admin", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("• Audit trail [").and(predicate::str::contains("(disabled)")));

    portal_menu(&dir)
        .args(["languages", "admin"])
        .assert()
        .success()
        .stdout("de\n");

    portal_menu(&dir)
        .args(["remove", "admin", "ADMIN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 4 menu item(s):"));

    let items = stored_items(&dir, "admin");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "home");
    assert_eq!(items[0]["position"], 0);
}

#[test]
fn test_check_and_fix_positions() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("gappy.menu.json"),
        r#"{
            "workspaceName": "gappy",
            "menuItems": [
                { "id": "a", "name": "A", "position": 0 },
                { "id": "b", "name": "B", "position": 5 }
            ]
        }"#,
    )
    .unwrap();

    portal_menu(&dir)
        .args(["check", "gappy"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Problems in menu of gappy (1):"));

    portal_menu(&dir)
        .args(["check", "gappy", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renumbered 1 item(s)."));

    portal_menu(&dir)
        .args(["check", "gappy"])
        .assert()
        .success()
        .stdout("Menu of gappy is consistent (2 items).\n");
}

#[test]
fn test_check_fix_refuses_dangling_parent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.menu.json");
    fs::write(
        &path,
        r#"{
            "workspaceName": "broken",
            "menuItems": [
                { "id": "a", "name": "A", "position": 0 },
                { "id": "lost", "name": "Lost", "parentItemId": "gone", "position": 3 }
            ]
        }"#,
    )
    .unwrap();
    let before = fs::read_to_string(&path).unwrap();

    portal_menu(&dir)
        .args(["check", "broken"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("lost references missing parent gone"));

    portal_menu(&dir)
        .args(["check", "broken", "--fix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be fixed by renumbering"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_export_import_round_trip() {
    let dir = seeded_dir();
    let snapshot = dir.path().join("snapshot.json");

    portal_menu(&dir)
        .args(["export", "admin", "--output"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 item(s)"));

    let exported: Value = serde_json::from_str(&fs::read_to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(exported["workspaceName"], "admin");
    assert!(exported["exportedAt"].is_string());

    portal_menu(&dir)
        .args(["import", "staging"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout("Imported 4 menu item(s) into staging\n");

    let items = stored_items(&dir, "staging");
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|item| item["workspaceName"] == "staging"));

    portal_menu(&dir)
        .args(["tree", "staging", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  • Roles [roles]"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("portal-menu.toml");

    portal_menu(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "preview_language", "fr"])
        .assert()
        .failure();

    fs::write(&config, "").unwrap();

    portal_menu(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "preview_language", "fr"])
        .assert()
        .success();

    portal_menu(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "preview_language"])
        .assert()
        .success()
        .stdout("fr\n");

    portal_menu(&dir)
        .args(["config", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();

    portal_menu(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("portal-menu"));
}
