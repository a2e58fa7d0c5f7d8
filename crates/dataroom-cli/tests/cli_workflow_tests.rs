//! CLI integration tests
//!
//! Each test drives the built binary against a fresh workspace directory.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const ROOT: &str = "default-data-room-root";

fn run(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dataroom-cli"))
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn ok(workspace: &Path, args: &[&str]) -> String {
    let output = run(workspace, args);
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn fails(workspace: &Path, args: &[&str]) -> String {
    let output = run(workspace, args);
    assert!(!output.status.success(), "{:?} unexpectedly succeeded", args);
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_fresh_workspace_lists_seeded_room() {
    let temp_dir = TempDir::new().unwrap();
    let stdout = ok(temp_dir.path(), &["room", "list"]);
    assert_eq!(stdout.trim(), "default-data-room\tData Room");
}

#[test]
fn test_folder_names_are_unique_ignoring_case() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    ok(ws, &["folder", "create", ROOT, "Finance", "--id", "fin"]);
    let stderr = fails(ws, &["folder", "create", ROOT, "  finance "]);
    assert!(stderr.contains("already exists"), "stderr: {}", stderr);

    let tree = ok(ws, &["tree"]);
    assert_eq!(tree.matches("Finance/").count(), 1);
}

#[test]
fn test_file_upload_and_download_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    let source = temp_dir.path().join("report.pdf");
    fs::write(&source, b"%PDF-1.7 body").unwrap();

    ok(&ws, &["file", "add", ROOT, source.to_str().unwrap(), "--id", "rep"]);
    let tree = ok(&ws, &["tree"]);
    assert!(tree.contains("report.pdf  13 bytes  file:rep"), "tree: {}", tree);

    let out = temp_dir.path().join("copy.pdf");
    ok(&ws, &["file", "get", "rep", out.to_str().unwrap()]);
    assert_eq!(fs::read(&out).unwrap(), b"%PDF-1.7 body");

    ok(&ws, &["file", "delete", "rep"]);
    fails(&ws, &["file", "get", "rep", out.to_str().unwrap()]);
}

#[test]
fn test_move_into_descendant_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    ok(ws, &["folder", "create", ROOT, "A", "--id", "a"]);
    ok(ws, &["folder", "create", ROOT, "B", "--id", "b"]);

    let stdout = ok(ws, &["move", "folder:a", "--to", "b"]);
    assert!(stdout.contains("Moved 1 folders and 0 files"));

    let stderr = fails(ws, &["move", "folder:b", "--to", "a"]);
    assert!(stderr.contains("move_into_descendant"), "stderr: {}", stderr);

    let stderr = fails(ws, &["move", &format!("folder:{}", ROOT), "--to", "a"]);
    assert!(stderr.contains("cannot_move_root"), "stderr: {}", stderr);
}

#[test]
fn test_tree_shows_tristate_selection() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    ok(ws, &["folder", "create", ROOT, "A", "--id", "a"]);
    ok(ws, &["folder", "create", "a", "A1", "--id", "a1"]);
    ok(ws, &["folder", "create", "a", "A2", "--id", "a2"]);

    let tree = ok(
        ws,
        &["tree", "--all", "--include", "folder:a", "--exclude", "folder:a1"],
    );
    assert!(tree.contains("[-] A/"), "tree: {}", tree);
    assert!(tree.contains("[ ] A1/"), "tree: {}", tree);
    assert!(tree.contains("[x] A2/"), "tree: {}", tree);

    let tree = ok(
        ws,
        &[
            "tree", "--all", "--include", "folder:a", "--exclude", "folder:a1", "--exclude",
            "folder:a2",
        ],
    );
    assert!(tree.contains("[ ] A/"), "tree: {}", tree);
}

#[test]
fn test_delete_selection_requires_confirmation() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    ok(ws, &["folder", "create", ROOT, "A", "--id", "a"]);
    ok(ws, &["folder", "create", "a", "A1", "--id", "a1"]);
    ok(ws, &["folder", "create", ROOT, "B", "--id", "b"]);

    let stdout = ok(ws, &["delete", "--include", "folder:a"]);
    assert!(stdout.contains("2 folders and 0 files in total"), "stdout: {}", stdout);
    assert!(ok(ws, &["tree"]).contains("A/"));

    ok(ws, &["delete", "--include", "folder:a", "--yes"]);
    let tree = ok(ws, &["tree"]);
    assert!(!tree.contains("A/"));
    assert!(tree.contains("B/"));
}

#[test]
fn test_zip_import_renames_collisions() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    let local = temp_dir.path().join("deck.pdf");
    fs::write(&local, b"old").unwrap();
    ok(&ws, &["file", "add", ROOT, local.to_str().unwrap()]);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    writer.start_file("slides/deck.pdf", options).unwrap();
    writer.write_all(b"new").unwrap();
    let archive = temp_dir.path().join("upload.zip");
    fs::write(&archive, writer.finish().unwrap().into_inner()).unwrap();

    let stdout = ok(&ws, &["import", ROOT, archive.to_str().unwrap()]);
    assert!(stdout.contains("Imported deck (2).pdf"), "stdout: {}", stdout);
    assert!(stdout.contains("1 imported, 0 skipped"));
}

#[test]
fn test_view_preferences_persist() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    ok(ws, &["folder", "create", ROOT, "alpha"]);
    ok(ws, &["folder", "create", ROOT, "beta"]);
    ok(ws, &["view", "set", "--direction", "desc"]);

    let view = fs::read_to_string(ws.join("view.toml")).unwrap();
    assert!(view.contains("direction = \"descending\""), "view: {}", view);

    let tree = ok(ws, &["tree"]);
    let beta = tree.find("beta/").unwrap();
    let alpha = tree.find("alpha/").unwrap();
    assert!(beta < alpha);
}

#[test]
fn test_script_applies_commands_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    let script = temp_dir.path().join("script.json");
    fs::write(
        &script,
        serde_json::json!([
            {
                "command": "create_folder",
                "data_room_id": "default-data-room",
                "parent_folder_id": ROOT,
                "folder_id": "legal",
                "name": "Legal"
            },
            { "command": "rename_folder", "folder_id": "legal", "name": "Legal & Tax" },
            { "command": "rename_folder", "folder_id": "missing", "name": "X" }
        ])
        .to_string(),
    )
    .unwrap();

    let stdout = ok(&ws, &["run", script.to_str().unwrap()]);
    assert!(stdout.contains("#2 rename_folder: ok"));
    assert!(stdout.contains("#3 rename_folder: rejected"));
    assert!(stdout.contains("2 commands applied"));
    assert!(ok(&ws, &["tree"]).contains("Legal & Tax/"));
}

#[test]
fn test_corrupt_state_falls_back_to_seed() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();
    fs::write(ws.join("state.json"), b"{ truncated").unwrap();

    let output = run(ws, &["room", "list"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Data Room"));
}
