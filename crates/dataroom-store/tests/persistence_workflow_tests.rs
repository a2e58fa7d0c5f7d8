//! Store collaborators driven together: persist, reload, import, purge

use std::fs;
use std::io::{Cursor, Write};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use dataroom_core::ops;
use dataroom_core::seed::{seeded_state, SEED_ROOT_FOLDER_ID};
use dataroom_core::{FileId, FolderId};
use dataroom_store::{
    extract_zip, import_into_folder, load_state, purge_orphans, save_state, ArchiveLimits,
    BlobStore, FsBlobStore, LoadSource,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn root() -> FolderId {
    FolderId::try_new(SEED_ROOT_FOLDER_ID).unwrap()
}

fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn sequential_ids() -> impl FnMut() -> FileId {
    let mut next = 0;
    move || {
        next += 1;
        FileId::try_new(format!("file-{}", next)).unwrap()
    }
}

#[test]
fn test_saved_state_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let state = Arc::new(seeded_state(now));
    let state = ops::create_file(
        &state,
        &root(),
        &FileId::try_new("f1").unwrap(),
        "report.pdf",
        42,
        now,
    );
    save_state(&path, &state).unwrap();

    let loaded = load_state(&path, Utc::now());
    assert_eq!(loaded.source, LoadSource::Loaded);
    assert_eq!(&loaded.state, state.as_ref());
}

#[test]
fn test_malformed_json_falls_back_to_seed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, b"{ not json").unwrap();

    let loaded = load_state(&path, Utc::now());
    assert!(matches!(loaded.source, LoadSource::SeededMalformed { .. }));
    assert!(loaded.source.is_seeded());
    assert_eq!(loaded.state.data_rooms().count(), 1);
}

#[test]
fn test_structurally_invalid_state_falls_back_to_seed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut value = serde_json::to_value(seeded_state(Utc::now())).unwrap();
    value["data_room_order"] = serde_json::json!([]);
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let loaded = load_state(&path, Utc::now());
    assert!(matches!(loaded.source, LoadSource::SeededInvalid { .. }));
}

#[test]
fn test_missing_schema_version_is_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, br#"{"data_room_order": []}"#).unwrap();

    let loaded = load_state(&path, Utc::now());
    assert_eq!(
        loaded.source,
        LoadSource::SeededVersionMismatch { found: None }
    );
}

#[test]
fn test_archive_import_renames_collisions_and_stores_bytes() {
    let dir = TempDir::new().unwrap();
    let blobs = FsBlobStore::new(dir.path().join("blobs"));
    let now = Utc::now();

    let state = Arc::new(seeded_state(now));
    let state = ops::create_file(
        &state,
        &root(),
        &FileId::try_new("existing").unwrap(),
        "deck.pdf",
        1,
        now,
    );

    let archive = zip_of(&[("q/deck.pdf", b"new deck"), ("notes.pdf", b"notes")]);
    let files = extract_zip(&archive, &ArchiveLimits::default()).unwrap();
    let report = import_into_folder(&state, &root(), files, sequential_ids(), now);

    assert_eq!(report.imported_count(), 2);
    assert_eq!(report.skipped_count(), 0);
    let names: Vec<_> = report.imported.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["deck (2).pdf", "notes.pdf"]);

    for file in &report.imported {
        blobs.put(&file.file_id, &file.bytes).unwrap();
    }
    let first = &report.imported[0];
    assert_eq!(blobs.get(&first.file_id).unwrap(), Some(b"new deck".to_vec()));
    assert_eq!(report.next_state.file(&first.file_id).unwrap().size, 8);
}

#[test]
fn test_import_with_only_invalid_names_is_noop() {
    let now = Utc::now();
    let state = Arc::new(seeded_state(now));
    let files = vec![dataroom_store::ExtractedFile {
        name: "..".into(),
        bytes: b"x".to_vec(),
    }];

    let report = import_into_folder(&state, &root(), files, sequential_ids(), now);
    assert_eq!(report.skipped_count(), 1);
    assert!(ops::is_noop(&state, &report.next_state));
}

#[test]
fn test_purge_removes_blobs_of_deleted_files() {
    let dir = TempDir::new().unwrap();
    let blobs = FsBlobStore::new(dir.path());
    let now = Utc::now();

    let keep = FileId::try_new("keep").unwrap();
    let gone = FileId::try_new("gone").unwrap();
    let state = Arc::new(seeded_state(now));
    let state = ops::create_file(&state, &root(), &keep, "keep.pdf", 1, now);
    let state = ops::create_file(&state, &root(), &gone, "gone.pdf", 1, now);
    blobs.put(&keep, b"k").unwrap();
    blobs.put(&gone, b"g").unwrap();

    let state = ops::delete_file(&state, &gone, now);
    let purged = purge_orphans(&blobs, &state).unwrap();

    assert_eq!(purged, vec![gone.clone()]);
    assert_eq!(blobs.get(&gone).unwrap(), None);
    assert!(blobs.get(&keep).unwrap().is_some());
}
