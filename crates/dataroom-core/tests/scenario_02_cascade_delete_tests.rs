//! Scenario 02: cascading deletes and delete previews

mod common;

use common::{file_id, folder_id, Fixture};
use dataroom_core::ops;
use dataroom_core::rules::validate_state;
use dataroom_core::traversal::collect_subtree;
use dataroom_core::{DataRoomError, DataRoomId, FolderId};

#[test]
fn test_scenario_02_delete_nested_folder_reports_counts() {
    // GIVEN root/A/A1 with a file in A and one in A1
    let mut fx = Fixture::nested();

    // WHEN deleting A
    let now = fx.now();
    let result = ops::delete_folder_cascade(&fx.state, &folder_id("a"), now);

    // THEN both folders and both files are gone and the view falls back to root
    assert!(result.deleted);
    assert_eq!(result.deleted_folder_count, 2);
    assert_eq!(result.deleted_file_count, 2);
    assert_eq!(result.fallback_folder_id, Some(fx.root.clone()));

    let next = &result.next_state;
    assert!(next.folder(&folder_id("a")).is_none());
    assert!(next.folder(&folder_id("a1")).is_none());
    assert!(next.file(&file_id("fa1")).is_none());
    assert!(next.folder(&fx.root).unwrap().child_folder_ids.is_empty());
    assert!(validate_state(next).is_ok());
}

#[test]
fn test_scenario_02_delete_removes_exactly_subtree() {
    let mut fx = Fixture::nested();
    fx.folder("root", "b", "B").file("b", "fb", "b.pdf", 1);

    let scope = collect_subtree(&fx.state, &folder_id("a"));
    let now = fx.now();
    let result = ops::delete_folder_cascade(&fx.state, &folder_id("a"), now);

    assert_eq!(
        fx.state.folder_count() - result.next_state.folder_count(),
        scope.folder_count()
    );
    assert_eq!(
        fx.state.file_count() - result.next_state.file_count(),
        scope.file_count()
    );
    assert!(result.next_state.file(&file_id("fb")).is_some());

    let mut deleted = result.deleted_file_ids.clone();
    deleted.sort();
    assert_eq!(deleted, vec![file_id("fa"), file_id("fa1")]);
}

#[test]
fn test_scenario_02_preview_matches_delete() {
    let mut fx = Fixture::nested();
    let preview = ops::preview_folder_delete(&fx.state, &folder_id("a")).unwrap();

    let now = fx.now();
    let result = ops::delete_folder_cascade(&fx.state, &folder_id("a"), now);

    assert_eq!(preview.folder_count(), result.deleted_folder_count);
    assert_eq!(preview.file_count(), result.deleted_file_count);
    assert!(ops::preview_folder_delete(&fx.state, &folder_id("ghost")).is_none());
}

#[test]
fn test_scenario_02_root_cannot_be_deleted() {
    let mut fx = Fixture::nested();
    let now = fx.now();
    let root = fx.root.clone();
    let result = ops::delete_folder_cascade(&fx.state, &root, now);

    assert!(!result.deleted);
    assert_eq!(result.deleted_folder_count, 0);
    assert_eq!(result.fallback_folder_id, None);
    assert!(matches!(
        result.rejection,
        Some(DataRoomError::RootFolderImmutable { .. })
    ));
    assert!(ops::is_noop(&fx.state, &result.next_state));
}

#[test]
fn test_scenario_02_delete_data_room_removes_everything() {
    let mut fx = Fixture::nested();
    let now = fx.now();
    let second = DataRoomId::try_new("second").unwrap();
    let state = ops::create_data_room(
        &fx.state,
        &second,
        &FolderId::try_new("second-root").unwrap(),
        "Second",
        now,
    );

    let result = ops::delete_data_room(&state, &fx.room);

    assert!(result.deleted);
    assert_eq!(result.deleted_folder_count, 3);
    assert_eq!(result.deleted_file_count, 2);
    assert_eq!(result.fallback_data_room_id, Some(second.clone()));
    assert_eq!(result.next_state.data_room_order(), &[second]);
    assert_eq!(result.next_state.folder_count(), 1);
    assert_eq!(result.next_state.file_count(), 0);
    assert!(validate_state(&result.next_state).is_ok());
}

#[test]
fn test_scenario_02_delete_last_room_has_no_fallback() {
    let fx = Fixture::seeded();
    let result = ops::delete_data_room(&fx.state, &fx.room);

    assert!(result.deleted);
    assert_eq!(result.fallback_data_room_id, None);
    assert_eq!(result.next_state.folder_count(), 0);
}

#[test]
fn test_scenario_02_delete_file_detaches_from_parent() {
    let mut fx = Fixture::nested();
    let now = fx.now();
    let next = ops::delete_file(&fx.state, &file_id("fa"), now);

    assert!(next.file(&file_id("fa")).is_none());
    assert!(next.folder(&folder_id("a")).unwrap().file_ids.is_empty());
    assert_eq!(next.data_room(&fx.room).unwrap().updated_at, now);
}
