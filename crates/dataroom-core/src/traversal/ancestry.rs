use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::model::AggregateState;
use dataroom_core_types::{FileId, FolderId};

/// Is `folder_id` inside `possible_ancestor_id`?
///
/// Walks parent pointers upward with no depth bound. A folder is inside
/// itself. The walk stops on the first repeated id or missing folder, so a
/// corrupted parent chain answers `false` instead of looping.
pub fn is_descendant(
    state: &AggregateState,
    folder_id: &FolderId,
    possible_ancestor_id: &FolderId,
) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(folder_id);

    while let Some(id) = current {
        if id == possible_ancestor_id {
            return true;
        }
        if !visited.insert(id) {
            // Cycle in the parent chain
            return false;
        }
        current = state
            .folder(id)
            .and_then(|folder| folder.parent_folder_id.as_ref());
    }

    false
}

/// Is the file located somewhere inside `folder_id` (directly or nested)?
pub fn is_file_inside_folder(state: &AggregateState, file_id: &FileId, folder_id: &FolderId) -> bool {
    state
        .file(file_id)
        .is_some_and(|file| is_descendant(state, &file.parent_folder_id, folder_id))
}

/// Every folder and file transitively owned by a folder, the folder included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubtreeSummary {
    pub folder_ids: BTreeSet<FolderId>,
    pub file_ids: BTreeSet<FileId>,
}

impl SubtreeSummary {
    pub fn folder_count(&self) -> usize {
        self.folder_ids.len()
    }

    pub fn file_count(&self) -> usize {
        self.file_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folder_ids.is_empty() && self.file_ids.is_empty()
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: SubtreeSummary) {
        self.folder_ids.extend(other.folder_ids);
        self.file_ids.extend(other.file_ids);
    }
}

/// Collect the subtree rooted at `root_folder_id`
///
/// Iterative (explicit stack) so deep trees cannot exhaust the call stack.
/// Follows child lists; ids that are listed but missing from the state are
/// skipped, and each folder is expanded at most once. This is the single
/// source of truth for cascading-delete scope and delete previews.
///
/// A missing root yields an empty summary.
pub fn collect_subtree(state: &AggregateState, root_folder_id: &FolderId) -> SubtreeSummary {
    let mut summary = SubtreeSummary::default();
    if state.folder(root_folder_id).is_none() {
        return summary;
    }

    let mut stack = vec![root_folder_id];
    while let Some(folder_id) = stack.pop() {
        let Some(folder) = state.folder(folder_id) else {
            continue;
        };
        if !summary.folder_ids.insert(folder_id.clone()) {
            continue;
        }

        summary.file_ids.extend(
            folder
                .file_ids
                .iter()
                .filter(|id| state.file(id).is_some())
                .cloned(),
        );
        stack.extend(folder.child_folder_ids.iter().rev());
    }

    summary
}

/// Folder ids from the data room root down to `folder_id` (breadcrumb order)
///
/// Returns an empty path for a missing folder. A broken or cyclic chain is cut
/// at the point where it breaks.
pub fn folder_path(state: &AggregateState, folder_id: &FolderId) -> Vec<FolderId> {
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(folder_id);

    while let Some(id) = current {
        let Some(folder) = state.folder(id) else {
            break;
        };
        if !visited.insert(id) {
            break;
        }
        path.push(id.clone());
        current = folder.parent_folder_id.as_ref();
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Folder, FileNode};
    use chrono::Utc;
    use dataroom_core_types::DataRoomId;

    fn fid(id: &str) -> FolderId {
        FolderId::try_new(id).unwrap()
    }

    /// root -> a -> b, with file x in b
    fn chain() -> AggregateState {
        let now = Utc::now();
        let room = DataRoomId::try_new("room").unwrap();
        let mut state = AggregateState::new();

        let mut root = Folder::new_root(fid("root"), room.clone(), "Root".into(), now);
        let mut a = Folder::new_child(fid("a"), room.clone(), fid("root"), "A".into(), now);
        let mut b = Folder::new_child(fid("b"), room, fid("a"), "B".into(), now);
        root.child_folder_ids.push(fid("a"));
        a.child_folder_ids.push(fid("b"));
        let x = FileId::try_new("x").unwrap();
        b.file_ids.push(x.clone());

        state.insert_folder(root);
        state.insert_folder(a);
        state.insert_folder(b);
        state.insert_file(FileNode::new(x, fid("b"), "x.pdf".into(), 1, now));
        state
    }

    #[test]
    fn test_is_descendant_inclusive() {
        let state = chain();
        assert!(is_descendant(&state, &fid("b"), &fid("root")));
        assert!(is_descendant(&state, &fid("b"), &fid("b")));
        assert!(!is_descendant(&state, &fid("a"), &fid("b")));
    }

    #[test]
    fn test_is_descendant_terminates_on_cycle() {
        let mut state = chain();
        state.folder_mut(&fid("a")).unwrap().parent_folder_id = Some(fid("b"));

        assert!(!is_descendant(&state, &fid("b"), &fid("root")));
    }

    #[test]
    fn test_collect_subtree_counts() {
        let state = chain();
        let summary = collect_subtree(&state, &fid("a"));
        assert_eq!(summary.folder_count(), 2);
        assert_eq!(summary.file_count(), 1);
        assert!(summary.folder_ids.contains(&fid("a")));
    }

    #[test]
    fn test_collect_subtree_survives_child_list_cycle() {
        let mut state = chain();
        state
            .folder_mut(&fid("b"))
            .unwrap()
            .child_folder_ids
            .push(fid("a"));

        let summary = collect_subtree(&state, &fid("a"));
        assert_eq!(summary.folder_count(), 2);
    }

    #[test]
    fn test_collect_subtree_missing_root() {
        let state = chain();
        assert!(collect_subtree(&state, &fid("nope")).is_empty());
    }

    #[test]
    fn test_folder_path() {
        let state = chain();
        assert_eq!(
            folder_path(&state, &fid("b")),
            vec![fid("root"), fid("a"), fid("b")]
        );
        assert!(folder_path(&state, &fid("nope")).is_empty());
    }
}
