use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::marks::{Mark, SelectionMarks};
use crate::model::AggregateState;
use crate::traversal::collect_subtree;
use dataroom_core_types::{DataRoomId, FileId, FolderId, NodeId};

/// Tri-state checkbox value of a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    None,
    Partial,
    Full,
}

/// Ancestor-collapsed checked items of one data room
///
/// A fully selected folder appears alone, without its contents. Files appear
/// individually only when no ancestor folder is fully selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckedSet {
    pub folder_ids: Vec<FolderId>,
    pub file_ids: Vec<FileId>,
}

impl CheckedSet {
    pub fn is_empty(&self) -> bool {
        self.folder_ids.is_empty() && self.file_ids.is_empty()
    }

    /// Checked items as node ids, folders first
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.folder_ids
            .iter()
            .cloned()
            .map(NodeId::Folder)
            .chain(self.file_ids.iter().cloned().map(NodeId::File))
            .collect()
    }
}

/// Counts shown before deleting the checked items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub top_level_folder_count: usize,
    pub standalone_file_count: usize,
    /// Folders removed including every nested folder
    pub total_folder_count: usize,
    /// Files removed including every file in nested folders
    pub total_file_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct FolderFacts {
    selected: bool,
    has_selected_descendants: bool,
    mode: SelectionMode,
}

const UNSELECTED: FolderFacts = FolderFacts {
    selected: false,
    has_selected_descendants: false,
    mode: SelectionMode::None,
};

/// Read-only view of a selection over one state
///
/// Borrows both the state and the marks, so neither can change while the
/// snapshot's caches are alive. Build a new snapshot after any mutation.
pub struct SelectionSnapshot<'a> {
    state: &'a AggregateState,
    marks: &'a SelectionMarks,
    folder_marks: RefCell<HashMap<FolderId, Option<Mark>>>,
    facts: RefCell<HashMap<FolderId, FolderFacts>>,
}

impl<'a> SelectionSnapshot<'a> {
    pub fn new(state: &'a AggregateState, marks: &'a SelectionMarks) -> Self {
        Self {
            state,
            marks,
            folder_marks: RefCell::new(HashMap::new()),
            facts: RefCell::new(HashMap::new()),
        }
    }

    /// Nearest explicit mark on the folder or its ancestors
    pub fn mark_for_folder(&self, folder_id: &FolderId) -> Option<Mark> {
        if let Some(mark) = self.folder_marks.borrow().get(folder_id) {
            return *mark;
        }

        let mut walked = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(folder_id.clone());
        let mut found = None;

        while let Some(id) = current.take() {
            if let Some(mark) = self.folder_marks.borrow().get(&id) {
                found = *mark;
                break;
            }
            if !seen.insert(id.clone()) {
                break;
            }
            if let Some(mark) = self.marks.explicit_mark(&NodeId::Folder(id.clone())) {
                found = Some(mark);
                walked.push(id);
                break;
            }
            current = self
                .state
                .folder(&id)
                .and_then(|folder| folder.parent_folder_id.clone());
            walked.push(id);
        }

        let mut cache = self.folder_marks.borrow_mut();
        for id in walked {
            cache.insert(id, found);
        }
        found
    }

    /// The file's own mark, or else its parent folder's effective mark
    pub fn mark_for_file(&self, file_id: &FileId) -> Option<Mark> {
        self.marks
            .explicit_mark(&NodeId::File(file_id.clone()))
            .or_else(|| {
                self.state
                    .file(file_id)
                    .and_then(|file| self.mark_for_folder(&file.parent_folder_id))
            })
    }

    pub fn is_file_selected(&self, file_id: &FileId) -> bool {
        self.mark_for_file(file_id) == Some(Mark::Include)
    }

    /// Included folders count as selected only while something beneath them
    /// is still selected, unless they are empty
    pub fn is_folder_selected(&self, folder_id: &FolderId) -> bool {
        self.facts(folder_id).selected
    }

    pub fn has_selected_descendants(&self, folder_id: &FolderId) -> bool {
        self.facts(folder_id).has_selected_descendants
    }

    pub fn folder_mode(&self, folder_id: &FolderId) -> SelectionMode {
        self.facts(folder_id).mode
    }

    pub fn is_selected(&self, node: &NodeId) -> bool {
        match node {
            NodeId::Folder(id) => self.is_folder_selected(id),
            NodeId::File(id) => self.is_file_selected(id),
        }
    }

    fn facts(&self, folder_id: &FolderId) -> FolderFacts {
        if let Some(facts) = self.facts.borrow().get(folder_id) {
            return *facts;
        }
        self.compute_facts(folder_id);
        self.facts
            .borrow()
            .get(folder_id)
            .copied()
            .unwrap_or(UNSELECTED)
    }

    /// Post-order fill of the facts cache for the subtree under `start`
    fn compute_facts(&self, start: &FolderId) {
        let mut in_progress = HashSet::new();
        let mut stack = vec![(start.clone(), false)];

        while let Some((id, children_done)) = stack.pop() {
            if self.facts.borrow().contains_key(&id) {
                continue;
            }
            let Some(folder) = self.state.folder(&id) else {
                self.facts.borrow_mut().insert(id, UNSELECTED);
                continue;
            };

            if !children_done {
                if !in_progress.insert(id.clone()) {
                    // Revisited before completion: a cycle
                    continue;
                }
                stack.push((id.clone(), true));
                for child in &folder.child_folder_ids {
                    if !in_progress.contains(child) {
                        stack.push((child.clone(), false));
                    }
                }
                continue;
            }

            let child_facts: Vec<FolderFacts> = {
                let cache = self.facts.borrow();
                folder
                    .child_folder_ids
                    .iter()
                    .map(|child| cache.get(child).copied().unwrap_or(UNSELECTED))
                    .collect()
            };
            let file_selection: Vec<bool> = folder
                .file_ids
                .iter()
                .map(|file_id| self.is_file_selected(file_id))
                .collect();

            let has_selected_descendants = file_selection.iter().any(|selected| *selected)
                || child_facts
                    .iter()
                    .any(|facts| facts.selected || facts.has_selected_descendants);
            let included = self.mark_for_folder(&id) == Some(Mark::Include);
            let selected = included && (folder.is_empty() || has_selected_descendants);

            let mode = if selected
                && file_selection.iter().all(|selected| *selected)
                && child_facts.iter().all(|facts| facts.mode == SelectionMode::Full)
            {
                SelectionMode::Full
            } else if !selected && !has_selected_descendants {
                SelectionMode::None
            } else {
                SelectionMode::Partial
            };

            self.facts.borrow_mut().insert(
                id,
                FolderFacts {
                    selected,
                    has_selected_descendants,
                    mode,
                },
            );
        }
    }

    /// Ancestor-collapsed checked items of a data room
    ///
    /// Walks down from the root. A fully selected non-root folder is taken as
    /// one item; otherwise its selected files are taken individually and its
    /// subfolders are examined in turn.
    pub fn checked_set(&self, data_room_id: &DataRoomId) -> CheckedSet {
        let mut checked = CheckedSet::default();
        let Some(root) = self.state.root_folder(data_room_id) else {
            return checked;
        };

        let mut visited = HashSet::new();
        let mut stack = vec![root.id.clone()];

        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(folder) = self.state.folder(&id) else {
                continue;
            };

            if folder.parent_folder_id.is_some() && self.folder_mode(&id) == SelectionMode::Full {
                checked.folder_ids.push(id);
                continue;
            }

            checked.file_ids.extend(
                folder
                    .file_ids
                    .iter()
                    .filter(|file_id| self.state.file(file_id).is_some())
                    .filter(|file_id| self.is_file_selected(file_id))
                    .cloned(),
            );
            stack.extend(folder.child_folder_ids.iter().rev().cloned());
        }

        checked
    }

    /// Counts for confirming a delete of the checked items
    pub fn summary(&self, data_room_id: &DataRoomId) -> SelectionSummary {
        let checked = self.checked_set(data_room_id);
        let mut summary = SelectionSummary {
            top_level_folder_count: checked.folder_ids.len(),
            standalone_file_count: checked.file_ids.len(),
            total_folder_count: 0,
            total_file_count: checked.file_ids.len(),
        };
        for folder_id in &checked.folder_ids {
            let subtree = collect_subtree(self.state, folder_id);
            summary.total_folder_count += subtree.folder_count();
            summary.total_file_count += subtree.file_count();
        }
        summary
    }
}
