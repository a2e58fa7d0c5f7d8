//! Display ordering of folder contents
//!
//! Sort preferences are an explicit [`ViewConfig`] value handed to each call;
//! the engine keeps no view state of its own.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::AggregateState;
use crate::rules::normalize_name;
use dataroom_core_types::{DataRoomId, FolderId, NodeId};

pub use crate::traversal::folder_path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
    Size,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// How folder contents are ordered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// List subfolders before files regardless of the sort key
    pub folders_first: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort_key: SortKey::Name,
            direction: SortDirection::Ascending,
            folders_first: true,
        }
    }
}

struct SortEntry {
    node: NodeId,
    name_key: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    size: u64,
}

impl SortEntry {
    fn compare(&self, other: &Self, config: &ViewConfig) -> Ordering {
        let primary = match config.sort_key {
            SortKey::Name => Ordering::Equal,
            SortKey::CreatedAt => self.created_at.cmp(&other.created_at),
            SortKey::UpdatedAt => self.updated_at.cmp(&other.updated_at),
            SortKey::Size => self.size.cmp(&other.size),
        };
        let ordering = primary
            .then_with(|| self.name_key.cmp(&other.name_key))
            .then_with(|| self.node.cmp(&other.node));
        match config.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Children of a folder in display order
///
/// Names compare case-insensitively. Folders have no size and sort as zero
/// under [`SortKey::Size`]. Missing child ids are skipped.
pub fn sorted_children(state: &AggregateState, folder_id: &FolderId, config: &ViewConfig) -> Vec<NodeId> {
    let Some(folder) = state.folder(folder_id) else {
        return Vec::new();
    };

    let mut folders: Vec<SortEntry> = folder
        .child_folder_ids
        .iter()
        .filter_map(|id| state.folder(id))
        .map(|child| SortEntry {
            node: NodeId::Folder(child.id.clone()),
            name_key: normalize_name(&child.name),
            created_at: child.created_at,
            updated_at: child.updated_at,
            size: 0,
        })
        .collect();
    let mut files: Vec<SortEntry> = folder
        .file_ids
        .iter()
        .filter_map(|id| state.file(id))
        .map(|file| SortEntry {
            node: NodeId::File(file.id.clone()),
            name_key: normalize_name(&file.name),
            created_at: file.created_at,
            updated_at: file.updated_at,
            size: file.size,
        })
        .collect();

    let entries = if config.folders_first {
        folders.sort_by(|a, b| a.compare(b, config));
        files.sort_by(|a, b| a.compare(b, config));
        folders.extend(files);
        folders
    } else {
        folders.extend(files);
        folders.sort_by(|a, b| a.compare(b, config));
        folders
    };

    entries.into_iter().map(|entry| entry.node).collect()
}

/// A row of the rendered tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleNode {
    pub node: NodeId,
    /// Zero for children of the root folder
    pub depth: usize,
}

/// Rows of a data room's tree, depth first, descending only into expanded
/// folders; the root folder is always open and not listed itself
pub fn visible_nodes(
    state: &AggregateState,
    data_room_id: &DataRoomId,
    expanded: &BTreeSet<FolderId>,
    config: &ViewConfig,
) -> Vec<VisibleNode> {
    let mut rows = Vec::new();
    let Some(root) = state.root_folder(data_room_id) else {
        return rows;
    };

    let mut visited = HashSet::new();
    visited.insert(root.id.clone());
    let mut stack: Vec<VisibleNode> = sorted_children(state, &root.id, config)
        .into_iter()
        .rev()
        .map(|node| VisibleNode { node, depth: 0 })
        .collect();

    while let Some(row) = stack.pop() {
        if let NodeId::Folder(id) = &row.node {
            if !visited.insert(id.clone()) {
                continue;
            }
            if expanded.contains(id) {
                let depth = row.depth + 1;
                stack.extend(
                    sorted_children(state, id, config)
                        .into_iter()
                        .rev()
                        .map(|node| VisibleNode { node, depth }),
                );
            }
        }
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataRoom, FileNode, Folder};
    use chrono::Duration;
    use dataroom_core_types::FileId;

    fn fid(id: &str) -> FolderId {
        FolderId::try_new(id).unwrap()
    }

    fn file(id: &str) -> FileId {
        FileId::try_new(id).unwrap()
    }

    fn room() -> DataRoomId {
        DataRoomId::try_new("room").unwrap()
    }

    fn fixture() -> AggregateState {
        let t0 = Utc::now();
        let mut state = AggregateState::new();
        state.insert_data_room(DataRoom::new(room(), "Room".into(), fid("root"), t0));
        state.push_data_room_order(room());

        let mut root = Folder::new_root(fid("root"), room(), "Room".into(), t0);
        root.child_folder_ids = vec![fid("zeta"), fid("alpha")];
        root.file_ids = vec![file("big"), file("small")];
        let mut alpha = Folder::new_child(fid("alpha"), room(), fid("root"), "alpha".into(), t0);
        alpha.file_ids = vec![file("inner")];
        let zeta = Folder::new_child(fid("zeta"), room(), fid("root"), "Zeta".into(), t0 + Duration::seconds(1));

        for folder in [root, alpha, zeta] {
            state.insert_folder(folder);
        }
        state.insert_file(FileNode::new(file("big"), fid("root"), "b.pdf".into(), 900, t0));
        state.insert_file(FileNode::new(file("small"), fid("root"), "A.pdf".into(), 5, t0));
        state.insert_file(FileNode::new(file("inner"), fid("alpha"), "in.pdf".into(), 1, t0));
        state
    }

    #[test]
    fn test_default_sort_is_name_folders_first() {
        let state = fixture();
        let children = sorted_children(&state, &fid("root"), &ViewConfig::default());
        assert_eq!(
            children,
            vec![
                NodeId::Folder(fid("alpha")),
                NodeId::Folder(fid("zeta")),
                NodeId::File(file("small")),
                NodeId::File(file("big")),
            ]
        );
    }

    #[test]
    fn test_size_descending_mixed() {
        let state = fixture();
        let config = ViewConfig {
            sort_key: SortKey::Size,
            direction: SortDirection::Descending,
            folders_first: false,
        };
        let children = sorted_children(&state, &fid("root"), &config);
        assert_eq!(children[0], NodeId::File(file("big")));
        assert_eq!(children[1], NodeId::File(file("small")));
    }

    #[test]
    fn test_visible_nodes_respects_expansion() {
        let state = fixture();
        let collapsed = visible_nodes(&state, &room(), &BTreeSet::new(), &ViewConfig::default());
        assert_eq!(collapsed.len(), 4);

        let expanded: BTreeSet<_> = [fid("alpha")].into_iter().collect();
        let rows = visible_nodes(&state, &room(), &expanded, &ViewConfig::default());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1].node, NodeId::File(file("inner")));
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn test_folder_path_is_breadcrumb() {
        let state = fixture();
        assert_eq!(folder_path(&state, &fid("alpha")), vec![fid("root"), fid("alpha")]);
    }
}
