use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::snapshot::SelectionSnapshot;
use crate::model::AggregateState;
use crate::traversal::collect_subtree;
use dataroom_core_types::NodeId;

/// Explicit selection mark on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Include,
    Exclude,
}

/// Sparse include/exclude marks
///
/// A node is in at most one of the two sets. Nodes in neither inherit from
/// their nearest marked ancestor folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionMarks {
    included: BTreeSet<NodeId>,
    excluded: BTreeSet<NodeId>,
}

impl SelectionMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build marks by replaying user toggles in order
    pub fn from_touches<'a>(
        state: &AggregateState,
        touches: impl IntoIterator<Item = &'a NodeId>,
    ) -> Self {
        let mut marks = Self::new();
        for node in touches {
            marks.toggle(state, node);
        }
        marks
    }

    /// The node's own explicit mark, ignoring ancestors
    pub fn explicit_mark(&self, node: &NodeId) -> Option<Mark> {
        if self.included.contains(node) {
            Some(Mark::Include)
        } else if self.excluded.contains(node) {
            Some(Mark::Exclude)
        } else {
            None
        }
    }

    pub fn included(&self) -> &BTreeSet<NodeId> {
        &self.included
    }

    pub fn excluded(&self) -> &BTreeSet<NodeId> {
        &self.excluded
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }

    /// Put an explicit mark on `node`
    ///
    /// Marks on the node's descendants are cleared so they inherit the new
    /// mark instead of contradicting it.
    pub fn set_mark(&mut self, state: &AggregateState, node: &NodeId, mark: Mark) {
        if let NodeId::Folder(folder_id) = node {
            if state.folder(folder_id).is_some() {
                let subtree = collect_subtree(state, folder_id);
                for id in subtree.folder_ids.iter().filter(|id| *id != folder_id) {
                    let descendant = NodeId::Folder(id.clone());
                    self.included.remove(&descendant);
                    self.excluded.remove(&descendant);
                }
                for id in &subtree.file_ids {
                    let descendant = NodeId::File(id.clone());
                    self.included.remove(&descendant);
                    self.excluded.remove(&descendant);
                }
            }
        }

        match mark {
            Mark::Include => {
                self.excluded.remove(node);
                self.included.insert(node.clone());
            }
            Mark::Exclude => {
                self.included.remove(node);
                self.excluded.insert(node.clone());
            }
        }
    }

    /// Flip the node's effective selection
    pub fn toggle(&mut self, state: &AggregateState, node: &NodeId) {
        let selected = SelectionSnapshot::new(state, self).is_selected(node);
        let mark = if selected { Mark::Exclude } else { Mark::Include };
        self.set_mark(state, node, mark);
    }

    /// Include every node in `visible`, e.g. the rows currently rendered
    pub fn select_all<'a>(&mut self, state: &AggregateState, visible: impl IntoIterator<Item = &'a NodeId>) {
        for node in visible {
            self.set_mark(state, node, Mark::Include);
        }
    }

    /// Exclude every node in `visible`
    pub fn clear_all<'a>(&mut self, state: &AggregateState, visible: impl IntoIterator<Item = &'a NodeId>) {
        for node in visible {
            self.set_mark(state, node, Mark::Exclude);
        }
    }

    /// Drop marks on nodes that no longer exist in `state`
    pub fn retain_existing(&mut self, state: &AggregateState) {
        let exists = |node: &NodeId| match node {
            NodeId::Folder(id) => state.folder(id).is_some(),
            NodeId::File(id) => state.file(id).is_some(),
        };
        self.included.retain(|node| exists(node));
        self.excluded.retain(|node| exists(node));
    }

    pub fn clear(&mut self) {
        self.included.clear();
        self.excluded.clear();
    }
}
