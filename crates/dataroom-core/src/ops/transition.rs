use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::Result;
use crate::model::AggregateState;
use crate::traversal::SubtreeSummary;
use crate::{log_op_end, log_op_rejected};

/// Did a transition leave the state untouched?
pub fn is_noop(previous: &Arc<AggregateState>, next: &Arc<AggregateState>) -> bool {
    Arc::ptr_eq(previous, next)
}

/// Turn a `try_*` result into the public no-op-on-rejection form
pub(crate) fn commit(
    op: &'static str,
    state: &Arc<AggregateState>,
    started: Instant,
    result: Result<AggregateState>,
) -> Arc<AggregateState> {
    match result {
        Ok(next) => {
            log_op_end!(op, duration_ms = elapsed_ms(started));
            Arc::new(next)
        }
        Err(err) => {
            log_op_rejected!(op, &err);
            Arc::clone(state)
        }
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Remove everything in `scope` from `state`, leaving no dangling references
///
/// Folders and files whose parent is being removed but that the child lists
/// did not mention are swept too and added to `scope`, so nothing is left
/// pointing at a missing parent.
pub(crate) fn purge(state: &mut AggregateState, scope: &mut SubtreeSummary) {
    loop {
        let stray: BTreeSet<_> = state
            .folders()
            .filter(|folder| !scope.folder_ids.contains(&folder.id))
            .filter(|folder| {
                folder
                    .parent_folder_id
                    .as_ref()
                    .is_some_and(|parent| scope.folder_ids.contains(parent))
            })
            .map(|folder| folder.id.clone())
            .collect();
        if stray.is_empty() {
            break;
        }
        tracing::warn!(
            stray_folders = stray.len(),
            "sweeping folders missing from their parent's child list"
        );
        scope.folder_ids.extend(stray);
    }

    let stray_files: Vec<_> = state
        .files()
        .filter(|file| scope.folder_ids.contains(&file.parent_folder_id))
        .filter(|file| !scope.file_ids.contains(&file.id))
        .map(|file| file.id.clone())
        .collect();
    scope.file_ids.extend(stray_files);

    for id in &scope.folder_ids {
        state.remove_folder(id);
    }
    for id in &scope.file_ids {
        state.remove_file(id);
    }
    for folder in state.folders_by_id.values_mut() {
        folder.child_folder_ids.retain(|id| !scope.folder_ids.contains(id));
        folder.file_ids.retain(|id| !scope.file_ids.contains(id));
    }
}
