//! Commands over a mixed set of folders and files
//!
//! Items are given as `folder:<id>` or `file:<id>`.

use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use dataroom_core::moves::apply_move;
use dataroom_core::ops::{self, file_ops};
use dataroom_core::{DataRoomId, FolderId, Mark, NodeId, SelectionMarks, SelectionSnapshot};
use dataroom_store::BlobStore;

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct MoveArgs {
    #[arg(required = true)]
    pub items: Vec<NodeId>,

    #[arg(long)]
    pub to: FolderId,

    /// Data room the items belong to (defaults to the first room)
    #[arg(long)]
    pub room: Option<DataRoomId>,
}

pub fn execute(args: MoveArgs, ws: &mut Workspace) -> CliResult {
    let room = ws.room(args.room.as_ref())?;
    let outcome = apply_move(&ws.state, &args.items, &room, Some(&args.to), Utc::now())
        .map_err(|rejection| format!("{} [{}]", rejection, rejection.code()))?;

    ws.commit(outcome.next_state)?;
    println!(
        "Moved {} folders and {} files into {}",
        outcome.moved_folders.len(),
        outcome.moved_files.len(),
        args.to
    );
    Ok(())
}

/// Selection given on the command line as include/exclude marks
#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Mark a node (and by default its subtree) as selected
    #[arg(long = "include")]
    pub include: Vec<NodeId>,

    /// Unmark a node inside an included folder
    #[arg(long = "exclude")]
    pub exclude: Vec<NodeId>,
}

impl SelectionArgs {
    pub fn marks(&self, ws: &Workspace) -> SelectionMarks {
        let mut marks = SelectionMarks::new();
        for node in &self.include {
            marks.set_mark(&ws.state, node, Mark::Include);
        }
        for node in &self.exclude {
            marks.set_mark(&ws.state, node, Mark::Exclude);
        }
        marks
    }
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(long)]
    pub room: Option<DataRoomId>,

    /// Actually delete; without it only the summary is printed
    #[arg(long)]
    pub yes: bool,
}

/// Delete the checked items of a selection
pub fn execute_delete(args: DeleteArgs, ws: &mut Workspace) -> CliResult {
    let room = ws.room(args.room.as_ref())?;
    let marks = args.selection.marks(ws);
    let (checked, summary) = {
        let snapshot = SelectionSnapshot::new(&ws.state, &marks);
        (snapshot.checked_set(&room), snapshot.summary(&room))
    };

    if checked.is_empty() {
        println!("Nothing selected");
        return Ok(());
    }
    println!(
        "Selected {} folders and {} files ({} folders and {} files in total)",
        summary.top_level_folder_count,
        summary.standalone_file_count,
        summary.total_folder_count,
        summary.total_file_count
    );
    if !args.yes {
        println!("Re-run with --yes to delete");
        return Ok(());
    }

    let now = Utc::now();
    let mut state = Arc::clone(&ws.state);
    let mut released = Vec::new();
    for folder_id in &checked.folder_ids {
        let result = ops::delete_folder_cascade(&state, folder_id, now);
        if let Some(rejection) = result.rejection {
            return Err(rejection.into());
        }
        released.extend(result.deleted_file_ids);
        state = result.next_state;
    }
    for file_id in &checked.file_ids {
        state = Arc::new(file_ops::try_delete_file(&state, file_id, now)?);
        released.push(file_id.clone());
    }

    ws.commit(state)?;
    for file_id in &released {
        ws.blobs.delete(file_id)?;
    }
    println!(
        "Deleted {} folders and {} files",
        summary.total_folder_count, summary.total_file_count
    );
    Ok(())
}
