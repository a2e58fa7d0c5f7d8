//! Tree rendering with selection state

use std::collections::BTreeSet;

use clap::Args;
use dataroom_core::view::visible_nodes;
use dataroom_core::{DataRoomId, FolderId, NodeId, SelectionMode, SelectionSnapshot};

use super::items::SelectionArgs;
use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[arg(long)]
    pub room: Option<DataRoomId>,

    /// Folders to open
    #[arg(long = "expand")]
    pub expand: Vec<FolderId>,

    /// Open every folder
    #[arg(long, conflicts_with = "expand")]
    pub all: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

pub fn execute(args: TreeArgs, ws: &Workspace) -> CliResult {
    let room_id = ws.room(args.room.as_ref())?;
    let room = ws
        .state
        .data_room(&room_id)
        .ok_or_else(|| format!("data room {} not found", room_id))?;

    let expanded: BTreeSet<FolderId> = if args.all {
        ws.state
            .folders()
            .filter(|folder| folder.data_room_id == room_id)
            .map(|folder| folder.id.clone())
            .collect()
    } else {
        args.expand.into_iter().collect()
    };

    let marks = args.selection.marks(ws);
    let snapshot = SelectionSnapshot::new(&ws.state, &marks);

    println!("{} ({})", room.name, room.id);
    for row in visible_nodes(&ws.state, &room_id, &expanded, &ws.view) {
        let indent = "  ".repeat(row.depth + 1);
        match &row.node {
            NodeId::Folder(id) => {
                let Some(folder) = ws.state.folder(id) else {
                    continue;
                };
                let check = match snapshot.folder_mode(id) {
                    SelectionMode::Full => "[x]",
                    SelectionMode::Partial => "[-]",
                    SelectionMode::None => "[ ]",
                };
                println!("{}{} {}/  {}", indent, check, folder.name, row.node);
            }
            NodeId::File(id) => {
                let Some(file) = ws.state.file(id) else {
                    continue;
                };
                let check = if snapshot.is_file_selected(id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                println!(
                    "{}{} {}  {} bytes  {}",
                    indent, check, file.name, file.size, row.node
                );
            }
        }
    }

    if !marks.is_empty() {
        let summary = snapshot.summary(&room_id);
        println!(
            "{} folders and {} files selected",
            summary.top_level_folder_count, summary.standalone_file_count
        );
    }
    Ok(())
}
