//! Folder commands

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};
use dataroom_core::ops::{self, folder_ops};
use dataroom_core::FolderId;
use dataroom_store::BlobStore;

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    Create {
        parent: FolderId,
        name: String,
        #[arg(long)]
        id: Option<FolderId>,
    },
    Rename {
        folder: FolderId,
        name: String,
    },
    Move {
        folder: FolderId,
        destination: FolderId,
    },
    /// Delete a folder and everything inside it
    Delete {
        folder: FolderId,
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn execute(args: FolderArgs, ws: &mut Workspace) -> CliResult {
    let now = Utc::now();
    match args.command {
        FolderCommand::Create { parent, name, id } => {
            let data_room_id = ws
                .state
                .folder(&parent)
                .map(|folder| folder.data_room_id.clone())
                .ok_or_else(|| format!("folder {} not found", parent))?;
            let folder_id = id.unwrap_or_else(FolderId::generate);
            let next =
                folder_ops::try_create_folder(&ws.state, &data_room_id, &parent, &folder_id, &name, now)?;
            ws.commit(Arc::new(next))?;
            println!("Created folder {}", folder_id);
        }
        FolderCommand::Rename { folder, name } => {
            let next = folder_ops::try_rename_folder(&ws.state, &folder, &name, now)?;
            ws.commit(Arc::new(next))?;
            println!("Renamed folder {}", folder);
        }
        FolderCommand::Move {
            folder,
            destination,
        } => {
            let next = folder_ops::try_move_folder(&ws.state, &folder, &destination, now)?;
            ws.commit(Arc::new(next))?;
            println!("Moved folder {} into {}", folder, destination);
        }
        FolderCommand::Delete { folder, dry_run } => {
            if dry_run {
                let summary = ops::preview_folder_delete(&ws.state, &folder)
                    .ok_or_else(|| format!("folder {} not found", folder))?;
                println!(
                    "Would delete {} folders and {} files",
                    summary.folder_count(),
                    summary.file_count()
                );
                return Ok(());
            }

            let result = ops::delete_folder_cascade(&ws.state, &folder, now);
            if let Some(rejection) = result.rejection {
                return Err(rejection.into());
            }
            ws.commit(result.next_state)?;
            for file_id in &result.deleted_file_ids {
                ws.blobs.delete(file_id)?;
            }
            println!(
                "Deleted {} folders and {} files",
                result.deleted_folder_count, result.deleted_file_count
            );
        }
    }
    Ok(())
}
