//! Data room commands
//!
//! Usage: dataroom room <list|create|rename|delete>

use chrono::Utc;
use clap::{Args, Subcommand};
use dataroom_core::ops::{self, data_room_ops};
use dataroom_core::{DataRoomId, FolderId};
use dataroom_store::BlobStore;
use std::sync::Arc;

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct RoomArgs {
    #[command(subcommand)]
    pub command: RoomCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomCommand {
    /// List data rooms in display order
    List,
    Create {
        name: String,
        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<DataRoomId>,
    },
    Rename { room: DataRoomId, name: String },
    /// Delete a data room with all of its folders and files
    Delete {
        room: DataRoomId,
        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn execute(args: RoomArgs, ws: &mut Workspace) -> CliResult {
    match args.command {
        RoomCommand::List => {
            for room in ws.state.data_rooms() {
                println!("{}\t{}", room.id, room.name);
            }
            Ok(())
        }
        RoomCommand::Create { name, id } => {
            let room_id = id.unwrap_or_else(DataRoomId::generate);
            let next = data_room_ops::try_create_data_room(
                &ws.state,
                &room_id,
                &FolderId::generate(),
                &name,
                Utc::now(),
            )?;
            ws.commit(Arc::new(next))?;
            println!("Created data room {}", room_id);
            Ok(())
        }
        RoomCommand::Rename { room, name } => {
            let next = data_room_ops::try_rename_data_room(&ws.state, &room, &name, Utc::now())?;
            ws.commit(Arc::new(next))?;
            println!("Renamed data room {}", room);
            Ok(())
        }
        RoomCommand::Delete { room, dry_run } => {
            if dry_run {
                let summary = ops::preview_data_room_delete(&ws.state, &room)
                    .ok_or_else(|| format!("data room {} not found", room))?;
                println!(
                    "Would delete {} folders and {} files",
                    summary.folder_count(),
                    summary.file_count()
                );
                return Ok(());
            }

            let result = ops::delete_data_room(&ws.state, &room);
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
            if let Some(fallback) = result.fallback_data_room_id {
                println!("Current data room: {}", fallback);
            }
            Ok(())
        }
    }
}
