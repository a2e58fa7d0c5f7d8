//! Scripted commands
//!
//! The script is a JSON array of commands tagged by `"command"`, e.g.
//! `[{"command": "rename_folder", "folder_id": "f-1", "name": "Legal"}]`.
//! Commands apply in order; the script stops at the first rejection unless
//! `--keep-going` is given. Blobs left without a file are purged at the end.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use dataroom_core::{apply, Command, Outcome};
use dataroom_store::purge_orphans;

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct RunArgs {
    pub script: PathBuf,

    #[arg(long)]
    pub keep_going: bool,
}

pub fn execute(args: RunArgs, ws: &mut Workspace) -> CliResult {
    let commands: Vec<Command> = serde_json::from_str(&fs::read_to_string(&args.script)?)?;

    let mut state = ws.state.clone();
    let mut applied = 0usize;
    for (index, command) in commands.into_iter().enumerate() {
        let op = command.op_name();
        let outcome = apply(&state, command, Utc::now());

        if outcome.is_noop(&state) {
            let reason = match &outcome {
                Outcome::MoveRejected { rejection, .. } => rejection.to_string(),
                Outcome::DataRoomDeleted(result) => rejection_text(result.rejection.as_ref()),
                Outcome::FolderDeleted(result) => rejection_text(result.rejection.as_ref()),
                _ => "rejected".to_string(),
            };
            println!("#{} {}: {}", index + 1, op, reason);
            if !args.keep_going {
                break;
            }
            continue;
        }

        println!("#{} {}: ok", index + 1, op);
        applied += 1;
        state = outcome.into_next_state();
    }

    if applied > 0 {
        ws.commit(state)?;
        let purged = purge_orphans(&ws.blobs, &ws.state)?;
        if !purged.is_empty() {
            println!("Released {} stored files", purged.len());
        }
    }
    println!("{} commands applied", applied);
    Ok(())
}

fn rejection_text(rejection: Option<&dataroom_core::DataRoomError>) -> String {
    rejection.map_or_else(|| "rejected".to_string(), ToString::to_string)
}
