//! ZIP import
//!
//! Usage: dataroom import <FOLDER> <ARCHIVE>

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use dataroom_core::{FileId, FolderId};
use dataroom_store::{extract_zip, import_into_folder, ArchiveLimits, BlobStore};

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct ImportArgs {
    pub folder: FolderId,

    pub archive: PathBuf,

    /// Refuse archives with more entries than this
    #[arg(long)]
    pub max_entries: Option<usize>,
}

pub fn execute(args: ImportArgs, ws: &mut Workspace) -> CliResult {
    if ws.state.folder(&args.folder).is_none() {
        return Err(format!("folder {} not found", args.folder).into());
    }

    let mut limits = ArchiveLimits::default();
    if let Some(max_entries) = args.max_entries {
        limits.max_entries = max_entries;
    }

    let bytes = fs::read(&args.archive)?;
    let files = extract_zip(&bytes, &limits)?;
    let report = import_into_folder(&ws.state, &args.folder, files, FileId::generate, Utc::now());

    for file in &report.imported {
        ws.blobs.put(&file.file_id, &file.bytes)?;
    }
    if report.imported_count() > 0 {
        ws.commit(report.next_state.clone())?;
    }

    for file in &report.imported {
        println!("Imported {}  {}", file.name, file.file_id);
    }
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.name, skipped.reason);
    }
    println!(
        "{} imported, {} skipped",
        report.imported_count(),
        report.skipped_count()
    );
    Ok(())
}
