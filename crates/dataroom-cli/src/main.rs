//! Data room CLI
//!
//! Command-line front end over a workspace directory holding the saved
//! state, the file blobs and the view preferences.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dataroom_core::logging_facility::{self, Profile};

mod commands;
mod workspace;

use workspace::Workspace;

#[derive(Debug, Parser)]
#[command(name = "dataroom")]
#[command(about = "Data room - organize documents into rooms and folders", long_about = None)]
struct Cli {
    /// Workspace directory (created on first write)
    #[arg(long, global = true, default_value = ".dataroom")]
    workspace: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Data room operations
    Room(commands::room::RoomArgs),
    /// Folder operations
    Folder(commands::folder::FolderArgs),
    /// File operations
    File(commands::file::FileArgs),
    /// Move a mixed set of folders and files into one folder
    Move(commands::items::MoveArgs),
    /// Delete the checked items of a selection
    Delete(commands::items::DeleteArgs),
    /// Print a data room's tree with selection state
    Tree(commands::tree::TreeArgs),
    /// Import the files of a ZIP archive into a folder
    Import(commands::import::ImportArgs),
    /// Show or change sort preferences
    View(commands::view::ViewArgs),
    /// Apply a JSON script of commands
    Run(commands::run::RunArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = Workspace::open(&cli.workspace).and_then(|mut ws| match cli.command {
        Commands::Room(args) => commands::room::execute(args, &mut ws),
        Commands::Folder(args) => commands::folder::execute(args, &mut ws),
        Commands::File(args) => commands::file::execute(args, &mut ws),
        Commands::Move(args) => commands::items::execute(args, &mut ws),
        Commands::Delete(args) => commands::items::execute_delete(args, &mut ws),
        Commands::Tree(args) => commands::tree::execute(args, &ws),
        Commands::Import(args) => commands::import::execute(args, &mut ws),
        Commands::View(args) => commands::view::execute(args, &mut ws),
        Commands::Run(args) => commands::run::execute(args, &mut ws),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
