//! Sort preferences, persisted in `view.toml`

use clap::{Args, Subcommand, ValueEnum};
use dataroom_core::view::{SortDirection, SortKey};

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(subcommand)]
    pub command: ViewCommand,
}

#[derive(Debug, Subcommand)]
pub enum ViewCommand {
    Show,
    Set {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        #[arg(long, value_enum)]
        direction: Option<DirectionArg>,

        #[arg(long)]
        folders_first: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Created,
    Updated,
    Size,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Created => SortKey::CreatedAt,
            SortArg::Updated => SortKey::UpdatedAt,
            SortArg::Size => SortKey::Size,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Ascending,
            DirectionArg::Desc => SortDirection::Descending,
        }
    }
}

pub fn execute(args: ViewArgs, ws: &mut Workspace) -> CliResult {
    match args.command {
        ViewCommand::Show => {}
        ViewCommand::Set {
            sort,
            direction,
            folders_first,
        } => {
            if let Some(sort) = sort {
                ws.view.sort_key = sort.into();
            }
            if let Some(direction) = direction {
                ws.view.direction = direction.into();
            }
            if let Some(folders_first) = folders_first {
                ws.view.folders_first = folders_first;
            }
            ws.save_view()?;
        }
    }
    print!("{}", toml::to_string_pretty(&ws.view)?);
    Ok(())
}
