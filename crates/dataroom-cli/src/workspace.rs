//! On-disk workspace: `state.json`, `view.toml` and `blobs/`

use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use dataroom_core::{AggregateState, DataRoomId, ViewConfig};
use dataroom_store::{load_state, save_state, FsBlobStore, LoadSource};

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

const STATE_FILE: &str = "state.json";
const VIEW_FILE: &str = "view.toml";
const BLOB_DIR: &str = "blobs";

pub struct Workspace {
    dir: PathBuf,
    pub state: Arc<AggregateState>,
    pub view: ViewConfig,
    pub blobs: FsBlobStore,
}

impl Workspace {
    /// Load the workspace at `dir`; nothing is written until a commit
    pub fn open(dir: &Path) -> CliResult<Self> {
        let loaded = load_state(&dir.join(STATE_FILE), Utc::now());
        match &loaded.source {
            LoadSource::Loaded | LoadSource::SeededMissing => {}
            other => eprintln!(
                "warning: saved state could not be used ({:?}); starting from a fresh data room",
                other
            ),
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            state: Arc::new(loaded.state),
            view: load_view(&dir.join(VIEW_FILE))?,
            blobs: FsBlobStore::new(dir.join(BLOB_DIR)),
        })
    }

    /// Adopt `next` and persist it
    pub fn commit(&mut self, next: Arc<AggregateState>) -> CliResult {
        self.state = next;
        save_state(&self.dir.join(STATE_FILE), &self.state)?;
        Ok(())
    }

    pub fn save_view(&self) -> CliResult {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(VIEW_FILE), toml::to_string_pretty(&self.view)?)?;
        Ok(())
    }

    /// The requested room, or the first room in display order
    pub fn room(&self, requested: Option<&DataRoomId>) -> CliResult<DataRoomId> {
        match requested {
            Some(id) if self.state.data_room(id).is_some() => Ok(id.clone()),
            Some(id) => Err(format!("data room {} not found", id).into()),
            None => self
                .state
                .data_rooms()
                .next()
                .map(|room| room.id.clone())
                .ok_or_else(|| "workspace has no data rooms".into()),
        }
    }
}

fn load_view(path: &Path) -> CliResult<ViewConfig> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(ViewConfig::default()),
        Err(e) => Err(e.into()),
    }
}
