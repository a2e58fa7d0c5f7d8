//! Versioned JSON persistence of the aggregate state
//!
//! Loading never fails the caller: a missing, unreadable, malformed,
//! outdated or structurally invalid file is replaced by the seeded state and
//! the reason is reported in [`LoadSource`].

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dataroom_core::model::CURRENT_SCHEMA_VERSION;
use dataroom_core::rules::validate_state;
use dataroom_core::seed::seeded_state;
use dataroom_core::{log_op_end, log_op_error, log_op_start, AggregateState};

use crate::atomic::atomic_write;
use crate::errors::{io_error, Result, StoreError};

/// Where a loaded state came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Read from disk and valid
    Loaded,
    /// No file yet
    SeededMissing,
    /// File exists but could not be read
    SeededUnreadable { reason: String },
    /// Not JSON, or not shaped like a state
    SeededMalformed { reason: String },
    SeededVersionMismatch { found: Option<u64> },
    /// Parsed but broke a structural invariant
    SeededInvalid { reason: String },
}

impl LoadSource {
    pub fn is_seeded(&self) -> bool {
        !matches!(self, LoadSource::Loaded)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedState {
    pub state: AggregateState,
    pub source: LoadSource,
}

/// Write the state as pretty JSON, atomically
///
/// # Errors
///
/// Returns `Serialization` or `Io` errors; the previous file is left intact.
pub fn save_state(path: &Path, state: &AggregateState) -> Result<()> {
    let started = Instant::now();
    log_op_start!("save_state", path = %path.display());

    let result = serde_json::to_vec_pretty(state)
        .map_err(StoreError::from)
        .and_then(|bytes| atomic_write(path, &bytes));

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(()) => log_op_end!("save_state", duration_ms = duration_ms),
        Err(err) => log_op_error!("save_state", err, duration_ms = duration_ms),
    }
    result
}

/// Load the state at `path`, substituting the seeded state when needed
pub fn load_state(path: &Path, now: DateTime<Utc>) -> LoadedState {
    let started = Instant::now();
    log_op_start!("load_state", path = %path.display());

    let source = match read_state(path) {
        Ok(state) => {
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            log_op_end!("load_state", duration_ms = duration_ms);
            return LoadedState {
                state,
                source: LoadSource::Loaded,
            };
        }
        Err(source) => source,
    };

    match &source {
        LoadSource::SeededMissing => {
            tracing::info!(path = %path.display(), "no saved state, starting from seed")
        }
        other => tracing::warn!(
            path = %path.display(),
            reason = ?other,
            "saved state unusable, starting from seed"
        ),
    }

    LoadedState {
        state: seeded_state(now),
        source,
    }
}

fn read_state(path: &Path) -> std::result::Result<AggregateState, LoadSource> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadSource::SeededMissing),
        Err(e) => {
            return Err(LoadSource::SeededUnreadable {
                reason: io_error("read_state", e).to_string(),
            })
        }
    };

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| LoadSource::SeededMalformed {
            reason: e.to_string(),
        })?;

    let found = value.get("schema_version").and_then(|v| v.as_u64());
    if found != Some(u64::from(CURRENT_SCHEMA_VERSION)) {
        return Err(LoadSource::SeededVersionMismatch { found });
    }

    let state: AggregateState =
        serde_json::from_value(value).map_err(|e| LoadSource::SeededMalformed {
            reason: e.to_string(),
        })?;

    validate_state(&state).map_err(|e| LoadSource::SeededInvalid {
        reason: e.to_string(),
    })?;

    Ok(state)
}
