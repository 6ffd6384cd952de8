//! JSON snapshot of the whole application state.

use serde::{Deserialize, Serialize};
use std::fs::{File, rename};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use volley_queue::{GameSettings, Roster, Session};

/// Everything the CLI keeps between runs.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AppState {
    pub roster: Roster,
    pub session: Session,
    pub settings: GameSettings,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupted state file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read the state file. A missing file is an empty state.
///
/// # Errors
///
/// Fails if the file exists but can't be read or parsed.
pub fn load(path: &Path) -> Result<AppState, StoreError> {
    if !path.exists() {
        log::info!("No state file at {}, starting fresh", path.display());
        return Ok(AppState::default());
    }

    let data = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let state: AppState = serde_json::from_str(&data).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loaded {} bytes from {}", data.len(), path.display());
    Ok(state)
}

/// Write the state file atomically.
///
/// # Errors
///
/// Fails on any IO error; the previous file is left intact.
pub fn save(path: &Path, state: &AppState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let data = serde_json::to_vec_pretty(state).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    // Write to a sibling temp file, then rename over the target
    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
        file.write_all(&data)
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&temp_path, e))?;
    }
    rename(&temp_path, path).map_err(|e| StoreError::io(path, e))?;

    log::debug!("Saved {} bytes to {}", data.len(), path.display());
    Ok(())
}
