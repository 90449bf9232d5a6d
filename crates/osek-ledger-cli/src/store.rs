use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use osek_ledger_core::state::AnnualState;

use crate::input;

/// The annual state document on disk, one JSON file per ledger.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and validate the document, or start a fresh one for `default_year`.
    pub fn load_or_default(
        &self,
        default_year: i32,
    ) -> Result<AnnualState, Box<dyn std::error::Error>> {
        if !self.exists() {
            log::info!(
                "No state at {}; starting a new {} ledger",
                self.path.display(),
                default_year
            );
            return Ok(AnnualState::new(default_year));
        }

        let mut state: AnnualState = input::file::read_json(&self.path)?;
        if let Err(e) = state.validate() {
            log::warn!("State at {} failed validation: {}", self.path.display(), e);
            return Err(format!("Invalid state file '{}': {}", self.path.display(), e).into());
        }
        log::debug!(
            "Loaded {} ledger revision {} from {}",
            state.year,
            state.revision,
            self.path.display()
        );
        Ok(state)
    }

    /// Write `state` back, bumping its revision.
    ///
    /// Holds `<path>.lock` from the revision check until the new document is
    /// in place. Fails without writing when another save holds the lock or
    /// when the document on disk has moved past the revision `state` was
    /// loaded at.
    pub fn save(&self, state: &mut AnnualState) -> Result<(), Box<dyn std::error::Error>> {
        let _lock = StateLock::acquire(self.lock_path())?;

        if self.exists() {
            let on_disk: AnnualState = input::file::read_json(&self.path)?;
            if on_disk.revision != state.revision {
                return Err(format!(
                    "State at '{}' changed since it was loaded (revision {} on disk, {} loaded); re-run the command",
                    self.path.display(),
                    on_disk.revision,
                    state.revision
                )
                .into());
            }
        }

        let contents = serde_json::to_string_pretty(&AnnualState {
            revision: state.revision + 1,
            ..state.clone()
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| format!("Failed to create a temp file in '{}': {}", dir.display(), e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| format!("Failed to write '{}': {}", tmp.path().display(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| format!("Failed to replace '{}': {}", self.path.display(), e.error))?;

        state.revision += 1;
        log::info!("Saved revision {} to {}", state.revision, self.path.display());
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }
}

/// Exclusive save lock, released on drop.
struct StateLock {
    path: PathBuf,
}

impl StateLock {
    fn acquire(path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(StateLock { path }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(format!(
                "State is locked by another command ('{}' exists); re-run the command, or remove the lock file if no other command is running",
                path.display()
            )
            .into()),
            Err(e) => Err(format!("Failed to create lock '{}': {}", path.display(), e).into()),
        }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Failed to remove lock '{}': {}", self.path.display(), e);
        }
    }
}
