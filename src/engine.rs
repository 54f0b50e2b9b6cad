// CLASSIFICATION: COMMUNITY
// Filename: engine.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-04-07

//! Collaborator seams.
//!
//! The query engine consuming a slot's data file and the transport
//! delivering replacement images both live outside this crate; the traits
//! here are the only surface the lifecycle core touches. The firmware
//! links its SQLite wrapper and MQTT manager behind them.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure reported by the engine when asked to open a data file.
#[derive(Debug, Error)]
#[error("database engine rejected {}: {reason}", path.display())]
pub struct EngineError {
    /// Data file the engine was pointed at.
    pub path: PathBuf,
    /// Engine-specific description of the failure.
    pub reason: String,
}

/// The database engine serving authorization queries.
pub trait DatabaseEngine {
    /// Open the engine against `path`, replacing any previous connection.
    fn open(&mut self, path: &Path) -> std::result::Result<(), EngineError>;

    /// Close the current connection if one exists. Must be idempotent.
    fn close(&mut self);
}

/// Transport callback surface: ask for the current image to be fetched
/// and replayed from the start.
pub trait Transport {
    /// Request a fresh database download.
    fn force_db_download(&mut self);
}

/// Minimal engine for host-side tooling: accepts any data file that exists
/// and is non-empty. The firmware substitutes the real SQLite wrapper.
#[derive(Debug, Default)]
pub struct FileProbeEngine {
    open_path: Option<PathBuf>,
}

impl FileProbeEngine {
    /// New engine with no open file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the currently open data file, if any.
    pub fn open_path(&self) -> Option<&Path> {
        self.open_path.as_deref()
    }
}

impl DatabaseEngine for FileProbeEngine {
    fn open(&mut self, path: &Path) -> std::result::Result<(), EngineError> {
        self.close();
        match fs::metadata(path) {
            Ok(meta) if meta.len() > 0 => {
                self.open_path = Some(path.to_path_buf());
                Ok(())
            }
            Ok(_) => Err(EngineError {
                path: path.to_path_buf(),
                reason: "empty database file".into(),
            }),
            Err(e) => Err(EngineError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    fn close(&mut self) {
        self.open_path = None;
    }
}
