// CLASSIFICATION: COMMUNITY
// Filename: error.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-04-02

//! Error taxonomy for the slot lifecycle.
//!
//! Nothing here is fatal to the process: engine rejections are recovered by
//! the rollback cascade, and a missing disk turns the download path into a
//! successful no-op. The worst outcome is the awaiting-image state with
//! deny-by-default authorization upstream.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by slot registry and download operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No persistent storage was mounted at init time.
    #[error("persistent storage unavailable")]
    DiskUnavailable,

    /// A slot data file could not be created or opened for writing.
    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The database engine rejected a candidate data file.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Neither slot holds a database proven good.
    #[error("no valid database slot")]
    NoValidSlot,

    /// Marker or data file I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
