// CLASSIFICATION: COMMUNITY
// Filename: download.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-04-11

//! Streaming download session for the non-current slot.
//!
//! The transport delivers the replacement image as arbitrarily sized
//! chunks; this session appends them to the other slot's data file. The
//! serving slot is never touched. Clearing the target's valid marker
//! before the first byte lands means a crash mid-download can never leave
//! a half-written file marked valid.

use std::fs::{File, OpenOptions};
use std::io;
use std::io::Write;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::marker;
use crate::registry::SlotRegistry;
use crate::slot::SlotId;

/// Byte-stream session writing into the other slot.
/// `Idle -> Downloading -> Idle` via [`finish`](Self::finish) or
/// [`cancel`](Self::cancel).
pub struct DownloadSession {
    active: Option<(SlotId, File)>,
}

impl DownloadSession {
    /// New idle session.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Whether a download is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Open the other slot's data file for writing, discarding any stale
    /// image and markers it held. No-op if already downloading.
    pub fn start(&mut self, registry: &SlotRegistry) -> Result<()> {
        if self.active.is_some() {
            return Ok(());
        }
        let target = registry.other();
        let files = registry.files(target);

        // valid must be cleared before any new byte is written
        marker::clear(&files.valid)?;
        marker::clear(&files.preferred)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&files.data)
            .map_err(|source| Error::FileOpen {
                path: files.data.clone(),
                source,
            })?;

        debug!("downloading into slot {target}");
        self.active = Some((target, file));
        Ok(())
    }

    /// Append a chunk, lazily starting the session. Returns the number of
    /// bytes accepted; chunk boundaries are transparent.
    pub fn write(&mut self, registry: &SlotRegistry, bytes: &[u8]) -> Result<usize> {
        if self.active.is_none() {
            self.start(registry)?;
        }
        if let Some((_, file)) = self.active.as_mut() {
            file.write_all(bytes)?;
        }
        Ok(bytes.len())
    }

    /// Close the data file and report which slot received the image, or
    /// `None` when no download was active.
    pub fn finish(&mut self) -> Option<SlotId> {
        self.active.take().map(|(slot, file)| {
            drop(file);
            slot
        })
    }

    /// Drop an in-progress download: close and delete the partial file.
    /// Markers stay as `start` left them, so the slot remains not valid.
    pub fn cancel(&mut self, registry: &SlotRegistry) -> io::Result<()> {
        if let Some((slot, file)) = self.active.take() {
            drop(file);
            info!("download into slot {slot} cancelled");
            match std::fs::remove_file(&registry.files(slot).data) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for DownloadSession {
    fn default() -> Self {
        Self::new()
    }
}
