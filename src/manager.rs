// CLASSIFICATION: COMMUNITY
// Filename: manager.rs v0.7
// Author: Lukas Bower
// Date Modified: 2026-04-19

//! Activation controller and boot recovery.
//!
//! One [`UpdateManager`] owns the registry, the download session and the
//! collaborator handles for the process lifetime. All operations run to
//! completion inline on the caller's stack; ordering of the individual
//! file writes, not atomicity, carries crash consistency.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::download::DownloadSession;
use crate::engine::{DatabaseEngine, Transport};
use crate::error::{Error, Result};
use crate::marker;
use crate::registry::SlotRegistry;
use crate::slot::{SlotId, SlotLayout};

/// Overall serving state of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// A slot is open in the engine and serving queries.
    Serving,
    /// No usable slot. Authorization upstream falls back to
    /// deny-by-default until a finished download repopulates a slot.
    AwaitingImage,
}

/// Owns the two slots and drives download, activation and recovery.
pub struct UpdateManager<E: DatabaseEngine, T: Transport> {
    registry: SlotRegistry,
    session: DownloadSession,
    engine: E,
    transport: T,
    disk_ok: bool,
    state: ControllerState,
}

impl<E: DatabaseEngine, T: Transport> UpdateManager<E, T> {
    /// Build the controller. Call [`init`](Self::init) once from setup
    /// before delivering any transport traffic.
    pub fn new(layout: SlotLayout, engine: E, transport: T) -> Self {
        Self {
            registry: SlotRegistry::new(layout),
            session: DownloadSession::new(),
            engine,
            transport,
            disk_ok: false,
            state: ControllerState::AwaitingImage,
        }
    }

    /// Boot recovery: pick a slot from the persisted markers and activate
    /// it, or request a fresh image when neither slot is usable.
    ///
    /// With no persistent storage the controller runs degraded: every
    /// download operation becomes a successful no-op and no engine is
    /// opened.
    pub fn init(&mut self, disk_available: bool) -> Result<()> {
        self.disk_ok = disk_available;
        if !disk_available {
            info!("no persistent storage, running without database updates");
            return Ok(());
        }

        match self.registry.preferred_slot() {
            Some(slot) => {
                if slot != self.registry.current() {
                    // align the registry with the marker that won
                    self.registry.swap()?;
                }
                self.open_with_rollback();
            }
            None => {
                error!("{}, requesting a fresh download", Error::NoValidSlot);
                self.request_fresh_image();
            }
        }
        Ok(())
    }

    /// Open the other slot for writing. With no disk this reports success
    /// and the incoming image is discarded as it arrives.
    pub fn start_download(&mut self) -> bool {
        if !self.disk_ok {
            debug!("ignoring download attempt, no disk available");
            return true;
        }
        match self.session.start(&self.registry) {
            Ok(()) => true,
            Err(e) => {
                warn!("cannot start download: {e}");
                false
            }
        }
    }

    /// Append a chunk of the incoming image, starting a session lazily.
    /// Returns the number of bytes accepted.
    pub fn write_to_database_file(&mut self, bytes: &[u8]) -> Result<usize> {
        if !self.disk_ok {
            return Ok(bytes.len());
        }
        self.session.write(&self.registry, bytes)
    }

    /// Close the downloaded file, mark its slot valid and try to activate
    /// it. The session returns to idle whatever the outcome.
    pub fn finish_download(&mut self) {
        if !self.disk_ok {
            return;
        }
        let Some(slot) = self.session.finish() else {
            return;
        };
        debug!("finished database download into slot {slot}");

        if let Err(e) = marker::write(&self.registry.files(slot).valid, 1) {
            warn!("cannot mark slot {slot} valid: {e}");
            return;
        }
        self.activate();
    }

    /// Drop an in-progress download. The serving slot is unaffected and
    /// keeps serving queries.
    pub fn cancel_download(&mut self) {
        if !self.disk_ok {
            return;
        }
        if let Err(e) = self.session.cancel(&self.registry) {
            warn!("cancel failed: {e}");
        }
    }

    /// Administrative wipe: close the engine, drop any download and delete
    /// all six slot files. The next boot starts awaiting a fresh image.
    pub fn wipe(&mut self) -> Result<()> {
        if !self.disk_ok {
            return Err(Error::DiskUnavailable);
        }
        info!("wiping all database files");
        if let Err(e) = self.session.cancel(&self.registry) {
            warn!("cancel during wipe failed: {e}");
        }
        self.engine.close();
        self.state = ControllerState::AwaitingImage;
        self.registry.wipe()?;
        Ok(())
    }

    /// Current serving state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Slot currently playing the "current" role.
    pub fn current_slot(&self) -> SlotId {
        self.registry.current()
    }

    /// Data file the engine is (or would be) pointed at.
    pub fn current_db_path(&self) -> &Path {
        &self.registry.current_files().data
    }

    /// Whether a download session is active.
    pub fn is_downloading(&self) -> bool {
        self.session.is_active()
    }

    /// The engine collaborator, for issuing queries upstream.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The transport collaborator.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Promote the freshly validated other slot and open it, rolling back
    /// if the engine rejects it. Aborts with no effect when the candidate
    /// was never proven good.
    fn activate(&mut self) {
        match self.registry.swap() {
            Ok(true) => {}
            Ok(false) => {
                warn!("candidate slot is not valid, leaving roles unchanged");
                return;
            }
            Err(e) => {
                warn!("swap failed: {e}");
                return;
            }
        }
        self.open_with_rollback();
    }

    /// Try to open the current slot; on failure invalidate it, swap back
    /// to the previous slot and retry once. Bounded: at most two open
    /// attempts, then the controller requests a fresh image and waits.
    fn open_with_rollback(&mut self) {
        if self.try_open_current() {
            return;
        }

        if !self.discard_current_and_swap_back() {
            self.request_fresh_image();
            return;
        }

        if self.try_open_current() {
            warn!("running on a single good slot until the next download");
            return;
        }

        let failing = self.registry.current();
        if let Err(e) = self.registry.invalidate(failing) {
            warn!("cannot invalidate slot {failing}: {e}");
        }
        self.request_fresh_image();
    }

    fn try_open_current(&mut self) -> bool {
        self.engine.close();
        let path: PathBuf = self.registry.current_files().data.clone();
        match self.engine.open(&path) {
            Ok(()) => {
                info!("database {} active", path.display());
                self.state = ControllerState::Serving;
                true
            }
            Err(e) => {
                warn!("{}", Error::Engine(e));
                false
            }
        }
    }

    /// Invalidate the failing current slot and fall back to the previous
    /// one. Returns false when no valid slot remains to fall back to.
    fn discard_current_and_swap_back(&mut self) -> bool {
        let failing = self.registry.current();
        if let Err(e) = self.registry.invalidate(failing) {
            warn!("cannot invalidate slot {failing}: {e}");
        }
        match self.registry.swap() {
            Ok(swapped) => swapped,
            Err(e) => {
                warn!("swap back failed: {e}");
                false
            }
        }
    }

    fn request_fresh_image(&mut self) {
        self.state = ControllerState::AwaitingImage;
        self.transport.force_db_download();
    }
}
