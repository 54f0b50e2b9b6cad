// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-04-19

//! Dual-slot database lifecycle core for the door-access controller.
//!
//! Two fixed on-disk slots hold the authorization database: one serves
//! queries while the other receives a replacement image streamed in by the
//! transport. Marker files, always rewritten in a fixed order, make the
//! active-slot switch recoverable after power loss at any write boundary.
//! The database engine and the transport stay behind traits; this crate
//! only manages the lifecycle of the files the engine reads.

/// Error taxonomy shared across the crate.
pub mod error;

/// Persisted marker flags read as integers.
pub mod marker;

/// Slot identities and the fixed on-disk layout.
pub mod slot;

/// Current/other role assignment over the two slots.
pub mod registry;

/// Streaming download session targeting the non-current slot.
pub mod download;

/// Collaborator seams: database engine and transport.
pub mod engine;

/// Activation, rollback and boot recovery.
pub mod manager;

pub use error::{Error, Result};
pub use manager::{ControllerState, UpdateManager};
pub use slot::{SlotId, SlotLayout};
