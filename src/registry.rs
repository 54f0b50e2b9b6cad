// CLASSIFICATION: COMMUNITY
// Filename: registry.rs v0.5
// Author: Lukas Bower
// Date Modified: 2026-04-19

//! Current/other role assignment and the ordered marker protocol.
//!
//! `swap` is the only place roles change. It refuses to promote a slot that
//! was never proven good, and it rewrites the two preferred markers in a
//! fixed order so that recovery after power loss at any point between the
//! writes still lands on the intended slot.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::marker;
use crate::slot::{SlotFiles, SlotId, SlotLayout};

/// Owns the slot layout and which slot currently plays the "current" role.
pub struct SlotRegistry {
    layout: SlotLayout,
    current: SlotId,
}

impl SlotRegistry {
    /// New registry; the role assignment starts at slot A until boot
    /// recovery or a swap says otherwise.
    pub fn new(layout: SlotLayout) -> Self {
        Self {
            layout,
            current: SlotId::A,
        }
    }

    /// Slot currently serving queries.
    pub fn current(&self) -> SlotId {
        self.current
    }

    /// Slot playing the download-target role.
    pub fn other(&self) -> SlotId {
        self.current.other()
    }

    /// Files backing the given slot.
    pub fn files(&self, slot: SlotId) -> &SlotFiles {
        self.layout.files(slot)
    }

    /// Files backing the current slot.
    pub fn current_files(&self) -> &SlotFiles {
        self.files(self.current)
    }

    /// A slot is valid once a download into it ran to completion.
    pub fn is_valid(&self, slot: SlotId) -> bool {
        marker::is_set(&self.files(slot).valid)
    }

    /// Generation value of the slot's preferred marker; 0 when unset.
    pub fn preference(&self, slot: SlotId) -> i64 {
        marker::read(&self.files(slot).preferred)
    }

    /// Whether a completed swap last named this slot preferred.
    pub fn is_preferred(&self, slot: SlotId) -> bool {
        self.preference(slot) > 0
    }

    /// The slot boot recovery would select from the persisted markers
    /// alone, or `None` when neither slot is usable. When both slots are
    /// valid the higher preferred generation wins: it was written later,
    /// so it names the slot the last swap promoted even if power was lost
    /// before the loser's marker was cleared.
    pub fn preferred_slot(&self) -> Option<SlotId> {
        match (self.is_valid(SlotId::A), self.is_valid(SlotId::B)) {
            (true, true) => {
                if self.preference(SlotId::B) > self.preference(SlotId::A) {
                    Some(SlotId::B)
                } else {
                    Some(SlotId::A)
                }
            }
            (true, false) => Some(SlotId::A),
            (false, true) => Some(SlotId::B),
            (false, false) => None,
        }
    }

    /// Promote the other slot to current. Refuses with `Ok(false)` and
    /// changes nothing unless the other slot's valid marker is set.
    ///
    /// Marker write order is load-bearing. If power is lost before the
    /// first write, the markers still describe the pre-swap assignment.
    /// If it is lost between the two, both preferred markers are positive
    /// and the new current slot holds the higher generation.
    pub fn swap(&mut self) -> io::Result<bool> {
        let promoted = self.other();
        if !self.is_valid(promoted) {
            return Ok(false);
        }

        let generation = self
            .preference(SlotId::A)
            .max(self.preference(SlotId::B))
            + 1;

        marker::write(&self.files(promoted).preferred, generation)?;
        self.current = promoted;
        marker::write(&self.files(promoted.other()).preferred, 0)?;

        debug!("slot {promoted} is now current (generation {generation})");
        Ok(true)
    }

    /// Delete a slot's data file and both of its markers, so `is_valid`
    /// reports false from here on.
    pub fn invalidate(&self, slot: SlotId) -> io::Result<()> {
        let files = self.files(slot);
        remove_if_present(&files.data)?;
        marker::clear(&files.valid)?;
        marker::clear(&files.preferred)
    }

    /// Administrative reset: invalidate both slots, removing all six files.
    pub fn wipe(&self) -> io::Result<()> {
        self.invalidate(SlotId::A)?;
        self.invalidate(SlotId::B)
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
