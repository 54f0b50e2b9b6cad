// CLASSIFICATION: COMMUNITY
// Filename: slot.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-04-05

//! Slot identities and the fixed on-disk layout.
//!
//! The two slots never move; only the current/other role assigned to them
//! changes. Six files under one root directory back the whole protocol.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

/// Identity of one of the two fixed storage slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    /// The slot playing the opposite role.
    pub fn other(self) -> SlotId {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::A => write!(f, "A"),
            SlotId::B => write!(f, "B"),
        }
    }
}

/// The three files backing one slot.
#[derive(Clone, Debug)]
pub struct SlotFiles {
    /// Database image read by the engine.
    pub data: PathBuf,
    /// Set once a download into this slot completed.
    pub valid: PathBuf,
    /// Generation marker naming the slot a completed swap promoted.
    pub preferred: PathBuf,
}

/// Fixed six-file layout under one storage root.
#[derive(Clone, Debug)]
pub struct SlotLayout {
    a: SlotFiles,
    b: SlotFiles,
}

impl SlotLayout {
    /// Build the layout rooted at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            a: SlotFiles {
                data: root.join("DB_A.db"),
                valid: root.join("VALID_A.TXT"),
                preferred: root.join("PREF_A.TXT"),
            },
            b: SlotFiles {
                data: root.join("DB_B.db"),
                valid: root.join("VALID_B.TXT"),
                preferred: root.join("PREF_B.TXT"),
            },
        }
    }

    /// Files backing the given slot.
    pub fn files(&self, slot: SlotId) -> &SlotFiles {
        match slot {
            SlotId::A => &self.a,
            SlotId::B => &self.b,
        }
    }
}

/// Report whether the storage root is present and writable. The firmware
/// passes the mount result into `init`; host-side tools probe instead.
pub fn probe_disk(root: &Path) -> bool {
    if let Err(e) = fs::create_dir_all(root) {
        warn!("storage root {} unavailable: {e}", root.display());
        return false;
    }
    let probe = root.join(".disk_probe");
    let ok = fs::write(&probe, b"1").is_ok();
    let _ = fs::remove_file(&probe);
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_uses_fixed_names() {
        let layout = SlotLayout::new(Path::new("/data"));
        assert_eq!(layout.files(SlotId::A).data, Path::new("/data/DB_A.db"));
        assert_eq!(layout.files(SlotId::B).valid, Path::new("/data/VALID_B.TXT"));
        assert_eq!(layout.files(SlotId::B).preferred, Path::new("/data/PREF_B.TXT"));
    }

    #[test]
    fn probe_reports_writable_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_disk(dir.path()));
        assert!(!dir.path().join(".disk_probe").exists());
    }
}
