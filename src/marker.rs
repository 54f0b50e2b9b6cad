// CLASSIFICATION: COMMUNITY
// Filename: marker.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-03-28

//! Persisted marker flags.
//!
//! A marker is a tiny file holding an ASCII decimal integer. It is always
//! rewritten in full (create/truncate, write, close), never appended to or
//! patched, so a reader observes either the old value or the new one.

use std::fs;
use std::io;
use std::path::Path;

/// Read a marker as an integer. A missing file, an unreadable file or
/// unparsable content all read as 0.
pub fn read(path: &Path) -> i64 {
    match fs::read_to_string(path) {
        Ok(text) => text.trim().parse().unwrap_or(0),
        Err(_) => 0,
    }
}

/// Boolean view of a marker: any positive value is true.
pub fn is_set(path: &Path) -> bool {
    read(path) > 0
}

/// Rewrite a marker in full with the given value.
pub fn write(path: &Path, value: i64) -> io::Result<()> {
    fs::write(path, value.to_string())
}

/// Remove a marker. A marker that was never written is already clear.
pub fn clear(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
