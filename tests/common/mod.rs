// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-04-19

//! Shared stubs for the slot protocol tests.

use std::fs;
use std::path::{Path, PathBuf};

use doorlatch::engine::{DatabaseEngine, EngineError, Transport};
use doorlatch::slot::SlotLayout;
use doorlatch::UpdateManager;

/// Engine stub accepting only images whose bytes start with `ok`.
/// Records every open attempt so tests can check the cascade is bounded.
pub struct TaggedEngine {
    pub opens: Vec<PathBuf>,
    pub open_path: Option<PathBuf>,
}

impl TaggedEngine {
    pub fn new() -> Self {
        Self {
            opens: Vec::new(),
            open_path: None,
        }
    }
}

impl DatabaseEngine for TaggedEngine {
    fn open(&mut self, path: &Path) -> Result<(), EngineError> {
        self.opens.push(path.to_path_buf());
        let good = fs::read(path)
            .map(|data| data.starts_with(b"ok"))
            .unwrap_or(false);
        if good {
            self.open_path = Some(path.to_path_buf());
            Ok(())
        } else {
            Err(EngineError {
                path: path.to_path_buf(),
                reason: "unusable image".into(),
            })
        }
    }

    fn close(&mut self) {
        self.open_path = None;
    }
}

/// Transport stub counting fresh-image requests.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: usize,
}

impl Transport for RecordingTransport {
    fn force_db_download(&mut self) {
        self.requests += 1;
    }
}

pub fn manager(root: &Path) -> UpdateManager<TaggedEngine, RecordingTransport> {
    UpdateManager::new(
        SlotLayout::new(root),
        TaggedEngine::new(),
        RecordingTransport::default(),
    )
}

/// Lay down a slot as a completed download would: data file, valid marker,
/// and optionally a preferred generation.
pub fn seed_slot(root: &Path, letter: char, content: &[u8], preferred: Option<i64>) {
    fs::write(root.join(format!("DB_{letter}.db")), content).unwrap();
    fs::write(root.join(format!("VALID_{letter}.TXT")), "1").unwrap();
    if let Some(generation) = preferred {
        fs::write(
            root.join(format!("PREF_{letter}.TXT")),
            generation.to_string(),
        )
        .unwrap();
    }
}

pub fn read_marker(root: &Path, name: &str) -> i64 {
    fs::read_to_string(root.join(name))
        .ok()
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0)
}
