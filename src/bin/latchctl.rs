// CLASSIFICATION: COMMUNITY
// Filename: latchctl.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-04-19

//! Host-side admin tool for the door controller's database slots.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use doorlatch::engine::{FileProbeEngine, Transport};
use doorlatch::registry::SlotRegistry;
use doorlatch::slot::{probe_disk, SlotId, SlotLayout};
use doorlatch::{ControllerState, UpdateManager};

#[derive(Parser)]
#[command(about = "Door controller database slot admin")]
struct Cli {
    /// Storage root holding the six slot files
    #[arg(long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Show both slots' markers and the slot boot recovery would pick
    Status,
    /// Stream a local image through the download path and activate it
    Install { image: PathBuf },
    /// Delete all six slot files
    Wipe,
}

/// Stand-in transport: on the bench there is nothing to re-fetch from,
/// so a fresh-image request is just reported to the operator.
struct BenchTransport;

impl Transport for BenchTransport {
    fn force_db_download(&mut self) {
        eprintln!("latchctl: controller requests a fresh database image");
    }
}

fn storage_root(cli: &Cli) -> PathBuf {
    cli.root.clone().unwrap_or_else(|| {
        std::env::var("DOORLATCH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"))
    })
}

fn show_status(registry: &SlotRegistry) {
    for slot in [SlotId::A, SlotId::B] {
        let files = registry.files(slot);
        let size = fs::metadata(&files.data).map(|m| m.len()).unwrap_or(0);
        println!(
            "slot {slot}: valid={} preferred_gen={} data={} ({size} bytes)",
            registry.is_valid(slot),
            registry.preference(slot),
            files.data.display(),
        );
    }
    match registry.preferred_slot() {
        Some(slot) => println!("boot would select slot {slot}"),
        None => println!("boot would request a fresh image"),
    }
}

fn install(root: PathBuf, image: PathBuf) -> anyhow::Result<()> {
    if !probe_disk(&root) {
        anyhow::bail!("storage root {} is not writable", root.display());
    }
    let mut manager = UpdateManager::new(
        SlotLayout::new(&root),
        FileProbeEngine::new(),
        BenchTransport,
    );
    manager.init(true)?;

    let mut source = fs::File::open(&image)?;
    let mut chunk = [0u8; 4096];
    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        manager.write_to_database_file(&chunk[..n])?;
    }
    manager.finish_download();

    match manager.state() {
        ControllerState::Serving => {
            println!(
                "installed {} as slot {}",
                image.display(),
                manager.current_slot()
            );
            Ok(())
        }
        ControllerState::AwaitingImage => {
            anyhow::bail!("image rejected, controller awaits a fresh one")
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let root = storage_root(&cli);

    match cli.cmd {
        Cmd::Status => {
            let registry = SlotRegistry::new(SlotLayout::new(&root));
            show_status(&registry);
            Ok(())
        }
        Cmd::Install { image } => install(root, image),
        Cmd::Wipe => {
            let registry = SlotRegistry::new(SlotLayout::new(&root));
            registry.wipe()?;
            println!("slot files removed under {}", root.display());
            Ok(())
        }
    }
}
