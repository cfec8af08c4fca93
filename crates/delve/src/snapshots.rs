//! Per-move snapshot persistence
//!
//! Pull-based and write-only: each cycle the session hands over the
//! rendered screen, the raw chunk that produced it, and the action taken,
//! and they land as numbered files under the log directory. Nothing here
//! ever feeds back into the core.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct SnapshotLog {
    dir: PathBuf,
    index: File,
    counter: u32,
}

impl SnapshotLog {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating snapshot directory {}", dir.display()))?;
        let index = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("index.txt"))
            .context("opening snapshot index")?;
        Ok(Self {
            dir,
            index,
            counter: 0,
        })
    }

    /// Write one move's snapshot: the full rendered screen and the raw
    /// bytes of the chunk that last changed it.
    pub fn record(
        &mut self,
        move_count: u32,
        action: &str,
        rendered: &[String],
        raw: &[u8],
    ) -> Result<()> {
        self.counter += 1;
        let stem = format!("{:04}", self.counter);

        let screen_name = format!("{stem}_screen.txt");
        let mut screen = File::create(self.dir.join(&screen_name))?;
        writeln!(screen, "move #{move_count}: {action}")?;
        writeln!(screen, "{}", "-".repeat(78))?;
        for row in rendered {
            writeln!(screen, "{row}")?;
        }

        let raw_name = format!("{stem}_raw.txt");
        fs::write(self.dir.join(&raw_name), raw)?;

        writeln!(
            self.index,
            "[{stem}] move #{move_count} ({} raw bytes) {action}",
            raw.len()
        )?;
        Ok(())
    }
}
