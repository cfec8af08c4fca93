//! Session configuration
//!
//! One struct gathers every knob the core consumes; the CLI fills it in
//! and the constructors below translate it into the per-crate configs.
//! Everything here is data — no behavior crosses this boundary.

use delve_engine::{EngineConfig, MenuInputs};
use delve_state::{ExtractConfig, Region};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Game executable.
    pub program: String,

    /// Arguments passed to the game.
    pub args: Vec<String>,

    /// Terminal dimensions the game is spawned with; the grid matches.
    pub rows: u16,
    pub cols: u16,

    /// Stop after this many issued commands.
    pub max_moves: u32,

    /// Rest when health drops below this fraction of maximum.
    pub rest_threshold: f32,

    /// Escalate after this many consecutive identical menu contexts.
    pub stuck_threshold: u32,

    /// Character name typed at the name prompt.
    pub name: String,

    /// Output counts as settled after this much silence.
    pub quiet: Duration,

    /// Give up waiting for output after this long.
    pub read_timeout: Duration,

    /// Where snapshots and the session log land.
    pub log_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            program: "/usr/games/crawl".to_string(),
            args: Vec::new(),
            rows: 40,
            cols: 160,
            max_moves: 1000,
            rest_threshold: 0.6,
            stuck_threshold: 5,
            name: "delver".to_string(),
            quiet: Duration::from_millis(300),
            read_timeout: Duration::from_millis(3500),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl SessionConfig {
    /// Extraction regions scaled to the configured dimensions: the map
    /// occupies the left half, the monster panel the right half below
    /// the stats block. At the game's native 160x40 these come out to
    /// the layout the extractor was written against.
    pub fn extract_config(&self) -> ExtractConfig {
        let half = (self.cols / 2).max(1);
        let map_bottom = ((self.rows as u32 * 7 / 10) as u16).max(1);
        let panel_top = self.rows / 4;
        let panel_bottom = ((self.rows as u32 * 4 / 5) as u16).max(panel_top + 1);

        ExtractConfig {
            map_region: Region::new(0, map_bottom, 0, half),
            monster_panel: Region::new(panel_top, panel_bottom, half, self.cols),
            ..ExtractConfig::default()
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            rest_threshold: self.rest_threshold,
            stuck_threshold: self.stuck_threshold,
            menu: MenuInputs {
                name: self.name.clone(),
                ..MenuInputs::default()
            },
            ..EngineConfig::default()
        }
    }
}
