//! Typed game facts from rendered screen text
//!
//! The extractor reads the reconstructed grid rows and produces an
//! [`ExtractedState`]: vitals, location, the visible monster list, and
//! the context markers that identify menus and prompts. Extraction is
//! total — a field the screen does not show comes back absent, never as
//! an error and never as a fabricated default. Each snapshot is parsed
//! from scratch; nothing is carried over between cycles.

pub mod config;
pub mod extract;
pub mod state;

pub use config::{ExtractConfig, MarkerPhrase, Region};
pub use extract::Extractor;
pub use state::{ExtractedState, Location, MarkerHit, MarkerKind, Meter, Monster};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}
