//! Screen reconstruction for delve
//!
//! The game's terminal protocol only ever transmits deltas: cursor moves,
//! styling changes and the characters that differ from the previous frame.
//! This crate rebuilds the complete screen from that stream — a streaming
//! escape-sequence parser decodes bytes into primitive operations, and a
//! fixed-size cell grid applies them. The rendered grid text is the single
//! source of truth everything downstream reads.

pub mod grid;
pub mod ops;
pub mod parser;
pub mod terminal;

pub use grid::{Cell, Color, Grid, Style};
pub use ops::{ClearKind, ScreenBuffer, StyleOp, TermOp};
pub use parser::Parser;
pub use terminal::Terminal;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("invalid terminal dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: u16, cols: u16 },
}
