//! PTY transport for delve
//!
//! Spawns the game under a pseudo-terminal sized to the configured grid
//! and moves raw bytes in both directions. Output order is preserved
//! exactly as the game produced it; nothing here interprets the stream.

pub mod pty;
pub mod transport;

pub use pty::{AsyncPtyMaster, PtyChild};
pub use transport::GameTransport;

/// Re-exported so callers can hold on to the child's pid without a
/// direct nix dependency.
pub use nix::unistd::Pid;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PtyError {
    #[error("failed to allocate PTY: {0}")]
    AllocationFailed(String),

    #[error("failed to spawn process: {0}")]
    SpawnFailed(String),

    #[error("PTY I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("game process closed its terminal")]
    Closed,
}
