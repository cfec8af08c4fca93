//! delve — plays Dungeon Crawl Stone Soup over a pseudo-terminal
//!
//! The game only ever sends screen deltas, so delve rebuilds the full
//! display with `delve-terminal`, turns it into typed facts with
//! `delve-state`, and picks the next key with `delve-engine`. This crate
//! owns the loop that wires those together around the `delve-pty`
//! transport, plus the CLI, logging, and per-move snapshot persistence.

pub mod config;
pub mod session;
pub mod snapshots;

pub use config::SessionConfig;
pub use session::{Ending, Session, SessionSummary};
