//! The session loop
//!
//! One synchronous cycle per move: read a settled output burst, feed it
//! to the terminal, extract facts, ask the engine for a command, send it.
//! The grid, extractor and engine are owned here and touched by nothing
//! else; a cycle runs to completion before the next chunk is read, so a
//! decision always sees the screen fully before or fully after a burst,
//! never mid-mutation.

use crate::config::SessionConfig;
use crate::snapshots::SnapshotLog;
use anyhow::{Context, Result};
use delve_engine::{Engine, Outcome, Phase};
use delve_pty::{GameTransport, Pid, PtyChild};
use delve_state::Extractor;
use delve_terminal::Terminal;
use std::process::Command;
use tracing::{error, info, warn};

/// Why the session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The configured move budget ran out.
    MoveBudget,
    /// A death or victory screen came up.
    GameOver,
    /// The same menu context recurred past the stuck threshold.
    Stuck { repeats: u32 },
    /// The game closed its side of the terminal.
    Disconnected,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionSummary {
    pub moves: u32,
    pub ending: Ending,
}

pub struct Session {
    cfg: SessionConfig,
    terminal: Terminal,
    extractor: Extractor,
    engine: Engine,
    transport: GameTransport,
    child: Pid,
    snapshots: SnapshotLog,
    moves: u32,
    last_chunk: Vec<u8>,
}

impl Session {
    /// Spawn the game and wire up a session around it.
    pub async fn launch(cfg: SessionConfig) -> Result<Self> {
        let terminal =
            Terminal::new(cfg.rows, cfg.cols).context("sizing the reconstruction grid")?;
        let extractor = Extractor::new(cfg.extract_config()).context("building the extractor")?;
        let engine = Engine::new(cfg.engine_config());
        let snapshots = SnapshotLog::new(cfg.log_dir.join("screens"))?;

        let mut command = Command::new(&cfg.program);
        command.args(&cfg.args);
        command.env("TERM", "xterm-256color");

        let child = PtyChild::spawn(command, cfg.rows, cfg.cols)
            .with_context(|| format!("spawning {}", cfg.program))?;
        let (master, pid) = child.into_async()?;
        info!(program = %cfg.program, pid = pid.as_raw(), "game launched");

        Ok(Self {
            cfg,
            terminal,
            extractor,
            engine,
            transport: GameTransport::new(master),
            child: pid,
            snapshots,
            moves: 0,
            last_chunk: Vec::new(),
        })
    }

    /// Drive the game until the move budget, a game-over screen, a stuck
    /// escalation, or a disconnect ends the session.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let ending = self.play().await?;

        match ending {
            Ending::MoveBudget | Ending::Stuck { .. } => self.quit_gracefully().await,
            Ending::GameOver | Ending::Disconnected => {}
        }
        self.reap();

        info!(moves = self.moves, ?ending, "session finished");
        Ok(SessionSummary {
            moves: self.moves,
            ending,
        })
    }

    async fn play(&mut self) -> Result<Ending> {
        while self.moves < self.cfg.max_moves {
            match self
                .transport
                .read_stable(self.cfg.quiet, self.cfg.read_timeout)
                .await
            {
                Ok(chunk) => {
                    if !chunk.is_empty() {
                        self.terminal.process(&chunk);
                        self.last_chunk = chunk;
                    }
                }
                Err(delve_pty::PtyError::Closed) => {
                    warn!("game closed the terminal");
                    return Ok(Ending::Disconnected);
                }
                Err(e) => return Err(e).context("reading game output"),
            }

            let rendered = self.terminal.render_text();
            let state = self.extractor.extract(&rendered);

            match self.engine.next(&state).context("deciding next command")? {
                Outcome::Command(action) => {
                    self.moves += 1;
                    info!(
                        move_number = self.moves,
                        phase = ?self.engine.phase(),
                        reason = %action.reason,
                        "issuing command"
                    );
                    self.snapshots
                        .record(self.moves, &action.reason, &rendered, &self.last_chunk)?;
                    self.transport.send(&action.input).await?;
                }
                Outcome::Stuck { repeats } => {
                    error!(repeats, "navigation is stuck; escalating");
                    self.snapshots
                        .record(self.moves, "stuck", &rendered, &self.last_chunk)?;
                    return Ok(Ending::Stuck { repeats });
                }
                Outcome::GameOver => {
                    info!("game over");
                    self.snapshots
                        .record(self.moves, "game over", &rendered, &self.last_chunk)?;
                    return Ok(Ending::GameOver);
                }
            }
        }
        Ok(Ending::MoveBudget)
    }

    /// Best-effort clean exit: the quit key, then the literal confirmation
    /// the game asks for. Failures here are logged, not propagated — the
    /// child gets reaped either way.
    async fn quit_gracefully(&mut self) {
        // Ctrl-Q opens the quit prompt.
        if self.transport.send("\x11").await.is_err() {
            return;
        }
        if let Ok(chunk) = self
            .transport
            .read_stable(self.cfg.quiet, self.cfg.read_timeout)
            .await
        {
            self.terminal.process(&chunk);
            let screen = self.terminal.render_text().join("\n").to_lowercase();
            if screen.contains("quit") {
                let _ = self.transport.send("quit\r").await;
                let _ = self
                    .transport
                    .read_stable(self.cfg.quiet, self.cfg.read_timeout)
                    .await;
            }
        }
    }

    fn reap(&mut self) {
        if let Err(e) = PtyChild::kill(self.child) {
            warn!(error = %e, "could not signal game process");
        }
        match PtyChild::wait(self.child) {
            Ok(code) => info!(code, "game process reaped"),
            Err(e) => warn!(error = %e, "could not reap game process"),
        }
    }

    /// Current outer phase, for display.
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Justification of the last issued command, for display.
    pub fn last_reason(&self) -> &str {
        self.engine.last_reason()
    }

    /// The full rendered screen, for persistence and inspection.
    pub fn rendered_screen(&self) -> Vec<String> {
        self.terminal.render_text()
    }

    /// The raw bytes of the most recent output burst.
    pub fn last_chunk(&self) -> &[u8] {
        &self.last_chunk
    }
}
