//! Byte transport between the session loop and the game
//!
//! The game redraws in bursts: a command triggers a flurry of escape
//! sequences, then silence until the next input. `read_stable` follows
//! that rhythm — it drains output until the burst goes quiet, so the
//! parser always gets a settled frame rather than a torn one.

use crate::pty::AsyncPtyMaster;
use crate::PtyError;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

/// How often the reader re-polls a quiet PTY.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct GameTransport {
    reader: ReadHalf<AsyncPtyMaster>,
    writer: WriteHalf<AsyncPtyMaster>,
    closed: bool,
}

impl GameTransport {
    pub fn new(master: AsyncPtyMaster) -> Self {
        let (reader, writer) = tokio::io::split(master);
        Self {
            reader,
            writer,
            closed: false,
        }
    }

    /// Read one settled burst of output.
    ///
    /// Waits up to `overall` for output, and once any has arrived keeps
    /// draining until the stream stays quiet for `quiet`. Returns an
    /// empty chunk when the game produced nothing at all within
    /// `overall`; returns [`PtyError::Closed`] once the game side of the
    /// terminal is gone.
    pub async fn read_stable(
        &mut self,
        quiet: Duration,
        overall: Duration,
    ) -> Result<Vec<u8>, PtyError> {
        if self.closed {
            return Err(PtyError::Closed);
        }

        let deadline = Instant::now() + overall;
        let mut chunk = Vec::new();
        let mut last_data: Option<Instant> = None;
        let mut buf = [0u8; 4096];

        loop {
            if Instant::now() >= deadline {
                break;
            }
            if let Some(at) = last_data {
                if at.elapsed() >= quiet {
                    break;
                }
            }

            match self.reader.read(&mut buf).await {
                Ok(0) => {
                    self.closed = true;
                    if chunk.is_empty() {
                        return Err(PtyError::Closed);
                    }
                    break;
                }
                Ok(n) => {
                    chunk.extend_from_slice(&buf[..n]);
                    last_data = Some(Instant::now());
                    trace!(bytes = n, total = chunk.len(), "pty burst data");
                }
                // The master is non-blocking: nothing buffered right now.
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => sleep(POLL_INTERVAL).await,
                Err(e) => {
                    // A PTY master reports EIO once the child is gone.
                    self.closed = true;
                    if chunk.is_empty() {
                        return Err(e.into());
                    }
                    break;
                }
            }
        }

        debug!(bytes = chunk.len(), "read settled output burst");
        Ok(chunk)
    }

    /// Send one command's bytes, verbatim.
    pub async fn send(&mut self, input: &str) -> Result<(), PtyError> {
        if self.closed {
            return Err(PtyError::Closed);
        }
        self.writer.write_all(input.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
