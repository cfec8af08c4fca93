//! PTY allocation and process spawning
//!
//! Unix only: openpty with the game's window size, fork, wire the slave
//! up as the child's controlling terminal, exec. The parent keeps the
//! master side and reads the escape stream from it.

use crate::PtyError;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{openpty, OpenptyResult, Winsize};
use nix::unistd::{fork, setsid, ForkResult, Pid};
use std::io;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::os::unix::process::CommandExt;
use std::process::Command;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// A game process running under a PTY. Owns the master fd and the child
/// pid; dropping it closes the terminal.
pub struct PtyChild {
    master: RawFd,
    pid: Pid,
}

impl PtyChild {
    /// Allocate a PTY with the given dimensions and exec `command` in it.
    ///
    /// The child gets the slave as stdin/stdout/stderr and as its
    /// controlling terminal; the parent gets the master in non-blocking
    /// mode, ready to be wrapped for async I/O.
    pub fn spawn(mut command: Command, rows: u16, cols: u16) -> Result<Self, PtyError> {
        let winsize = Winsize {
            ws_row: rows,
            ws_col: cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };

        let OpenptyResult { master, slave } = openpty(Some(&winsize), None)
            .map_err(|e| PtyError::AllocationFailed(format!("openpty failed: {e}")))?;
        let master_fd = master.into_raw_fd();
        let slave_fd = slave.into_raw_fd();

        fcntl(master_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))
            .map_err(|e| PtyError::AllocationFailed(format!("set non-blocking failed: {e}")))?;

        match unsafe { fork() }.map_err(|e| PtyError::SpawnFailed(format!("fork failed: {e}")))? {
            ForkResult::Parent { child } => {
                unsafe {
                    libc::close(slave_fd);
                }
                debug!(pid = child.as_raw(), rows, cols, "game process spawned");
                Ok(Self {
                    master: master_fd,
                    pid: child,
                })
            }
            ForkResult::Child => {
                unsafe {
                    libc::close(master_fd);
                }

                setsid().expect("setsid failed");

                unsafe {
                    libc::dup2(slave_fd, 0);
                    libc::dup2(slave_fd, 1);
                    libc::dup2(slave_fd, 2);
                    libc::close(slave_fd);
                    if libc::ioctl(0, libc::TIOCSCTTY as libc::c_ulong, 0) < 0 {
                        panic!("TIOCSCTTY failed: {}", io::Error::last_os_error());
                    }
                }

                let err = command.exec();
                eprintln!("failed to execute game command: {err}");
                std::process::exit(1);
            }
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Convert the master side into an async handle, consuming the
    /// wrapper. The caller becomes responsible for reaping the child via
    /// the returned pid.
    pub fn into_async(mut self) -> Result<(AsyncPtyMaster, Pid), PtyError> {
        let fd = self.master;
        let pid = self.pid;
        self.master = -1;
        Ok((AsyncPtyMaster::from_raw(fd)?, pid))
    }

    /// Wait for the child to exit, returning its exit code.
    pub fn wait(pid: Pid) -> Result<i32, PtyError> {
        use nix::sys::wait::{waitpid, WaitStatus};

        match waitpid(pid, None)
            .map_err(|e| PtyError::Io(io::Error::from_raw_os_error(e as i32)))?
        {
            WaitStatus::Exited(_, code) => Ok(code),
            WaitStatus::Signaled(_, signal, _) => Ok(128 + signal as i32),
            _ => Ok(-1),
        }
    }

    /// Ask the child to terminate.
    pub fn kill(pid: Pid) -> Result<(), PtyError> {
        nix::sys::signal::kill(pid, nix::sys::signal::Signal::SIGTERM)
            .map_err(|e| PtyError::Io(io::Error::from_raw_os_error(e as i32)))
    }
}

impl Drop for PtyChild {
    fn drop(&mut self) {
        if self.master != -1 {
            unsafe {
                libc::close(self.master);
            }
        }
    }
}

/// Async wrapper around the PTY master fd.
pub struct AsyncPtyMaster {
    inner: tokio::fs::File,
}

impl AsyncPtyMaster {
    fn from_raw(fd: RawFd) -> io::Result<Self> {
        let file = unsafe { std::fs::File::from_raw_fd(fd) };
        Ok(Self {
            inner: tokio::fs::File::from_std(file),
        })
    }
}

impl AsRawFd for AsyncPtyMaster {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

impl AsyncRead for AsyncPtyMaster {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for AsyncPtyMaster {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<io::Result<usize>> {
        std::pin::Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
