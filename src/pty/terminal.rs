//! Caller Terminal Control
//!
//! Saves the caller's terminal attributes before a command runs, switches
//! to raw mode when a full-screen program asks for it, and always puts the
//! saved attributes back, including on panic via `Drop`.

use crate::error::{Error, Result};
use nix::sys::termios::{cfmakeraw, tcgetattr, tcsetattr, SetArg, Termios};
use portable_pty::PtySize;
use std::io::IsTerminal;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

nix::ioctl_read_bad!(read_winsize, nix::libc::TIOCGWINSZ, nix::libc::winsize);

/// Whether the caller's stdin is an interactive terminal
pub fn stdin_is_tty() -> bool {
    std::io::stdin().is_terminal()
}

/// Whether the caller's stdout is an interactive terminal
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Size of the caller's terminal, or the given defaults when unavailable
pub fn current_size(default_rows: u16, default_cols: u16) -> PtySize {
    let fallback = PtySize {
        rows: default_rows,
        cols: default_cols,
        pixel_width: 0,
        pixel_height: 0,
    };

    let fds = [
        std::io::stdout().as_raw_fd(),
        std::io::stdin().as_raw_fd(),
    ];
    for fd in fds {
        let mut ws = nix::libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: `ws` is a valid, writable winsize for the duration of the call
        let read = unsafe { read_winsize(fd, &mut ws) };
        if read.is_ok() && ws.ws_row > 0 && ws.ws_col > 0 {
            return PtySize {
                rows: ws.ws_row,
                cols: ws.ws_col,
                pixel_width: ws.ws_xpixel,
                pixel_height: ws.ws_ypixel,
            };
        }
    }

    fallback
}

/// Scoped ownership of the caller terminal's attributes
#[derive(Debug)]
pub struct TerminalGuard {
    saved: Mutex<Option<SavedTerminal>>,
    raw_mode_engaged: AtomicBool,
}

/// Our own descriptor on the caller terminal and its attributes at capture
#[derive(Debug)]
struct SavedTerminal {
    fd: OwnedFd,
    termios: Termios,
}

impl TerminalGuard {
    /// Snapshot the caller's terminal attributes when stdin is a TTY
    pub fn capture() -> Self {
        if stdin_is_tty() {
            Self::for_terminal(std::io::stdin().as_fd())
        } else {
            Self::detached()
        }
    }

    /// Snapshot the attributes of the terminal behind `fd`
    ///
    /// The guard keeps a duplicate of `fd`, so it may outlive the caller's
    /// handle. Anything that is not a terminal gives a detached guard.
    pub fn for_terminal(fd: BorrowedFd<'_>) -> Self {
        let saved = match fd
            .try_clone_to_owned()
            .map_err(Error::from)
            .and_then(|fd| Ok((tcgetattr(&fd)?, fd)))
        {
            Ok((termios, fd)) => Some(SavedTerminal { fd, termios }),
            Err(e) => {
                warn!("Could not read terminal attributes: {}", e);
                None
            }
        };

        Self {
            saved: Mutex::new(saved),
            raw_mode_engaged: AtomicBool::new(false),
        }
    }

    /// A guard that never touches the terminal
    pub fn detached() -> Self {
        Self {
            saved: Mutex::new(None),
            raw_mode_engaged: AtomicBool::new(false),
        }
    }

    /// Whether attributes were saved, i.e. raw mode can be engaged
    pub fn is_interactive(&self) -> bool {
        self.saved.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    pub fn raw_mode_engaged(&self) -> bool {
        self.raw_mode_engaged.load(Ordering::Acquire)
    }

    /// Switch the caller's terminal to raw mode
    ///
    /// Happens at most once per guard; later calls return `Ok(false)`.
    pub fn engage_raw(&self) -> Result<bool> {
        let saved = self.saved.lock().map_err(|_| Error::Terminal {
            reason: "terminal state lock poisoned".to_string(),
        })?;
        let Some(original) = saved.as_ref() else {
            return Ok(false);
        };

        if self.raw_mode_engaged.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }

        let mut raw = original.termios.clone();
        cfmakeraw(&mut raw);
        tcsetattr(&original.fd, SetArg::TCSANOW, &raw)?;
        debug!("Caller terminal switched to raw mode");
        Ok(true)
    }

    /// Put the saved attributes back; a no-op when nothing was saved
    pub fn restore(&self) -> Result<()> {
        let saved = self.saved.lock().map_err(|_| Error::Terminal {
            reason: "terminal state lock poisoned".to_string(),
        })?;
        if let Some(original) = saved.as_ref() {
            tcsetattr(&original.fd, SetArg::TCSADRAIN, &original.termios)?;
            self.raw_mode_engaged.store(false, Ordering::Release);
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal attributes: {}", e);
        }
    }
}
