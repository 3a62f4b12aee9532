//! I/O Pump
//!
//! Background worker that relays bytes between the caller's terminal and
//! the PTY master while keeping a copy of everything the child printed.
//!
//! The capture buffer is owned by the worker thread and handed back over a
//! channel when the thread ends, so the invoking thread only ever sees it
//! after the worker is done writing to it.

use super::terminal::TerminalGuard;
use super::triggers::RawModeTriggers;
use crate::error::{Error, Result};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Observer invoked with each decoded chunk of raw child output
pub type OutputCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Ordered decoded output of one command
#[derive(Debug, Default, Clone)]
pub struct CaptureBuffer {
    chunks: Vec<String>,
    /// Bytes of a UTF-8 sequence split across reads
    pending: Vec<u8>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and append them; returns the newly decoded text
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Option<&str> {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let text = match std::str::from_utf8(&data) {
            Ok(text) => text.to_string(),
            Err(e) if e.error_len().is_none() => {
                // Incomplete sequence at the end: keep it for the next read
                let valid = e.valid_up_to();
                self.pending = data[valid..].to_vec();
                String::from_utf8_lossy(&data[..valid]).into_owned()
            }
            Err(_) => String::from_utf8_lossy(&data).into_owned(),
        };

        if text.is_empty() {
            return None;
        }
        self.chunks.push(text);
        self.chunks.last().map(String::as_str)
    }

    /// Flush any undecodable trailing bytes
    pub fn finish(&mut self) {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.chunks.push(rest);
        }
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn text(&self) -> String {
        self.chunks.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the last chunk ends the line (false when empty)
    pub fn ends_with_newline(&self) -> bool {
        self.chunks.last().is_some_and(|c| c.ends_with('\n'))
    }
}

/// Pump tuning
#[derive(Debug, Clone)]
pub struct PumpOptions {
    pub read_buffer_size: usize,
    pub stdin_buffer_size: usize,
    /// Upper bound on reading leftover output after the stop signal
    pub drain_timeout: Duration,
    /// Relay the caller's stdin into the child
    pub forward_stdin: bool,
    /// Copy child output to the caller's stdout
    pub mirror_stdout: bool,
}

/// What the worker hands back when it ends
#[derive(Debug, Default)]
pub struct PumpReport {
    pub capture: CaptureBuffer,
    pub raw_mode_engaged: bool,
    pub bytes_read: usize,
}

/// Handle on a running pump worker
pub struct IoPump {
    stop: Option<OwnedFd>,
    report: Receiver<PumpReport>,
    handle: Option<JoinHandle<()>>,
}

impl IoPump {
    /// Start relaying on `master`, which the worker takes ownership of
    pub fn start(
        master: File,
        guard: Arc<TerminalGuard>,
        options: PumpOptions,
        callback: Option<OutputCallback>,
    ) -> Result<Self> {
        let (stop_read, stop_write) = nix::unistd::pipe()?;
        let stdin = if options.forward_stdin {
            Some(File::from(std::io::stdin().as_fd().try_clone_to_owned()?))
        } else {
            None
        };

        let (tx, rx) = sync_channel(1);
        let worker = Worker {
            master,
            stdin,
            stop: stop_read,
            guard,
            triggers: RawModeTriggers::default(),
            callback,
            options,
            report: PumpReport::default(),
        };

        let handle = thread::Builder::new()
            .name("ifw-pty-pump".to_string())
            .spawn(move || {
                let report = worker.run();
                let _ = tx.send(report);
            })
            .map_err(|e| Error::Other(format!("Failed to start I/O pump: {}", e)))?;

        Ok(Self {
            stop: Some(stop_write),
            report: rx,
            handle: Some(handle),
        })
    }

    /// Signal the worker to drain and stop
    pub fn stop(&mut self) {
        // Closing the write end wakes the worker with POLLHUP
        self.stop.take();
    }

    /// Stop the worker and wait up to `timeout` for its capture
    pub fn finish(mut self, timeout: Duration) -> PumpReport {
        self.stop();

        match self.report.recv_timeout(timeout) {
            Ok(report) => {
                if let Some(handle) = self.handle.take() {
                    if handle.join().is_err() {
                        warn!("I/O pump thread panicked after reporting");
                    }
                }
                report
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("I/O pump did not finish within {:?}; detaching", timeout);
                PumpReport::default()
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("I/O pump exited without a report");
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                PumpReport::default()
            }
        }
    }
}

struct Worker {
    master: File,
    stdin: Option<File>,
    stop: OwnedFd,
    guard: Arc<TerminalGuard>,
    triggers: RawModeTriggers,
    callback: Option<OutputCallback>,
    options: PumpOptions,
    report: PumpReport,
}

impl Worker {
    fn run(mut self) -> PumpReport {
        let mut master_buf = vec![0u8; self.options.read_buffer_size];
        let mut stdin_buf = vec![0u8; self.options.stdin_buffer_size];
        let mut drain_deadline: Option<Instant> = None;

        loop {
            let timeout = match drain_deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        trace!("Drain window elapsed");
                        break;
                    }
                    PollTimeout::try_from(left).unwrap_or(PollTimeout::ZERO)
                }
                None => PollTimeout::NONE,
            };

            let draining = drain_deadline.is_some();
            let ready = match self.wait_ready(draining, timeout) {
                Ok(ready) => ready,
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    warn!("I/O pump poll failed: {}", e);
                    break;
                }
            };

            if ready.stop && !draining {
                debug!("I/O pump draining");
                drain_deadline = Some(Instant::now() + self.options.drain_timeout);
            }

            if ready.stdin && !draining {
                self.forward_stdin(&mut stdin_buf);
            }

            if ready.master {
                match self.master.read(&mut master_buf) {
                    Ok(0) => break,
                    Ok(n) => self.handle_output(&master_buf[..n]),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) if e.kind() == ErrorKind::WouldBlock => continue,
                    // EIO: every slave descriptor is closed
                    Err(e) if e.raw_os_error() == Some(Errno::EIO as i32) => break,
                    Err(e) => {
                        warn!("PTY read error: {}", e);
                        break;
                    }
                }
            } else if draining && !ready.stop {
                // Nothing left to drain
                break;
            }
        }

        self.report.capture.finish();
        self.report.raw_mode_engaged = self.guard.raw_mode_engaged();
        trace!("I/O pump read {} bytes", self.report.bytes_read);
        self.report
    }

    fn wait_ready(&self, draining: bool, timeout: PollTimeout) -> nix::Result<Ready> {
        let master = self.master.as_fd();
        let stop = self.stop.as_fd();
        let stdin: Option<BorrowedFd<'_>> = self.stdin.as_ref().map(|f| f.as_fd());

        let mut fds = vec![PollFd::new(master, PollFlags::POLLIN)];
        if !draining {
            fds.push(PollFd::new(stop, PollFlags::POLLIN));
            if let Some(stdin) = stdin {
                fds.push(PollFd::new(stdin, PollFlags::POLLIN));
            }
        }

        let count = poll(&mut fds, timeout)?;
        if count == 0 {
            return Ok(Ready::default());
        }

        let readable = |fd: &PollFd<'_>| {
            fd.revents().is_some_and(|r| {
                r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
            })
        };

        Ok(Ready {
            master: readable(&fds[0]),
            stop: fds.get(1).is_some_and(readable),
            stdin: fds.get(2).is_some_and(readable),
        })
    }

    fn forward_stdin(&mut self, buf: &mut [u8]) {
        let Some(stdin) = self.stdin.as_mut() else {
            return;
        };

        match stdin.read(buf) {
            Ok(0) => {
                debug!("Caller stdin closed");
                self.stdin = None;
            }
            Ok(n) => {
                if let Err(e) = self.master.write_all(&buf[..n]) {
                    warn!("Failed to forward input to PTY: {}", e);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                warn!("Caller stdin read error: {}", e);
                self.stdin = None;
            }
        }
    }

    fn handle_output(&mut self, bytes: &[u8]) {
        self.report.bytes_read += bytes.len();

        if self.options.mirror_stdout {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(bytes).and_then(|_| stdout.flush()).is_err() {
                trace!("Mirror to stdout failed");
            }
        }

        if self.triggers.observe(bytes) {
            match self.guard.engage_raw() {
                Ok(true) => debug!("Raw-mode trigger seen in child output"),
                Ok(false) => {}
                Err(e) => warn!("Failed to enter raw mode: {}", e),
            }
        }

        if let Some(chunk) = self.report.capture.push_bytes(bytes) {
            if let Some(callback) = &self.callback {
                callback(chunk);
            }
        }
    }
}

#[derive(Debug, Default)]
struct Ready {
    master: bool,
    stop: bool,
    stdin: bool,
}
