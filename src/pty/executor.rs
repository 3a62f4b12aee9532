//! PTY Command Executor
//!
//! Runs one command at a time as `shell -c command` on a fresh PTY, in its
//! own session and process group, with the session's directory and
//! environment.
//!
//! Phases: `Idle -> Spawning -> Running -> Draining -> Cleanup -> Idle`.
//! Everything acquired during `Spawning` is owned by an [`Execution`] whose
//! teardown runs on every path, and whose `Drop` covers unwinding.

use super::pump::{IoPump, OutputCallback, PumpOptions, PumpReport};
use super::signals::InterruptHandle;
use super::terminal::{self, TerminalGuard};
use crate::ansi::strip_ansi;
use crate::config::PtyConfig;
use crate::error::{Error, Result};
use crate::models::{ExecutionOutcome, ExecutionPhase};
use crate::platform::{GroupSignal, Platform, SignalOps};
use crate::session::SessionState;
use nix::sys::signal::Signal;
use portable_pty::{native_pty_system, Child, CommandBuilder, ExitStatus, MasterPty};
use std::fs::File;
use std::io::Write;
use std::os::fd::BorrowedFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Executes shell commands on a pseudo-terminal
pub struct PtyExecutor {
    config: PtyConfig,
    shell: PathBuf,
    signals: Arc<dyn SignalOps>,
    interrupt: InterruptHandle,
    output_callback: Option<OutputCallback>,
    last_output: String,
    phase: ExecutionPhase,
}

impl PtyExecutor {
    pub fn new(config: PtyConfig, shell: PathBuf) -> Self {
        Self::with_signals(config, shell, Arc::from(Platform::signals()))
    }

    pub fn with_signals(config: PtyConfig, shell: PathBuf, signals: Arc<dyn SignalOps>) -> Self {
        Self {
            config,
            shell,
            interrupt: InterruptHandle::new(Arc::clone(&signals)),
            signals,
            output_callback: None,
            last_output: String::new(),
            phase: ExecutionPhase::Idle,
        }
    }

    /// Shell used for `shell -c command`
    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Handle for interrupting the running command from another thread
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Receive every decoded output chunk as it arrives
    pub fn set_output_callback<F>(&mut self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.output_callback = Some(Arc::new(callback));
    }

    pub fn clear_output_callback(&mut self) {
        self.output_callback = None;
    }

    /// Raw capture of the last command, escape sequences included
    pub fn last_output(&self) -> &str {
        &self.last_output
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Run `command` to completion and capture its output
    ///
    /// Blocks until the command exits or is interrupted. `&mut self` makes
    /// overlapping invocations impossible.
    pub fn execute(&mut self, session: &SessionState, command: &str) -> Result<ExecutionOutcome> {
        self.enter(ExecutionPhase::Spawning);
        let mut execution = match self.spawn(session, command) {
            Ok(execution) => execution,
            Err(e) => {
                self.enter(ExecutionPhase::Idle);
                return Err(e);
            }
        };

        self.interrupt.arm(execution.pgid);
        self.enter(ExecutionPhase::Running);
        let status = execution.child.wait();

        self.enter(ExecutionPhase::Draining);
        let report = execution.finish_pump(Duration::from_millis(self.config.join_timeout_ms));

        self.enter(ExecutionPhase::Cleanup);
        execution.cleanup(&report, &self.config, self.signals.as_ref());
        let interrupted = self.interrupt.disarm();
        self.enter(ExecutionPhase::Idle);

        let status = status?;
        let raw = report.capture.text();
        let outcome = ExecutionOutcome {
            output: strip_ansi(&raw).trim().to_string(),
            exit_code: exit_code_of(&status),
            interrupted,
        };
        self.last_output = raw;

        debug!(
            "Command finished with code {} (interrupted: {})",
            outcome.exit_code, outcome.interrupted
        );
        Ok(outcome)
    }

    fn enter(&mut self, phase: ExecutionPhase) {
        trace!("Execution phase {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn spawn(&self, session: &SessionState, command: &str) -> Result<Execution> {
        let guard = Arc::new(TerminalGuard::capture());
        let size = terminal::current_size(self.config.default_rows, self.config.default_cols);

        let pair = native_pty_system()
            .openpty(size)
            .map_err(|e| Error::PtyCreationFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let mut builder = CommandBuilder::new(&self.shell);
        builder.arg("-c");
        builder.arg(command);
        builder.env_clear();
        for (key, value) in session.env() {
            builder.env(key, value);
        }
        builder.cwd(session.current_dir());

        let child = pair
            .slave
            .spawn_command(builder)
            .map_err(|e| Error::CommandSpawnFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;
        // The parent must not hold the slave, or the master never sees EOF
        drop(pair.slave);

        let mut execution = Execution {
            child,
            master: Some(pair.master),
            pgid: 0,
            pump: None,
            guard,
            finished: false,
        };

        let pid = execution.child.process_id().unwrap_or(0);
        execution.pgid = self.resolve_process_group(pid);
        debug!(
            "Spawned {} -c {:?} as pid {} (pgid {})",
            self.shell.display(),
            command,
            pid,
            execution.pgid
        );

        let master = execution.clone_master()?;
        let options = PumpOptions {
            read_buffer_size: self.config.read_buffer_size,
            stdin_buffer_size: self.config.stdin_buffer_size,
            drain_timeout: Duration::from_millis(self.config.drain_timeout_ms),
            forward_stdin: terminal::stdin_is_tty(),
            mirror_stdout: terminal::stdout_is_tty(),
        };
        execution.pump = Some(IoPump::start(
            master,
            Arc::clone(&execution.guard),
            options,
            self.output_callback.clone(),
        )?);

        Ok(execution)
    }

    /// Process group to signal for `pid`; 0 when it would hit our own group
    fn resolve_process_group(&self, pid: u32) -> i32 {
        if pid == 0 {
            return 0;
        }
        let pgid = self
            .signals
            .process_group_of(pid)
            .unwrap_or(pid as i32);

        if pgid == nix::unistd::getpgrp().as_raw() {
            warn!("Child {} shares our process group; interrupts disabled", pid);
            return 0;
        }
        pgid
    }
}

/// `strsignal` texts as reported by portable-pty, glibc/musl then BSD
const SIGNAL_NAMES: &[(Signal, &[&str])] = &[
    (Signal::SIGHUP, &["Hangup"]),
    (Signal::SIGINT, &["Interrupt"]),
    (Signal::SIGQUIT, &["Quit"]),
    (Signal::SIGILL, &["Illegal instruction"]),
    (Signal::SIGTRAP, &["Trace/breakpoint trap", "Trace/BPT trap"]),
    (Signal::SIGABRT, &["Aborted", "Abort trap"]),
    (Signal::SIGBUS, &["Bus error"]),
    (Signal::SIGFPE, &["Floating point exception"]),
    (Signal::SIGKILL, &["Killed"]),
    (Signal::SIGUSR1, &["User defined signal 1"]),
    (Signal::SIGSEGV, &["Segmentation fault"]),
    (Signal::SIGUSR2, &["User defined signal 2"]),
    (Signal::SIGPIPE, &["Broken pipe"]),
    (Signal::SIGALRM, &["Alarm clock"]),
    (Signal::SIGTERM, &["Terminated"]),
];

/// Shell-style exit code: the status code, or `128 + signo` for a signal death
fn exit_code_of(status: &ExitStatus) -> i32 {
    let Some(name) = status.signal() else {
        return status.exit_code() as i32;
    };

    let known = SIGNAL_NAMES
        .iter()
        .find(|(_, names)| names.contains(&name))
        .map(|(signal, _)| *signal as i32);
    // Unnamed signals come through as "Signal N" or "Real-time signal N"
    let numbered = || {
        if !name.to_ascii_lowercase().contains("signal ") {
            return None;
        }
        name.rsplit(' ').next()?.parse::<i32>().ok()
    };

    match known.or_else(numbered) {
        Some(signo) => 128 + signo,
        None => {
            debug!("Unrecognised termination signal {:?}", name);
            status.exit_code() as i32
        }
    }
}

/// Resources of one in-flight command
struct Execution {
    child: Box<dyn Child + Send + Sync>,
    master: Option<Box<dyn MasterPty + Send>>,
    pgid: i32,
    pump: Option<IoPump>,
    guard: Arc<TerminalGuard>,
    finished: bool,
}

impl Execution {
    /// Independent descriptor on the master for the pump to own
    fn clone_master(&self) -> Result<File> {
        let fd = self
            .master
            .as_ref()
            .and_then(|m| m.as_raw_fd())
            .ok_or_else(|| Error::Terminal {
                reason: "PTY master has no file descriptor".to_string(),
            })?;
        // SAFETY: the master is owned by `self` and open for this call
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        Ok(File::from(borrowed.try_clone_to_owned()?))
    }

    fn finish_pump(&mut self, timeout: Duration) -> PumpReport {
        match self.pump.take() {
            Some(pump) => pump.finish(timeout),
            None => PumpReport::default(),
        }
    }

    /// Release everything; never fails
    fn cleanup(&mut self, report: &PumpReport, config: &PtyConfig, signals: &dyn SignalOps) {
        if !report.capture.is_empty()
            && !report.capture.ends_with_newline()
            && terminal::stdout_is_tty()
        {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(b"\n").and_then(|_| stdout.flush());
        }

        if let Err(e) = self.guard.restore() {
            warn!("Failed to restore terminal attributes: {}", e);
        }

        self.master.take();

        let alive = matches!(self.child.try_wait(), Ok(None));
        if alive && self.pgid > 0 {
            debug!("Child still running at cleanup; terminating group {}", self.pgid);
            if let Err(e) = signals.signal_group(self.pgid, GroupSignal::Terminate) {
                warn!("{}", e);
            }
            std::thread::sleep(Duration::from_millis(config.terminate_grace_ms));

            if matches!(self.child.try_wait(), Ok(None)) {
                if let Err(e) = signals.signal_group(self.pgid, GroupSignal::Kill) {
                    warn!("{}", e);
                }
                let _ = self.child.wait();
            }
        }

        self.finished = true;
    }
}

impl Drop for Execution {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(pump) = self.pump.take() {
            drop(pump.finish(Duration::ZERO));
        }
        if let Err(e) = self.guard.restore() {
            warn!("Failed to restore terminal attributes: {}", e);
        }
        self.master.take();
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
