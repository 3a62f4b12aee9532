//! Integration Tests for PTY Command Execution
//!
//! Real `/bin/sh` children on real pseudo-terminals: capture, exit codes,
//! interrupts and the output observer.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use ifw::config::PtyConfig;
use ifw::models::{ExecutionPhase, INTERRUPTED_MARKER};
use ifw::PtyExecutor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use test_utils::test_session;

fn sh_executor() -> PtyExecutor {
    PtyExecutor::new(PtyConfig::default(), PathBuf::from("/bin/sh"))
}

#[test]
fn test_echo_output_is_exact() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec.execute(&test_session(temp.path()), "echo hello").unwrap();

    assert_eq!(outcome.output, "hello");
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.render(), "hello");
}

#[test]
fn test_empty_output_is_success() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec.execute(&test_session(temp.path()), "true").unwrap();

    assert!(outcome.success());
    assert_eq!(outcome.render(), "");
}

#[test]
fn test_output_with_failure_marker() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec
        .execute(&test_session(temp.path()), "echo partial; exit 7")
        .unwrap();

    assert_eq!(outcome.exit_code, 7);
    assert_eq!(outcome.render(), "partial\n❌ Command exited with code 7");
}

#[test]
fn test_signal_death_reports_shell_code() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec
        .execute(&test_session(temp.path()), "kill -TERM $$")
        .unwrap();

    assert_eq!(outcome.exit_code, 143);
    assert!(!outcome.interrupted);
    assert_eq!(outcome.render(), "❌ Command exited with code 143");
}

#[test]
fn test_stderr_shares_the_terminal() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec
        .execute(&test_session(temp.path()), "echo out; echo err >&2")
        .unwrap();

    assert!(outcome.output.contains("out"));
    assert!(outcome.output.contains("err"));
}

#[test]
fn test_child_sees_a_terminal() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec
        .execute(&test_session(temp.path()), "[ -t 0 ] && [ -t 1 ] && echo tty")
        .unwrap();

    assert_eq!(outcome.output, "tty");
}

#[test]
fn test_colors_removed_from_capture_only() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec
        .execute(
            &test_session(temp.path()),
            "printf '\\033[32mgreen\\033[0m\\n'",
        )
        .unwrap();

    assert_eq!(outcome.output, "green");
    assert!(exec.last_output().contains("\x1b[32m"));
}

#[test]
fn test_large_output_is_fully_captured() {
    let temp = TempDir::new().unwrap();
    let mut exec = sh_executor();
    let outcome = exec
        .execute(
            &test_session(temp.path()),
            "i=0; while [ $i -lt 2000 ]; do echo line$i; i=$((i+1)); done",
        )
        .unwrap();

    let lines: Vec<&str> = outcome.output.lines().collect();
    assert_eq!(lines.len(), 2000);
    assert_eq!(lines[0], "line0");
    assert_eq!(lines[1999], "line1999");
}

#[test]
fn test_interrupt_when_idle_is_false() {
    let exec = sh_executor();
    assert!(!exec.interrupt_handle().interrupt());
    assert!(!exec.interrupt_handle().is_active());
}

#[test]
fn test_interrupt_stops_running_command() {
    let temp = TempDir::new().unwrap();
    let session = test_session(temp.path());
    let mut exec = sh_executor();
    let handle = exec.interrupt_handle();

    let interrupter = thread::spawn(move || {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_active() {
            if Instant::now() > deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        thread::sleep(Duration::from_millis(200));
        handle.interrupt()
    });

    let started = Instant::now();
    let outcome = exec.execute(&session, "sleep 10").unwrap();

    assert!(interrupter.join().unwrap());
    assert!(outcome.interrupted);
    assert_eq!(outcome.render(), INTERRUPTED_MARKER);
    assert!(started.elapsed() < Duration::from_secs(8));
    assert_eq!(exec.phase(), ExecutionPhase::Idle);
    assert!(!exec.interrupt_handle().is_active());
}

#[test]
fn test_executor_is_reusable_after_interrupt() {
    let temp = TempDir::new().unwrap();
    let session = test_session(temp.path());
    let mut exec = sh_executor();
    let handle = exec.interrupt_handle();

    let interrupter = thread::spawn(move || {
        while !handle.is_active() {
            thread::sleep(Duration::from_millis(10));
        }
        thread::sleep(Duration::from_millis(100));
        handle.interrupt()
    });
    exec.execute(&session, "sleep 10").unwrap();
    interrupter.join().unwrap();

    let outcome = exec.execute(&session, "echo again").unwrap();
    assert_eq!(outcome.render(), "again");
    assert!(!outcome.interrupted);
}

#[test]
fn test_output_callback_streams_chunks() {
    let temp = TempDir::new().unwrap();
    let chunks = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&chunks);

    let mut exec = sh_executor();
    exec.set_output_callback(move |chunk| sink.lock().unwrap().push(chunk.to_string()));
    exec.execute(&test_session(temp.path()), "echo one; echo two")
        .unwrap();

    let joined = chunks.lock().unwrap().concat();
    assert!(joined.contains("one"));
    assert!(joined.contains("two"));

    exec.clear_output_callback();
    exec.execute(&test_session(temp.path()), "echo three").unwrap();
    assert!(!chunks.lock().unwrap().concat().contains("three"));
}
