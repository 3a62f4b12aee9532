//! Contract Tests for the Interactive Shell Interface
//!
//! The operations the command router relies on: classification, execution
//! with text-encoded failures, interruption, directory and reset.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use ifw::models::INTERRUPTED_MARKER;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use test_utils::hermetic_shell;

#[test]
fn test_is_shell_command_contract() {
    let temp = TempDir::new().unwrap();
    let shell = hermetic_shell(temp.path());

    assert!(shell.is_shell_command("ls -la"));
    assert!(shell.is_shell_command("git commit -m 'fix the login bug'"));
    assert!(!shell.is_shell_command("please help me configure the firewall"));
    assert!(!shell.is_shell_command("grep is my favorite search tool"));
    assert!(!shell.is_shell_command(""));
}

#[test]
fn test_classification_does_not_touch_session() {
    let temp = TempDir::new().unwrap();
    let shell = hermetic_shell(temp.path());
    let dir = shell.get_current_directory();

    shell.is_shell_command("cd /");
    assert_eq!(shell.get_current_directory(), dir);
    assert!(shell.get_shell_history().is_empty());
}

#[test]
fn test_execute_echo() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    assert_eq!(shell.execute_shell_command("echo hello"), "hello");
}

#[test]
fn test_execute_nonzero_exit() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let output = shell.execute_shell_command("exit 3");
    assert!(output.contains("❌ Command exited with code 3"));
}

#[test]
fn test_cd_and_back() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let before = shell.get_current_directory();

    shell.execute_shell_command("cd /tmp");
    shell.execute_shell_command("cd -");
    assert_eq!(shell.get_current_directory(), before);
}

#[test]
fn test_cd_missing_directory() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let before = shell.get_current_directory();

    let output = shell.execute_shell_command("cd ./no-such-dir");
    assert!(output.starts_with("❌"));
    assert_eq!(shell.get_current_directory(), before);
}

#[test]
fn test_reset_state() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let startup = shell.get_current_directory();

    shell.execute_shell_command("cd /");
    shell.execute_shell_command("echo hi");
    shell.reset_state();

    assert_eq!(shell.get_current_directory(), startup);
    assert!(shell.get_shell_history().is_empty());
}

#[test]
fn test_interrupt_contract() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    assert!(!shell.interrupt_current_command());

    let handle = shell.interrupt_handle();
    let interrupter = thread::spawn(move || {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_active() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        thread::sleep(Duration::from_millis(200));
        handle.interrupt()
    });

    let output = shell.execute_shell_command("sleep 10");
    assert!(interrupter.join().unwrap());
    assert_eq!(output, INTERRUPTED_MARKER);
    assert!(!shell.interrupt_current_command());
}

#[test]
fn test_last_output_is_raw_capture() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());

    shell.execute_shell_command("echo raw");
    assert!(shell.get_last_output().contains("raw\r\n"));
}
