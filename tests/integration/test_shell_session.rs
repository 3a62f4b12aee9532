//! Integration Tests for Session State and CLI Routing
//!
//! Directory changes, environment exports and history through the shell
//! facade, and line routing through the REPL controller.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use ifw::cli::{
    CommandHandler, CommandProcessor, Controller, HandlerContext, HandlerResult, OfflineAssistant,
    CLEAR_SCREEN,
};
use ifw::models::Role;
use std::fs;
use tempfile::TempDir;
use test_utils::hermetic_shell;

#[test]
fn test_cd_then_back_restores_directory() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let start = shell.get_current_directory();

    assert_eq!(shell.execute_shell_command("cd /tmp"), "");
    assert_ne!(shell.get_current_directory(), start);

    assert_eq!(shell.execute_shell_command("cd -"), "");
    assert_eq!(shell.get_current_directory(), start);
}

#[test]
fn test_cd_nonexistent_keeps_directory() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let start = shell.get_current_directory();

    let output = shell.execute_shell_command("cd /definitely/not/here");
    assert!(output.starts_with("❌"));
    assert_eq!(shell.get_current_directory(), start);
}

#[test]
fn test_directory_persists_into_pty_commands() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("nested")).unwrap();
    fs::write(temp.path().join("nested").join("marker.txt"), "found").unwrap();

    let mut shell = hermetic_shell(temp.path());
    shell.execute_shell_command("cd nested");
    assert_eq!(shell.execute_shell_command("cat marker.txt"), "found");
}

#[test]
fn test_unset_hides_variable_from_children() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());

    shell.execute_shell_command("export IFW_TEMP_VAR=present");
    assert_eq!(shell.execute_shell_command("echo $IFW_TEMP_VAR"), "present");

    shell.execute_shell_command("unset IFW_TEMP_VAR");
    assert_eq!(shell.execute_shell_command("echo \"[$IFW_TEMP_VAR]\""), "[]");
}

#[test]
fn test_reset_state_restores_startup() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());
    let start = shell.get_current_directory();

    shell.execute_shell_command("cd /");
    shell.execute_shell_command("export IFW_RESET_VAR=1");
    assert_eq!(shell.get_shell_history().len(), 2);

    shell.reset_state();
    assert_eq!(shell.get_current_directory(), start);
    assert!(shell.get_shell_history().is_empty());
    assert!(shell.session().var("IFW_RESET_VAR").is_none());
}

#[test]
fn test_history_records_issued_commands() {
    let temp = TempDir::new().unwrap();
    let mut shell = hermetic_shell(temp.path());

    shell.execute_shell_command("pwd");
    shell.execute_shell_command("  echo hi  ");
    assert_eq!(shell.get_shell_history(), vec!["pwd", "echo hi"]);
}

#[test]
fn test_controller_routes_control_words() {
    let temp = TempDir::new().unwrap();
    let mut controller = Controller::new(hermetic_shell(temp.path()), Box::new(OfflineAssistant));

    let clear = controller.handle_line("clear");
    assert_eq!(clear.output.as_deref(), Some(CLEAR_SCREEN));
    assert!(!clear.exit);

    assert!(controller.handle_line("exit").exit);
    assert!(controller.handle_line("QUIT").exit);
    assert_eq!(controller.processor().stats("control").unwrap().processed, 3);
}

#[test]
fn test_controller_logs_shell_exchange() {
    let temp = TempDir::new().unwrap();
    let mut controller = Controller::new(hermetic_shell(temp.path()), Box::new(OfflineAssistant));

    let result = controller.handle_line("cd /tmp");
    assert!(result.success);

    let messages = controller.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "cd /tmp");
    assert_eq!(messages[1].content, "✓ Executed: cd /tmp");
}

#[test]
fn test_controller_sends_prose_to_assistant() {
    let temp = TempDir::new().unwrap();
    let mut controller = Controller::new(hermetic_shell(temp.path()), Box::new(OfflineAssistant));

    let result = controller.handle_line("how do I list pods?");
    assert!(result.output.unwrap().contains("No assistant backend"));
    assert_eq!(controller.processor().stats("assistant").unwrap().processed, 1);
    assert_eq!(controller.processor().stats("shell").unwrap().processed, 0);
    assert!(controller.shell().get_shell_history().is_empty());
}

#[test]
fn test_controller_counts_failed_commands() {
    let temp = TempDir::new().unwrap();
    let mut controller = Controller::new(hermetic_shell(temp.path()), Box::new(OfflineAssistant));

    let result = controller.handle_line("ls /definitely/not/here");
    assert!(!result.success);
    assert!(result.output.unwrap().contains("❌ Command exited with code"));

    let stats = controller.processor().stats("shell").unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.successful, 0);
}

#[test]
fn test_repl_runs_until_exit() {
    let temp = TempDir::new().unwrap();
    let mut controller = Controller::new(hermetic_shell(temp.path()), Box::new(OfflineAssistant));

    let input = b"cd /tmp\npwd\nexit\necho never\n";
    let mut output = Vec::new();
    controller.run(&input[..], &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("|>| "));
    assert!(!text.contains("never"));
    assert_eq!(controller.shell().get_shell_history(), vec!["cd /tmp", "pwd"]);
}

struct EchoHandler;

impl CommandHandler for EchoHandler {
    fn name(&self) -> &'static str {
        "echo-all"
    }

    fn can_handle(&self, _input: &str, _ctx: &HandlerContext<'_>) -> bool {
        true
    }

    fn handle(&mut self, input: &str, _ctx: &mut HandlerContext<'_>) -> HandlerResult {
        HandlerResult::ok(input.to_uppercase())
    }
}

#[test]
fn test_custom_handler_chain() {
    let temp = TempDir::new().unwrap();
    let mut processor = CommandProcessor::new();
    processor.register(Box::new(EchoHandler));

    let mut controller = Controller::with_processor(hermetic_shell(temp.path()), processor);
    assert_eq!(
        controller.handle_line("ls -la").output.as_deref(),
        Some("LS -LA")
    );
    assert_eq!(controller.processor().handler_names(), vec!["echo-all"]);
}
