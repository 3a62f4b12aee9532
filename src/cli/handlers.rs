//! Built-in CLI handlers
//!
//! Routing order is control words, then shell commands, then everything
//! else goes to the assistant backend.

use super::processor::{CommandHandler, HandlerContext, HandlerResult};
use crate::builtins;
use crate::models::Message;
use crate::pty::terminal;

/// Screen clear and cursor home
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const MARKER_FAILED: &str = "❌";
const MARKER_INTERRUPTED: &str = "🛑";

/// Lines of `output` carrying a failure or interrupt marker
fn status_lines(output: &str) -> String {
    output
        .lines()
        .filter(|line| line.starts_with(MARKER_FAILED) || line.starts_with(MARKER_INTERRUPTED))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `exit`, `quit` and `clear`
#[derive(Debug, Default)]
pub struct ControlHandler;

impl CommandHandler for ControlHandler {
    fn name(&self) -> &'static str {
        "control"
    }

    fn can_handle(&self, input: &str, _ctx: &HandlerContext<'_>) -> bool {
        matches!(
            input.trim().to_lowercase().as_str(),
            "exit" | "quit" | "clear"
        )
    }

    fn handle(&mut self, input: &str, _ctx: &mut HandlerContext<'_>) -> HandlerResult {
        match input.trim().to_lowercase().as_str() {
            "clear" => HandlerResult::ok(CLEAR_SCREEN),
            _ => HandlerResult::exit(),
        }
    }
}

/// Lines the classifier accepts as shell commands
#[derive(Debug, Default)]
pub struct ShellHandler;

impl CommandHandler for ShellHandler {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn can_handle(&self, input: &str, ctx: &HandlerContext<'_>) -> bool {
        ctx.shell.is_shell_command(input)
    }

    fn handle(&mut self, input: &str, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let command = input.trim();
        let mirrored = !builtins::is_intercepted(command) && terminal::stdout_is_tty();
        let output = ctx.shell.execute_shell_command(command);

        let logged = if output.is_empty() {
            format!("✓ Executed: {}", command)
        } else {
            output.clone()
        };
        ctx.conversation.record_exchange(command, &logged);

        let status = status_lines(&output);
        let success = status.is_empty();
        let shown = if mirrored {
            // The child already wrote its output live; only markers remain
            status
        } else {
            output
        };

        HandlerResult {
            output: Some(shown).filter(|o| !o.is_empty()),
            success,
            exit: false,
        }
    }
}

/// Backend that answers natural-language input
pub trait Assistant: Send {
    fn respond(&mut self, input: &str, history: &[Message]) -> String;
}

/// Placeholder used when no assistant backend is wired in
#[derive(Debug, Default)]
pub struct OfflineAssistant;

impl Assistant for OfflineAssistant {
    fn respond(&mut self, _input: &str, _history: &[Message]) -> String {
        "No assistant backend is configured; only shell commands are available.".to_string()
    }
}

/// Everything that is not a control word or a shell command
pub struct AssistantHandler {
    assistant: Box<dyn Assistant>,
}

impl AssistantHandler {
    pub fn new(assistant: Box<dyn Assistant>) -> Self {
        Self { assistant }
    }
}

impl Default for AssistantHandler {
    fn default() -> Self {
        Self::new(Box::new(OfflineAssistant))
    }
}

impl CommandHandler for AssistantHandler {
    fn name(&self) -> &'static str {
        "assistant"
    }

    fn can_handle(&self, input: &str, _ctx: &HandlerContext<'_>) -> bool {
        !input.trim().is_empty()
    }

    fn handle(&mut self, input: &str, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let reply = self.assistant.respond(input, ctx.conversation.messages());
        ctx.conversation.record_exchange(input, &reply);
        HandlerResult::ok(reply)
    }
}
