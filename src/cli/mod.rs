//! Interactive CLI
//!
//! The read-eval-print loop around [`InteractiveShell`]: each line is routed
//! through a [`CommandProcessor`] (control words, then shell commands, then
//! the assistant) and every exchange lands in the [`Conversation`].

pub mod handlers;
pub mod processor;
pub mod prompt;

pub use handlers::{
    Assistant, AssistantHandler, ControlHandler, OfflineAssistant, ShellHandler, CLEAR_SCREEN,
};
pub use processor::{CommandHandler, CommandProcessor, HandlerContext, HandlerResult, HandlerStats};

use crate::error::Result;
use crate::models::Conversation;
use crate::pty::InterruptHandle;
use crate::shell::InteractiveShell;
use std::io::{BufRead, Write};

/// Owns the shell session, handler chain and conversation log
pub struct Controller {
    shell: InteractiveShell,
    processor: CommandProcessor,
    conversation: Conversation,
    user: String,
    host: String,
}

impl Controller {
    /// Controller with the standard handler chain
    pub fn new(shell: InteractiveShell, assistant: Box<dyn Assistant>) -> Self {
        let mut processor = CommandProcessor::new();
        processor.register(Box::new(ControlHandler));
        processor.register(Box::new(ShellHandler));
        processor.register(Box::new(AssistantHandler::new(assistant)));
        Self::with_processor(shell, processor)
    }

    pub fn with_processor(shell: InteractiveShell, processor: CommandProcessor) -> Self {
        Self {
            shell,
            processor,
            conversation: Conversation::new(),
            user: prompt::current_user(),
            host: prompt::current_host(),
        }
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.shell.interrupt_handle()
    }

    pub fn shell(&self) -> &InteractiveShell {
        &self.shell
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    /// Prompt for the current session directory
    pub fn prompt(&self) -> String {
        let session = self.shell.session();
        prompt::render_prompt(
            &self.user,
            &self.host,
            session.current_dir(),
            session.home_dir().as_deref(),
        )
    }

    /// Route one line of input
    pub fn handle_line(&mut self, line: &str) -> HandlerResult {
        let input = line.trim();
        if input.is_empty() {
            return HandlerResult::silent();
        }

        let mut ctx = HandlerContext {
            shell: &mut self.shell,
            conversation: &mut self.conversation,
        };
        self.processor
            .process(input, &mut ctx)
            .unwrap_or_else(HandlerResult::silent)
    }

    /// Read lines from `input` until EOF or an exit command
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(output, "{}", self.prompt())?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                debug!("End of input");
                break;
            }

            let result = self.handle_line(&line);
            if let Some(text) = &result.output {
                writeln!(output, "{}", text)?;
            }
            if result.exit {
                break;
            }
        }

        for (name, stats) in self.processor.all_stats() {
            debug!(
                "{} handler: {} processed, {} ok, {} failed",
                name, stats.processed, stats.successful, stats.failed
            );
        }
        Ok(())
    }
}
