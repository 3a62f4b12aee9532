//! Interactive shell facade
//!
//! The surface the command router uses: classify a line, run it, interrupt
//! it, and inspect or reset the session. Every failure is reported through
//! the returned text, never as an `Err`.

use crate::builtins;
use crate::classifier::ShellCommandClassifier;
use crate::config::Config;
use crate::error::Result;
use crate::pty::{InterruptHandle, PtyExecutor};
use crate::session::SessionState;

/// One interactive shell session
pub struct InteractiveShell {
    session: SessionState,
    classifier: ShellCommandClassifier,
    executor: PtyExecutor,
}

impl InteractiveShell {
    /// Create a session in the process's current directory and environment
    pub fn new(config: &Config) -> Result<Self> {
        let shell = config.shell.resolve();
        debug!("Interactive shell using {}", shell.display());

        Ok(Self {
            session: SessionState::new()?,
            classifier: ShellCommandClassifier::new(&config.classifier, shell.clone()),
            executor: PtyExecutor::new(config.pty.clone(), shell),
        })
    }

    /// Assemble a shell from explicit parts
    pub fn with_parts(
        session: SessionState,
        classifier: ShellCommandClassifier,
        executor: PtyExecutor,
    ) -> Self {
        Self {
            session,
            classifier,
            executor,
        }
    }

    /// Whether `text` should run as a shell command
    pub fn is_shell_command(&self, text: &str) -> bool {
        self.classifier.classify(text)
    }

    /// Run `text` as a builtin or on the PTY and return display text
    pub fn execute_shell_command(&mut self, text: &str) -> String {
        let command = text.trim();
        if command.is_empty() {
            return String::new();
        }
        self.session.push_history(command);

        if let Some(output) = builtins::handle(&mut self.session, command) {
            return output;
        }

        match self.executor.execute(&self.session, command) {
            Ok(outcome) => outcome.render(),
            Err(e) => {
                debug!("Execution of {:?} failed: {}", command, e);
                format!("❌ Error executing command: {}", e)
            }
        }
    }

    /// Send `SIGINT` to the running command, if any
    pub fn interrupt_current_command(&self) -> bool {
        self.executor.interrupt_handle().interrupt()
    }

    /// Handle usable from other threads while a command runs
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.executor.interrupt_handle()
    }

    pub fn get_current_directory(&self) -> String {
        self.session.current_dir().display().to_string()
    }

    /// Return to the startup directory and environment with empty history
    pub fn reset_state(&mut self) {
        self.session.reset();
    }

    pub fn get_shell_history(&self) -> Vec<String> {
        self.session.history().to_vec()
    }

    /// Raw output of the last PTY command
    pub fn get_last_output(&self) -> String {
        self.executor.last_output().to_string()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn classifier(&self) -> &ShellCommandClassifier {
        &self.classifier
    }

    pub fn executor_mut(&mut self) -> &mut PtyExecutor {
        &mut self.executor
    }
}
