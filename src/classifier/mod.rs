//! Shell command vs natural language classification
//!
//! A precision-over-recall heuristic: a line is only treated as a shell
//! command when its first word resolves to something runnable and the rest
//! of the line does not read like English.

pub mod index;
pub mod lexer;
pub mod patterns;

pub use index::{CommandIndex, SHELL_BUILTINS};
pub use lexer::ClassificationInput;

use crate::config::ClassifierConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// Decides whether a line of user text should run in the shell
pub struct ShellCommandClassifier {
    index: Arc<CommandIndex>,
    stopword_ratio: f64,
}

impl ShellCommandClassifier {
    /// Create a classifier whose index is discovered from the environment
    pub fn new(config: &ClassifierConfig, shell: PathBuf) -> Self {
        Self {
            index: Arc::new(CommandIndex::new(config, shell)),
            stopword_ratio: config.stopword_ratio,
        }
    }

    /// Create a classifier over an existing index
    pub fn with_index(index: Arc<CommandIndex>, stopword_ratio: f64) -> Self {
        Self {
            index,
            stopword_ratio,
        }
    }

    /// The command index backing this classifier
    pub fn index(&self) -> &Arc<CommandIndex> {
        &self.index
    }

    /// Return true when `text` should be treated as a shell command
    ///
    /// Total: never fails, and an undecidable line is natural language.
    pub fn classify(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }

        if patterns::is_obvious_natural_language(trimmed) {
            trace!("Opener or question mark: natural language");
            return false;
        }

        let input = ClassificationInput::parse(trimmed);
        if input.malformed {
            trace!("Unbalanced quoting: natural language");
            return false;
        }

        let command = match input.candidate_command() {
            Some(command) => command,
            None => return false,
        };

        if !self.index.resolves(command) {
            trace!("{} is not a known command", command);
            return false;
        }

        if patterns::has_prose_signal(&input.residue) {
            trace!("Prose phrase in arguments of {}", command);
            return false;
        }

        if let Some(ratio) = patterns::stopword_ratio(&input.residue) {
            if ratio > self.stopword_ratio {
                trace!("Stop-word ratio {:.2} in arguments of {}", ratio, command);
                return false;
            }
        }

        true
    }
}
