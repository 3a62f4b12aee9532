//! Handler routing
//!
//! A [`CommandProcessor`] offers each line to its handlers in priority order
//! and dispatches it to the first one that accepts it.

use crate::models::Conversation;
use crate::shell::InteractiveShell;
use std::collections::BTreeMap;

/// State a handler may read or mutate while processing a line
pub struct HandlerContext<'a> {
    pub shell: &'a mut InteractiveShell,
    pub conversation: &'a mut Conversation,
}

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResult {
    /// Text to show the user, if any
    pub output: Option<String>,
    pub success: bool,
    /// The REPL should stop after this line
    pub exit: bool,
}

impl HandlerResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            success: true,
            exit: false,
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            success: false,
            exit: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            output: None,
            success: true,
            exit: false,
        }
    }

    pub fn exit() -> Self {
        Self {
            output: None,
            success: true,
            exit: true,
        }
    }
}

/// One kind of input the CLI knows how to act on
pub trait CommandHandler: Send {
    /// Name used in statistics and logs
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &str, ctx: &HandlerContext<'_>) -> bool;

    fn handle(&mut self, input: &str, ctx: &mut HandlerContext<'_>) -> HandlerResult;
}

/// Per-handler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerStats {
    pub processed: u64,
    pub successful: u64,
    pub failed: u64,
}

/// Routes input to the first handler that accepts it
#[derive(Default)]
pub struct CommandProcessor {
    handlers: Vec<Box<dyn CommandHandler>>,
    stats: BTreeMap<&'static str, HandlerStats>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; earlier handlers take priority
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        self.stats.entry(handler.name()).or_default();
        self.handlers.push(handler);
    }

    /// Dispatch `input`; `None` when no handler accepted it
    pub fn process(&mut self, input: &str, ctx: &mut HandlerContext<'_>) -> Option<HandlerResult> {
        let handler = self
            .handlers
            .iter_mut()
            .find(|handler| handler.can_handle(input, ctx))?;

        let name = handler.name();
        debug!("Routing input to {} handler", name);
        let result = handler.handle(input, ctx);

        let stats = self.stats.entry(name).or_default();
        stats.processed += 1;
        if result.success {
            stats.successful += 1;
        } else {
            stats.failed += 1;
        }
        Some(result)
    }

    pub fn stats(&self, name: &str) -> Option<HandlerStats> {
        self.stats.get(name).copied()
    }

    pub fn all_stats(&self) -> &BTreeMap<&'static str, HandlerStats> {
        &self.stats
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}
