//! Raw-mode trigger policy
//!
//! Escape sequences that full-screen programs emit when they take over the
//! terminal. Seeing one in the child's output means the caller's terminal
//! must go raw so keystrokes reach the program unbuffered.

/// Alternate screen, application cursor keys, legacy alternate screen and
/// application keypad
pub const DEFAULT_TRIGGERS: &[&[u8]] = &[b"\x1b[?1049h", b"\x1b[?1h", b"\x1b[?47h", b"\x1b="];

/// Streaming matcher for raw-mode trigger sequences
///
/// Keeps the tail of the previous chunk so a sequence split across two
/// reads is still recognised.
#[derive(Debug, Clone)]
pub struct RawModeTriggers {
    patterns: Vec<Vec<u8>>,
    tail: Vec<u8>,
}

impl Default for RawModeTriggers {
    fn default() -> Self {
        Self::with_patterns(DEFAULT_TRIGGERS.iter().map(|p| p.to_vec()))
    }
}

impl RawModeTriggers {
    pub fn with_patterns<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            patterns: patterns.into_iter().filter(|p| !p.is_empty()).collect(),
            tail: Vec::new(),
        }
    }

    /// Add another trigger sequence
    pub fn push(&mut self, pattern: impl Into<Vec<u8>>) {
        let pattern = pattern.into();
        if !pattern.is_empty() {
            self.patterns.push(pattern);
        }
    }

    /// Whether `data` contains any trigger, without streaming state
    pub fn matches(&self, data: &[u8]) -> bool {
        self.patterns.iter().any(|p| contains(data, p))
    }

    /// Feed the next output chunk; true when a trigger completes in it
    pub fn observe(&mut self, chunk: &[u8]) -> bool {
        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(chunk);

        let found = self.matches(&window);

        let keep = self.longest().saturating_sub(1).min(window.len());
        self.tail = window.split_off(window.len() - keep);
        found
    }

    fn longest(&self) -> usize {
        self.patterns.iter().map(Vec::len).max().unwrap_or(0)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
