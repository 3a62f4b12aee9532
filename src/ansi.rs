//! ANSI escape code removal
//!
//! Captured PTY output is mirrored to the real terminal untouched; the copy
//! kept for conversation history goes through [`strip_ansi`] so that colour,
//! cursor and title sequences do not leak into logs.

use vte::{Parser, Perform};

/// Collects printable text while the parser swallows escape sequences
#[derive(Default)]
struct PlainText {
    out: String,
}

impl Perform for PlainText {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.out.push('\n'),
            b'\t' => self.out.push('\t'),
            // Backspace erases the previous cell (e.g. progress spinners)
            0x08 => {
                if !self.out.ends_with('\n') {
                    self.out.pop();
                }
            }
            // Carriage returns, bells and other C0 controls carry no text
            _ => {}
        }
    }
}

/// Remove escape sequences and control characters from captured output
pub fn strip_ansi(text: &str) -> String {
    let mut parser = Parser::new();
    let mut performer = PlainText::default();
    parser.advance(&mut performer, text.as_bytes());
    performer.out
}
