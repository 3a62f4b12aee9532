//! Shell-style tokenization for classification
//!
//! Produces the [`ClassificationInput`] derived view of a line: shell-lexed
//! tokens, the candidate command word and the unquoted residue that prose
//! detection runs on.

/// Derived view of one line of user text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationInput {
    /// Original text
    pub raw: String,
    /// Tokens produced by shell lexing (or its fallbacks)
    pub tokens: Vec<String>,
    /// Quoting was unbalanced and the tokens come from a repaired line
    pub malformed: bool,
    /// Unquoted text after the command word
    pub residue: String,
}

impl ClassificationInput {
    /// Lex `text` into its classification view
    pub fn parse(text: &str) -> Self {
        let (tokens, malformed) = tokenize(text);
        Self {
            raw: text.to_string(),
            tokens,
            malformed,
            residue: unquoted_residue(text),
        }
    }

    /// First token, the word that must name a command
    pub fn candidate_command(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Tokens after the command word
    pub fn arguments(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }
}

/// Shell-lex `text`; the flag reports whether the line needed repair
///
/// Unbalanced quoting is retried with a closing quote appended, then falls
/// back to a plain whitespace split.
pub fn tokenize(text: &str) -> (Vec<String>, bool) {
    if let Some(tokens) = shlex::split(text) {
        return (tokens, false);
    }

    for closing in ['"', '\''] {
        if let Some(tokens) = shlex::split(&format!("{}{}", text, closing)) {
            return (tokens, true);
        }
    }

    let naive = text.split_whitespace().map(str::to_string).collect();
    (naive, true)
}

/// Text outside any quoted span, with the command word removed
pub fn unquoted_residue(text: &str) -> String {
    let mut unquoted = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    unquoted.push(escaped);
                }
            }
            None => unquoted.push(c),
        }
    }

    unquoted
        .split_whitespace()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ")
}
