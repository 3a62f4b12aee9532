//! Natural-language signal patterns
//!
//! Phrase patterns that almost never occur in real shell arguments. They run
//! on the lowercased unquoted residue of a line, so a valid command word
//! followed by prose (`grep is my favorite search tool`) is still rejected.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Question words that open a natural-language line
const QUESTION_OPENERS: &[&str] = &["what ", "how ", "why ", "when ", "where ", "who "];

/// Conversational openers
const CONVERSATIONAL_OPENERS: &[&str] = &["tell me", "can you", "please ", "i want", "i need"];

/// Common English words counted by the stop-word fallback
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "are", "and", "or", "but", "for", "to", "of", "in", "on", "at", "by", "with",
    "all",
];

const SIGNAL_PATTERNS: &[&str] = &[
    // Comparative language
    r"\b(better|worse|best|worst)\s+(than|of)\b",
    r"\bcompared?\s+to\b",
    r"\bvs\b|\bversus\b",
    // Possessive and descriptive phrasing
    r"\bmy\s+(favorite|preferred|personal)\b",
    r"\bis\s+my\s+(favorite|preferred)\b",
    r"\bcan\s+(locate|find|search|help|assist|manage|handle|create|remove|display|show)\b",
    r"\b(helps?|assists?)\s+(navigate|with|you|me|us)\b",
    r"\b(removes?|creates?|displays?|shows?|handles?|manages?|serves?|provides?)\s+\w+\s+(files|content|requests|sessions|tasks|operations|devices|connections|rules)\b",
    // Question phrasing
    r"\bis\s+(the|this|that|a|an)\b",
    r"\bare\s+(the|these|those)\b",
    r"\bwhich\s+(one|is|are)\b",
    // Conversational phrasing
    r"\b(can|could|should|would)\s+you\b",
    r"\bplease\s+(help|tell|show)\b",
    r"\btell\s+me\s+about\b",
    r"\bhelp\s+me\s+(with|understand)\b",
    // Articles with descriptive nouns
    r"\bthe\s+(latest|newest|oldest|current|main|primary|best|file|directory|process|version|service|system|program)\b",
    r"\ba\s+(new|good|bad|better|simple|useful)\b",
    r"\ban\s+(old|new|existing)\b",
    // Explanatory phrasing
    r"\bhow\s+(to|do|does)\b",
    r"\bwhat\s+(is|are|does)\b",
    r"\bwhy\s+(is|are|does)\b",
    // Instructional phrasing
    r"\bthis\s+(command|file|directory|is)\b",
    r"\bthat\s+(command|file|directory)\b",
    r"\ball\s+\w+\s+(files|directories|commands|in)\b",
    r"\bsome\s+\w+\s+(files|directories)\b",
    r"\bevery\s+\w+\s+file\b",
    // Prepositional flow
    r"\bof\s+(my|the|this|that)\b",
    r"\bwith\s+(someone|the|my)\b",
    r"\bto\s+(the|my|someone)\b",
    r"\bin\s+(directory|the|my)\b",
    r"\bfrom\s+(the|my|web|disk)\b",
    r"\bbetween\s+(systems|files|the)\b",
    // Manner adverbs
    r"\b(efficiently|properly|correctly|nicely|beautifully|permanently|gracefully|temporarily|securely|safely|professionally|regularly|accurately|reliably|clearly)\b",
    // Time and manner expressions
    r"\bunexpectedly\s+(yesterday|today|recently)\b",
    r"\bsince\s+the\s+(last|recent)\b",
    r"\bneed\s+(to\s+be|upgrading|updating)\b",
    // Multi-word phrases
    r"\ball\s+(files|directories)\s+in\b",
    r"\bfiles\s+in\s+(directory|the)\b",
    r"\bsource\s+code\s+changes\b",
    r"\bfile\s+(contents|permissions)\b",
    r"\bsystem\s+(files|services|resource)\b",
    r"\bnetwork\s+(connectivity|connections)\b",
    r"\bhttp\s+requests\s+to\b",
    r"\bmultiple\s+(files|shell)\s+(together|sessions)\b",
];

static SIGNALS: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(SIGNAL_PATTERNS).expect("natural-language patterns compile"));

/// Fast check on the whole line before any lexing
pub fn is_obvious_natural_language(text: &str) -> bool {
    let lower = text.trim().to_lowercase();

    lower.ends_with('?')
        || QUESTION_OPENERS.iter().any(|w| lower.starts_with(w))
        || CONVERSATIONAL_OPENERS.iter().any(|w| lower.starts_with(w))
}

/// Whether the residue contains any curated natural-language phrase
pub fn has_prose_signal(residue: &str) -> bool {
    SIGNALS.is_match(&residue.to_lowercase())
}

/// Fraction of words in `residue` that are common English stop-words
///
/// Returns `None` for residues of two words or fewer, which are too short
/// for the ratio to mean anything.
pub fn stopword_ratio(residue: &str) -> Option<f64> {
    let lower = residue.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() <= 2 {
        return None;
    }
    let common = words.iter().filter(|w| STOP_WORDS.contains(w)).count();
    Some(common as f64 / words.len() as f64)
}
