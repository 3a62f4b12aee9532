//! Property-based tests for command classification

#[path = "../test_utils/mod.rs"]
mod test_utils;

use ifw::ansi::strip_ansi;
use ifw::classifier::lexer::ClassificationInput;
use proptest::prelude::*;
use test_utils::{test_classifier, KNOWN_COMMANDS};

proptest! {
    #[test]
    fn test_classify_doesnt_panic(s in "\\PC*") {
        let classifier = test_classifier();
        let _ = classifier.classify(&s);
    }

    #[test]
    fn test_questions_are_never_commands(s in "\\PC{1,60}") {
        let classifier = test_classifier();
        let question = format!("{}?", s);
        prop_assert!(!classifier.classify(&question));
    }

    #[test]
    fn test_whitespace_only_is_never_a_command(s in "[ \\t\\n]{0,20}") {
        let classifier = test_classifier();
        prop_assert!(!classifier.classify(&s));
    }

    #[test]
    fn test_quoted_message_does_not_change_decision(
        idx in 0..KNOWN_COMMANDS.len(),
        flag in "-[a-z]{1,3}",
        message in "[a-zA-Z ,.]{0,40}",
    ) {
        let classifier = test_classifier();
        let command = KNOWN_COMMANDS[idx];
        let bare = format!("{} {}", command, flag);
        let quoted = format!("{} {} '{}'", command, flag, message);
        prop_assert_eq!(classifier.classify(&bare), classifier.classify(&quoted));
    }

    #[test]
    fn test_residue_never_contains_quoted_text(
        word in "[a-z]{1,8}",
        secret in "[A-Z]{4,12}",
    ) {
        let input = ClassificationInput::parse(&format!("{} --x \"{}\"", word, secret));
        prop_assert!(!input.residue.contains(&secret));
    }

    #[test]
    fn test_strip_ansi_removes_every_escape(
        text in "[a-z ]{0,30}",
        code in 0u8..108,
    ) {
        let colored = format!("\x1b[{}m{}\x1b[0m", code, text);
        let stripped = strip_ansi(&colored);
        prop_assert!(!stripped.contains('\x1b'));
        prop_assert_eq!(stripped, text);
    }
}
