//! Unit Tests for Command Classification
//!
//! Heuristic decisions on realistic infrastructure input, plus the lexer
//! and command index the classifier is built on.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use ifw::classifier::lexer::{tokenize, ClassificationInput};
use ifw::classifier::patterns::{has_prose_signal, is_obvious_natural_language, stopword_ratio};
use ifw::classifier::{CommandIndex, ShellCommandClassifier};
use std::sync::Arc;
use test_utils::test_classifier;

#[test]
fn test_common_commands_are_shell() {
    let classifier = test_classifier();
    let commands = [
        "ls",
        "ls -la /var/log",
        "kubectl get pods -n kube-system",
        "docker ps -a",
        "tar -czf backup.tar.gz ./data",
        "find . -name '*.rs'",
        "curl -sSL https://example.com/install.sh",
        "ssh deploy@10.0.0.5",
        "cp -r src/ dest/",
        "export PATH=/usr/local/bin:$PATH",
        "pwd",
        "./scripts/deploy.sh staging",
        "/usr/bin/env",
    ];
    for command in commands {
        assert!(classifier.classify(command), "{command} should be a command");
    }
}

#[test]
fn test_questions_and_requests_are_language() {
    let classifier = test_classifier();
    let sentences = [
        "what pods are running?",
        "How do I restart nginx",
        "why is my disk full",
        "tell me about the cluster",
        "can you list the buckets",
        "please delete the old snapshots",
        "I want to scale the deployment",
        "i need a new vpc",
        "where are the logs",
        "who owns this instance",
    ];
    for sentence in sentences {
        assert!(!classifier.classify(sentence), "{sentence} should be language");
    }
}

#[test]
fn test_command_words_used_in_prose() {
    let classifier = test_classifier();
    let sentences = [
        "grep is my favorite search tool",
        "docker is better than podman",
        "find the latest file in my home",
        "make a new service for payments",
        "cat shows file contents nicely",
        "ssh helps you connect securely",
        "kubectl compared to helm",
        "git vs mercurial",
    ];
    for sentence in sentences {
        assert!(!classifier.classify(sentence), "{sentence} should be language");
    }
}

#[test]
fn test_quoted_arguments_are_not_analyzed() {
    let classifier = test_classifier();
    assert!(classifier.classify("git commit -m 'fix the login bug'"));
    assert!(classifier.classify("git commit -m \"what is the best way to do this?\" --no-verify"));
    assert!(classifier.classify("grep -r 'how to' docs/"));
}

#[test]
fn test_unknown_first_word_is_language() {
    let classifier = test_classifier();
    assert!(!classifier.classify("deploy the app"));
    assert!(!classifier.classify("terraform apply"));
}

#[test]
fn test_malformed_quoting_is_language() {
    let classifier = test_classifier();
    assert!(!classifier.classify("echo 'unterminated"));
    assert!(!classifier.classify("grep \"pattern file.txt"));
}

#[test]
fn test_fast_path_signals() {
    assert!(is_obvious_natural_language("ls?"));
    assert!(is_obvious_natural_language("Can you help"));
    assert!(is_obvious_natural_language("WHERE is it"));
    assert!(!is_obvious_natural_language("whereis ls"));
    assert!(!is_obvious_natural_language("please"));
}

#[test]
fn test_prose_signal_catalog() {
    assert!(has_prose_signal("is the newest one"));
    assert!(has_prose_signal("gracefully"));
    assert!(has_prose_signal("with the team"));
    assert!(has_prose_signal("how to rotate keys"));
    assert!(!has_prose_signal("-n default --watch"));
    assert!(!has_prose_signal("-rf ./build"));
}

#[test]
fn test_stopword_ratio_threshold() {
    assert_eq!(stopword_ratio("the"), None);
    assert_eq!(stopword_ratio("x in y"), Some(1.0 / 3.0));

    let index = CommandIndex::from_names(["ls"]);
    let strict = ShellCommandClassifier::with_index(Arc::new(index), 0.3);
    assert!(!strict.classify("ls x in y"));

    let index = CommandIndex::from_names(["ls"]);
    let lenient = ShellCommandClassifier::with_index(Arc::new(index), 0.4);
    assert!(lenient.classify("ls x in y"));
}

#[test]
fn test_lexer_view() {
    let input = ClassificationInput::parse("docker run -e MSG='hello world' nginx");
    assert_eq!(input.candidate_command(), Some("docker"));
    assert_eq!(
        input.arguments(),
        &["run", "-e", "MSG=hello world", "nginx"].map(String::from)
    );
    assert_eq!(input.residue, "run -e MSG= nginx");
    assert!(!input.malformed);

    let (tokens, malformed) = tokenize("echo 'a b");
    assert_eq!(tokens, vec!["echo", "a b"]);
    assert!(malformed);
}

#[test]
fn test_index_suggestions_are_sorted_and_bounded() {
    let names: Vec<String> = (0..20).map(|i| format!("kube{:02}", i)).collect();
    let index = CommandIndex::from_names(names);

    let suggestions = index.suggestions("kube");
    assert_eq!(suggestions.len(), 10);
    assert_eq!(suggestions[0], "kube00");
    assert_eq!(suggestions[9], "kube09");
}

#[test]
fn test_index_only_grows() {
    let index = CommandIndex::from_names(["ls"]);
    let before = index.len();
    index.insert("helm");
    index.insert("ls");
    assert_eq!(index.len(), before + 1);
    assert!(index.contains("helm"));
}
