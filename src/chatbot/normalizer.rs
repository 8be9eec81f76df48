use lazy_static::lazy_static;
use regex::Regex;


pub const QUESTION_WORDS: &[&str] = &[
    "what", "where", "when", "why", "how", "can", "could", "would", "should", "tell", "give", "me",
];

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s?]").expect("static regex");
}

/// Lowercases, strips everything but word characters, whitespace and `?`,
/// then drops question words and single-character tokens.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(lowered.trim(), "");

    stripped
        .split_whitespace()
        .filter(|word| !QUESTION_WORDS.contains(word) && word.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}
