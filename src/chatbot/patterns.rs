use std::sync::Arc;

use crate::knowledge::KnowledgeBase;

/// Pattern words at most this long never count as an overlap on their own.
const MIN_OVERLAP_WORD_CHARS: usize = 3;


#[derive(Debug, Clone)]
pub struct PatternMatcher {
    kb: Arc<KnowledgeBase>,
}

impl PatternMatcher {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// First intent (knowledge-base order) with a pattern that contains the
    /// input, is contained in it, or shares a word longer than three characters.
    pub fn first_pattern_match(&self, raw_input: &str) -> Option<&str> {
        let user_lower = raw_input.trim().to_lowercase();
        if user_lower.is_empty() {
            return None;
        }

        for intent in self.kb.intents() {
            for pattern in &intent.patterns {
                if pattern_matches(&user_lower, &pattern.to_lowercase()) {
                    return Some(intent.tag.as_str());
                }
            }
        }

        None
    }
}

fn pattern_matches(user_lower: &str, pattern_lower: &str) -> bool {
    // An empty pattern would be a substring of every input.
    if pattern_lower.is_empty() {
        return false;
    }

    pattern_lower.contains(user_lower)
        || user_lower.contains(pattern_lower)
        || pattern_lower
            .split_whitespace()
            .filter(|word| word.chars().count() > MIN_OVERLAP_WORD_CHARS)
            .any(|word| user_lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Intent;

    fn matcher() -> PatternMatcher {
        PatternMatcher::new(Arc::new(KnowledgeBase::new(vec![
            Intent::new("x", ["zzz unmatched phrase"], ["R"]),
            Intent::new("library_details", ["Library timings", "Can I borrow books"], ["L"]),
            Intent::new("greeting", ["Good morning"], ["G"]),
        ])))
    }

    #[test]
    fn test_exact_pattern() {
        assert_eq!(matcher().first_pattern_match("zzz unmatched phrase"), Some("x"));
    }

    #[test]
    fn test_input_inside_pattern() {
        assert_eq!(matcher().first_pattern_match("library tim"), Some("library_details"));
    }

    #[test]
    fn test_pattern_inside_input() {
        assert_eq!(
            matcher().first_pattern_match("hey, GOOD MORNING everyone"),
            Some("greeting")
        );
    }

    #[test]
    fn test_long_word_overlap() {
        assert_eq!(matcher().first_pattern_match("opening timings?"), Some("library_details"));
        // "can" is too short to count
        assert_eq!(matcher().first_pattern_match("i can do it"), None);
    }

    #[test]
    fn test_overlap_is_substring_based() {
        assert_eq!(matcher().first_pattern_match("notebooks"), Some("library_details"));
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(matcher().first_pattern_match("phrase and books"), Some("x"));
    }

    #[test]
    fn test_empty_input_never_matches() {
        assert_eq!(matcher().first_pattern_match("   "), None);
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let matcher = PatternMatcher::new(Arc::new(KnowledgeBase::new(vec![
            Intent::new("blank", [""], ["B"]),
            Intent::new("x", ["zzz unmatched phrase"], ["R"]),
        ])));
        assert_eq!(matcher.first_pattern_match("quantum"), None);
        assert_eq!(matcher.first_pattern_match("zzz unmatched phrase"), Some("x"));
    }

    #[test]
    fn test_empty_knowledge_base() {
        let matcher = PatternMatcher::new(Arc::new(KnowledgeBase::empty()));
        assert_eq!(matcher.first_pattern_match("library"), None);
    }
}
