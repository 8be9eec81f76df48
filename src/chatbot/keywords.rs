use std::collections::HashMap;

use lazy_static::lazy_static;

/// `(token, tag, priority)`; specific terms outrank generic ones.
const DEFAULT_KEYWORDS: &[(&str, &str, u32)] = &[
    ("fee", "fee_structure", 3), ("fees", "fee_structure", 3), ("payment", "fee_structure", 3),
    ("tuition", "fee_structure", 3), ("cost", "fee_structure", 3), ("money", "fee_structure", 2),

    ("bus", "transportation", 3), ("transport", "transportation", 3), ("travel", "transportation", 2),
    ("commute", "transportation", 2), ("route", "transportation", 2), ("vehicle", "transportation", 1),

    ("placement", "placement_info", 3), ("job", "placement_info", 3), ("company", "placement_info", 2),
    ("recruitment", "placement_info", 2), ("career", "placement_info", 2), ("salary", "placement_info", 2),
    ("package", "placement_info", 2), ("hire", "placement_info", 1),

    ("course", "course_information", 3), ("program", "course_information", 2),
    ("subject", "course_information", 2), ("syllabus", "course_information", 2),
    ("curriculum", "course_information", 2), ("study", "course_information", 1),

    ("faculty", "faculty_contacts", 3), ("professor", "faculty_contacts", 2),
    ("teacher", "faculty_contacts", 2), ("staff", "faculty_contacts", 1),
    ("hod", "faculty_contacts", 3), ("department", "faculty_contacts", 1),

    ("library", "library_details", 3), ("book", "library_details", 2),
    ("borrow", "library_details", 2), ("research", "library_details", 1),

    ("facility", "facilities", 3), ("facilities", "facilities", 3), ("hostel", "facilities", 3),
    ("sports", "facilities", 2), ("lab", "facilities", 2), ("laboratory", "facilities", 2),
    ("canteen", "facilities", 2), ("cafeteria", "facilities", 2), ("gym", "facilities", 2),
    ("medical", "facilities", 2), ("campus", "facilities", 1), ("infrastructure", "facilities", 2),
    ("accommodation", "facilities", 2), ("ground", "facilities", 1), ("auditorium", "facilities", 1),

    ("admission", "admission_process", 3), ("apply", "admission_process", 2),
    ("application", "admission_process", 2), ("eligibility", "admission_process", 2),
    ("entrance", "admission_process", 2), ("admit", "admission_process", 1),

    ("scholarship", "scholarships", 3), ("financial", "scholarships", 2),
    ("aid", "scholarships", 2), ("loan", "scholarships", 1),

    ("event", "events_clubs", 2), ("fest", "events_clubs", 2), ("club", "events_clubs", 2),
    ("activity", "events_clubs", 1), ("workshop", "events_clubs", 1),
];

lazy_static! {
    static ref DEFAULT_TABLE: KeywordTable = KeywordTable::from_entries(DEFAULT_KEYWORDS);
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    pub tag: &'static str,
    pub priority: u32,
}


#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: HashMap<&'static str, KeywordEntry>,
}

impl KeywordTable {
    pub fn from_entries(entries: &[(&'static str, &'static str, u32)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(token, tag, priority)| (token, KeywordEntry { tag, priority }))
                .collect(),
        }
    }

    
    pub fn college() -> Self {
        DEFAULT_TABLE.clone()
    }

    pub fn get(&self, token: &str) -> Option<KeywordEntry> {
        self.entries.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    table: KeywordTable,
}

impl KeywordMatcher {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// Per-tag priority sums over the raw whitespace split, in first-seen order.
    pub fn scores(&self, raw_input: &str) -> Vec<(&'static str, u32)> {
        let mut scores: Vec<(&'static str, u32)> = Vec::new();

        for word in raw_input.to_lowercase().split_whitespace() {
            let Some(entry) = self.table.get(word) else {
                continue;
            };
            match scores.iter_mut().find(|(tag, _)| *tag == entry.tag) {
                Some((_, score)) => *score += entry.priority,
                None => scores.push((entry.tag, entry.priority)),
            }
        }

        scores
    }

    /// Highest accumulated score wins; on a tie the tag seen first in the input wins.
    pub fn best_keyword_tag(&self, raw_input: &str) -> Option<&'static str> {
        let mut best: Option<(&'static str, u32)> = None;
        for (tag, score) in self.scores(raw_input) {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((tag, score));
            }
        }
        best.map(|(tag, _)| tag)
    }

    /// Distinct matched tags, first-seen order, no priority weighting.
    pub fn detected_tags(&self, raw_input: &str) -> Vec<&'static str> {
        let mut tags = Vec::new();
        for word in raw_input.to_lowercase().split_whitespace() {
            if let Some(entry) = self.table.get(word) {
                if !tags.contains(&entry.tag) {
                    tags.push(entry.tag);
                }
            }
        }
        tags
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(KeywordTable::college())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_maps_to_its_tag() {
        let matcher = KeywordMatcher::default();
        for &(token, tag, _) in DEFAULT_KEYWORDS {
            assert_eq!(matcher.best_keyword_tag(token), Some(tag), "token: {token}");
        }
    }

    #[test]
    fn test_priorities_sum_per_tag() {
        let matcher = KeywordMatcher::default();
        let scores = matcher.scores("hostel campus fee");
        assert_eq!(scores, vec![("facilities", 4), ("fee_structure", 3)]);
        assert_eq!(matcher.best_keyword_tag("hostel campus fee"), Some("facilities"));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.best_keyword_tag("bus fee"), Some("transportation"));
        assert_eq!(matcher.best_keyword_tag("fee bus"), Some("fee_structure"));
        for _ in 0..10 {
            assert_eq!(matcher.best_keyword_tag("library hostel"), Some("library_details"));
        }
    }

    #[test]
    fn test_raw_split_not_normalized() {
        let matcher = KeywordMatcher::default();
        assert_eq!(
            matcher.best_keyword_tag("what are the hostel and sports facilities"),
            Some("facilities")
        );
        assert_eq!(matcher.best_keyword_tag("fees?"), None);
        assert_eq!(matcher.best_keyword_tag("HOSTEL"), Some("facilities"));
    }

    #[test]
    fn test_no_match() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.best_keyword_tag("hello there"), None);
        assert_eq!(matcher.best_keyword_tag(""), None);
    }

    #[test]
    fn test_detected_tags_dedup() {
        let matcher = KeywordMatcher::default();
        assert_eq!(
            matcher.detected_tags("gym fee hostel bus"),
            vec!["facilities", "fee_structure", "transportation"]
        );
    }

    #[test]
    fn test_custom_table() {
        let matcher = KeywordMatcher::new(KeywordTable::from_entries(&[("zzz", "x", 1)]));
        assert_eq!(matcher.best_keyword_tag("zzz"), Some("x"));
        assert_eq!(matcher.best_keyword_tag("fee"), None);
    }
}
