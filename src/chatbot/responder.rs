use std::sync::Arc;

use serde::Serialize;
use strum::{AsRefStr, Display};
use tracing::{debug, warn};

use super::keywords::KeywordMatcher;
use super::patterns::PatternMatcher;
use super::picker::{ResponsePicker, choose};
use super::similarity::SimilarityMatcher;
use crate::core::config::BotConfig;
use crate::knowledge::{Intent, KnowledgeBase};
use crate::utils::safe_truncate_ellipsis;

pub const EMPTY_INPUT_PROMPT: &str = "Please ask me something about the college!";
pub const QUICK_GREETING: &str = "Hello! Welcome to College Helpdesk! How can I assist you today?";
pub const QUICK_FAREWELL: &str = "Goodbye! Have a great day! 👋";

const QUICK_REPLY_MAX_CHARS: usize = 3;
const MAX_SUGGESTED_TOPICS: usize = 2;

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "good morning", "good afternoon"];
const FAREWELL_WORDS: &[&str] = &["bye", "goodbye", "see you", "exit"];
const THANKS_WORDS: &[&str] = &["thank", "thanks"];

pub const GREETING_REPLIES: &[&str] = &[
    "Hello! Welcome to College Helpdesk! How can I assist you today?",
    "Hi there! I'm here to help with college information. What do you need to know?",
    "Greetings! Ask me about admissions, courses, fees, placements, or campus facilities.",
];

pub const FAREWELL_REPLIES: &[&str] = &[
    "Thank you for chatting! Feel free to ask if you have more questions. Have a great day! 👋",
    "Goodbye! Come back anytime you have questions about the college. 👋",
];

pub const THANKS_REPLIES: &[&str] = &[
    "You're welcome! Is there anything else I can help you with?",
    "Happy to help! Ask me anything else about the college.",
];

pub const FALLBACK_REPLIES: &[&str] = &[
    "I can help with: Admissions, Courses, Fees, Placements, Facilities, Faculty, Library, or Transportation. What would you like to know?",
    "Try asking about: • Fee structure • Placement statistics • Campus facilities • Admission process • Faculty contacts",
    "I specialize in college information. You can ask me about fees, placements, hostels, labs, sports facilities, or any other campus-related queries.",
];


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    EmptyInput,
    QuickGreeting,
    QuickFarewell,
    Keyword,
    Pattern,
    Similarity,
    FollowUp,
    Suggestion,
    Greeting,
    Farewell,
    Thanks,
    Fallback,
}


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub stage: MatchStage,
    /// Intent that produced the text, for intent-backed stages.
    pub tag: Option<String>,
}

impl Reply {
    fn canned(text: &str, stage: MatchStage) -> Self {
        Self {
            text: text.to_string(),
            stage,
            tag: None,
        }
    }
}

/// Runs the matching stages in order; the first one that answers wins.
pub struct ResponseSelector {
    kb: Arc<KnowledgeBase>,
    keywords: KeywordMatcher,
    patterns: PatternMatcher,
    similarity: SimilarityMatcher,
    picker: Arc<dyn ResponsePicker>,
}

impl ResponseSelector {
    pub fn new(kb: Arc<KnowledgeBase>, picker: Arc<dyn ResponsePicker>) -> Self {
        let similarity = SimilarityMatcher::from_knowledge_base(&kb);
        Self::with_parts(kb, KeywordMatcher::default(), similarity, picker)
    }

    pub fn from_config(
        kb: Arc<KnowledgeBase>,
        picker: Arc<dyn ResponsePicker>,
        config: &BotConfig,
    ) -> Self {
        let similarity = SimilarityMatcher::new(
            &kb,
            config.similarity_threshold,
            config.similarity_cache_size,
            config.similarity_cache_ttl_secs,
        );
        Self::with_parts(kb, KeywordMatcher::default(), similarity, picker)
    }

    pub fn with_parts(
        kb: Arc<KnowledgeBase>,
        keywords: KeywordMatcher,
        similarity: SimilarityMatcher,
        picker: Arc<dyn ResponsePicker>,
    ) -> Self {
        Self {
            patterns: PatternMatcher::new(Arc::clone(&kb)),
            kb,
            keywords,
            similarity,
            picker,
        }
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn keywords(&self) -> &KeywordMatcher {
        &self.keywords
    }

    pub fn similarity(&self) -> &SimilarityMatcher {
        &self.similarity
    }

    pub fn picker(&self) -> &dyn ResponsePicker {
        self.picker.as_ref()
    }

    pub fn respond(&self, raw_input: &str) -> String {
        self.select(raw_input).text
    }

    pub fn select(&self, raw_input: &str) -> Reply {
        let reply = self.select_inner(raw_input);
        debug!(
            "'{}' answered by {} stage (tag: {:?})",
            safe_truncate_ellipsis(raw_input, 60),
            reply.stage,
            reply.tag
        );
        reply
    }

    fn select_inner(&self, raw_input: &str) -> Reply {
        if raw_input.trim().is_empty() {
            return Reply::canned(EMPTY_INPUT_PROMPT, MatchStage::EmptyInput);
        }

        let user_lower = raw_input.trim().to_lowercase();

        if user_lower.chars().count() <= QUICK_REPLY_MAX_CHARS {
            match user_lower.as_str() {
                "hi" | "hey" => return Reply::canned(QUICK_GREETING, MatchStage::QuickGreeting),
                // "exit" is four characters and never gets here; kept to mirror the cue list
                "bye" | "exit" => return Reply::canned(QUICK_FAREWELL, MatchStage::QuickFarewell),
                _ => {}
            }
        }

        if let Some(reply) = self
            .keywords
            .best_keyword_tag(raw_input)
            .and_then(|tag| self.intent_reply(tag, MatchStage::Keyword))
        {
            return reply;
        }

        if let Some(reply) = self
            .patterns
            .first_pattern_match(raw_input)
            .and_then(|tag| self.intent_reply(tag, MatchStage::Pattern))
        {
            return reply;
        }

        match self.similarity.best_similar(raw_input) {
            Ok(Some(found)) => {
                if let Some(reply) = self.intent_reply(&found.tag, MatchStage::Similarity) {
                    return reply;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Similarity stage skipped: {}", e),
        }

        let detected = self.keywords.detected_tags(raw_input);
        if !detected.is_empty() {
            let suggestions = detected
                .iter()
                .take(MAX_SUGGESTED_TOPICS)
                .copied()
                .collect::<Vec<_>>()
                .join(" or ");
            return Reply {
                text: format!("I can help you with {suggestions}. Could you rephrase your question?"),
                stage: MatchStage::Suggestion,
                tag: None,
            };
        }

        let heuristics: [(&[&str], &[&'static str], MatchStage); 3] = [
            (GREETING_WORDS, GREETING_REPLIES, MatchStage::Greeting),
            (FAREWELL_WORDS, FAREWELL_REPLIES, MatchStage::Farewell),
            (THANKS_WORDS, THANKS_REPLIES, MatchStage::Thanks),
        ];
        for (cues, replies, stage) in heuristics {
            if cues.iter().any(|cue| user_lower.contains(cue)) {
                return Reply::canned(self.pick_canned(replies), stage);
            }
        }

        Reply::canned(self.pick_canned(FALLBACK_REPLIES), MatchStage::Fallback)
    }

    /// `None` when the tag is unknown or the intent has nothing to say.
    pub fn intent_reply(&self, tag: &str, stage: MatchStage) -> Option<Reply> {
        let intent = self.kb.intent(tag)?;
        let text = self.pick_response(intent)?;
        Some(Reply {
            text: text.to_string(),
            stage,
            tag: Some(intent.tag.clone()),
        })
    }

    pub fn pick_response<'a>(&self, intent: &'a Intent) -> Option<&'a str> {
        choose(self.picker.as_ref(), &intent.responses).map(String::as_str)
    }

    fn pick_canned(&self, replies: &[&'static str]) -> &'static str {
        choose(self.picker.as_ref(), replies)
            .copied()
            .unwrap_or(FALLBACK_REPLIES[0])
    }
}
