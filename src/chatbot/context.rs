use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::picker::{SeededPicker, choose};
use super::responder::{MatchStage, Reply, ResponseSelector};
use super::session::{InMemorySessionStore, SessionContext, SessionStore};
use crate::core::config::BotConfig;
use crate::knowledge::KnowledgeBase;

pub const DEFAULT_SESSION_ID: &str = "default";

const FOLLOW_UP_CUES: &[&str] = &["more", "detail", "another", "else", "what about", "and"];

pub const FOLLOW_UP_CONNECTIVES: &[&str] = &[
    "Here's more information:",
    "Additional details:",
    "Also, you might want to know:",
    "More about that:",
];

/// Wraps the selector with per-session topic memory for follow-up questions.
pub struct ContextTracker {
    selector: Arc<ResponseSelector>,
    sessions: Arc<dyn SessionStore>,
}

impl ContextTracker {
    pub fn new(selector: Arc<ResponseSelector>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { selector, sessions }
    }

    pub fn from_config(kb: Arc<KnowledgeBase>, config: &BotConfig) -> Self {
        let picker = Arc::new(SeededPicker::from_seed_option(config.rng_seed));
        let selector = ResponseSelector::from_config(kb, picker, config);
        let sessions = InMemorySessionStore::new(config.max_sessions, config.session_ttl_secs);
        Self::new(Arc::new(selector), Arc::new(sessions))
    }

    pub fn selector(&self) -> &Arc<ResponseSelector> {
        &self.selector
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn respond(&self, raw_input: &str, session_id: &str) -> String {
        self.respond_with_stage(raw_input, session_id).text
    }

    pub fn respond_with_stage(&self, raw_input: &str, session_id: &str) -> Reply {
        let handle = self.sessions.get_or_create(session_id);
        let mut context = handle.lock();
        context.question_count += 1;
        context.last_seen = Utc::now();

        if let Some(reply) = self.follow_up(raw_input, &context) {
            debug!("Session {}: follow-up on {:?}", session_id, reply.tag);
            return reply;
        }

        let reply = self.selector.select(raw_input);

        if let Some(tag) = self.detect_topic(raw_input) {
            context.record_topic(&tag);
        }

        reply
    }

    fn follow_up(&self, raw_input: &str, context: &SessionContext) -> Option<Reply> {
        let topic = context.last_topic.as_deref()?;
        let lowered = raw_input.to_lowercase();
        if !FOLLOW_UP_CUES.iter().any(|cue| lowered.contains(cue)) {
            return None;
        }

        let intent = self.selector.knowledge_base().intent(topic)?;
        let response = self.selector.pick_response(intent)?;
        let connective = choose(self.selector.picker(), FOLLOW_UP_CONNECTIVES)?;

        Some(Reply {
            text: format!("{connective}\n{response}"),
            stage: MatchStage::FollowUp,
            tag: Some(intent.tag.clone()),
        })
    }

    /// Literal pattern containment first, then the keyword winner.
    pub fn detect_topic(&self, raw_input: &str) -> Option<String> {
        let kb = self.selector.knowledge_base();
        let lowered = raw_input.to_lowercase();

        // Empty patterns are skipped; they would claim every input.
        let by_pattern = kb.intents().iter().find(|intent| {
            intent
                .patterns
                .iter()
                .any(|pattern| !pattern.is_empty() && lowered.contains(&pattern.to_lowercase()))
        });
        if let Some(intent) = by_pattern {
            return Some(intent.tag.clone());
        }

        let tag = self.selector.keywords().best_keyword_tag(raw_input)?;
        kb.intent(tag).map(|intent| intent.tag.clone())
    }
}
