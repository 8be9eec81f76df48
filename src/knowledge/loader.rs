use std::path::Path;

use tracing::{debug, error, info};

use super::models::KnowledgeBase;
use crate::core::error::{BotError, Result};

impl KnowledgeBase {
    
    pub fn from_json_str(json: &str) -> Result<Self> {
        let kb: KnowledgeBase = serde_json::from_str(json)?;
        Ok(kb)
    }

    
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BotError::KnowledgeBase(format!("cannot read {}: {}", path.display(), e))
        })?;
        let kb = Self::from_json_str(&raw)?;

        info!("Knowledge base loaded: {} intents from {}", kb.len(), path.display());
        for intent in kb.intents() {
            let sample: Vec<&str> = intent.patterns.iter().take(3).map(String::as_str).collect();
            debug!(
                "  - {}: {} patterns (e.g., {:?})",
                intent.tag,
                intent.patterns.len(),
                sample
            );
        }

        Ok(kb)
    }

    /// Missing or malformed files degrade to an empty knowledge base; every
    /// query then lands on the generic fallback.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(kb) => kb,
            Err(e) => {
                error!("Error loading knowledge base: {}, continuing with no intents", e);
                Self::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str() {
        let kb = KnowledgeBase::from_json_str(
            r#"{"intents": [
                {"tag": "x", "patterns": ["zzz unmatched phrase"], "responses": ["R"]},
                {"tag": "y", "patterns": ["why"]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(kb.len(), 2);
        assert_eq!(kb.intent("x").unwrap().responses, vec!["R"]);
        assert!(!kb.intent("y").unwrap().is_answerable());
        assert!(kb.intent("missing").is_none());
    }

    #[test]
    fn test_missing_intents_key_is_empty() {
        let kb = KnowledgeBase::from_json_str("{}").unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            KnowledgeBase::from_json_str("{\"intents\": [").unwrap_err(),
            BotError::Json(_)
        ));
    }

    #[test]
    fn test_load_missing_file_degrades_to_empty() {
        let kb = KnowledgeBase::load_or_empty("/nonexistent/college_data.json");
        assert!(kb.is_empty());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("collegebot_kb_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"intents": [{"tag": "library_details", "patterns": ["library timings"], "responses": ["9 to 5"]}]}"#,
        )
        .unwrap();

        let kb = KnowledgeBase::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(kb.intents()[0].tag, "library_details");
    }

    #[test]
    fn test_bundled_knowledge_base_parses() {
        let kb = KnowledgeBase::from_json_str(include_str!("../../data/college_data.json")).unwrap();
        assert!(kb.intents().iter().all(|intent| intent.is_answerable()));
        assert!(kb.intent("facilities").is_some());
        assert!(kb.intent("fee_structure").is_some());
    }
}
