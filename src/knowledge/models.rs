use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

impl Intent {
    pub fn new(
        tag: impl Into<String>,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        responses: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    
    pub fn is_answerable(&self) -> bool {
        !self.responses.is_empty()
    }
}

/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    intents: Vec<Intent>,
}

impl KnowledgeBase {
    pub fn new(intents: Vec<Intent>) -> Self {
        Self { intents }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    
    pub fn intent(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
