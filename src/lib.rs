pub mod chatbot;
pub mod core;
pub mod knowledge;
pub mod server;
pub mod utils;

pub use utils::{safe_truncate, safe_truncate_ellipsis};


pub use chatbot::{ContextTracker, Reply, ResponseSelector};
pub use crate::core::config::BotConfig;
pub use crate::core::error::{BotError, Result};
pub use knowledge::{Intent, KnowledgeBase};


pub const DEFAULT_PORT: u16 = 5000;


pub const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "data/college_data.json";


pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.15;


pub const DEFAULT_CACHE_SIZE: usize = 1000;


pub const DEFAULT_CACHE_TTL: u64 = 300;


pub const APOLOGY_REPLY: &str = "Sorry, I encountered an error. Please try again.";
