

pub mod loader;
pub mod models;

pub use models::{Intent, KnowledgeBase};
