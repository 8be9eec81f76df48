pub mod cache;
pub mod context;
pub mod keywords;
pub mod normalizer;
pub mod patterns;
pub mod picker;
pub mod responder;
pub mod session;
pub mod similarity;
pub mod stopwords;

pub use context::{ContextTracker, DEFAULT_SESSION_ID};
pub use keywords::{KeywordEntry, KeywordMatcher, KeywordTable};
pub use normalizer::normalize;
pub use patterns::PatternMatcher;
pub use picker::{FixedPicker, ResponsePicker, SeededPicker};
pub use responder::{MatchStage, Reply, ResponseSelector};
pub use session::{InMemorySessionStore, SessionContext, SessionHandle, SessionStore};
pub use similarity::{SimilarMatch, SimilarityError, SimilarityMatcher, TfidfIndex};
