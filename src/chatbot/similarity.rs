use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use super::cache::{CacheStats, MatchCache};
use super::normalizer::normalize;
use super::stopwords::is_stop_word;
use crate::knowledge::KnowledgeBase;
use crate::{DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL, DEFAULT_SIMILARITY_THRESHOLD};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").expect("static regex");
}


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    #[error("no patterns survive normalization")]
    NoPatterns,

    #[error("empty vocabulary; patterns only contain stop words")]
    EmptyVocabulary,
}


#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMatch {
    pub tag: String,
    pub score: f64,
    pub pattern: String,
}

type SparseVector = Vec<(usize, f64)>;

/// Unigram + bigram terms after stop-word removal, in document order.
fn terms(text: &str) -> Vec<String> {
    let words: Vec<&str> = TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| !is_stop_word(word))
        .collect();

    let mut terms: Vec<String> = words.iter().map(|word| word.to_string()).collect();
    terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
    }
}

/// TF-IDF space fitted on the normalized patterns of a knowledge base.
#[derive(Debug, Clone)]
pub struct TfidfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
    tags: Vec<String>,
    patterns: Vec<String>,
}

impl TfidfIndex {
    pub fn build(kb: &KnowledgeBase) -> Result<Self, SimilarityError> {
        let mut documents = Vec::new();
        let mut tags = Vec::new();
        for intent in kb.intents() {
            for pattern in &intent.patterns {
                let processed = normalize(pattern);
                if !processed.is_empty() {
                    documents.push(processed);
                    tags.push(intent.tag.clone());
                }
            }
        }

        if documents.is_empty() {
            return Err(SimilarityError::NoPatterns);
        }

        let doc_terms: Vec<Vec<String>> = documents.iter().map(|doc| terms(doc)).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();
        for doc in &doc_terms {
            let mut seen: Vec<usize> = Vec::new();
            for term in doc {
                let next = vocabulary.len();
                let index = *vocabulary.entry(term.clone()).or_insert(next);
                if index == df.len() {
                    df.push(0);
                }
                if !seen.contains(&index) {
                    seen.push(index);
                    df[index] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            return Err(SimilarityError::EmptyVocabulary);
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut index = Self {
            vocabulary,
            idf,
            rows: Vec::with_capacity(doc_terms.len()),
            tags,
            patterns: documents,
        };
        let rows: Vec<SparseVector> = doc_terms.iter().map(|doc| index.vectorize_terms(doc)).collect();
        index.rows = rows;

        debug!(
            "TF-IDF index built: {} patterns, {} terms",
            index.rows.len(),
            index.vocabulary.len()
        );

        Ok(index)
    }

    fn vectorize_terms(&self, terms: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            if let Some(&i) = self.vocabulary.get(term) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();
        vector.sort_by_key(|(i, _)| *i);
        l2_normalize(&mut vector);
        vector
    }

    /// Rows are unit length, so the dot product is the cosine similarity.
    pub fn similarities(&self, normalized_input: &str) -> Vec<f64> {
        let query: HashMap<usize, f64> =
            self.vectorize_terms(&terms(normalized_input)).into_iter().collect();

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|(i, w)| query.get(i).map(|q| q * w))
                    .sum::<f64>()
            })
            .collect()
    }

    /// First pattern holding the maximum similarity.
    pub fn best(&self, normalized_input: &str) -> Option<SimilarMatch> {
        let mut best: Option<(usize, f64)> = None;
        for (i, score) in self.similarities(normalized_input).into_iter().enumerate() {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((i, score));
            }
        }

        best.map(|(i, score)| SimilarMatch {
            tag: self.tags[i].clone(),
            score,
            pattern: self.patterns[i].clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}


pub struct SimilarityMatcher {
    index: Result<TfidfIndex, SimilarityError>,
    threshold: f64,
    cache: MatchCache<Option<SimilarMatch>>,
}

impl SimilarityMatcher {
    pub fn new(kb: &KnowledgeBase, threshold: f64, cache_size: usize, cache_ttl_secs: u64) -> Self {
        let index = TfidfIndex::build(kb);
        if let Err(e) = &index {
            warn!("Similarity index unavailable: {}", e);
        }

        Self {
            index,
            threshold,
            cache: MatchCache::new(cache_size, cache_ttl_secs),
        }
    }

    pub fn from_knowledge_base(kb: &Arc<KnowledgeBase>) -> Self {
        Self::new(kb, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL)
    }

    /// `Ok(None)` when nothing clears the threshold; `Err` when the index
    /// could not be built.
    pub fn best_similar(&self, raw_input: &str) -> Result<Option<SimilarMatch>, SimilarityError> {
        let normalized = normalize(raw_input);
        if normalized.is_empty() {
            return Ok(None);
        }

        let index = self.index.as_ref().map_err(Clone::clone)?;

        let key = MatchCache::<Option<SimilarMatch>>::make_key(&normalized);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let result = index
            .best(&normalized)
            .filter(|candidate| candidate.score > self.threshold);
        self.cache.set(&key, result.clone());

        Ok(result)
    }

    pub fn best_similar_tag(&self, raw_input: &str) -> Option<String> {
        self.best_similar(raw_input)
            .ok()
            .flatten()
            .map(|found| found.tag)
    }

    pub fn index(&self) -> Result<&TfidfIndex, &SimilarityError> {
        self.index.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
