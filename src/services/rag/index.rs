//! TF-IDF similarity index over document chunks.
//!
//! An immutable snapshot: the chunk sequence and its vector model are built
//! together and never partially updated. Queries transform the text into
//! the same vector space (out-of-vocabulary terms contribute nothing) and
//! rank chunks by cosine similarity.

use std::collections::HashMap;

/// English stop words excluded from the vocabulary.
const STOP_WORDS: [&str; 60] = [
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "but", "by", "can", "could", "do", "for", "from", "had", "has", "have", "he", "her",
    "his", "how", "if", "in", "into", "is", "it", "its", "just", "me", "more", "my", "no", "not",
    "of", "on", "or", "our", "she", "so", "some", "than", "that", "the", "their", "there", "they",
    "this", "to", "was", "we", "what", "will", "with",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk {
    pub index: usize,
    pub score: f64,
}

pub struct SimilarityIndex {
    chunks: Vec<String>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    /// One L2-normalized sparse TF-IDF vector per chunk, term-id keyed.
    vectors: Vec<Vec<(usize, f64)>>,
}

impl SimilarityIndex {
    /// Build the vector space model over the full chunk sequence.
    pub fn build(chunks: Vec<String>) -> Self {
        let tokenized: Vec<Vec<String>> = chunks.iter().map(|c| tokenize(c)).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for tokens in &tokenized {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokens {
                let next_id = vocabulary.len();
                let term_id = *vocabulary.entry(token.clone()).or_insert(next_id);
                if term_id == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen.contains(&term_id) {
                    document_frequency[term_id] += 1;
                    seen.push(term_id);
                }
            }
        }

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1.
        let n = chunks.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = tokenized
            .iter()
            .map(|tokens| weigh(tokens, &vocabulary, &idf))
            .collect();

        Self {
            chunks,
            vocabulary,
            idf,
            vectors,
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, index: usize) -> Option<&str> {
        self.chunks.get(index).map(|s| s.as_str())
    }

    /// Rank chunks by cosine similarity against the query, highest first,
    /// ties broken by original chunk order. Empty when nothing scores
    /// above zero ("no relevant context" rather than noise).
    pub fn query(&self, text: &str, top_k: usize) -> Vec<ScoredChunk> {
        let tokens = tokenize(text);
        let query_vec: HashMap<usize, f64> = weigh(&tokens, &self.vocabulary, &self.idf)
            .into_iter()
            .collect();

        if query_vec.is_empty() {
            return vec![];
        }

        let mut scored: Vec<ScoredChunk> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| {
                let score = vector
                    .iter()
                    .map(|(term_id, weight)| weight * query_vec.get(term_id).copied().unwrap_or(0.0))
                    .sum();
                ScoredChunk { index, score }
            })
            .collect();

        if !scored.iter().any(|s| s.score > 0.0) {
            return vec![];
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        scored.truncate(top_k);
        scored
    }
}

/// Case-fold, split on non-alphanumeric, keep tokens of two or more
/// characters, drop stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2 && !STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// TF-IDF weights for one token sequence, L2-normalized, sparse.
fn weigh(tokens: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> Vec<(usize, f64)> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    for token in tokens {
        if let Some(&term_id) = vocabulary.get(token) {
            *counts.entry(term_id).or_insert(0.0) += 1.0;
        }
    }

    let mut weights: Vec<(usize, f64)> = counts
        .into_iter()
        .map(|(term_id, tf)| (term_id, tf * idf[term_id]))
        .collect();

    let norm: f64 = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut weights {
            *w /= norm;
        }
    }
    weights.sort_by_key(|(term_id, _)| *term_id);
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "Our salon offers haircuts and coloring services every weekday.".to_string(),
            "Cancellation policy: bookings may be cancelled 24 hours in advance.".to_string(),
            "Facials and spa sessions run for sixty minutes.".to_string(),
        ]
    }

    #[test]
    fn test_query_ranks_matching_chunk_first() {
        let index = SimilarityIndex::build(corpus());
        let results = index.query("what is the cancellation policy?", 4);
        assert!(!results.is_empty());
        assert_eq!(results[0].index, 1);
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_query_is_deterministic() {
        let index = SimilarityIndex::build(corpus());
        let a = index.query("spa facial", 4);
        let b = index.query("spa facial", 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_top_k_larger_than_corpus() {
        let index = SimilarityIndex::build(vec![
            "haircut prices".to_string(),
            "haircut times".to_string(),
        ]);
        let results = index.query("haircut", 4);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_zero_relevance_returns_empty() {
        let index = SimilarityIndex::build(corpus());
        let results = index.query("zyzzyva", 4);
        assert!(results.is_empty());
    }

    #[test]
    fn test_stop_word_only_query_returns_empty() {
        let index = SimilarityIndex::build(corpus());
        assert!(index.query("the and of", 4).is_empty());
    }

    #[test]
    fn test_ties_break_by_original_chunk_order() {
        let index = SimilarityIndex::build(vec![
            "unrelated text about weather".to_string(),
            "massage booking rules".to_string(),
            "massage booking rules".to_string(),
        ]);
        let results = index.query("massage", 4);
        assert!(results.len() >= 2);
        assert_eq!(results[0].index, 1);
        assert_eq!(results[1].index, 2);
        assert!((results[0].score - results[1].score).abs() < 1e-12);
    }

    #[test]
    fn test_scores_descend() {
        let index = SimilarityIndex::build(corpus());
        let results = index.query("salon haircuts coloring", 4);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
