//! Weighted Keyword Scorer
//!
//! Implements the `FallbackRanker` port: each unique query token earns the
//! best weight among the metadata fields it appears in (tags, description,
//! filename), and the sum is normalized by the number of unique query
//! tokens so scores stay in `(0, 1]` regardless of query length.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use pixlens_domain::ports::FallbackRanker;
use pixlens_domain::value_objects::{ImageRecord, ResultOrigin, SearchResult};

use crate::constants::{
    KEYWORD_TOKEN_MIN_LENGTH, KEYWORD_WEIGHT_DESCRIPTION, KEYWORD_WEIGHT_FILENAME,
    KEYWORD_WEIGHT_TAG,
};

/// Field weights for keyword scoring.
///
/// Tags are curated and weigh the most; file names are the weakest signal
/// since they often carry camera-generated noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordParams {
    /// Weight of a query token found in a tag
    pub tag_weight: f32,
    /// Weight of a query token found in the description
    pub description_weight: f32,
    /// Weight of a query token found in the file name
    pub filename_weight: f32,
}

impl Default for KeywordParams {
    fn default() -> Self {
        Self {
            tag_weight: KEYWORD_WEIGHT_TAG,
            description_weight: KEYWORD_WEIGHT_DESCRIPTION,
            filename_weight: KEYWORD_WEIGHT_FILENAME,
        }
    }
}

/// Deterministic keyword ranker over stored image metadata.
pub struct KeywordScorer {
    params: KeywordParams,
}

impl KeywordScorer {
    /// Create a scorer with the default field weights.
    pub fn new() -> Self {
        Self::with_params(KeywordParams::default())
    }

    /// Create a scorer with custom field weights.
    pub fn with_params(params: KeywordParams) -> Self {
        Self { params }
    }

    /// Lowercased unicode-word tokens, with separator punctuation common in
    /// file names treated as whitespace. Tokens shorter than
    /// `KEYWORD_TOKEN_MIN_LENGTH` characters are dropped.
    pub fn tokenize(text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if matches!(c, '_' | '-' | '.') { ' ' } else { c })
            .collect();
        normalized
            .unicode_words()
            .filter(|word| word.chars().count() >= KEYWORD_TOKEN_MIN_LENGTH)
            .map(str::to_owned)
            .collect()
    }

    /// Score one record against a query; `0.0` means no token overlap.
    pub fn score(&self, record: &ImageRecord, query: &str) -> f32 {
        let query_tokens: HashSet<String> = Self::tokenize(query).into_iter().collect();
        if query_tokens.is_empty() {
            return 0.0;
        }

        let tag_tokens: HashSet<String> = record
            .tags
            .iter()
            .flat_map(|tag| Self::tokenize(tag))
            .collect();
        let description_tokens: HashSet<String> = record
            .description
            .as_deref()
            .map(Self::tokenize)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let filename_tokens: HashSet<String> = Self::tokenize(&record.filename).into_iter().collect();

        let mut total = 0.0f32;
        for token in &query_tokens {
            if tag_tokens.contains(token) {
                total += self.params.tag_weight;
            } else if description_tokens.contains(token) {
                total += self.params.description_weight;
            } else if filename_tokens.contains(token) {
                total += self.params.filename_weight;
            }
        }

        total / query_tokens.len() as f32
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackRanker for KeywordScorer {
    fn rank(&self, records: &[ImageRecord], query: &str, top_k: usize) -> Vec<SearchResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = records
            .iter()
            .filter_map(|record| {
                let score = self.score(record, query);
                (score > 0.0).then(|| SearchResult {
                    record: record.clone(),
                    score,
                    origin: ResultOrigin::Keyword,
                })
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        results
    }
}
