//! Extractive summarization with the TextRank algorithm
//!
//! Classical baseline next to the generative summary: sentences become graph
//! nodes weighted by token overlap, ranked by power iteration, and the top
//! sentences are re-emitted in document order.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 50;
const CONVERGENCE: f64 = 1e-4;

/// Function words excluded from sentence-overlap scoring
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "with", "was", "were", "this", "have", "has", "had", "his",
    "her", "its", "their", "from", "they", "are", "been", "will", "would", "could", "said",
    "but", "not", "which", "who", "when", "after", "before", "over", "into", "about", "more",
    "also", "than", "then", "there", "what", "all", "out",
];

/// Deterministic extractive summarizer
pub struct TextRankSummarizer {
    limit_sentences: usize,
}

impl Default for TextRankSummarizer {
    fn default() -> Self {
        Self { limit_sentences: 3 }
    }
}

impl TextRankSummarizer {
    /// Create a summarizer emitting at most `limit_sentences` sentences
    pub fn new(limit_sentences: usize) -> Self {
        Self {
            limit_sentences: limit_sentences.max(1),
        }
    }

    /// Summarize `text`; short inputs are returned whole
    pub fn summarize(&self, text: &str) -> String {
        let sentences: Vec<&str> = text
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.len() <= self.limit_sentences {
            return sentences.join(" ");
        }

        let token_sets: Vec<HashSet<String>> = sentences.iter().map(|s| content_tokens(s)).collect();
        let n = sentences.len();

        let mut weights = vec![vec![0.0f64; n]; n];
        let mut degrees = vec![0.0f64; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let w = sentence_similarity(&token_sets[i], &token_sets[j]);
                if w > 0.0 {
                    weights[i][j] = w;
                    weights[j][i] = w;
                    degrees[i] += w;
                    degrees[j] += w;
                }
            }
        }

        let scores = power_iterate(&weights, &degrees);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut selected: Vec<usize> = order.into_iter().take(self.limit_sentences).collect();
        selected.sort_unstable();

        selected
            .iter()
            .map(|&i| sentences[i])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn content_tokens(sentence: &str) -> HashSet<String> {
    sentence
        .unicode_words()
        .map(str::to_lowercase)
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Token overlap normalized by sentence length, as in the original TextRank
/// formulation; very short sentences fall back to the raw overlap count.
fn sentence_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let overlap = a.intersection(b).count() as f64;
    if overlap == 0.0 {
        return 0.0;
    }
    let denominator = (a.len() as f64).ln() + (b.len() as f64).ln();
    if denominator > 0.0 {
        overlap / denominator
    } else {
        overlap
    }
}

fn power_iterate(weights: &[Vec<f64>], degrees: &[f64]) -> Vec<f64> {
    let n = degrees.len();
    let mut scores = vec![1.0f64; n];

    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![0.0f64; n];
        let mut delta = 0.0f64;
        for i in 0..n {
            let mut rank = 0.0;
            for j in 0..n {
                if weights[j][i] > 0.0 && degrees[j] > 0.0 {
                    rank += weights[j][i] / degrees[j] * scores[j];
                }
            }
            next[i] = (1.0 - DAMPING) + DAMPING * rank;
            delta += (next[i] - scores[i]).abs();
        }
        scores = next;
        if delta < CONVERGENCE {
            break;
        }
    }

    scores
}
