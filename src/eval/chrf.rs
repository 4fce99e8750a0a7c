//! Corpus-level chrF2++ scoring
//!
//! Character n-grams up to order 6 plus word n-grams up to order 2, scored
//! as an F-measure with recall weighted by beta = 2. Statistics are summed
//! over all segment pairs before the F-score is taken, so the result is a
//! corpus score rather than an average of segment scores.

use std::collections::HashMap;

/// Highest character n-gram order
const CHAR_ORDER: usize = 6;
/// Highest word n-gram order
const WORD_ORDER: usize = 2;
/// Recall weight
const BETA: f64 = 2.0;
/// Smoothing term applied to every ratio denominator
const EPSILON: f64 = 1e-16;

/// Per-order n-gram statistics accumulated over the corpus
#[derive(Debug, Clone, Copy, Default)]
struct OrderStats {
    candidate_total: usize,
    reference_total: usize,
    matched: usize,
}

/// chrF2++ corpus scorer
#[derive(Debug, Clone)]
pub struct ChrfScorer {
    char_order: usize,
    word_order: usize,
    beta: f64,
}

impl Default for ChrfScorer {
    fn default() -> Self {
        Self {
            char_order: CHAR_ORDER,
            word_order: WORD_ORDER,
            beta: BETA,
        }
    }
}

impl ChrfScorer {
    /// Score a corpus of candidate translations against row-aligned
    /// references. Pairs are zipped positionally; the result is on the
    /// 0-100 scale.
    pub fn corpus_score(&self, candidates: &[String], references: &[String]) -> f64 {
        let orders = self.char_order + self.word_order;
        let mut stats = vec![OrderStats::default(); orders];

        for (candidate, reference) in candidates.iter().zip(references.iter()) {
            self.accumulate(candidate, reference, &mut stats);
        }

        let f_sum: f64 = stats
            .iter()
            .map(|s| f_score(s.matched, s.candidate_total, s.reference_total, self.beta))
            .sum();

        100.0 * f_sum / orders as f64
    }

    /// Add one segment pair's statistics to the per-order totals
    fn accumulate(&self, candidate: &str, reference: &str, stats: &mut [OrderStats]) {
        let candidate_chars = squeeze(candidate);
        let reference_chars = squeeze(reference);
        for n in 1..=self.char_order {
            let cand_counts = char_ngram_counts(&candidate_chars, n);
            let ref_counts = char_ngram_counts(&reference_chars, n);
            tally(&mut stats[n - 1], &cand_counts, &ref_counts);
        }

        let candidate_words = tokenize(candidate);
        let reference_words = tokenize(reference);
        for n in 1..=self.word_order {
            let cand_counts = word_ngram_counts(&candidate_words, n);
            let ref_counts = word_ngram_counts(&reference_words, n);
            tally(&mut stats[self.char_order + n - 1], &cand_counts, &ref_counts);
        }
    }
}

fn tally(
    stats: &mut OrderStats,
    cand_counts: &HashMap<String, usize>,
    ref_counts: &HashMap<String, usize>,
) {
    stats.candidate_total += cand_counts.values().sum::<usize>();
    stats.reference_total += ref_counts.values().sum::<usize>();
    stats.matched += clipped_matches(cand_counts, ref_counts);
}

/// F-measure with recall weighted by beta, epsilon-smoothed
fn f_score(matched: usize, candidate_total: usize, reference_total: usize, beta: f64) -> f64 {
    let precision = matched as f64 / (candidate_total as f64 + EPSILON);
    let recall = matched as f64 / (reference_total as f64 + EPSILON);
    let beta_sq = beta * beta;
    (1.0 + beta_sq) * precision * recall / (beta_sq * precision + recall + EPSILON)
}

/// All non-whitespace characters of the text, in order
fn squeeze(text: &str) -> Vec<char> {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whitespace-split tokens with edge punctuation separated into its own
/// tokens, so "world." matches "world" plus "."
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        let mut start = 0;
        let mut end = chars.len();
        while start < end && !chars[start].is_alphanumeric() {
            start += 1;
        }
        while end > start && !chars[end - 1].is_alphanumeric() {
            end -= 1;
        }

        for c in &chars[..start] {
            tokens.push(c.to_string());
        }
        if start < end {
            tokens.push(chars[start..end].iter().collect());
        }
        for c in &chars[end..] {
            tokens.push(c.to_string());
        }
    }
    tokens
}

fn char_ngram_counts(chars: &[char], n: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    if chars.len() >= n {
        for window in chars.windows(n) {
            *counts.entry(window.iter().collect::<String>()).or_insert(0) += 1;
        }
    }
    counts
}

fn word_ngram_counts(words: &[String], n: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    if words.len() >= n {
        for window in words.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

/// Overlap clipped to the reference count, per n-gram
fn clipped_matches(
    cand_counts: &HashMap<String, usize>,
    ref_counts: &HashMap<String, usize>,
) -> usize {
    let mut matched = 0;
    for (ngram, cand_count) in cand_counts {
        if let Some(ref_count) = ref_counts.get(ngram) {
            matched += cand_count.min(ref_count);
        }
    }
    matched
}
