use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::stop_words::is_stop_word;
use super::types::SparseVector;
use crate::TARGET_CLUSTER;

lazy_static! {
    // Runs of two or more word characters.
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");
}

/// Lowercased tokens of `text` with English stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectoriser fitted on one corpus.
///
/// Term frequencies are raw counts, idf is smoothed (`ln((1 + n) / (1 + df)) + 1`)
/// and every row is L2-normalised. Vocabulary indices follow lexicographic term order.
#[derive(Debug, Clone, Default)]
pub struct TfIdf {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdf {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let mut unique: Vec<&str> = tokens.iter().map(String::as_str).collect();
            unique.sort_unstable();
            unique.dedup();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(df.len());
        for (index, (term, count)) in df.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), index);
            idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
        }

        debug!(target: TARGET_CLUSTER, "Fitted TF-IDF on {} documents, vocabulary={}", documents.len(), vocabulary.len());

        TfIdf { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Unknown terms are ignored; a document with no known terms maps to the zero vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        SparseVector::new(self.vocabulary.len(), entries)
    }

    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let model = Self::fit(documents);
        let rows = documents.iter().map(|d| model.transform(d.as_ref())).collect();
        (model, rows)
    }
}
