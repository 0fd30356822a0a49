//! TF-IDF document vectors.
//!
//! Term frequency is the raw count of a term in a document. Inverse document
//! frequency is smoothed as if one extra document contained every term:
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! Each row is then scaled to unit L2 norm. Rows of documents with no
//! vocabulary terms stay all-zero.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Terms are runs of two or more word characters.
static TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Dense document-term matrix, one row per input document.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
    /// Sorted vocabulary; column `j` of every row weights `vocabulary[j]`.
    pub vocabulary: Vec<String>,
    pub idf: Vec<f64>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfMatrix {
    /// Fit the vocabulary and idf weights on `docs` and transform them.
    pub fn fit_transform<S: AsRef<str>>(docs: &[S]) -> Self {
        let tokenized: Vec<Vec<&str>> = docs
            .iter()
            .map(|d| TERM.find_iter(d.as_ref()).map(|m| m.as_str()).collect())
            .collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &tokenized {
            let mut unique = terms.clone();
            unique.sort_unstable();
            unique.dedup();
            for t in unique {
                *df.entry(t).or_default() += 1;
            }
        }

        let n = docs.len() as f64;
        let columns: BTreeMap<&str, usize> = df.keys().enumerate().map(|(j, t)| (*t, j)).collect();
        let idf: Vec<f64> = df
            .values()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows = tokenized
            .iter()
            .map(|terms| {
                let mut row = vec![0.0; idf.len()];
                for t in terms {
                    row[columns[t]] += 1.0;
                }
                for (w, weight) in row.iter_mut().zip(&idf) {
                    *w *= weight;
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Self {
            vocabulary: df.keys().map(|t| t.to_string()).collect(),
            idf,
            rows,
        }
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of pairwise-distinct rows.
    pub fn distinct_rows(&self) -> usize {
        let mut keys: Vec<Vec<u64>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|v| v.to_bits()).collect())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}
