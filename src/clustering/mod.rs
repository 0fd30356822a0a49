//! Topical clustering of scraped articles.
//!
//! The clusterer normalizes one text field per article with [`Stopwords`],
//! builds a [`TfidfMatrix`] over the batch and partitions the rows with
//! seeded [`KMeans`]. The resulting label is written back onto each
//! [`Article`].
//!
//! Cluster ids have no meaning beyond grouping: the same input and seed give
//! the same ids, but a different input order may number the same groups
//! differently.

pub mod kmeans;
pub mod text;
pub mod tfidf;

use crate::error::ClusterError;
use crate::models::Article;
use clap::ValueEnum;
use kmeans::KMeans;
use serde::Deserialize;
use text::Stopwords;
use tfidf::TfidfMatrix;
use tracing::{info, instrument, warn};

/// Which article text is clustered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    /// Headline only.
    #[default]
    Title,
    /// Headline followed by the summary.
    Content,
}

/// What to do when there are fewer distinct documents than requested clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Lower `k` to the number of distinct documents.
    #[default]
    Reduce,
    /// Refuse with [`ClusterError::DegenerateInput`].
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    pub num_clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub field: TextField,
    pub on_degenerate: DegeneratePolicy,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            num_clusters: 6,
            seed: 42,
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            field: TextField::Title,
            on_degenerate: DegeneratePolicy::Reduce,
        }
    }
}

/// Outcome of a clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSummary {
    pub requested: usize,
    /// `k` actually used; zero for an empty batch.
    pub effective: usize,
}

#[derive(Debug, Clone)]
pub struct Clusterer {
    stopwords: Stopwords,
    options: ClusterOptions,
}

impl Clusterer {
    pub fn new(stopwords: Stopwords, options: ClusterOptions) -> Self {
        Self { stopwords, options }
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Assign a cluster id to every article.
    ///
    /// On error no article is modified.
    #[instrument(level = "info", skip_all, fields(n = articles.len(), k = self.options.num_clusters))]
    pub fn cluster(&self, articles: &mut [Article]) -> Result<ClusterSummary, ClusterError> {
        let requested = self.options.num_clusters;
        if requested == 0 {
            return Err(ClusterError::InvalidClusterCount);
        }
        if articles.is_empty() {
            info!("No articles to cluster");
            return Ok(ClusterSummary {
                requested,
                effective: 0,
            });
        }

        let docs: Vec<String> = articles
            .iter()
            .map(|a| match self.options.field {
                TextField::Title => self.stopwords.normalize(&a.title),
                TextField::Content => self.stopwords.normalize(&a.content),
            })
            .collect();
        let matrix = TfidfMatrix::fit_transform(&docs);

        let distinct = matrix.distinct_rows();
        let effective = if distinct < requested {
            match self.options.on_degenerate {
                DegeneratePolicy::Strict => {
                    return Err(ClusterError::DegenerateInput {
                        requested,
                        distinct,
                    });
                }
                DegeneratePolicy::Reduce => {
                    warn!(requested, distinct, "Fewer distinct documents than clusters; reducing k");
                    distinct
                }
            }
        } else {
            requested
        };

        let fit = KMeans {
            k: effective,
            seed: self.options.seed,
            n_init: self.options.n_init,
            max_iterations: self.options.max_iterations,
            tolerance: self.options.tolerance,
        }
        .fit(&matrix.rows);

        for (article, label) in articles.iter_mut().zip(fit.labels) {
            article.cluster = Some(label);
        }

        info!(
            features = matrix.n_features(),
            effective,
            inertia = fit.inertia,
            iterations = fit.iterations,
            "Clustered articles"
        );
        Ok(ClusterSummary {
            requested,
            effective,
        })
    }
}
