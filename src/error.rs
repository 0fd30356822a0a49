//! Error types for each pipeline stage.
//!
//! Every stage owns a small `thiserror` enum so callers can match on the
//! failure they care about (a non-success status, a malformed container, a
//! degenerate clustering request). [`AppError`] folds them together for the
//! binary boundary.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures while retrieving the source page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} returned status {status_code}")]
    Status { url: String, status_code: u16 },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A promo container that could not be turned into an article.
///
/// These are collected per container and never abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("promo container #{index} has no title")]
    MissingTitle { index: usize },
}

/// Failures while persisting or loading the article list.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid article JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while partitioning articles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("cluster count must be at least 1")]
    InvalidClusterCount,
    #[error("{requested} clusters requested but only {distinct} distinct documents")]
    DegenerateInput { requested: usize, distinct: usize },
}

/// Failures while loading a stopword list.
#[derive(Debug, Error)]
pub enum StopwordsError {
    #[error("cannot read stopword list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while loading the YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Cluster(#[from] ClusterError),
    #[error(transparent)]
    Stopwords(#[from] StopwordsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
