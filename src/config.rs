//! Configuration file support.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and environment variables (see [`crate::cli`]). Every
//! key in the file is optional:
//!
//! ```yaml
//! source_url: https://www.bbc.com/news/world
//! store: bbc_articles.json
//! timeout_secs: 30
//! stopwords: ./stopwords.txt
//! clustering:
//!   num_clusters: 6
//!   seed: 42
//!   n_init: 10
//!   max_iterations: 300
//!   tolerance: 0.0001
//!   field: title        # or: content
//!   on_degenerate: reduce   # or: strict
//! ```

use crate::clustering::{ClusterOptions, DegeneratePolicy, TextField};
use crate::error::ConfigError;
use crate::outputs::json::DEFAULT_STORE;
use crate::scrapers::bbc::BBC_WORLD_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Clusters formed by `cluster` when nothing else is configured.
pub const CLUSTER_DEFAULT_K: usize = 6;
/// Clusters formed by `run` when nothing else is configured.
pub const RUN_DEFAULT_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    pub store: PathBuf,
    /// Request timeout for the page fetch.
    pub timeout_secs: u64,
    /// Custom stopword list; the built-in English list is used when unset.
    pub stopwords: Option<PathBuf>,
    pub clustering: ClusteringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: BBC_WORLD_URL.to_string(),
            store: PathBuf::from(DEFAULT_STORE),
            timeout_secs: 30,
            stopwords: None,
            clustering: ClusteringConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Overrides the per-command default when set.
    pub num_clusters: Option<usize>,
    pub seed: u64,
    pub n_init: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub field: TextField,
    pub on_degenerate: DegeneratePolicy,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        let defaults = ClusterOptions::default();
        Self {
            num_clusters: None,
            seed: defaults.seed,
            n_init: defaults.n_init,
            max_iterations: defaults.max_iterations,
            tolerance: defaults.tolerance,
            field: defaults.field,
            on_degenerate: defaults.on_degenerate,
        }
    }
}

impl ClusteringConfig {
    /// Build clusterer options, using `default_k` if no cluster count is set.
    pub fn options(&self, default_k: usize) -> ClusterOptions {
        ClusterOptions {
            num_clusters: self.num_clusters.unwrap_or(default_k),
            seed: self.seed,
            n_init: self.n_init,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            field: self.field,
            on_degenerate: self.on_degenerate,
        }
    }
}

impl Config {
    /// Read a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Defaults, or the file at `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source_url, "https://www.bbc.com/news/world");
        assert_eq!(config.store, PathBuf::from("bbc_articles.json"));
        assert_eq!(config.clustering.options(CLUSTER_DEFAULT_K).num_clusters, 6);
        assert_eq!(config.clustering.options(RUN_DEFAULT_K).num_clusters, 3);
        assert_eq!(config.clustering.seed, 42);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "store: /tmp/articles.json\nclustering:\n  num_clusters: 4\n  field: content\n  on_degenerate: strict"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.store, PathBuf::from("/tmp/articles.json"));
        assert_eq!(config.timeout_secs, 30);

        let options = config.clustering.options(RUN_DEFAULT_K);
        assert_eq!(options.num_clusters, 4);
        assert_eq!(options.field, TextField::Content);
        assert_eq!(options.on_degenerate, DegeneratePolicy::Strict);
        assert_eq!(options.seed, 42);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "clustering:\n  field: headlines").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("config.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
