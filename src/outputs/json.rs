//! JSON article store.
//!
//! The scrape step overwrites a single pretty-printed JSON array so a later
//! `cluster` run can pick it up:
//!
//! ```text
//! [
//!     {
//!         "title": "...",
//!         "link": "https://www.bbc.com/news/...",
//!         "description": "..."
//!     }
//! ]
//! ```
//!
//! Only `title`, `link` and `description` are written; see [`Article`].

use crate::error::StoreError;
use crate::models::Article;
use crate::utils::ensure_parent_dir;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Default store file name.
pub const DEFAULT_STORE: &str = "bbc_articles.json";

/// Overwrite `path` with `articles`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn save_articles(path: &Path, articles: &[Article]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    articles.serialize(&mut ser).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    ensure_parent_dir(path).await.map_err(io_err)?;
    fs::write(path, buf).await.map_err(io_err)?;
    info!("Wrote article store");
    Ok(())
}

/// Load articles from `path`. A missing file is an empty store.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_articles(path: &Path) -> Result<Vec<Article>, StoreError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Article store not found; starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let articles: Vec<Article> = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(count = articles.len(), "Loaded article store");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> Vec<Article> {
        vec![
            Article::new("Élection à Paris", "https://www.bbc.com/news/1", "Résultats"),
            Article::new("No link here", "", ""),
        ]
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_stable_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STORE);
        let mut original = articles();
        original[0].cluster = Some(3);

        save_articles(&path, &original).await.unwrap();
        let loaded = load_articles(&path).await.unwrap();

        assert_eq!(loaded.len(), 2);
        for (a, b) in loaded.iter().zip(&original) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.link, b.link);
            assert_eq!(a.description, b.description);
            assert_eq!(a.content, b.content);
            assert_eq!(a.cluster, None);
        }
    }

    #[tokio::test]
    async fn test_saved_file_is_pretty_and_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STORE);
        save_articles(&path, &articles()).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"title\": \"Élection à Paris\""));
        assert!(!raw.contains("content"));
        assert!(!raw.contains("cluster"));
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STORE);
        save_articles(&path, &articles()).await.unwrap();
        save_articles(&path, &articles()[1..]).await.unwrap();

        assert_eq!(load_articles(&path).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        save_articles(&path, &[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_articles(&dir.path().join("absent.json")).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STORE);
        std::fs::write(&path, "[{\"title\": ").unwrap();
        assert!(matches!(
            load_articles(&path).await,
            Err(StoreError::Json { .. })
        ));
    }
}
