//! Data models for scraped articles and their cluster groupings.
//!
//! - [`Article`]: one news teaser taken from a promo container
//! - [`ClusterReport`]: articles grouped by the cluster id the clusterer assigned
//!
//! Only `title`, `link` and `description` are persisted. `content` is derived
//! and `cluster` is recomputed on every clustering run, so both are skipped by
//! serde and rebuilt on load.

use serde::{Deserialize, Serialize};

/// A news teaser scraped from the source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredArticle")]
pub struct Article {
    /// Headline text.
    pub title: String,
    /// Absolute URL of the story; empty when the container had no anchor.
    pub link: String,
    /// Summary paragraph, possibly empty.
    pub description: String,
    /// `title` and `description` joined by a single space.
    #[serde(skip)]
    pub content: String,
    /// Cluster id, `None` until the clusterer runs.
    #[serde(skip)]
    pub cluster: Option<usize>,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let description = description.into();
        let content = format!("{} {}", title, description);
        Self {
            title,
            link: link.into(),
            description,
            content,
            cluster: None,
        }
    }
}

/// On-disk shape of an article. Extra keys from older dumps are ignored.
#[derive(Debug, Deserialize)]
struct StoredArticle {
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
}

impl From<StoredArticle> for Article {
    fn from(s: StoredArticle) -> Self {
        Article::new(s.title, s.link, s.description)
    }
}

/// One cluster and its members, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterGroup {
    pub id: usize,
    pub articles: Vec<Article>,
}

/// Articles grouped by cluster id, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterReport {
    /// The `k` that was asked for.
    pub requested_clusters: usize,
    /// The `k` actually used after degenerate-input reduction.
    pub effective_clusters: usize,
    pub clusters: Vec<ClusterGroup>,
}

impl ClusterReport {
    /// Group already-clustered articles. Articles without a cluster id are left out.
    pub fn from_articles(
        articles: &[Article],
        requested_clusters: usize,
        effective_clusters: usize,
    ) -> Self {
        use itertools::Itertools;

        let clusters = articles
            .iter()
            .filter_map(|a| a.cluster.map(|id| (id, a.clone())))
            .into_group_map()
            .into_iter()
            .sorted_by_key(|(id, _)| *id)
            .map(|(id, articles)| ClusterGroup { id, articles })
            .collect();

        Self {
            requested_clusters,
            effective_clusters,
            clusters,
        }
    }
}
