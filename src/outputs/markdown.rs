//! Markdown rendering of the article list and its clusters.
//!
//! ```text
//! # News Clustering - BBC News
//!
//! _Generated 2025-05-06 20:30_
//!
//! ## BBC News Articles
//! - [title](link) - description
//!
//! ## Clustered News
//! ### Cluster 1
//! - [title](link) - description
//! ```
//!
//! Clusters are numbered from 1 for readers; the numbering follows the
//! internal ids, so an id of 0 prints as "Cluster 1".

use crate::models::{Article, ClusterReport};
use chrono::Local;
use std::fmt::Write;

/// Shown when there is nothing to render.
pub const NO_ARTICLES_WARNING: &str =
    "No news articles available. Make sure to run the scraper to fetch and store articles.";

/// Render the full report.
pub fn render(articles: &[Article], report: &ClusterReport) -> String {
    let mut md = String::new();
    writeln!(md, "# News Clustering - BBC News\n").unwrap();
    writeln!(md, "_Generated {}_\n", Local::now().format("%Y-%m-%d %H:%M")).unwrap();

    if articles.is_empty() {
        writeln!(md, "> **Warning:** {}", NO_ARTICLES_WARNING).unwrap();
        return md;
    }

    writeln!(md, "## BBC News Articles\n").unwrap();
    for article in articles {
        writeln!(md, "{}", article_line(article)).unwrap();
    }

    writeln!(md, "\n## Clustered News").unwrap();
    if report.effective_clusters < report.requested_clusters {
        writeln!(
            md,
            "\n_{} clusters requested, {} formed._",
            report.requested_clusters, report.effective_clusters
        )
        .unwrap();
    }
    for group in &report.clusters {
        writeln!(md, "\n### Cluster {}\n", group.id + 1).unwrap();
        for article in &group.articles {
            writeln!(md, "{}", article_line(article)).unwrap();
        }
    }

    md
}

fn article_line(article: &Article) -> String {
    let title = escape_brackets(&article.title);
    let head = if article.link.is_empty() {
        title
    } else {
        format!("[{}]({})", title, article.link)
    };
    if article.description.is_empty() {
        format!("- {}", head)
    } else {
        format!("- {} - {}", head, article.description)
    }
}

/// Keep square brackets in titles from breaking link syntax.
fn escape_brackets(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}
