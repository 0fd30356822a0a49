//! BBC News promo extractor.
//!
//! The BBC World front page lists each story as a `div.gs-c-promo` container
//! holding a heading, an optional anchor and an optional summary paragraph:
//!
//! ```text
//! div.gs-c-promo
//! ├── a.gs-c-promo-heading[href]
//! │   └── h3.gs-c-promo-heading__title
//! └── p.gs-c-promo-summary
//! ```
//!
//! Relative `href`s are resolved against the page URL. Stories are
//! deduplicated on the resulting link string, first occurrence wins.

use crate::error::ExtractError;
use crate::models::Article;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default page scraped when no URL is configured.
pub const BBC_WORLD_URL: &str = "https://www.bbc.com/news/world";

static PROMO: Lazy<Selector> = Lazy::new(|| Selector::parse("div.gs-c-promo").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.gs-c-promo-heading__title").unwrap());
static HEADING_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.gs-c-promo-heading").unwrap());
static SUMMARY: Lazy<Selector> = Lazy::new(|| Selector::parse("p.gs-c-promo-summary").unwrap());

/// Articles recovered from one page plus the containers that were skipped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub articles: Vec<Article>,
    pub failures: Vec<ExtractError>,
    /// Containers dropped because their link was already seen.
    pub duplicates: usize,
}

/// Extract deduplicated articles from a BBC News page.
///
/// A container without a title is recorded in [`Extraction::failures`] and
/// skipped; it does not claim its link in the dedup set. An empty link is an
/// ordinary dedup key, so only the first link-less container survives.
#[instrument(level = "info", skip_all, fields(%base_url))]
pub fn extract_articles(html: &str, base_url: &Url) -> Extraction {
    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut extraction = Extraction::default();

    for (index, promo) in document.select(&PROMO).enumerate() {
        let Some(title) = first_text(promo, &TITLE).filter(|t| !t.is_empty()) else {
            warn!(index, "Promo container has no title; skipping");
            extraction.failures.push(ExtractError::MissingTitle { index });
            continue;
        };

        let link = promo
            .select(&HEADING_LINK)
            .next()
            .map(|a| resolve_link(base_url, a.value().attr("href").unwrap_or("").trim()))
            .unwrap_or_default();

        if !seen.insert(link.clone()) {
            debug!(index, %link, "Duplicate link; skipping");
            extraction.duplicates += 1;
            continue;
        }

        let description = first_text(promo, &SUMMARY).unwrap_or_default();
        debug!(
            index,
            %link,
            title = %truncate_for_log(&title, 80),
            "Extracted promo"
        );
        extraction
            .articles
            .push(Article::new(title, link, description));
    }

    info!(
        articles = extraction.articles.len(),
        duplicates = extraction.duplicates,
        failures = extraction.failures.len(),
        "Extracted BBC articles"
    );
    extraction
}

/// Trimmed text of the first descendant matching `selector`.
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

/// Resolve `href` against the page URL.
///
/// Absolute hrefs pass through unchanged. If joining fails the href is
/// appended to the page URL as-is.
fn resolve_link(base_url: &Url, href: &str) -> String {
    match base_url.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            warn!(%href, error = %e, "Cannot resolve promo href; concatenating");
            format!("{}{}", base_url, href)
        }
    }
}
