//! # News Clusters
//!
//! Scrapes the BBC News World front page, extracts each story teaser and
//! groups the stories into topical clusters.
//!
//! ## Usage
//!
//! ```sh
//! news_clusters scrape              # fetch + store bbc_articles.json
//! news_clusters cluster -k 6        # load + cluster + print Markdown
//! news_clusters run                 # everything, k = 3 by default
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline:
//! 1. **Fetching**: One GET of the source page, with a bounded timeout
//! 2. **Extraction**: Promo containers become articles, deduplicated by link
//! 3. **Storage**: The article list overwrites a pretty-printed JSON file
//! 4. **Clustering**: TF-IDF vectors partitioned by seeded k-means
//! 5. **Output**: A Markdown report of articles and clusters
//!
//! `scrape` runs steps 1-3, `cluster` loads the store and runs 4-5, `run` does all five.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod clustering;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::{Cli, Command};
use clustering::text::Stopwords;
use clustering::{ClusterOptions, Clusterer};
use config::Config;
use error::{AppError, FetchError};
use models::{Article, ClusterReport};
use outputs::{json, markdown};
use scrapers::{Fetcher, bbc};
use utils::ensure_parent_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_clusters starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = run(args).await {
        error!(error = %e, "Run failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run(args: Cli) -> Result<(), AppError> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);

    match &args.command {
        Command::Scrape(scrape_args) => {
            scrape_args.apply(&mut config);
            scrape(&config).await?;
        }
        Command::Cluster(cluster_args) => {
            cluster_args.apply(&mut config);
            let stopwords = init_stopwords(&config)?;
            let articles = json::load_articles(&config.store).await?;
            let options = args.command.cluster_options(&config);
            cluster_and_render(
                articles,
                stopwords,
                options,
                cluster_args.markdown_output.as_deref(),
            )
            .await?;
        }
        Command::Run {
            scrape: scrape_args,
            cluster: cluster_args,
        } => {
            scrape_args.apply(&mut config);
            cluster_args.apply(&mut config);
            let stopwords = init_stopwords(&config)?;
            let articles = scrape(&config).await?;
            let options = args.command.cluster_options(&config);
            cluster_and_render(
                articles,
                stopwords,
                options,
                cluster_args.markdown_output.as_deref(),
            )
            .await?;
        }
    }
    Ok(())
}

/// Load the stopword list once, before any article is processed.
fn init_stopwords(config: &Config) -> Result<Stopwords, AppError> {
    let stopwords = match &config.stopwords {
        Some(path) => Stopwords::from_file(path)?,
        None => Stopwords::english(),
    };
    if stopwords.is_empty() {
        warn!("Stopword list is empty; no words will be filtered");
    }
    Ok(stopwords)
}

/// Fetch, extract and store. Returns the stored articles.
#[instrument(level = "info", skip_all, fields(url = %config.source_url))]
async fn scrape(config: &Config) -> Result<Vec<Article>, AppError> {
    let base_url = Url::parse(&config.source_url).map_err(FetchError::from)?;
    let fetcher = Fetcher::new(Duration::from_secs(config.timeout_secs))?;
    let html = fetcher.fetch(&config.source_url).await?;

    let extraction = bbc::extract_articles(&html, &base_url);
    for failure in &extraction.failures {
        warn!(error = %failure, "Skipped malformed promo container");
    }

    json::save_articles(&config.store, &extraction.articles).await?;
    info!(
        path = %config.store.display(),
        count = extraction.articles.len(),
        "Scrape complete"
    );
    Ok(extraction.articles)
}

#[instrument(level = "info", skip_all, fields(n = articles.len()))]
async fn cluster_and_render(
    mut articles: Vec<Article>,
    stopwords: Stopwords,
    options: ClusterOptions,
    markdown_output: Option<&Path>,
) -> Result<(), AppError> {
    if articles.is_empty() {
        warn!("{}", markdown::NO_ARTICLES_WARNING);
    }

    let clusterer = Clusterer::new(stopwords, options);
    debug!(options = ?clusterer.options(), "Clusterer ready");
    let summary = clusterer.cluster(&mut articles)?;
    let report = ClusterReport::from_articles(&articles, summary.requested, summary.effective);
    let md = markdown::render(&articles, &report);

    match markdown_output {
        Some(path) => {
            ensure_parent_dir(path).await?;
            tokio::fs::write(path, md).await?;
            info!(path = %path.display(), "Wrote Markdown report");
        }
        None => print!("{}", md),
    }
    Ok(())
}
