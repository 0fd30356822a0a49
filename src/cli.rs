//! Command-line interface definitions.
//!
//! Flags override values from the optional YAML config file, which in turn
//! override built-in defaults. Global options can also come from environment
//! variables.

use crate::clustering::{ClusterOptions, DegeneratePolicy, TextField};
use crate::config::{CLUSTER_DEFAULT_K, Config, RUN_DEFAULT_K};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scrape BBC News and group its stories into topical clusters.
///
/// # Examples
///
/// ```sh
/// # Fetch the front page and store its articles
/// news_clusters scrape
///
/// # Cluster the stored articles into 6 groups and print a Markdown report
/// news_clusters cluster -k 6
///
/// # Both in one go, writing the report to a file
/// news_clusters run --markdown-output report.md
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "NEWS_CLUSTERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path of the JSON article store
    #[arg(short, long, global = true, env = "NEWS_CLUSTERS_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the source page and overwrite the article store
    Scrape(ScrapeArgs),
    /// Cluster the stored articles and render the report
    Cluster(ClusterArgs),
    /// Scrape, store, then cluster and render
    Run {
        #[command(flatten)]
        scrape: ScrapeArgs,
        #[command(flatten)]
        cluster: ClusterArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Page to scrape
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub struct ClusterArgs {
    /// Number of clusters (default 6 for `cluster`, 3 for `run`)
    #[arg(short = 'k', long = "clusters")]
    pub clusters: Option<usize>,

    /// Seed for k-means initialization
    #[arg(long)]
    pub seed: Option<u64>,

    /// Article text to cluster on
    #[arg(long, value_enum)]
    pub field: Option<TextField>,

    /// Fail instead of reducing k when there are too few distinct articles
    #[arg(long)]
    pub strict: bool,

    /// Stopword list, one word per line
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Write the Markdown report here instead of stdout
    #[arg(short, long)]
    pub markdown_output: Option<PathBuf>,
}

impl Cli {
    /// Apply global flags on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(store) = &self.store {
            config.store = store.clone();
        }
    }
}

impl ScrapeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.source_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
    }
}

impl ClusterArgs {
    pub fn apply(&self, config: &mut Config) {
        let c = &mut config.clustering;
        if let Some(k) = self.clusters {
            c.num_clusters = Some(k);
        }
        if let Some(seed) = self.seed {
            c.seed = seed;
        }
        if let Some(field) = self.field {
            c.field = field;
        }
        if self.strict {
            c.on_degenerate = DegeneratePolicy::Strict;
        }
        if let Some(path) = &self.stopwords {
            config.stopwords = Some(path.clone());
        }
    }
}

impl Command {
    /// Cluster options for this command once `config` is fully resolved.
    pub fn cluster_options(&self, config: &Config) -> ClusterOptions {
        let default_k = match self {
            Command::Run { .. } => RUN_DEFAULT_K,
            _ => CLUSTER_DEFAULT_K,
        };
        config.clustering.options(default_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_scrape_parsing() {
        let cli = Cli::parse_from([
            "news_clusters",
            "--store",
            "/tmp/articles.json",
            "scrape",
            "--url",
            "https://www.bbc.com/news/business",
            "--timeout-secs",
            "5",
        ]);

        let mut config = Config::default();
        cli.apply(&mut config);
        let Command::Scrape(args) = &cli.command else {
            panic!("expected scrape");
        };
        args.apply(&mut config);

        assert_eq!(config.store, PathBuf::from("/tmp/articles.json"));
        assert_eq!(config.source_url, "https://www.bbc.com/news/business");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_cli_cluster_flags() {
        let cli = Cli::parse_from([
            "news_clusters",
            "cluster",
            "-k",
            "4",
            "--seed",
            "7",
            "--field",
            "content",
            "--strict",
            "-m",
            "report.md",
        ]);

        let Command::Cluster(args) = &cli.command else {
            panic!("expected cluster");
        };
        let mut config = Config::default();
        args.apply(&mut config);
        let options = cli.command.cluster_options(&config);

        assert_eq!(options.num_clusters, 4);
        assert_eq!(options.seed, 7);
        assert_eq!(options.field, TextField::Content);
        assert_eq!(options.on_degenerate, DegeneratePolicy::Strict);
        assert_eq!(args.markdown_output, Some(PathBuf::from("report.md")));
    }

    #[test]
    fn test_default_k_depends_on_command() {
        let config = Config::default();

        let cluster = Cli::parse_from(["news_clusters", "cluster"]);
        assert_eq!(cluster.command.cluster_options(&config).num_clusters, 6);

        let run = Cli::parse_from(["news_clusters", "run"]);
        assert_eq!(run.command.cluster_options(&config).num_clusters, 3);
    }

    #[test]
    fn test_global_store_after_subcommand() {
        let cli = Cli::parse_from(["news_clusters", "cluster", "-s", "x.json"]);
        assert_eq!(cli.store, Some(PathBuf::from("x.json")));
    }
}
