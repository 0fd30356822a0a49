//! Output generation: the JSON article store and the Markdown report.
//!
//! # Submodules
//!
//! - [`json`]: Saves and loads the scraped article list (`bbc_articles.json`)
//! - [`markdown`]: Renders articles and their clusters for reading
//!
//! # Output Files
//!
//! ```text
//! bbc_articles.json   # overwritten by every scrape
//! report.md           # optional, from --markdown-output; stdout otherwise
//! ```

pub mod json;
pub mod markdown;
