//! Reddit Downloader - bulk media retrieval for listing exports
//!
//! This library takes post records from a reddit-style listing, resolves
//! each post's link through a set of hosting-site adapters, and downloads
//! the underlying media with content-hash deduplication.
//!
//! # Features
//!
//! - Ordered URL-pattern adapter selection with a generic extractor fallback
//! - Page-scrape adapters for hosts that embed media URLs in HTML
//! - Bounded fixed-interval retry on transient transfer failures
//! - Content-hash deduplication with skip and hard-link policies
//! - Pre-seeding the dedup ledger from an existing output tree
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use reddit_downloader::{
//!     Config, DeduplicationLedger, DownloadOrchestrator, OrchestratorOptions, SiteRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let posts = reddit_downloader::post::load_listing(Path::new("listing.json"))?;
//!
//!     let options = OrchestratorOptions::from_config(&config)?;
//!     let mut orchestrator = DownloadOrchestrator::new(
//!         reqwest::Client::new(),
//!         SiteRegistry::default(),
//!         DeduplicationLedger::new(),
//!         options,
//!     );
//!     orchestrator.run(&posts).await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod download;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod fs;
pub mod output;
pub mod post;
pub mod resource;
pub mod sites;

// Re-exports for convenience
pub use config::{Config, DuplicatePolicy};
pub use dedup::DeduplicationLedger;
pub use download::{DownloadOrchestrator, OrchestratorOptions, RunStats};
pub use error::{Error, Result};
pub use fetch::RetryingFetcher;
pub use filter::DownloadFilter;
pub use post::Post;
pub use resource::Resource;
pub use sites::{SiteAdapter, SiteAdapterSelector, SiteRegistry};
