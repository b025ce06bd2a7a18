//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Reddit bulk downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "reddit-downloader",
    version,
    about = "Bulk-download linked media from reddit listing exports",
    long_about = "Takes a listing export (a JSON array of post records), resolves each \n\
                  post's link through a set of hosting-site adapters, and downloads the \n\
                  underlying media with content-hash deduplication."
)]
pub struct Args {
    /// Listing export file to process.
    pub listing: PathBuf,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Format scheme for file names.
    #[arg(long)]
    pub file_scheme: Option<String>,

    /// Format scheme for folder names.
    #[arg(long)]
    pub folder_scheme: Option<String>,

    /// Skip writing content whose hash has already been written.
    #[arg(long)]
    pub no_dupes: bool,

    /// Hard-link repeated content to the first downloaded copy.
    #[arg(long, conflicts_with = "no_dupes")]
    pub hard_link: bool,

    /// Hash the existing output tree first, so content already on disk
    /// counts as seen.
    #[arg(long)]
    pub search_existing: bool,

    /// Retry wait budget per resource, in seconds.
    #[arg(long)]
    pub max_wait_time: Option<u64>,

    /// Post ID to skip. May be given multiple times.
    #[arg(long = "exclude-id")]
    pub exclude_ids: Vec<String>,

    /// File of post IDs to skip, one per line.
    #[arg(long)]
    pub exclude_id_file: Option<PathBuf>,

    /// Subreddit whose posts are skipped. May be given multiple times.
    #[arg(long = "skip-subreddit")]
    pub skip_subreddits: Vec<String>,

    /// File extension to reject before download. May be given multiple
    /// times.
    #[arg(long = "skip")]
    pub skip_extensions: Vec<String>,

    /// Domain fragment to reject before download. May be given multiple
    /// times.
    #[arg(long = "ignore-domain")]
    pub skip_domains: Vec<String>,

    /// Base delay between downloads, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where
    /// specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(dir) = self.download_directory {
            config.options.download_directory = Some(dir);
        }
        if let Some(scheme) = self.file_scheme {
            config.naming.file_scheme = scheme;
        }
        if let Some(scheme) = self.folder_scheme {
            config.naming.folder_scheme = scheme;
        }
        if self.no_dupes {
            config.options.no_dupes = true;
        }
        if self.hard_link {
            config.options.hard_link = true;
        }
        if self.search_existing {
            config.options.search_existing = true;
        }
        if let Some(seconds) = self.max_wait_time {
            config.fetch.max_wait_seconds = seconds;
        }
        config.options.exclude_ids.extend(self.exclude_ids);
        if let Some(path) = self.exclude_id_file {
            config.options.exclude_id_file = Some(path);
        }
        config.options.skip_subreddits.extend(self.skip_subreddits);
        config.filter.skip_extensions.extend(self.skip_extensions);
        config.filter.skip_domains.extend(self.skip_domains);
        if let Some(delay) = self.delay_ms {
            config.options.download_delay_ms = delay;
        }
    }
}
