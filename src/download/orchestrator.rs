//! The per-post download pipeline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use tokio::time::sleep;

use crate::config::{Config, DuplicatePolicy};
use crate::dedup::DeduplicationLedger;
use crate::download::state::RunStats;
use crate::error::{Error, Result};
use crate::fetch::RetryingFetcher;
use crate::filter::DownloadFilter;
use crate::fs::naming::NameFormatter;
use crate::fs::paths::{hard_link, set_modified_time, write_resource};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::{SiteAdapter, SiteAdapterSelector, SiteRegistry};

/// Everything the orchestrator needs beyond the HTTP client and adapter
/// registry, assembled from the loaded configuration.
#[derive(Debug)]
pub struct OrchestratorOptions {
    pub root: PathBuf,
    pub policy: DuplicatePolicy,
    pub formatter: NameFormatter,
    pub filter: DownloadFilter,
    pub backoff: Duration,
    pub max_wait: Duration,
    pub excluded_ids: HashSet<String>,
    pub skip_subreddits: HashSet<String>,
    pub download_delay_ms: u64,
}

impl OrchestratorOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            root: config.download_directory(),
            policy: config.duplicate_policy(),
            formatter: NameFormatter::new(config.naming.clone()),
            filter: DownloadFilter::new(config.filter.clone()),
            backoff: Duration::from_secs(config.fetch.backoff_seconds),
            max_wait: Duration::from_secs(config.fetch.max_wait_seconds),
            excluded_ids: config.exclusion_set()?,
            skip_subreddits: config
                .options
                .skip_subreddits
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            download_delay_ms: config.options.download_delay_ms,
        })
    }
}

/// What happened to one resource.
enum Persisted {
    Written,
    AlreadyOnDisk,
    Filtered,
    DuplicateSkipped,
    HardLinked,
}

/// Drives every post through adapter selection, resource resolution,
/// filtering, fetch, hashing and the persist decision. Posts and their
/// resources are processed strictly sequentially; the ledger is the only
/// state shared across posts.
pub struct DownloadOrchestrator {
    client: Client,
    selector: SiteAdapterSelector,
    registry: SiteRegistry,
    fetcher: RetryingFetcher,
    ledger: DeduplicationLedger,
    options: OrchestratorOptions,
    stats: RunStats,
}

impl DownloadOrchestrator {
    pub fn new(
        client: Client,
        registry: SiteRegistry,
        ledger: DeduplicationLedger,
        options: OrchestratorOptions,
    ) -> Self {
        let fetcher = RetryingFetcher::new(client.clone(), options.backoff);
        Self {
            client,
            selector: SiteAdapterSelector::new(),
            registry,
            fetcher,
            ledger,
            options,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn ledger(&self) -> &DeduplicationLedger {
        &self.ledger
    }

    /// Process every post in listing order. Site failures never escape
    /// this loop; they are logged and the run moves on.
    pub async fn run(&mut self, posts: &[Post]) -> &RunStats {
        for post in posts {
            self.process_post(post).await;
        }
        &self.stats
    }

    async fn process_post(&mut self, post: &Post) {
        if self.options.excluded_ids.contains(&post.id) {
            tracing::debug!("Skipping excluded post {}", post.id);
            self.stats.skipped_excluded += 1;
            return;
        }

        if self
            .options
            .skip_subreddits
            .contains(&post.subreddit.to_lowercase())
        {
            tracing::debug!("Skipping post {} from r/{}", post.id, post.subreddit);
            self.stats.skipped_excluded += 1;
            return;
        }

        let kind = match self.selector.select(&post.url, self.registry.probe()).await {
            Ok(kind) => kind,
            Err(e) => {
                self.log_post_failure(post, "selector", &e);
                self.stats.failed_posts += 1;
                return;
            }
        };

        let adapter = self.registry.adapter(kind);
        let adapter_name = adapter.name();

        let resources = match adapter.find_resources(post, &self.client).await {
            Ok(resources) => resources,
            Err(e) => {
                self.log_post_failure(post, adapter_name, &e);
                self.stats.failed_posts += 1;
                return;
            }
        };

        let paths = match self
            .options
            .formatter
            .format_resource_paths(&self.options.root, post, &resources)
        {
            Ok(paths) => paths,
            Err(e) => {
                self.log_post_failure(post, adapter_name, &e);
                self.stats.failed_posts += 1;
                return;
            }
        };

        // per-resource failures abandon that resource only; the rest of
        // the post's resources still get their chance
        for (path, resource) in paths.into_iter().zip(resources) {
            match self.process_resource(post, path.as_path(), resource).await {
                Ok(Persisted::Written) => {
                    self.stats.downloaded += 1;
                    tracing::info!("Downloaded {} -> {}", post.id, path.display());
                }
                Ok(Persisted::AlreadyOnDisk) => {
                    self.stats.skipped_existing += 1;
                    tracing::debug!("Skipping existing file {}", path.display());
                }
                Ok(Persisted::Filtered) => {
                    self.stats.skipped_filtered += 1;
                    tracing::debug!("Filtered resource of post {}", post.id);
                }
                Ok(Persisted::DuplicateSkipped) => {
                    self.stats.duplicates_skipped += 1;
                    tracing::debug!("Skipping duplicate content for post {}", post.id);
                }
                Ok(Persisted::HardLinked) => {
                    self.stats.hard_linked += 1;
                    tracing::info!("Hard-linked {} -> {}", post.id, path.display());
                }
                Err(e) => {
                    tracing::error!(
                        "Failed resource of post {} via {}: {}",
                        post.id,
                        adapter_name,
                        e
                    );
                    self.stats.failed_resources += 1;
                }
            }
        }
    }

    async fn process_resource(
        &mut self,
        post: &Post,
        path: &Path,
        mut resource: Resource,
    ) -> Result<Persisted> {
        // path-based short-circuit, independent of content hash: nothing
        // is fetched and no ledger entry is made
        if path.exists() {
            return Ok(Persisted::AlreadyOnDisk);
        }

        if !self.options.filter.check(&resource) {
            return Ok(Persisted::Filtered);
        }

        // self-text resources arrive with content synthesized; everything
        // else is fetched here
        if resource.content().is_none() {
            self.politeness_delay().await;
            let bytes = self.fetcher.fetch(&resource.url, self.options.max_wait).await?;
            resource.set_content(bytes);
        }

        let hash = resource.hash()?.to_string();
        let content = resource
            .content()
            .ok_or_else(|| Error::ContentNotFetched(resource.url.clone()))?;

        match self.ledger.lookup(&hash) {
            None => {
                write_resource(path, content)?;
                set_modified_time(path, post.created_utc)?;
                self.ledger.record(hash, path);
                Ok(Persisted::Written)
            }
            Some(first_seen) => match self.options.policy {
                DuplicatePolicy::Skip => Ok(Persisted::DuplicateSkipped),
                DuplicatePolicy::HardLink => {
                    hard_link(first_seen, path)?;
                    Ok(Persisted::HardLinked)
                }
                DuplicatePolicy::Allow => {
                    // ledger entries are write-once; the first-seen
                    // mapping stays canonical
                    write_resource(path, content)?;
                    set_modified_time(path, post.created_utc)?;
                    Ok(Persisted::Written)
                }
            },
        }
    }

    /// Distinguish error classes explicitly when logging a post failure.
    fn log_post_failure(&self, post: &Post, adapter: &str, error: &Error) {
        match error {
            Error::NotADownloadableLink(url) => {
                tracing::error!("Post {}: no adapter for {}", post.id, url);
            }
            Error::SiteDownloader { site, message } => {
                tracing::error!("Post {} via {}: {}", post.id, site, message);
            }
            Error::ResourceNotFound(message) => {
                tracing::error!("Post {} via {}: {}", post.id, adapter, message);
            }
            other => {
                tracing::error!("Post {} via {}: {}", post.id, adapter, other);
            }
        }
    }

    async fn politeness_delay(&self) {
        let base = self.options.download_delay_ms;
        if base == 0 {
            return;
        }
        let jittered = rand::thread_rng().gen_range(base..base + base / 2 + 1);
        sleep(Duration::from_millis(jittered)).await;
    }
}
