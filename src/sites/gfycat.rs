//! Gfycat page-scrape adapter.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::redgifs::{clip_id_from_url, RedgifsAdapter};
use crate::sites::scrape::{extract_ld_json, fetch_page};
use crate::sites::SiteAdapter;

/// Resolves clips from the page's ld+json metadata block. Clips migrated
/// off the site are chained through the sibling redgifs scrape under the
/// same clip id.
#[derive(Debug)]
pub struct GfycatAdapter {
    page_base: String,
    sibling: RedgifsAdapter,
}

impl Default for GfycatAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl GfycatAdapter {
    pub fn new() -> Self {
        Self::with_bases("https://gfycat.com", RedgifsAdapter::new())
    }

    /// Base/sibling override, used by tests to point at local servers.
    pub fn with_bases(page_base: impl Into<String>, sibling: RedgifsAdapter) -> Self {
        Self {
            page_base: page_base.into(),
            sibling,
        }
    }
}

#[async_trait]
impl SiteAdapter for GfycatAdapter {
    fn name(&self) -> &'static str {
        "gfycat"
    }

    async fn find_resources(&self, post: &Post, client: &Client) -> Result<Vec<Resource>> {
        let clip_id = clip_id_from_url(&post.url).ok_or_else(|| Error::SiteDownloader {
            site: self.name(),
            message: format!("Cannot extract clip id from {}", post.url),
        })?;

        let url = format!("{}/{}", self.page_base, clip_id);
        let page = fetch_page(client, &url, self.name()).await?;

        match extract_ld_json(&page, self.name()) {
            Ok(metadata) => {
                let media_url = metadata["video"]["contentUrl"].as_str().ok_or_else(|| {
                    Error::SiteDownloader {
                        site: self.name(),
                        message: format!("ld+json block for {} carries no contentUrl", clip_id),
                    }
                })?;
                Ok(vec![Resource::new(post, media_url)])
            }
            Err(_) => {
                // expected block absent: the clip may have moved to the
                // sibling host, retry under the same id there
                tracing::debug!(
                    "No ld+json block on {} page for {}, trying sibling host",
                    self.name(),
                    clip_id
                );
                self.sibling.scrape_watch(post, client, &clip_id).await
            }
        }
    }
}
