//! Reddit gallery adapter.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::SiteAdapter;

/// Extensions probed per gallery media identifier, in preference order.
/// The media host does not declare extensions anywhere in the post data.
const CANDIDATE_EXTENSIONS: &[&str] = &[".jpg", ".png", ".gif", ".mp4"];

/// Resolves gallery posts by probing the media CDN for each identifier
/// until one candidate extension answers.
#[derive(Debug)]
pub struct GalleryAdapter {
    media_base: String,
}

impl Default for GalleryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryAdapter {
    pub fn new() -> Self {
        Self::with_media_base("https://i.redd.it")
    }

    /// Media CDN base override, used by tests to point at a local server.
    pub fn with_media_base(media_base: impl Into<String>) -> Self {
        Self {
            media_base: media_base.into(),
        }
    }

    async fn probe_id(&self, post: &Post, client: &Client, media_id: &str) -> Option<Resource> {
        for ext in CANDIDATE_EXTENSIONS {
            let url = format!("{}/{}{}", self.media_base, media_id, ext);
            match client.head(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Some(Resource::with_extension(post, url, ext));
                }
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("Probe failed for {}: {}", url, e);
                    continue;
                }
            }
        }
        None
    }
}

#[async_trait]
impl SiteAdapter for GalleryAdapter {
    fn name(&self) -> &'static str {
        "gallery"
    }

    async fn find_resources(&self, post: &Post, client: &Client) -> Result<Vec<Resource>> {
        if post.gallery_ids.is_empty() {
            return Err(Error::ResourceNotFound(format!(
                "Gallery post {} carries no media identifiers",
                post.id
            )));
        }

        let mut resources = Vec::new();
        for media_id in &post.gallery_ids {
            match self.probe_id(post, client, media_id).await {
                Some(resource) => resources.push(resource),
                None => {
                    tracing::error!(
                        "No candidate extension resolved for gallery item {} of post {}",
                        media_id,
                        post.id
                    );
                }
            }
        }

        if resources.is_empty() {
            return Err(Error::ResourceNotFound(format!(
                "No gallery items of post {} could be resolved",
                post.id
            )));
        }

        Ok(resources)
    }
}
