//! Erome album adapter.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::scrape::fetch_page;
use crate::sites::SiteAdapter;

/// Bitrate suffix preferred when a clip offers several encodes.
const PREFERRED_VARIANT: &str = "_720p";

/// Resolves album pages by scraping front-facing image tags and video
/// sources out of the DOM.
#[derive(Debug, Default)]
pub struct EromeAdapter;

#[async_trait]
impl SiteAdapter for EromeAdapter {
    fn name(&self) -> &'static str {
        "erome"
    }

    async fn find_resources(&self, post: &Post, client: &Client) -> Result<Vec<Resource>> {
        let page = fetch_page(client, &post.url, self.name()).await?;
        let page_url = Url::parse(&post.url)?;
        let media_urls = extract_media_urls(&page, &page_url);

        if media_urls.is_empty() {
            return Err(Error::SiteDownloader {
                site: self.name(),
                message: format!("No album media found on {}", post.url),
            });
        }

        Ok(media_urls
            .into_iter()
            .map(|url| Resource::new(post, url))
            .collect())
    }
}

/// Pull image and video URLs out of the album DOM. Each `<video>` element
/// is reduced to a single source, preferring the 720p variant when the
/// clip offers several.
fn extract_media_urls(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let image_selector = Selector::parse("img.img-front").expect("static selector");
    let video_selector = Selector::parse("video").expect("static selector");
    let source_selector = Selector::parse("source").expect("static selector");

    let mut urls = Vec::new();

    for image in document.select(&image_selector) {
        if let Some(src) = image.value().attr("src").or_else(|| image.value().attr("data-src")) {
            if let Some(absolute) = absolutize(src, page_url) {
                urls.push(absolute);
            }
        }
    }

    for video in document.select(&video_selector) {
        let sources: Vec<&str> = video
            .select(&source_selector)
            .filter_map(|source| source.value().attr("src"))
            .filter(|src| {
                mime_guess::from_path(src)
                    .first()
                    .map(|mime| mime.type_() == mime_guess::mime::VIDEO)
                    .unwrap_or(false)
            })
            .collect();

        let picked = sources
            .iter()
            .find(|src| {
                src.rsplit_once('.')
                    .map(|(stem, _)| stem.ends_with(PREFERRED_VARIANT))
                    .unwrap_or(false)
            })
            .or_else(|| sources.first());

        if let Some(src) = picked {
            if let Some(absolute) = absolutize(src, page_url) {
                urls.push(absolute);
            }
        }
    }

    urls
}

fn absolutize(src: &str, page_url: &Url) -> Option<String> {
    page_url.join(src).ok().map(String::from)
}
