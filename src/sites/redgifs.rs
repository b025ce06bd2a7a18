//! Redgifs page-scrape adapter.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::scrape::fetch_page;
use crate::sites::SiteAdapter;

/// Resolves clips from the watch-page widget configuration: an inline
/// script whose non-JSON wrapper text has to be stripped by regex before
/// the embedded JSON can be parsed.
#[derive(Debug)]
pub struct RedgifsAdapter {
    page_base: String,
}

impl Default for RedgifsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RedgifsAdapter {
    pub fn new() -> Self {
        Self::with_page_base("https://www.redgifs.com")
    }

    /// Page base override, used by tests to point at a local server.
    pub fn with_page_base(page_base: impl Into<String>) -> Self {
        Self {
            page_base: page_base.into(),
        }
    }

    /// Scrape a watch page for one clip id. Also used by the sibling
    /// gfycat adapter as its chained fallback.
    pub(crate) async fn scrape_watch(
        &self,
        post: &Post,
        client: &Client,
        clip_id: &str,
    ) -> Result<Vec<Resource>> {
        let url = format!("{}/watch/{}", self.page_base, clip_id);
        let page = fetch_page(client, &url, self.name()).await?;
        let config = extract_widget_config(&page, self.name())?;

        let media_url = config["gif"]["urls"]["hd"]
            .as_str()
            .or_else(|| config["gif"]["urls"]["sd"].as_str())
            .ok_or_else(|| Error::SiteDownloader {
                site: self.name(),
                message: format!("Widget config for {} carries no media urls", clip_id),
            })?;

        Ok(vec![Resource::new(post, media_url)])
    }
}

#[async_trait]
impl SiteAdapter for RedgifsAdapter {
    fn name(&self) -> &'static str {
        "redgifs"
    }

    async fn find_resources(&self, post: &Post, client: &Client) -> Result<Vec<Resource>> {
        let clip_id = clip_id_from_url(&post.url).ok_or_else(|| Error::SiteDownloader {
            site: self.name(),
            message: format!("Cannot extract clip id from {}", post.url),
        })?;
        self.scrape_watch(post, client, &clip_id).await
    }
}

/// Last path segment of a watch URL, without query or fragment.
pub(crate) fn clip_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && !id.contains('.'))
        .map(str::to_lowercase)
}

/// Isolate the single inline script carrying the widget configuration and
/// parse the JSON object out of its wrapper text.
fn extract_widget_config(html: &str, site: &'static str) -> Result<serde_json::Value> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").expect("static selector");
    let pattern = Regex::new(r"(?s)gifData\s*=\s*(\{.*?\})\s*;").expect("static pattern");

    let mut matched: Option<String> = None;
    for script in document.select(&selector) {
        let text: String = script.text().collect();
        if let Some(captures) = pattern.captures(&text) {
            if matched.is_some() {
                return Err(Error::SiteDownloader {
                    site,
                    message: "Multiple widget-config scripts in page, cannot isolate one"
                        .to_string(),
                });
            }
            matched = Some(captures[1].to_string());
        }
    }

    let raw = matched.ok_or_else(|| Error::SiteDownloader {
        site,
        message: "Widget-config script not found in page".to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| Error::SiteDownloader {
        site,
        message: format!("Unparsable widget config: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const WATCH_PAGE: &str = r#"<html><head>
        <script>
            window.analytics = "unrelated";
        </script>
        <script>
            var loaded = true; gifData = {"gif": {"urls": {
                "hd": "https://media.example.com/clip-large.mp4",
                "sd": "https://media.example.com/clip-small.mp4"
            }}}; widget.boot(gifData);
        </script>
    </head><body></body></html>"#;

    fn watch_post(url: &str) -> Post {
        serde_json::from_str(&format!(
            r#"{{"id":"rg001","title":"t","url":"{}",
                "subreddit":"gifs","created_utc":1600000000}}"#,
            url
        ))
        .unwrap()
    }

    #[test]
    fn test_clip_id_from_url() {
        assert_eq!(
            clip_id_from_url("https://www.redgifs.com/watch/TameHugeOx?ref=x"),
            Some("tamehugeox".to_string())
        );
        assert_eq!(
            clip_id_from_url("https://www.redgifs.com/watch/tamehugeox/"),
            Some("tamehugeox".to_string())
        );
        assert_eq!(clip_id_from_url("https://www.redgifs.com/"), None);
    }

    #[test]
    fn test_widget_config_requires_exactly_one_block() {
        let err = extract_widget_config("<html></html>", "redgifs").unwrap_err();
        assert!(matches!(err, Error::SiteDownloader { .. }));

        let doubled =
            r#"<script>gifData = {"a":1} ;</script><script>gifData = {"b":2} ;</script>"#;
        assert!(extract_widget_config(doubled, "redgifs").is_err());
    }

    #[tokio::test]
    async fn test_scrape_prefers_hd_url() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/watch/tamehugeox");
            then.status(200).body(WATCH_PAGE);
        });

        let adapter = RedgifsAdapter::with_page_base(server.base_url());
        let post = watch_post("https://www.redgifs.com/watch/tamehugeox");
        let resources = adapter.find_resources(&post, &Client::new()).await.unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].url, "https://media.example.com/clip-large.mp4");
    }

    #[tokio::test]
    async fn test_missing_widget_config_is_typed_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/watch/tamehugeox");
            then.status(200).body("<html><body>nothing here</body></html>");
        });

        let adapter = RedgifsAdapter::with_page_base(server.base_url());
        let post = watch_post("https://www.redgifs.com/watch/tamehugeox");
        let err = adapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::SiteDownloader {
                site: "redgifs",
                ..
            }
        ));
    }
}
