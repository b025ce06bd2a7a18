//! Imgur `.gifv` adapter.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::SiteAdapter;

/// Rewrites imgur `.gifv` page links to the underlying mp4 on the image
/// CDN. A `.gifv` URL serves an HTML player page, not the clip itself.
#[derive(Debug, Default)]
pub struct ImgurAdapter;

#[async_trait]
impl SiteAdapter for ImgurAdapter {
    fn name(&self) -> &'static str {
        "imgur"
    }

    async fn find_resources(&self, post: &Post, _client: &Client) -> Result<Vec<Resource>> {
        let parsed = Url::parse(&post.url)?;
        let id = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .and_then(|name| name.strip_suffix(".gifv"))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::SiteDownloader {
                site: "imgur",
                message: format!("Cannot extract clip id from {}", post.url),
            })?;

        let url = format!("https://i.imgur.com/{}.mp4", id);
        Ok(vec![Resource::with_extension(post, url, ".mp4")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_url(url: &str) -> Post {
        serde_json::from_str(&format!(
            r#"{{"id":"abc123","title":"t","url":"{}",
                "subreddit":"gifs","created_utc":1600000000}}"#,
            url
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_gifv_rewritten_to_cdn_mp4() {
        let post = post_with_url("https://imgur.com/JHq8Ewd.gifv");
        let resources = ImgurAdapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].url, "https://i.imgur.com/JHq8Ewd.mp4");
        assert_eq!(resources[0].extension().unwrap(), ".mp4");
    }

    #[tokio::test]
    async fn test_i_subdomain_also_handled() {
        let post = post_with_url("https://i.imgur.com/JHq8Ewd.gifv");
        let resources = ImgurAdapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap();
        assert_eq!(resources[0].url, "https://i.imgur.com/JHq8Ewd.mp4");
    }

    #[tokio::test]
    async fn test_non_gifv_is_a_typed_error() {
        let post = post_with_url("https://imgur.com/gallery/xyz");
        let err = ImgurAdapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SiteDownloader { site: "imgur", .. }));
    }
}
