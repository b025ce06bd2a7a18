//! Direct-link adapter.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::SiteAdapter;

/// No resolution needed: the post URL is the resource URL.
#[derive(Debug, Default)]
pub struct DirectAdapter;

#[async_trait]
impl SiteAdapter for DirectAdapter {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn find_resources(&self, post: &Post, _client: &Client) -> Result<Vec<Resource>> {
        Ok(vec![Resource::new(post, &post.url)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_url_through_verbatim() {
        let post: Post = serde_json::from_str(
            r#"{"id":"abc123","title":"t","url":"https://i.redd.it/pic.jpg",
                "subreddit":"pics","created_utc":1600000000}"#,
        )
        .unwrap();

        let resources = DirectAdapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].url, "https://i.redd.it/pic.jpg");
        assert_eq!(resources[0].extension().unwrap(), ".jpg");
    }
}
