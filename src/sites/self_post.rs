//! Self-text post adapter.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::SiteAdapter;

/// Synthesizes a markdown document from the post itself. No network fetch
/// happens; the content is populated at resolution time and hashed
/// immediately.
#[derive(Debug, Default)]
pub struct SelfPostAdapter;

#[async_trait]
impl SiteAdapter for SelfPostAdapter {
    fn name(&self) -> &'static str {
        "selfpost"
    }

    async fn find_resources(&self, post: &Post, _client: &Client) -> Result<Vec<Resource>> {
        let document = format!(
            "## {}\n\n{}\n\n_Submitted {} by u/{} to r/{}_\n",
            post.title,
            post.selftext,
            post.created().format("%Y-%m-%d %H:%M"),
            post.author(),
            post.subreddit,
        );

        let mut resource = Resource::with_content(post, &post.url, ".md", document.into_bytes());
        resource.hash()?;
        Ok(vec![resource])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::DELETED_AUTHOR;

    #[tokio::test]
    async fn test_synthesizes_document_without_network() {
        let post: Post = serde_json::from_str(
            r#"{"id":"abc123","title":"A question","selftext":"The body.",
                "url":"https://www.reddit.com/r/AskX/comments/abc123/a_question/",
                "subreddit":"AskX","author":"someone","created_utc":1609459200,
                "is_self":true}"#,
        )
        .unwrap();

        let resources = SelfPostAdapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap();

        assert_eq!(resources.len(), 1);
        let text = String::from_utf8(resources[0].content().unwrap().to_vec()).unwrap();
        assert!(text.contains("## A question"));
        assert!(text.contains("The body."));
        assert!(text.contains("u/someone"));
        assert!(text.contains("r/AskX"));
        assert_eq!(resources[0].extension().unwrap(), ".md");
    }

    #[tokio::test]
    async fn test_deleted_author_uses_sentinel() {
        let post: Post = serde_json::from_str(
            r#"{"id":"abc123","title":"t","selftext":"b",
                "url":"https://www.reddit.com/r/AskX/comments/abc123/t/",
                "subreddit":"AskX","created_utc":1609459200,"is_self":true}"#,
        )
        .unwrap();

        let resources = SelfPostAdapter
            .find_resources(&post, &Client::new())
            .await
            .unwrap();

        let text = String::from_utf8(resources[0].content().unwrap().to_vec()).unwrap();
        assert!(text.contains(&format!("u/{}", DELETED_AUTHOR)));
    }
}
