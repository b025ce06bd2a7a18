//! Fetchable resources derived from posts.

use md5::{Digest, Md5};

use crate::error::{Error, Result};
use crate::post::Post;

/// One fetchable media/text unit derived from a post's link.
///
/// Created by a site adapter, filled with bytes exactly once, hashed on
/// demand, then handed to the orchestrator for a single persist decision.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Identifier of the post this resource came from.
    pub post_id: String,

    /// Resolved fetch URL.
    pub url: String,

    extension: Option<String>,
    content: Option<Vec<u8>>,
    hash: Option<String>,
}

impl Resource {
    /// Resource whose extension is inferred from the URL path suffix.
    pub fn new(post: &Post, url: impl Into<String>) -> Self {
        let url = url.into();
        let extension = extension_from_url(&url);
        Self {
            post_id: post.id.clone(),
            url,
            extension,
            content: None,
            hash: None,
        }
    }

    /// Resource with an adapter-supplied extension (leading dot included).
    pub fn with_extension(post: &Post, url: impl Into<String>, extension: &str) -> Self {
        Self {
            post_id: post.id.clone(),
            url: url.into(),
            extension: Some(extension.to_string()),
            content: None,
            hash: None,
        }
    }

    /// Resource whose content is synthesized locally, bypassing any fetch.
    pub fn with_content(
        post: &Post,
        url: impl Into<String>,
        extension: &str,
        content: Vec<u8>,
    ) -> Self {
        let mut resource = Self::with_extension(post, url, extension);
        resource.content = Some(content);
        resource
    }

    /// File extension, with the leading dot. Absence is a hard error:
    /// destination paths cannot be computed without one.
    pub fn extension(&self) -> Result<&str> {
        self.extension
            .as_deref()
            .ok_or_else(|| Error::MissingExtension(self.url.clone()))
    }

    /// Downloaded bytes, if fetched.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Populate content bytes. Called exactly once, by the fetcher path.
    pub fn set_content(&mut self, bytes: Vec<u8>) {
        self.content = Some(bytes);
        self.hash = None;
    }

    /// Content fingerprint (MD5 hex digest), computed lazily on first use.
    pub fn hash(&mut self) -> Result<&str> {
        if self.hash.is_none() {
            let content = self
                .content
                .as_deref()
                .ok_or_else(|| Error::ContentNotFetched(self.url.clone()))?;
            self.hash = Some(hash_bytes(content));
        }
        Ok(self.hash.as_deref().unwrap())
    }
}

/// MD5 hex digest of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Infer a file extension from a URL's path suffix.
///
/// The query string and fragment are ignored; the rightmost dot wins
/// (`hard.png.mp4` gives `.mp4`). Tokens of 3 to 5 word characters count
/// as extensions.
pub fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let (stem, ext) = path.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    if (3..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(format!(".{}", ext.to_lowercase()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_post() -> Post {
        serde_json::from_str(
            r#"{"id":"abc123","title":"t","url":"https://example.com/a.jpg",
                "subreddit":"pics","created_utc":1600000000}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_extension_inference() {
        assert_eq!(
            extension_from_url("https://x.com/a/b/example.jpg?x=1#y"),
            Some(".jpg".to_string())
        );
        assert_eq!(
            extension_from_url("https://x.com/hard.png.mp4"),
            Some(".mp4".to_string())
        );
        assert_eq!(
            extension_from_url("https://x.com/clip.WEBM"),
            Some(".webm".to_string())
        );
        assert_eq!(extension_from_url("https://x.com/no-extension"), None);
        assert_eq!(extension_from_url("https://x.com/archive.toolong"), None);
    }

    #[test]
    fn test_missing_extension_is_hard_error() {
        let resource = Resource::new(&test_post(), "https://example.com/page");
        assert!(matches!(
            resource.extension(),
            Err(Error::MissingExtension(_))
        ));
    }

    #[test]
    fn test_hash_requires_content() {
        let mut resource = Resource::new(&test_post(), "https://example.com/a.jpg");
        assert!(matches!(resource.hash(), Err(Error::ContentNotFetched(_))));
    }

    #[test]
    fn test_hash_is_stable_and_content_sensitive() {
        let post = test_post();
        let mut a = Resource::with_content(&post, "https://x.com/1.jpg", ".jpg", vec![1, 2, 3]);
        let mut b = Resource::with_content(&post, "https://y.com/2.jpg", ".jpg", vec![1, 2, 3]);
        let mut c = Resource::with_content(&post, "https://x.com/3.jpg", ".jpg", vec![1, 2, 4]);

        let ha = a.hash().unwrap().to_string();
        assert_eq!(ha, b.hash().unwrap());
        assert_ne!(ha, c.hash().unwrap());
        // repeated calls return the cached digest
        assert_eq!(ha, a.hash().unwrap());
    }
}
