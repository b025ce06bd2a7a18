//! Hosting-site adapters.
//!
//! Each adapter knows how to turn one hosting site's URL shape into
//! fetchable resources. The selector maps a post URL onto an adapter via
//! an ordered pattern list; the registry owns one instance of each.

pub mod direct;
pub mod erome;
pub mod fallback;
pub mod gallery;
pub mod gfycat;
pub mod imgur;
pub mod redgifs;
pub mod scrape;
pub mod self_post;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;

pub use direct::DirectAdapter;
pub use erome::EromeAdapter;
pub use fallback::YtdlpAdapter;
pub use gallery::GalleryAdapter;
pub use gfycat::GfycatAdapter;
pub use imgur::ImgurAdapter;
pub use redgifs::RedgifsAdapter;
pub use self_post::SelfPostAdapter;

/// Strategy object that extracts resources from one hosting site.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Adapter name, used in log lines.
    fn name(&self) -> &'static str;

    /// Resolve the post's link into zero or more fetchable resources.
    /// May perform network I/O (page fetch, probe requests).
    async fn find_resources(&self, post: &Post, client: &Client) -> Result<Vec<Resource>>;
}

/// Last-resort "can this URL be handled at all" check. The probe may hit
/// the network and is therefore fallible; a failed probe means "no".
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    async fn can_handle(&self, url: &str) -> bool;
}

/// Which adapter handles a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Direct,
    Imgur,
    SelfPost,
    Gallery,
    Gfycat,
    Redgifs,
    Erome,
    Fallback,
}

/// Maps a URL onto an adapter kind via an ordered host/path pattern list.
///
/// Patterns are matched against the normalized URL (scheme, `www.` prefix
/// and query string stripped). Order matters: specific shapes like an
/// imgur `.gifv` suffix come before the generic dot-extension catch-all.
#[derive(Debug)]
pub struct SiteAdapterSelector {
    patterns: Vec<(Regex, AdapterKind)>,
}

impl Default for SiteAdapterSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapterSelector {
    pub fn new() -> Self {
        let table: &[(&str, AdapterKind)] = &[
            (r"reddit\.com/gallery/", AdapterKind::Gallery),
            (r"imgur\.com/.*\.gifv$", AdapterKind::Imgur),
            (r"gfycat\.com/", AdapterKind::Gfycat),
            (r"redgifs\.com/", AdapterKind::Redgifs),
            (r"erome\.com/", AdapterKind::Erome),
            (r"reddit\.com/r/[^/]+/comments/", AdapterKind::SelfPost),
            (r"^v\.redd\.it/", AdapterKind::Fallback),
            (r"(youtube\.com|youtu\.be)/", AdapterKind::Fallback),
            // last resort: anything that looks like a direct file link
            (r"\.\w{3,4}$", AdapterKind::Direct),
        ];
        let patterns = table
            .iter()
            .map(|(pattern, kind)| (Regex::new(pattern).unwrap(), *kind))
            .collect();
        Self { patterns }
    }

    /// Pick the adapter for a URL. Pure except for the fallback probe,
    /// which only runs when no pattern matched.
    pub async fn select(&self, url: &str, probe: &dyn CapabilityProbe) -> Result<AdapterKind> {
        let normalized = normalize_url(url);

        for (pattern, kind) in &self.patterns {
            if pattern.is_match(&normalized) {
                return Ok(*kind);
            }
        }

        if probe.can_handle(url).await {
            return Ok(AdapterKind::Fallback);
        }

        Err(Error::NotADownloadableLink(url.to_string()))
    }
}

/// Strip scheme, `www.` prefix, query string and fragment, leaving a
/// lowercased `host/path` string for pattern matching.
pub fn normalize_url(url: &str) -> String {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let url = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let url = url.strip_prefix("www.").unwrap_or(url);
    url.to_lowercase()
}

/// One instance of every adapter, plus kind-based dispatch. Field-level
/// construction lets tests swap in adapters pointed at local servers.
pub struct SiteRegistry {
    pub direct: DirectAdapter,
    pub imgur: ImgurAdapter,
    pub self_post: SelfPostAdapter,
    pub gallery: GalleryAdapter,
    pub gfycat: GfycatAdapter,
    pub redgifs: RedgifsAdapter,
    pub erome: EromeAdapter,
    pub fallback: YtdlpAdapter,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self {
            direct: DirectAdapter,
            imgur: ImgurAdapter,
            self_post: SelfPostAdapter,
            gallery: GalleryAdapter::new(),
            gfycat: GfycatAdapter::new(),
            redgifs: RedgifsAdapter::new(),
            erome: EromeAdapter,
            fallback: YtdlpAdapter::new(),
        }
    }
}

impl SiteRegistry {
    pub fn adapter(&self, kind: AdapterKind) -> &dyn SiteAdapter {
        match kind {
            AdapterKind::Direct => &self.direct,
            AdapterKind::Imgur => &self.imgur,
            AdapterKind::SelfPost => &self.self_post,
            AdapterKind::Gallery => &self.gallery,
            AdapterKind::Gfycat => &self.gfycat,
            AdapterKind::Redgifs => &self.redgifs,
            AdapterKind::Erome => &self.erome,
            AdapterKind::Fallback => &self.fallback,
        }
    }

    pub fn probe(&self) -> &dyn CapabilityProbe {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverProbe;

    #[async_trait]
    impl CapabilityProbe for NeverProbe {
        async fn can_handle(&self, _url: &str) -> bool {
            false
        }
    }

    struct AlwaysProbe;

    #[async_trait]
    impl CapabilityProbe for AlwaysProbe {
        async fn can_handle(&self, _url: &str) -> bool {
            true
        }
    }

    async fn select(url: &str) -> Result<AdapterKind> {
        SiteAdapterSelector::new().select(url, &NeverProbe).await
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://www.Imgur.com/abc.gifv?x=1#frag"),
            "imgur.com/abc.gifv"
        );
        assert_eq!(normalize_url("http://v.redd.it/xyz"), "v.redd.it/xyz");
        assert_eq!(normalize_url("i.redd.it/a.jpg"), "i.redd.it/a.jpg");
    }

    #[tokio::test]
    async fn test_specific_patterns_win_over_generic() {
        // .gifv would also satisfy the dot-extension catch-all
        assert_eq!(
            select("https://imgur.com/abc.gifv").await.unwrap(),
            AdapterKind::Imgur
        );
        assert_eq!(
            select("https://www.reddit.com/gallery/abc123").await.unwrap(),
            AdapterKind::Gallery
        );
    }

    #[tokio::test]
    async fn test_known_hosts() {
        assert_eq!(
            select("https://gfycat.com/tamehugeox").await.unwrap(),
            AdapterKind::Gfycat
        );
        assert_eq!(
            select("https://www.redgifs.com/watch/tamehugeox").await.unwrap(),
            AdapterKind::Redgifs
        );
        assert_eq!(
            select("https://www.erome.com/a/Xyz09").await.unwrap(),
            AdapterKind::Erome
        );
        assert_eq!(
            select("https://www.reddit.com/r/pics/comments/abc123/a_title/")
                .await
                .unwrap(),
            AdapterKind::SelfPost
        );
        assert_eq!(
            select("https://v.redd.it/abc123").await.unwrap(),
            AdapterKind::Fallback
        );
        assert_eq!(
            select("https://youtu.be/dQw4w9WgXcQ").await.unwrap(),
            AdapterKind::Fallback
        );
    }

    #[tokio::test]
    async fn test_generic_dot_extension_routes_direct() {
        assert_eq!(
            select("https://i.redd.it/abc.jpg").await.unwrap(),
            AdapterKind::Direct
        );
        assert_eq!(
            select("https://files.example.org/x/y/clip.webm?download=1")
                .await
                .unwrap(),
            AdapterKind::Direct
        );
    }

    #[tokio::test]
    async fn test_unrecognized_without_fallback_raises() {
        let err = select("https://example.org/some/page").await.unwrap_err();
        assert!(matches!(err, Error::NotADownloadableLink(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_with_fallback_probe() {
        let kind = SiteAdapterSelector::new()
            .select("https://example.org/some/page", &AlwaysProbe)
            .await
            .unwrap();
        assert_eq!(kind, AdapterKind::Fallback);
    }

    #[tokio::test]
    async fn test_selection_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                select("https://imgur.com/abc.gifv").await.unwrap(),
                AdapterKind::Imgur
            );
            assert_eq!(
                select("https://i.redd.it/abc.jpg").await.unwrap(),
                AdapterKind::Direct
            );
        }
    }
}
