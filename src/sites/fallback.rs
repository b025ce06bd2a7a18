//! Generic fallback adapter wrapping the yt-dlp extractor.

use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;
use crate::sites::{CapabilityProbe, SiteAdapter};

/// Delegates wholesale to the `yt-dlp` binary, which recognizes a very
/// large number of video hosts and decides the media URL and extension
/// itself.
#[derive(Debug)]
pub struct YtdlpAdapter {
    binary: String,
    timeout: Duration,
}

impl Default for YtdlpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl YtdlpAdapter {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Binary/timeout override, used by tests to substitute a stub script.
    pub fn with_binary(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        let invocation = Command::new(&self.binary).args(args).output();
        match timeout(self.timeout, invocation).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(Error::SiteDownloader {
                site: "ytdlp",
                message: format!("Failed to run {}: {}", self.binary, e),
            }),
            Err(_) => Err(Error::SiteDownloader {
                site: "ytdlp",
                message: format!("{} timed out after {:?}", self.binary, self.timeout),
            }),
        }
    }
}

#[async_trait]
impl CapabilityProbe for YtdlpAdapter {
    /// Ask the extractor whether it recognizes the URL. The probe hits
    /// the network; any failure counts as "cannot handle".
    async fn can_handle(&self, url: &str) -> bool {
        match self
            .run(&["--simulate", "--quiet", "--no-warnings", url])
            .await
        {
            Ok(output) => output.status.success(),
            Err(e) => {
                tracing::debug!("Extractor probe failed for {}: {}", url, e);
                false
            }
        }
    }
}

#[async_trait]
impl SiteAdapter for YtdlpAdapter {
    fn name(&self) -> &'static str {
        "ytdlp"
    }

    async fn find_resources(&self, post: &Post, _client: &Client) -> Result<Vec<Resource>> {
        let output = self
            .run(&["--dump-json", "--no-playlist", "--no-warnings", &post.url])
            .await?;

        if !output.status.success() {
            return Err(Error::SiteDownloader {
                site: "ytdlp",
                message: format!(
                    "Extractor rejected {}: {}",
                    post.url,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let info: serde_json::Value =
            serde_json::from_slice(&output.stdout).map_err(|e| Error::SiteDownloader {
                site: "ytdlp",
                message: format!("Unparsable extractor output for {}: {}", post.url, e),
            })?;

        let media_url = info["url"].as_str().ok_or_else(|| Error::SiteDownloader {
            site: "ytdlp",
            message: format!("Extractor output for {} carries no url", post.url),
        })?;
        let ext = info["ext"].as_str().ok_or_else(|| Error::SiteDownloader {
            site: "ytdlp",
            message: format!("Extractor output for {} carries no extension", post.url),
        })?;

        Ok(vec![Resource::with_extension(
            post,
            media_url,
            &format!(".{}", ext),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn stub_extractor(dir: &std::path::Path, exit_code: i32, stdout: &str) -> String {
        let path = dir.join("yt-dlp-stub");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "cat <<'EOF'").unwrap();
        writeln!(file, "{}", stdout).unwrap();
        writeln!(file, "EOF").unwrap();
        writeln!(file, "exit {}", exit_code).unwrap();
        drop(file);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn video_post() -> Post {
        serde_json::from_str(
            r#"{"id":"yt001","title":"t","url":"https://video.example.com/v/123",
                "subreddit":"videos","created_utc":1600000000}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_probe_maps_exit_status_to_capability() {
        let yes_dir = tempfile::tempdir().unwrap();
        let yes = YtdlpAdapter::with_binary(
            stub_extractor(yes_dir.path(), 0, ""),
            Duration::from_secs(5),
        );
        assert!(yes.can_handle("https://video.example.com/v/123").await);

        let no_dir = tempfile::tempdir().unwrap();
        let no = YtdlpAdapter::with_binary(
            stub_extractor(no_dir.path(), 1, ""),
            Duration::from_secs(5),
        );
        assert!(!no.can_handle("https://video.example.com/v/123").await);
    }

    #[tokio::test]
    async fn test_missing_binary_declines() {
        let adapter =
            YtdlpAdapter::with_binary("/nonexistent/yt-dlp", Duration::from_secs(5));
        assert!(!adapter.can_handle("https://video.example.com/v/123").await);
    }

    #[tokio::test]
    async fn test_find_resources_parses_extractor_json() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = YtdlpAdapter::with_binary(
            stub_extractor(
                dir.path(),
                0,
                r#"{"url": "https://cdn.example.com/v/123/media", "ext": "mp4"}"#,
            ),
            Duration::from_secs(5),
        );

        let resources = adapter
            .find_resources(&video_post(), &Client::new())
            .await
            .unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].url, "https://cdn.example.com/v/123/media");
        assert_eq!(resources[0].extension().unwrap(), ".mp4");
    }

    #[tokio::test]
    async fn test_extractor_rejection_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = YtdlpAdapter::with_binary(
            stub_extractor(dir.path(), 1, ""),
            Duration::from_secs(5),
        );

        let err = adapter
            .find_resources(&video_post(), &Client::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SiteDownloader { site: "ytdlp", .. }));
    }
}
