//! Filename generation from post metadata.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::post::Post;
use crate::resource::Resource;

/// Longest filename stem kept after substitution, so paths stay under
/// filesystem limits once the extension and index suffix are appended.
const MAX_STEM_CHARS: usize = 180;

/// Format-string schemes for output names. Recognized tokens:
/// `{POSTID}`, `{TITLE}`, `{SUBREDDIT}`, `{REDDITOR}`, `{UPVOTES}`,
/// `{FLAIR}`, `{DATE}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_file_scheme")]
    pub file_scheme: String,

    #[serde(default = "default_folder_scheme")]
    pub folder_scheme: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            file_scheme: default_file_scheme(),
            folder_scheme: default_folder_scheme(),
        }
    }
}

fn default_file_scheme() -> String {
    "{REDDITOR}_{TITLE}_{POSTID}".to_string()
}

fn default_folder_scheme() -> String {
    "{SUBREDDIT}".to_string()
}

/// Computes destination paths for a post's resources by substituting post
/// metadata into the configured schemes.
#[derive(Debug, Clone)]
pub struct NameFormatter {
    config: NamingConfig,
}

impl NameFormatter {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    /// One destination path per resource. Posts that resolve to several
    /// resources get a 1-based index suffix on every filename; single
    /// resources get none.
    pub fn format_resource_paths(
        &self,
        root: &Path,
        post: &Post,
        resources: &[Resource],
    ) -> Result<Vec<PathBuf>> {
        let folder = self.format_folder(root, post)?;
        let stem = clamp_chars(&self.substitute(&self.config.file_scheme, post)?, MAX_STEM_CHARS);

        let mut paths = Vec::with_capacity(resources.len());
        for (index, resource) in resources.iter().enumerate() {
            let extension = resource.extension()?;
            let name = if resources.len() > 1 {
                format!("{}_{}{}", stem, index + 1, extension)
            } else {
                format!("{}{}", stem, extension)
            };
            paths.push(folder.join(name));
        }
        Ok(paths)
    }

    fn format_folder(&self, root: &Path, post: &Post) -> Result<PathBuf> {
        let mut folder = root.to_path_buf();
        for segment in self.config.folder_scheme.split('/') {
            folder.push(self.substitute(segment, post)?);
        }
        Ok(folder)
    }

    fn substitute(&self, scheme: &str, post: &Post) -> Result<String> {
        let substituted = scheme
            .replace("{POSTID}", &post.id)
            .replace("{TITLE}", &post.title)
            .replace("{SUBREDDIT}", &post.subreddit)
            .replace("{REDDITOR}", post.author())
            .replace("{UPVOTES}", &post.score.to_string())
            .replace("{FLAIR}", post.flair())
            .replace("{DATE}", &post.created().format("%Y-%m-%d").to_string());
        sanitize_component(&substituted)
    }
}

/// Replace characters that cannot appear in a path component. Traversal
/// attempts and empty results are rejected outright.
pub fn sanitize_component(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Name cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

fn clamp_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_post() -> Post {
        serde_json::from_str(
            r#"{"id":"abc123","title":"A mountain: at dawn","url":"https://i.redd.it/x.jpg",
                "subreddit":"EarthPorn","author":"someone","score":42,
                "created_utc":1609459200}"#,
        )
        .unwrap()
    }

    fn resource(post: &Post, url: &str) -> Resource {
        Resource::new(post, url)
    }

    #[test]
    fn test_substitution_and_sanitization() {
        let formatter = NameFormatter::new(NamingConfig::default());
        let post = test_post();
        let resources = vec![resource(&post, "https://i.redd.it/x.jpg")];

        let paths = formatter
            .format_resource_paths(Path::new("/out"), &post, &resources)
            .unwrap();

        assert_eq!(
            paths,
            vec![PathBuf::from(
                "/out/EarthPorn/someone_A mountain_ at dawn_abc123.jpg"
            )]
        );
    }

    #[test]
    fn test_multi_resource_posts_get_index_suffix() {
        let formatter = NameFormatter::new(NamingConfig {
            file_scheme: "{POSTID}".to_string(),
            folder_scheme: "{SUBREDDIT}".to_string(),
        });
        let post = test_post();
        let resources = vec![
            resource(&post, "https://i.redd.it/a.jpg"),
            resource(&post, "https://i.redd.it/b.png"),
        ];

        let paths = formatter
            .format_resource_paths(Path::new("/out"), &post, &resources)
            .unwrap();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/out/EarthPorn/abc123_1.jpg"),
                PathBuf::from("/out/EarthPorn/abc123_2.png"),
            ]
        );
    }

    #[test]
    fn test_single_resource_has_no_suffix() {
        let formatter = NameFormatter::new(NamingConfig {
            file_scheme: "{POSTID}".to_string(),
            folder_scheme: "{SUBREDDIT}".to_string(),
        });
        let post = test_post();
        let resources = vec![resource(&post, "https://i.redd.it/a.jpg")];

        let paths = formatter
            .format_resource_paths(Path::new("/out"), &post, &resources)
            .unwrap();

        assert_eq!(paths, vec![PathBuf::from("/out/EarthPorn/abc123.jpg")]);
    }

    #[test]
    fn test_missing_extension_fails_path_computation() {
        let formatter = NameFormatter::new(NamingConfig::default());
        let post = test_post();
        let resources = vec![resource(&post, "https://example.com/no-extension")];

        let err = formatter
            .format_resource_paths(Path::new("/out"), &post, &resources)
            .unwrap_err();
        assert!(matches!(err, Error::MissingExtension(_)));
    }

    #[test]
    fn test_long_titles_are_clamped() {
        let formatter = NameFormatter::new(NamingConfig {
            file_scheme: "{TITLE}".to_string(),
            folder_scheme: "{SUBREDDIT}".to_string(),
        });
        let mut post = test_post();
        post.title = "x".repeat(400);
        let resources = vec![resource(&post, "https://i.redd.it/a.jpg")];

        let paths = formatter
            .format_resource_paths(Path::new("/out"), &post, &resources)
            .unwrap();
        let name = paths[0].file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), MAX_STEM_CHARS + ".jpg".len());
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert!(sanitize_component("../evil").is_err());
        assert!(sanitize_component("ok_name").is_ok());
    }
}
