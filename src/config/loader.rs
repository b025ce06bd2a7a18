//! Configuration structures and loading logic.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::modes::DuplicatePolicy;
use crate::error::{Error, Result};
use crate::fetch::FetchConfig;
use crate::filter::FilterConfig;
use crate::fs::NamingConfig;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Download options configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Skip writing content whose hash was already written.
    #[serde(default)]
    pub no_dupes: bool,

    /// Hard-link repeated content to the first-seen file.
    #[serde(default)]
    pub hard_link: bool,

    /// Hash the existing output tree before downloading, so content
    /// already on disk counts as seen.
    #[serde(default)]
    pub search_existing: bool,

    /// Worker pool size for the existing-tree hash scan.
    #[serde(default = "default_scan_workers")]
    pub scan_workers: usize,

    /// Base delay between resource downloads, in milliseconds. Zero
    /// disables the delay.
    #[serde(default)]
    pub download_delay_ms: u64,

    /// Post IDs to skip outright.
    #[serde(default)]
    pub exclude_ids: Vec<String>,

    /// File of post IDs to skip, one per line.
    #[serde(default)]
    pub exclude_id_file: Option<PathBuf>,

    /// Subreddits whose posts are skipped, case-insensitive.
    #[serde(default)]
    pub skip_subreddits: Vec<String>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            no_dupes: false,
            hard_link: false,
            search_existing: false,
            scan_workers: default_scan_workers(),
            download_delay_ms: 0,
            exclude_ids: Vec::new(),
            exclude_id_file: None,
            skip_subreddits: Vec::new(),
        }
    }
}

fn default_scan_workers() -> usize {
    4
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Effective download directory: configured, or the platform download
    /// folder, or `./downloads`.
    pub fn download_directory(&self) -> PathBuf {
        if let Some(dir) = &self.options.download_directory {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("downloads"))
    }

    /// Duplicate policy resolved from the option flags. Validation
    /// rejects configs that set both.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.options.no_dupes {
            DuplicatePolicy::Skip
        } else if self.options.hard_link {
            DuplicatePolicy::HardLink
        } else {
            DuplicatePolicy::Allow
        }
    }

    /// Full exclusion set: inline IDs plus the exclusion file, if any.
    pub fn exclusion_set(&self) -> Result<HashSet<String>> {
        let mut ids: HashSet<String> = self.options.exclude_ids.iter().cloned().collect();
        if let Some(path) = &self.options.exclude_id_file {
            ids.extend(load_id_file(path)?);
        }
        Ok(ids)
    }
}

/// Read a post-ID file: one ID per line, blank lines and `#` comments
/// ignored.
pub fn load_id_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Config(format!("Exclusion file not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
