//! Pre-fetch resource filtering.

use serde::Deserialize;

use crate::resource::Resource;

/// Exclusion lists for the download filter. Empty lists disable the
/// corresponding check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// File extensions to reject, with or without the leading dot.
    #[serde(default)]
    pub skip_extensions: Vec<String>,

    /// Domain fragments to reject wherever they appear in a resource URL.
    #[serde(default)]
    pub skip_domains: Vec<String>,
}

/// Rejects resources by extension or source domain before any fetch
/// happens, so unwanted content costs no network I/O.
#[derive(Debug, Clone)]
pub struct DownloadFilter {
    extensions: Vec<String>,
    domains: Vec<String>,
}

impl DownloadFilter {
    pub fn new(config: FilterConfig) -> Self {
        let extensions = config
            .skip_extensions
            .iter()
            .map(|e| {
                let e = e.to_lowercase();
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{}", e)
                }
            })
            .collect();
        let domains = config
            .skip_domains
            .iter()
            .map(|d| d.to_lowercase())
            .collect();
        Self {
            extensions,
            domains,
        }
    }

    /// True when the resource may be downloaded.
    pub fn check(&self, resource: &Resource) -> bool {
        self.check_extension(resource) && self.check_domain(resource)
    }

    fn check_extension(&self, resource: &Resource) -> bool {
        let ext = match resource.extension() {
            Ok(ext) => ext.to_lowercase(),
            // Extension problems are reported downstream, not here.
            Err(_) => return true,
        };
        !self.extensions.iter().any(|skip| ext.ends_with(skip))
    }

    fn check_domain(&self, resource: &Resource) -> bool {
        let url = resource.url.to_lowercase();
        !self.domains.iter().any(|skip| url.contains(skip))
    }
}
