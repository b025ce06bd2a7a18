//! Shared page-scrape helpers for adapters that parse embedded data.

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{Error, Result};

/// Fetch an HTML page, failing with a typed site error on any non-success
/// status.
pub async fn fetch_page(client: &Client, url: &str, site: &'static str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(Error::SiteDownloader {
            site,
            message: format!("HTTP {} fetching page {}", status.as_u16(), url),
        });
    }

    Ok(response.text().await?)
}

/// Return the inner text of the single element matching `css`. Zero or
/// multiple matches are a hard error: the page no longer has the expected
/// structure and guessing would risk returning wrong data.
pub fn extract_single_script(html: &str, css: &str, site: &'static str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(css).map_err(|e| Error::SiteDownloader {
        site,
        message: format!("Invalid selector '{}': {}", css, e),
    })?;

    let mut matches = document.select(&selector);
    let first = matches.next().ok_or_else(|| Error::SiteDownloader {
        site,
        message: format!("Expected block '{}' not found in page", css),
    })?;
    if matches.next().is_some() {
        return Err(Error::SiteDownloader {
            site,
            message: format!("Multiple blocks match '{}', cannot isolate one", css),
        });
    }

    Ok(first.text().collect())
}

/// Parse the page's single `<script type="application/ld+json">` block.
pub fn extract_ld_json(html: &str, site: &'static str) -> Result<serde_json::Value> {
    let raw = extract_single_script(html, r#"script[type="application/ld+json"]"#, site)?;
    serde_json::from_str(&raw).map_err(|e| Error::SiteDownloader {
        site,
        message: format!("Unparsable ld+json block: {}", e),
    })
}
