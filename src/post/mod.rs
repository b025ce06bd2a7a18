//! Post records from the upstream listing.
//!
//! The listing API itself is an external collaborator; this module only
//! defines the record shape the pipeline consumes and a loader for listing
//! export files (a JSON array of post objects).

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Sentinel substituted when a post's author is deleted or suspended.
pub const DELETED_AUTHOR: &str = "DELETED";

/// One submission from the upstream listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Listing-wide unique identifier.
    pub id: String,

    /// Submission title.
    pub title: String,

    /// The URL the submission links to. Self posts link to themselves.
    pub url: String,

    /// Subreddit name, without the `r/` prefix.
    pub subreddit: String,

    /// Author name. Absent for deleted or suspended accounts.
    #[serde(default)]
    author: Option<String>,

    /// Creation time, seconds since epoch.
    pub created_utc: i64,

    /// Net score at listing time.
    #[serde(default)]
    pub score: i64,

    /// Flair text, if any.
    #[serde(default)]
    pub link_flair_text: Option<String>,

    /// Self-text body. Empty for link posts.
    #[serde(default)]
    pub selftext: String,

    /// Whether this is a self (text) post.
    #[serde(default)]
    pub is_self: bool,

    /// Media identifiers for gallery posts, in gallery order.
    #[serde(default)]
    pub gallery_ids: Vec<String>,
}

impl Post {
    /// Author name, substituting the deleted-account sentinel.
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DELETED_AUTHOR)
    }

    /// Flair text or an empty string.
    pub fn flair(&self) -> &str {
        self.link_flair_text.as_deref().unwrap_or("")
    }

    /// Creation time as a UTC datetime.
    pub fn created(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.created_utc, 0)
            .single()
            .unwrap_or_default()
    }
}

/// Load a listing export file: a JSON array of post records.
pub fn load_listing(path: &Path) -> Result<Vec<Post>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Listing(format!("Listing file not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let posts: Vec<Post> = serde_json::from_str(&content)
        .map_err(|e| Error::Listing(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(posts)
}
