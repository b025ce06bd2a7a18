//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Tokens the naming schemes may substitute.
const KNOWN_TOKENS: &[&str] = &[
    "{POSTID}",
    "{TITLE}",
    "{SUBREDDIT}",
    "{REDDITOR}",
    "{UPVOTES}",
    "{FLAIR}",
    "{DATE}",
];

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.no_dupes && config.options.hard_link {
        return Err(Error::ConfigValidation {
            field: "no_dupes / hard_link".to_string(),
            message: "The no-dupes and hard-link policies are mutually exclusive".to_string(),
        });
    }

    if config.options.scan_workers == 0 {
        return Err(Error::ConfigValidation {
            field: "scan_workers".to_string(),
            message: "At least one scan worker is required".to_string(),
        });
    }

    if config.fetch.backoff_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "backoff_seconds".to_string(),
            message: "Retry backoff must be at least one second".to_string(),
        });
    }

    validate_scheme("file_scheme", &config.naming.file_scheme)?;
    validate_scheme("folder_scheme", &config.naming.folder_scheme)?;

    Ok(())
}

/// A scheme must be non-empty and any `{...}` token it uses must be one
/// we can substitute.
fn validate_scheme(field: &str, scheme: &str) -> Result<()> {
    if scheme.trim().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    let mut rest = scheme;
    while let Some(start) = rest.find('{') {
        let tail = &rest[start..];
        let end = tail.find('}').ok_or_else(|| Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unclosed token in scheme '{}'", scheme),
        })?;
        let token = &tail[..=end];
        if !KNOWN_TOKENS.contains(&token) {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: format!("Unknown token {} in scheme '{}'", token, scheme),
            });
        }
        rest = &tail[end + 1..];
    }

    Ok(())
}
