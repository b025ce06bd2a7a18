//! Byte transfer with bounded retry.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;

use crate::error::{Error, Result};

/// Transfer tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Fixed sleep between transient-failure retries.
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: u64,

    /// Total sleep budget per resource before giving up.
    #[serde(default = "default_max_wait_seconds")]
    pub max_wait_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backoff_seconds: default_backoff_seconds(),
            max_wait_seconds: default_max_wait_seconds(),
        }
    }
}

fn default_backoff_seconds() -> u64 {
    60
}

fn default_max_wait_seconds() -> u64 {
    120
}

/// Downloads resource bytes with a fixed-interval retry on transient
/// failure, bounded by an accumulated-sleep budget.
///
/// 408, 429 and connection-level transport errors are transient; every
/// other non-2xx status fails the resource immediately.
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    client: Client,
    backoff: Duration,
}

impl RetryingFetcher {
    pub fn new(client: Client, backoff: Duration) -> Self {
        Self { client, backoff }
    }

    /// Fetch the full body at `url`, retrying transient failures until the
    /// accumulated sleep reaches `max_wait`.
    pub async fn fetch(&self, url: &str, max_wait: Duration) -> Result<Vec<u8>> {
        let mut waited = Duration::ZERO;
        loop {
            match self.attempt(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if is_transient(&e) => {
                    if waited >= max_wait {
                        return Err(Error::RetryBudgetExhausted {
                            url: url.to_string(),
                            budget_secs: max_wait.as_secs(),
                        });
                    }
                    tracing::debug!(
                        "Transient failure fetching {} ({}), retrying in {:?}",
                        url,
                        e,
                        self.backoff
                    );
                    sleep(self.backoff).await;
                    waited += self.backoff;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::EmptyResponse(url.to_string()));
        }

        Ok(bytes.to_vec())
    }
}

fn is_transient(err: &Error) -> bool {
    match err {
        Error::FetchStatus { status, .. } => *status == 408 || *status == 429,
        Error::Http(e) => e.is_connect() || e.is_timeout(),
        _ => false,
    }
}
