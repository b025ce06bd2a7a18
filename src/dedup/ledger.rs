//! The hash-to-path ledger.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Process-lifetime mapping of content hash to the first file written with
/// that hash. Entries are write-once per hash and never removed; policy
/// decisions belong to the orchestrator, the ledger is a passive store.
#[derive(Debug, Default)]
pub struct DeduplicationLedger {
    entries: HashMap<String, PathBuf>,
}

impl DeduplicationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-seeded from an existing-tree scan.
    pub fn from_seed(seed: HashMap<String, PathBuf>) -> Self {
        Self { entries: seed }
    }

    /// Record the first-seen path for a hash. Later records for the same
    /// hash are ignored: the first mapping is retained.
    pub fn record(&mut self, hash: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.entry(hash.into()).or_insert_with(|| path.into());
    }

    /// Path of the first file written with this hash, if any.
    pub fn lookup(&self, hash: &str) -> Option<&Path> {
        self.entries.get(hash).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
