//! Content-hash deduplication.
//!
//! This module provides:
//! - File hashing
//! - The hash-to-path ledger consulted before every persist decision
//! - Pre-seeding the ledger from an existing output tree

pub mod hash;
pub mod ledger;
pub mod scan;

pub use hash::hash_file;
pub use ledger::DeduplicationLedger;
pub use scan::seed_from_directory;
