//! Duplicate-handling policy.

use std::fmt;

/// What to do when a resource's content hash is already in the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Write the file anyway; duplicates are allowed.
    #[default]
    Allow,

    /// Skip the write entirely.
    Skip,

    /// Hard-link the new destination to the first-seen file.
    HardLink,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Skip => write!(f, "no-dupes"),
            Self::HardLink => write!(f, "hard-link"),
        }
    }
}
