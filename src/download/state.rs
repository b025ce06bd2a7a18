//! Run statistics tracking.

/// Counters accumulated over one orchestration run.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Resources written to disk (including allowed duplicates).
    pub downloaded: u64,

    /// Posts skipped by the exclusion set or skip-subreddit set.
    pub skipped_excluded: u64,

    /// Resources whose destination path already existed.
    pub skipped_existing: u64,

    /// Resources rejected by the download filter.
    pub skipped_filtered: u64,

    /// Resources skipped under the no-dupes policy.
    pub duplicates_skipped: u64,

    /// Resources hard-linked to a first-seen file.
    pub hard_linked: u64,

    /// Posts abandoned before any resource work (resolution failures).
    pub failed_posts: u64,

    /// Individual resources abandoned mid-pipeline.
    pub failed_resources: u64,
}

impl RunStats {
    /// Directory entries created (fresh writes plus hard links).
    pub fn total_written(&self) -> u64 {
        self.downloaded + self.hard_linked
    }

    /// Units skipped for any reason.
    pub fn total_skipped(&self) -> u64 {
        self.skipped_excluded
            + self.skipped_existing
            + self.skipped_filtered
            + self.duplicates_skipped
    }

    pub fn total_failed(&self) -> u64 {
        self.failed_posts + self.failed_resources
    }
}
