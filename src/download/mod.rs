//! Download orchestration.
//!
//! This module provides:
//! - The per-post download pipeline and its persist decisions
//! - Run statistics tracking

pub mod orchestrator;
pub mod state;

pub use orchestrator::{DownloadOrchestrator, OrchestratorOptions};
pub use state::RunStats;
