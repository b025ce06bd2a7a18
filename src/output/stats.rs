//! Statistics reporting.

use console::style;

use crate::download::RunStats;

/// Print the end-of-run statistics block.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run statistics:").bold());
    println!("  Downloaded:  {}", style(stats.downloaded).green());
    if stats.hard_linked > 0 {
        println!("  Hard-linked: {}", stats.hard_linked);
    }
    println!("  Skipped:     {}", stats.total_skipped());
    println!("    excluded:  {}", stats.skipped_excluded);
    println!("    existing:  {}", stats.skipped_existing);
    println!("    filtered:  {}", stats.skipped_filtered);
    println!("    duplicate: {}", stats.duplicates_skipped);
    if stats.total_failed() > 0 {
        println!("  Failed:      {}", style(stats.total_failed()).red());
    }
    println!("{}", style("═".repeat(50)).dim());
}
