//! Reddit Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use reqwest::Client;
use tracing_subscriber::{fmt, EnvFilter};

use reddit_downloader::{
    cli::Args,
    config::{validate_config, Config},
    dedup::{seed_from_directory, DeduplicationLedger},
    download::{DownloadOrchestrator, OrchestratorOptions},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_error, print_info, print_run_stats,
        print_warning,
    },
    post::load_listing,
    sites::SiteRegistry,
};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Listing(_) => ExitCode::from(exit_codes::LISTING_ERROR as u8),
                Error::FetchStatus { .. }
                | Error::EmptyResponse(_)
                | Error::RetryBudgetExhausted { .. }
                | Error::Http(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let listing_path = args.listing.clone();
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let root = config.download_directory();
    print_config_summary(
        &listing_path.display().to_string(),
        &config.duplicate_policy().to_string(),
        &root.display().to_string(),
    );

    // Failing to create the output root is the one fatal setup error
    std::fs::create_dir_all(&root)?;

    // Load the listing
    let posts = load_listing(&listing_path)?;
    print_info(&format!("{} posts in listing", posts.len()));

    let client = Client::builder().user_agent(USER_AGENT).build()?;

    // Optionally pre-seed the ledger from what is already on disk
    let ledger = if config.options.search_existing {
        print_info("Hashing existing output tree...");
        let seed = seed_from_directory(&root, config.options.scan_workers, true).await?;
        print_info(&format!("{} existing files indexed", seed.len()));
        DeduplicationLedger::from_seed(seed)
    } else {
        DeduplicationLedger::new()
    };

    let options = OrchestratorOptions::from_config(&config)?;
    let mut orchestrator =
        DownloadOrchestrator::new(client, SiteRegistry::default(), ledger, options);

    let stats = orchestrator.run(&posts).await;
    print_run_stats(stats);

    Ok(())
}
