use chrono::Utc;

use crate::app::{AppContext, Result};
use crate::batch::{BatchConfig, BatchSummary};
use crate::cli::BatchArgs;
use crate::domain::CharterNumber;

/// Print the website for one charter, or `UNKNOWN` if none is on file.
pub async fn fetch_one(ctx: &AppContext, charter: &str) -> Result<()> {
    let charter: CharterNumber = charter.parse()?;
    let website = ctx.fetcher.fetch(charter).await?;
    println!("{}", website);
    Ok(())
}

/// Overlay command-line flags on the configured batch settings.
pub fn apply_batch_args(config: &mut BatchConfig, args: &BatchArgs) -> Result<()> {
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(error_log) = &args.error_log {
        config.error_log = error_log.clone();
    }
    if let Some(progress_file) = &args.progress_file {
        config.progress_file = progress_file.clone();
    }
    if let Some(rate_limit) = args.rate_limit {
        config.rate_limit_secs = rate_limit;
    }
    if let Some(interval) = args.commit_interval {
        config.commit_interval = interval;
    }
    if let Some(start_from) = &args.start_from {
        config.start_from = Some(start_from.parse()?);
    }
    config.dry_run = args.dry_run;

    config.validate()
}

pub async fn run_batch(ctx: &AppContext) -> Result<BatchSummary> {
    let config = &ctx.config.batch;
    let start = Utc::now();

    if config.dry_run {
        println!("Dry run: no requests, no writes, no commits");
    }
    println!(
        "Fetching websites for {} -> {} (rate limit {:?}, checkpoint every {})",
        config.input.display(),
        config.output.display(),
        config.rate_limit(),
        config.commit_interval
    );
    if let Some(start_from) = config.start_from {
        println!("Starting from charter {}", start_from);
    }

    let summary = ctx.batch_runner().run().await?;

    let elapsed = Utc::now().signed_duration_since(start);
    println!(
        "\n{}\n  elapsed: {:.1}s",
        summary,
        elapsed.num_milliseconds() as f64 / 1000.0
    );

    Ok(summary)
}
