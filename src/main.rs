use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cuweb::app::AppContext;
use cuweb::cli::{commands, Cli, Commands};
use cuweb::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch { charter } => {
            let ctx = AppContext::new(config)?;
            commands::fetch_one(&ctx, &charter).await?;
        }
        Commands::Batch(args) => {
            if args.resume {
                tracing::debug!("--resume given; resuming is always on");
            }
            commands::apply_batch_args(&mut config.batch, &args)?;
            let ctx = AppContext::new(config)?;
            commands::run_batch(&ctx).await?;
        }
    }

    Ok(())
}
