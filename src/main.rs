mod cli;

use clap::Parser;
use cli::Cli;
use mavic::{Config, Scraper};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let _ = dotenvy::dotenv();
            Config::load_from_path(path.clone())?
        }
        None => Config::load()?,
    };
    cli.apply(&mut config);

    let options = config.resolve()?;
    let report = Scraper::new(options)?.run().await?;

    println!("{}", report.summary);

    Ok(())
}
