use clap::Parser;
use mavic::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mavic")]
#[command(about = "Download images from subreddit listings", long_about = None)]
pub struct Cli {
    /// Subreddits to scrape
    #[arg(value_name = "SUBREDDITS")]
    pub subreddits: Vec<String>,

    /// The output directory to store the images
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// The total number of posts max per subreddit
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Also scrape the front page into its own folder
    #[arg(short, long)]
    pub frontpage: bool,

    /// Page type: hot, new, rising, best, top[-window], controversial[-window]
    #[arg(short = 't', long = "type")]
    pub page_type: Option<String>,

    /// Put every image in the output directory instead of per-subreddit folders
    #[arg(short, long)]
    pub root: bool,

    /// Maximum number of concurrent downloads
    #[arg(short, long)]
    pub downloads: Option<usize>,

    /// Configuration file (defaults to $MAVIC_CONFIG or config/mavic.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only print the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Layer command-line flags over the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        let scrape = &mut config.scrape;

        if !self.subreddits.is_empty() {
            scrape.subreddits = self.subreddits.clone();
        }
        if let Some(output) = &self.output {
            scrape.output_dir = output.clone();
        }
        if let Some(limit) = self.limit {
            scrape.limit = limit;
        }
        if self.frontpage {
            scrape.front_page = true;
        }
        if let Some(page_type) = &self.page_type {
            scrape.page_type = page_type.clone();
        }
        if self.root {
            scrape.root_only = true;
        }
        if let Some(downloads) = self.downloads {
            scrape.max_concurrent_downloads = downloads;
        }
        if self.quiet {
            scrape.display_loading = false;
        }
    }
}
