pub mod config;
pub mod extract;
pub mod feed;
pub mod http;
pub mod item;
pub mod observability;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod scraper;
pub mod transfer;

pub use config::{Config, ScrapeOptions};
pub use item::Item;
pub use report::RunSummary;
pub use scraper::{RunReport, ScrapeError, Scraper};
