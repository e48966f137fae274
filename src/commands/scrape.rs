//! The `scrape` command: one-shot scrape from the terminal

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::models::RecordSource;
use crate::scraper::{ScrapeOptions, ThreadScraper};
use crate::storage::DealStore;

/// Scrape a single thread and print a short summary
pub async fn scrape(url: String, max_pages: u32, force_refresh: bool) -> Result<()> {
    let config = Config::from_env()?;
    config.validate().context("Invalid configuration")?;

    let store = Arc::new(DealStore::new(&config.storage.data_dir));
    let scraper = ThreadScraper::new(&config.scraper, Arc::clone(&store))?;

    let opts = ScrapeOptions {
        max_pages,
        force_refresh,
    };

    let record = scraper.scrape(&url, &opts).await?;

    match record.source {
        RecordSource::Cache => println!("Served from cache"),
        RecordSource::Scrape => println!("Scraped fresh"),
    }
    if !record.deal_title.is_empty() {
        println!("  Title: {}", record.deal_title);
    }
    println!("  Comments: {}", record.count);
    println!(
        "  Saved to: {}",
        config.storage.data_dir.join(&record.saved_to).display()
    );

    Ok(())
}
