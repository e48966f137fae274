//! The `files` command: inspect or clear the cache directory

use anyhow::{Context, Result};

use crate::config::Config;
use crate::storage::DealStore;

/// List cache entries, or delete them all with `--clear`
pub async fn files(clear: bool) -> Result<()> {
    let config = Config::from_env()?;
    config.validate().context("Invalid configuration")?;

    let store = DealStore::new(&config.storage.data_dir);

    if clear {
        let deleted = store.delete_all()?;
        println!("Deleted {deleted} cache entries");
        return Ok(());
    }

    let entries = store.list()?;
    if entries.is_empty() {
        println!(
            "No cache entries in {}",
            config.storage.data_dir.display()
        );
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:<30} {:>9}B  {}  {}",
            entry.filename, entry.size, entry.modified, entry.title
        );
    }

    Ok(())
}
