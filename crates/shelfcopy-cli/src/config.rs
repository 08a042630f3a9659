//! Runtime configuration: where per-site stores live.

use anyhow::{Context, Result};
use shelfcopy::FileStore;
use std::path::PathBuf;
use url::Url;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "SHELFCOPY_HOME";

/// Sites the commands act on when no page URL is given.
pub const GOODREADS_ORIGIN: &str = "https://www.goodreads.com";
pub const LETTERBOXD_ORIGIN: &str = "https://letterboxd.com";
pub const STORYGRAPH_ORIGIN: &str = "https://app.thestorygraph.com";

/// Resolved data locations.
#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
}

impl Config {
    /// `--home` wins, then `SHELFCOPY_HOME`, then `~/.shelfcopy`.
    pub fn resolve(home_flag: Option<PathBuf>) -> Self {
        let home = home_flag
            .or_else(|| std::env::var_os(HOME_ENV).map(PathBuf::from))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".shelfcopy")
            });
        Self { home }
    }

    pub fn stores_dir(&self) -> PathBuf {
        self.home.join("stores")
    }

    /// The key-value store for the site serving `page_url`.
    pub fn store_for_url(&self, page_url: &str) -> Result<FileStore> {
        Ok(self.store_for_origin(&origin_of(page_url)?))
    }

    pub fn store_for_origin(&self, origin: &str) -> FileStore {
        FileStore::for_origin(&self.stores_dir(), origin)
    }
}

/// `scheme://host[:port]` of a page URL.
pub fn origin_of(page_url: &str) -> Result<String> {
    let url = Url::parse(page_url).with_context(|| format!("invalid page URL: {page_url}"))?;
    Ok(url.origin().ascii_serialization())
}
