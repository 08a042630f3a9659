//! `shelfcopy storygraph|letterboxd|radarr-url`: jump from one catalog to another.

use crate::cli::output::{self, Styled};
use crate::cli::read_page;
use crate::config::{Config, LETTERBOXD_ORIGIN, STORYGRAPH_ORIGIN};
use anyhow::Result;
use shelfcopy::links;
use shelfcopy::HtmlDocument;
use std::path::Path;

/// Print the Goodreads search URL for a saved Storygraph book page.
pub fn run_storygraph(page: &Path) -> Result<()> {
    let s = Styled::new();
    let html = read_page(page)?;
    let doc = HtmlDocument::parse(&html, STORYGRAPH_ORIGIN);

    match links::goodreads_search_url(&doc) {
        Ok(search) => {
            if output::is_json() {
                output::print_json(&serde_json::json!({ "goodreads_search": search.as_str() }));
            } else {
                println!("{search}");
            }
            Ok(())
        }
        Err(e) => {
            output::print_fail(&s, "Could not find book information.");
            Err(e.into())
        }
    }
}

/// Print the Radarr search URL for a saved Letterboxd film page.
pub fn run_letterboxd(config: &Config, page: &Path) -> Result<()> {
    let s = Styled::new();
    let html = read_page(page)?;
    let doc = HtmlDocument::parse(&html, LETTERBOXD_ORIGIN);

    let store = config.store_for_origin(LETTERBOXD_ORIGIN);
    let base = links::radarr_base_url(&store);

    match links::radarr_search_url(&doc, &base) {
        Ok(target) => {
            if output::is_json() {
                output::print_json(&serde_json::json!({
                    "tmdb_id": links::tmdb_id(&doc)?,
                    "radarr": target,
                }));
            } else {
                println!("{target}");
            }
            Ok(())
        }
        Err(e) => {
            output::print_fail(&s, &format!("No Radarr link: {e}"));
            Err(e.into())
        }
    }
}

/// Show or change the Radarr base URL.
pub fn run_radarr_url(config: &Config, new_url: Option<&str>) -> Result<()> {
    let s = Styled::new();
    let mut store = config.store_for_origin(LETTERBOXD_ORIGIN);

    match new_url {
        Some(url) => {
            let stored = links::set_radarr_base_url(&mut store, url)?;
            output::print_ok(&s, &format!("Radarr URL set to {stored}."));
        }
        None => {
            let current = links::radarr_base_url(&store);
            if output::is_json() {
                output::print_json(&serde_json::json!({ "radarr_url": current }));
            } else {
                println!("{current}");
            }
        }
    }
    Ok(())
}
