//! `shelfcopy copy <page> --url <url>`: one spreadsheet row from a book page.

use crate::cli::output::{self, Styled};
use crate::cli::read_page;
use crate::config::Config;
use anyhow::Result;
use shelfcopy::{BookInfoExtractor, HtmlDocument, SettingsStore};
use std::path::Path;
use tracing::debug;

/// Run the copy command.
pub fn run(config: &Config, page: &Path, url: &str) -> Result<()> {
    let s = Styled::new();
    let html = read_page(page)?;
    let doc = HtmlDocument::parse(&html, url);

    let store = SettingsStore::open(config.store_for_url(url)?);
    debug!("settings from {}", store.backend().path().display());
    let extractor = BookInfoExtractor::new(&doc, store.settings());

    if output::is_json() {
        let columns = match extractor.columns() {
            Ok(columns) => columns,
            Err(e) => {
                output::print_json(&serde_json::json!({
                    "error": "extraction_failed",
                    "message": e.to_string(),
                }));
                return Err(e.into());
            }
        };
        output::print_json(&serde_json::json!({ "url": url, "columns": columns }));
        return Ok(());
    }

    match extractor.get_book_info() {
        Ok(row) => {
            println!("{row}");
            output::print_ok(
                &s,
                &format!(
                    "Book info ready ({} columns).",
                    store.settings().field_order.len()
                ),
            );
            Ok(())
        }
        Err(e) => {
            output::print_fail(&s, &format!("Error copying book info: {e}"));
            Err(e.into())
        }
    }
}
