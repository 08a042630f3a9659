//! CLI subcommand implementations for the shelfcopy binary.

pub mod copy_cmd;
pub mod links_cmd;
pub mod output;
pub mod settings_cmd;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a saved page from `path`, or from stdin when `path` is `-`.
pub fn read_page(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("failed to read page from stdin")?;
        return Ok(html);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read page: {}", path.display()))
}
