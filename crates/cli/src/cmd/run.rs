//! Debounce search input read from stdin

use super::SearchBox;
use crate::settings::Settings;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Each stdin line is the current search box content
pub async fn run(settings: &Settings, flush_on_eof: bool) -> Result<()> {
    let search_box = SearchBox::new(settings, |query| println!("search: {}", query))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut keystrokes = 0usize;
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        keystrokes += 1;
        search_box.debouncer.call(line);
    }

    search_box.finish(flush_on_eof).await;

    info!(
        "Input closed: {} keystrokes, {} searches",
        keystrokes,
        search_box.searches()
    );
    Ok(())
}
