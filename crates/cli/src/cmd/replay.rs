//! Replay a timed keystroke script through the debouncer

use super::SearchBox;
use crate::script::parse_script;
use crate::settings::Settings;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use tokio::time::Instant;
use tracing::info;

pub async fn run(settings: &Settings, script: &Path, flush_at_end: bool) -> Result<()> {
    let source = tokio::fs::read_to_string(script)
        .await
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let events = parse_script(&source)?;

    let start = Instant::now();
    let search_box = SearchBox::new(settings, move |query| {
        let at = format!("[{:>6}ms]", start.elapsed().as_millis());
        println!("{} search: {}", at.dimmed(), query);
    })?;

    for event in &events {
        tokio::time::sleep_until(start + event.offset).await;
        search_box.debouncer.call(event.text.clone());
    }

    search_box.finish(flush_at_end).await;

    info!(
        "Replayed {} events in {:?}: {} searches",
        events.len(),
        start.elapsed(),
        search_box.searches()
    );
    Ok(())
}
