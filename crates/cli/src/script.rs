//! Replay scripts
//!
//! One event per line: `<offset_ms> <text>`. The text is everything after
//! the first run of whitespace and may be empty (a cleared search box).
//! Blank lines and lines starting with `#` are skipped. Offsets are
//! measured from the start of the replay and must not decrease.

use anyhow::{Context, Result};
use std::time::Duration;

/// A single timed input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEvent {
    /// When the event happens, relative to replay start
    pub offset: Duration,
    /// Search box content after the event
    pub text: String,
}

/// Parse a replay script
pub fn parse_script(source: &str) -> Result<Vec<ScriptEvent>> {
    let mut events: Vec<ScriptEvent> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end();
        if line.trim_start().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let line = line.trim_start();
        let (offset, text) = match line.split_once(char::is_whitespace) {
            Some((offset, text)) => (offset, text.trim_start()),
            None => (line, ""),
        };

        let offset_ms: u64 = offset
            .parse()
            .with_context(|| format!("line {}: invalid offset '{}'", line_no, offset))?;
        let offset = Duration::from_millis(offset_ms);

        if let Some(previous) = events.last() {
            if offset < previous.offset {
                anyhow::bail!(
                    "line {}: offset {}ms is earlier than the previous event ({}ms)",
                    line_no,
                    offset_ms,
                    previous.offset.as_millis()
                );
            }
        }

        events.push(ScriptEvent {
            offset,
            text: text.to_string(),
        });
    }

    Ok(events)
}
