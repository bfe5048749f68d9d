//! CLI command implementations

pub mod config;
pub mod replay;
pub mod run;

use crate::settings::Settings;
use anyhow::{Context, Result};
use debounce::{Debouncer, FrameDriver, FrameScheduler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Debounced search handler plus the frame loop it may depend on
pub struct SearchBox {
    pub debouncer: Debouncer<String, usize>,
    searches: Arc<AtomicUsize>,
    _frames: Option<FrameDriver>,
}

impl SearchBox {
    /// Build the debounced search handler described by `settings`
    ///
    /// `search` receives each query that survives debouncing. The debounced
    /// result is the running count of searches.
    pub fn new<F>(settings: &Settings, search: F) -> Result<Self>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let searches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&searches);

        let mut builder = Debouncer::builder()
            .options(settings.debounce.options())
            .action(move |query: String| {
                search(&query);
                counter.fetch_add(1, Ordering::SeqCst) + 1
            });

        let mut driver = None;
        if settings.frames.enabled {
            let frames = FrameScheduler::new();
            driver = Some(frames.drive(settings.frames.fps).context("Failed to start frame loop")?);
            builder = builder.frames(frames);
        }

        let debouncer = builder.build().context("Failed to build search debouncer")?;
        info!("Search debouncer ready (backend: {:?})", debouncer.backend());

        Ok(Self {
            debouncer,
            searches,
            _frames: driver,
        })
    }

    /// Searches run so far
    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Finish the session: flush the pending search, or wait for it
    pub async fn finish(&self, flush: bool) {
        if flush {
            self.debouncer.flush();
            return;
        }
        while self.debouncer.pending() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
