//! # Progress Indicator
//!
//! The simulated progress bar: a spawned tick task that maps elapsed time
//! to a fill level on each animation-frame-equivalent tick.
//!
//! Cancellation is cooperative and polling-based, not event-based: the
//! task checks the session's `transitioning` flag after applying each
//! frame, so at most one extra frame runs after logical cancellation.
//! There is no `stop()`.

use metamorph_core::primitives::FRAME_INTERVAL_MS;
use metamorph_core::{EvolutionSession, Surface, is_complete, progress_permille};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, interval};

/// Drives the surface's progress fill from a spawned tick task.
#[derive(Debug)]
pub struct ProgressIndicator<S: Surface + 'static> {
    surface: Arc<Mutex<S>>,
    session: Arc<RwLock<EvolutionSession>>,
}

impl<S: Surface + 'static> ProgressIndicator<S> {
    /// Bind the indicator to its surface and governing session.
    #[must_use]
    pub fn new(surface: Arc<Mutex<S>>, session: Arc<RwLock<EvolutionSession>>) -> Self {
        Self { surface, session }
    }

    /// Start a fill cycle over `duration_ms`.
    ///
    /// Shows the indicator, resets the fill to 0, then ticks until the
    /// fill is complete or the session stops transitioning, whichever
    /// comes first; finally hides the indicator and resets the fill.
    ///
    /// Not reentrant: a second `start` while a task is running spawns a
    /// fresh task with a fresh baseline. The controller's re-entrancy
    /// guard keeps that from happening while a transition is active.
    pub fn start(&self, duration_ms: u64) -> JoinHandle<()> {
        let surface = Arc::clone(&self.surface);
        let session = Arc::clone(&self.session);

        tokio::spawn(async move {
            let baseline = Instant::now();
            {
                let mut surface = surface.lock().await;
                surface.show_progress();
                surface.set_progress_permille(0);
            }

            let mut frames = interval(Duration::from_millis(FRAME_INTERVAL_MS));
            loop {
                frames.tick().await;

                let elapsed_ms =
                    u64::try_from(baseline.elapsed().as_millis()).unwrap_or(u64::MAX);
                let fill = progress_permille(elapsed_ms, duration_ms);
                surface.lock().await.set_progress_permille(fill);

                if is_complete(fill) {
                    break;
                }
                if !session.read().await.is_transitioning() {
                    // Cooperative cancellation: the flag flipped under us;
                    // this frame was the one permitted extra tick.
                    break;
                }
            }

            let mut surface = surface.lock().await;
            surface.hide_progress();
            surface.set_progress_permille(0);
        })
    }
}
