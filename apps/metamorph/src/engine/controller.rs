//! # Evolution Controller
//!
//! The timed state machine at the heart of the widget.
//!
//! One `advance()` call walks the session from stage i to i+1 through a
//! fixed choreography of surface mutations, two awaited delays, and four
//! audio cue points. Two guards protect the entry: a re-entrancy guard
//! (at most one transition in flight) and a terminal guard (no advancing
//! past the last stage). Neither guard is an error; both report through
//! the surface's status line.
//!
//! Ordering is contractual: within one invocation the steps below execute
//! strictly in sequence, suspending only at the two timed delays. Across
//! invocations the re-entrancy guard makes a concurrent call a complete
//! no-op, never a queued request.

use crate::engine::progress::ProgressIndicator;
use metamorph_core::presenter::{
    STATUS_AUDIO_DISABLED, STATUS_ENERGY_CLIMBING, STATUS_FINAL_STAGE, STATUS_READY,
    STATUS_TRANSITION_STARTED, congratulation,
};
use metamorph_core::primitives::{
    CHARGE_DELAY_MS, FLASH_TAG, PROGRESS_DURATION_MS, SETTLED_TAG, VANISH_DELAY_MS, VEILED_TAG,
};
use metamorph_core::{
    AdvanceOutcome, AudioCueEmitter, Cue, DisplayPresenter, EvolutionSession, MetamorphError,
    StageCatalog, StyleTag, Surface,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, sleep};

/// Orchestrates evolution transitions for one session.
///
/// Construction is two-phase: `new` wires the collaborators, then
/// `initialize` performs the first render and the one-time audio
/// availability message. The controller owns the session; the progress
/// indicator holds a read-side handle to it.
pub struct EvolutionController<S: Surface + 'static, A: AudioCueEmitter> {
    catalog: StageCatalog,
    session: Arc<RwLock<EvolutionSession>>,
    surface: Arc<Mutex<S>>,
    presenter: DisplayPresenter,
    progress: ProgressIndicator<S>,
    audio: A,
}

impl<S: Surface + 'static, A: AudioCueEmitter> EvolutionController<S, A> {
    /// Wire the controller to its collaborators.
    #[must_use]
    pub fn new(catalog: StageCatalog, surface: S, audio: A) -> Self {
        let surface = Arc::new(Mutex::new(surface));
        let session = Arc::new(RwLock::new(EvolutionSession::new()));
        let progress = ProgressIndicator::new(Arc::clone(&surface), Arc::clone(&session));

        Self {
            catalog,
            session,
            surface,
            presenter: DisplayPresenter::new(),
            progress,
            audio,
        }
    }

    /// Perform the first render and startup messaging.
    ///
    /// # Errors
    ///
    /// Only on a defective catalog, which `StageCatalog::new` rules out.
    pub async fn initialize(&self) -> Result<(), MetamorphError> {
        let index = self.session.read().await.current_index();
        let descriptor = self.catalog.get(index)?;

        let mut surface = self.surface.lock().await;
        self.presenter.render(&mut *surface, descriptor);
        self.presenter
            .set_terminal_messaging(&mut *surface, self.catalog.is_terminal(index));

        // The one place audio availability is consulted. Everything else
        // proceeds identically with or without sound.
        if self.audio.is_available() {
            surface.set_status(STATUS_READY);
        } else {
            tracing::warn!("audio sink unavailable; cues will be silent");
            surface.set_status(STATUS_AUDIO_DISABLED);
        }

        surface.set_trigger_enabled(true);
        surface.commit();
        Ok(())
    }

    /// Run one full transition, or hit a guard and return immediately.
    ///
    /// # Errors
    ///
    /// `StageOutOfRange` only on a programming defect; it is propagated,
    /// never clamped.
    pub async fn advance(&self) -> Result<AdvanceOutcome, MetamorphError> {
        // Guards, checked in order under one write lock so that the check
        // and the state entry are atomic.
        {
            let mut session = self.session.write().await;

            if session.is_transitioning() {
                tracing::debug!("advance ignored: transition already in flight");
                return Ok(AdvanceOutcome::AlreadyTransitioning);
            }

            if self.catalog.is_terminal(session.current_index()) {
                drop(session);
                tracing::info!("advance refused: already at the final stage");
                let mut surface = self.surface.lock().await;
                surface.set_status(STATUS_FINAL_STAGE);
                surface.set_trigger_enabled(false);
                return Ok(AdvanceOutcome::FinalStageReached);
            }

            session.begin_transition();
        }

        // a. Disable the trigger, announce, cue the start.
        {
            let mut surface = self.surface.lock().await;
            surface.set_trigger_enabled(false);
            surface.set_status(STATUS_TRANSITION_STARTED);
        }
        self.audio.emit(Cue::Start);

        // b. The bar runs longer than the phases on purpose; it is pacing,
        //    not timing.
        let progress_task = self.progress.start(PROGRESS_DURATION_MS);

        // c. Flash the container, unsettle the outgoing image.
        {
            let mut surface = self.surface.lock().await;
            surface.add_container_tag(StyleTag::new(FLASH_TAG));
            surface.remove_image_tag(&StyleTag::new(SETTLED_TAG));
        }

        // d. Charging phase.
        sleep(Duration::from_millis(CHARGE_DELAY_MS)).await;

        // e. Veil the image at the peak.
        {
            let mut surface = self.surface.lock().await;
            surface.add_image_tag(StyleTag::new(VEILED_TAG));
            surface.set_status(STATUS_ENERGY_CLIMBING);
        }
        self.audio.emit(Cue::Peak);

        // f. Vanish phase.
        sleep(Duration::from_millis(VANISH_DELAY_MS)).await;

        // g. Move the cursor and render the incoming stage.
        let new_index = self.session.write().await.advance_stage();
        let descriptor = self.catalog.get(new_index)?;
        let terminal = self.catalog.is_terminal(new_index);
        tracing::debug!(stage = %descriptor.name, index = new_index, "stage advanced");

        {
            let mut surface = self.surface.lock().await;
            self.presenter.render(&mut *surface, descriptor);
            self.presenter.set_terminal_messaging(&mut *surface, terminal);

            // h. Unveil, commit the boundary, then settle. The commit
            //    keeps the settle from coalescing with the unveil.
            surface.remove_image_tag(&StyleTag::new(VEILED_TAG));
            surface.commit();
            surface.add_image_tag(StyleTag::new(SETTLED_TAG));

            // i. Drop the flash.
            surface.remove_container_tag(&StyleTag::new(FLASH_TAG));
        }
        self.audio.emit(Cue::Success);

        // j. Congratulate, naming the new stage.
        {
            let mut surface = self.surface.lock().await;
            surface.set_status(&congratulation(&descriptor.name));
        }

        // k. Close the transition. The bar cancels cooperatively on its
        //    next tick; reap it before re-arming the trigger so a stale
        //    frame can never land inside a follow-up transition. The
        //    surface reset stays idempotent with the task's own cleanup.
        self.session.write().await.complete_transition();
        let _ = progress_task.await;
        {
            let mut surface = self.surface.lock().await;
            surface.set_trigger_enabled(true);
            surface.hide_progress();
            surface.set_progress_permille(0);
        }

        // l. Terminal stage: permanent disable plus the victory cue. Later
        //    calls land on the terminal guard above.
        if terminal {
            let mut surface = self.surface.lock().await;
            surface.set_trigger_enabled(false);
            drop(surface);
            self.audio.emit(Cue::Victory);
            tracing::info!("terminal stage reached; trigger disabled for good");
        }

        Ok(AdvanceOutcome::Advanced {
            index: new_index,
            terminal,
        })
    }

    /// Index of the session's current stage.
    pub async fn current_index(&self) -> usize {
        self.session.read().await.current_index()
    }

    /// Whether a transition is currently in flight.
    pub async fn is_transitioning(&self) -> bool {
        self.session.read().await.is_transitioning()
    }

    /// The catalog driving this controller.
    #[must_use]
    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    /// Shared handle to the surface, for the trigger loop.
    #[must_use]
    pub fn surface(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.surface)
    }
}
