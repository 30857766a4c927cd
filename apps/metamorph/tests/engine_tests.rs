//! Integration tests for the evolution engine.
//!
//! Every timed test runs under a paused tokio clock
//! (`start_paused = true`), so the 1500/500/3000 ms timers complete
//! deterministically and event offsets can be asserted exactly.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use metamorph::engine::{EvolutionController, ProgressIndicator};
use metamorph_core::presenter::{
    STATUS_AUDIO_DISABLED, STATUS_ENERGY_CLIMBING, STATUS_FINAL_STAGE, STATUS_READY,
    STATUS_TRANSITION_STARTED, TRIGGER_MAXED_LABEL, TRIGGER_READY_LABEL,
};
use metamorph_core::primitives::{
    CHARGE_DELAY_MS, FLASH_TAG, PROGRESS_SCALE, SETTLED_TAG, VANISH_DELAY_MS, VEILED_TAG,
};
use metamorph_core::{
    AdvanceOutcome, AudioCueEmitter, Cue, EvolutionSession, StageCatalog, StyleTag, Surface,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::time::{Duration, Instant};

// =============================================================================
// RECORDING FAKES
// =============================================================================

/// One observed surface mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Name(String),
    Label(String),
    Image(String),
    ReplaceTags(Vec<String>),
    AddContainerTag(String),
    RemoveContainerTag(String),
    AddImageTag(String),
    RemoveImageTag(String),
    Commit,
    Status(String),
    TriggerEnabled(bool),
    TriggerLabel(String),
    ShowProgress,
    Fill(u16),
    HideProgress,
}

/// Everything the recording surface has seen, plus its current state.
#[derive(Debug, Default)]
struct SurfaceState {
    events: Vec<(Instant, Event)>,
    name: String,
    label: String,
    image: String,
    image_tags: BTreeSet<String>,
    status: String,
    trigger_enabled: bool,
    trigger_label: String,
    progress_visible: bool,
    fills: Vec<u16>,
}

impl SurfaceState {
    /// Offset from `t0` of the first event matching `predicate`.
    fn offset_of(&self, t0: Instant, predicate: impl Fn(&Event) -> bool) -> Option<Duration> {
        self.events
            .iter()
            .find(|(_, event)| predicate(event))
            .map(|(at, _)| at.duration_since(t0))
    }

    /// Position in the event log of the first event matching `predicate`.
    fn position_of(&self, predicate: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events.iter().position(|(_, event)| predicate(event))
    }
}

#[derive(Debug, Clone)]
struct RecordingSurface {
    state: Arc<StdMutex<SurfaceState>>,
}

impl RecordingSurface {
    fn new() -> Self {
        Self {
            state: Arc::new(StdMutex::new(SurfaceState::default())),
        }
    }

    fn handle(&self) -> Arc<StdMutex<SurfaceState>> {
        Arc::clone(&self.state)
    }

    fn record(&self, event: Event) -> std::sync::MutexGuard<'_, SurfaceState> {
        let mut state = self.state.lock().unwrap();
        state.events.push((Instant::now(), event));
        state
    }
}

impl Surface for RecordingSurface {
    fn set_name(&mut self, name: &str) {
        let mut state = self.record(Event::Name(name.to_string()));
        state.name = name.to_string();
    }
    fn set_stage_label(&mut self, label: &str) {
        let mut state = self.record(Event::Label(label.to_string()));
        state.label = label.to_string();
    }
    fn set_image(&mut self, image_ref: &str) {
        let mut state = self.record(Event::Image(image_ref.to_string()));
        state.image = image_ref.to_string();
    }
    fn replace_container_tags(&mut self, tags: &BTreeSet<StyleTag>) {
        let names: Vec<String> = tags.iter().map(|t| t.as_str().to_string()).collect();
        self.record(Event::ReplaceTags(names));
    }
    fn add_container_tag(&mut self, tag: StyleTag) {
        self.record(Event::AddContainerTag(tag.as_str().to_string()));
    }
    fn remove_container_tag(&mut self, tag: &StyleTag) {
        self.record(Event::RemoveContainerTag(tag.as_str().to_string()));
    }
    fn add_image_tag(&mut self, tag: StyleTag) {
        let mut state = self.record(Event::AddImageTag(tag.as_str().to_string()));
        state.image_tags.insert(tag.as_str().to_string());
    }
    fn remove_image_tag(&mut self, tag: &StyleTag) {
        let mut state = self.record(Event::RemoveImageTag(tag.as_str().to_string()));
        state.image_tags.remove(tag.as_str());
    }
    fn commit(&mut self) {
        self.record(Event::Commit);
    }
    fn set_status(&mut self, text: &str) {
        let mut state = self.record(Event::Status(text.to_string()));
        state.status = text.to_string();
    }
    fn set_trigger_enabled(&mut self, enabled: bool) {
        let mut state = self.record(Event::TriggerEnabled(enabled));
        state.trigger_enabled = enabled;
    }
    fn set_trigger_label(&mut self, label: &str) {
        let mut state = self.record(Event::TriggerLabel(label.to_string()));
        state.trigger_label = label.to_string();
    }
    fn show_progress(&mut self) {
        let mut state = self.record(Event::ShowProgress);
        state.progress_visible = true;
    }
    fn set_progress_permille(&mut self, permille: u16) {
        let mut state = self.record(Event::Fill(permille));
        state.fills.push(permille);
    }
    fn hide_progress(&mut self) {
        let mut state = self.record(Event::HideProgress);
        state.progress_visible = false;
    }
}

/// Cue recorder honoring the silent-no-op contract when unavailable.
#[derive(Debug, Clone)]
struct RecordingCueEmitter {
    available: bool,
    cues: Arc<StdMutex<Vec<Cue>>>,
}

impl RecordingCueEmitter {
    fn new(available: bool) -> Self {
        Self {
            available,
            cues: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    fn handle(&self) -> Arc<StdMutex<Vec<Cue>>> {
        Arc::clone(&self.cues)
    }
}

impl AudioCueEmitter for RecordingCueEmitter {
    fn emit(&self, cue: Cue) {
        if !self.available {
            return;
        }
        self.cues.lock().unwrap().push(cue);
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

type Rig = (
    Arc<EvolutionController<RecordingSurface, RecordingCueEmitter>>,
    Arc<StdMutex<SurfaceState>>,
    Arc<StdMutex<Vec<Cue>>>,
);

/// Controller over the built-in catalog with recording collaborators.
fn rig(audio_available: bool) -> Rig {
    let surface = RecordingSurface::new();
    let state = surface.handle();
    let emitter = RecordingCueEmitter::new(audio_available);
    let cues = emitter.handle();
    let controller = Arc::new(EvolutionController::new(
        StageCatalog::builtin(),
        surface,
        emitter,
    ));
    (controller, state, cues)
}

// =============================================================================
// INITIALIZATION TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn initialize_renders_the_initial_stage() {
    let (controller, state, _cues) = rig(true);
    controller.initialize().await.unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.name, "Botamon 🥚");
    assert_eq!(state.label, "Bebé I");
    assert!(state.image.contains("Botamon"));
    assert_eq!(state.status, STATUS_READY);
    assert_eq!(state.trigger_label, TRIGGER_READY_LABEL);
    assert!(state.trigger_enabled);
}

#[tokio::test(start_paused = true)]
async fn initialize_reports_audio_unavailability_once() {
    let (controller, state, _cues) = rig(false);
    controller.initialize().await.unwrap();

    let state = state.lock().unwrap();
    // The informational message is the only difference; the widget is
    // fully armed either way.
    assert_eq!(state.status, STATUS_AUDIO_DISABLED);
    assert!(state.trigger_enabled);
}

// =============================================================================
// TRANSITION CHOREOGRAPHY TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn advance_hits_its_timing_marks() {
    let (controller, state, _cues) = rig(true);
    controller.initialize().await.unwrap();

    let t0 = Instant::now();
    let outcome = controller.advance().await.unwrap();
    assert_eq!(
        outcome,
        AdvanceOutcome::Advanced {
            index: 1,
            terminal: false
        }
    );

    let state = state.lock().unwrap();

    // The image is veiled exactly at the end of the charging phase.
    let veiled_at = state
        .offset_of(t0, |e| *e == Event::AddImageTag(VEILED_TAG.to_string()))
        .expect("veiled tag must be applied");
    assert_eq!(veiled_at, Duration::from_millis(CHARGE_DELAY_MS));

    // The new stage lands exactly after charge + vanish.
    let renamed_at = state
        .offset_of(t0, |e| *e == Event::Name("Koromon ✨".to_string()))
        .expect("new stage must be rendered");
    assert_eq!(
        renamed_at,
        Duration::from_millis(CHARGE_DELAY_MS + VANISH_DELAY_MS)
    );

    // Settled state after the dust clears.
    assert_eq!(state.name, "Koromon ✨");
    assert_eq!(state.label, "Bebé II");
    assert!(state.status.contains("Koromon"));
    assert!(state.trigger_enabled);
    assert!(state.image_tags.contains(SETTLED_TAG));
    assert!(!state.image_tags.contains(VEILED_TAG));
    assert!(!state.progress_visible);

    drop(state);
    assert_eq!(controller.current_index().await, 1);
    assert!(!controller.is_transitioning().await);
}

#[tokio::test(start_paused = true)]
async fn advance_orders_its_surface_mutations() {
    let (controller, state, _cues) = rig(true);
    controller.initialize().await.unwrap();
    controller.advance().await.unwrap();

    let state = state.lock().unwrap();

    let started = state
        .position_of(|e| *e == Event::Status(STATUS_TRANSITION_STARTED.to_string()))
        .expect("start status");
    let flash_on = state
        .position_of(|e| *e == Event::AddContainerTag(FLASH_TAG.to_string()))
        .expect("flash applied");
    let veiled = state
        .position_of(|e| *e == Event::AddImageTag(VEILED_TAG.to_string()))
        .expect("veiled applied");
    let climbing = state
        .position_of(|e| *e == Event::Status(STATUS_ENERGY_CLIMBING.to_string()))
        .expect("climbing status");
    let unveiled = state
        .position_of(|e| *e == Event::RemoveImageTag(VEILED_TAG.to_string()))
        .expect("veiled removed");
    let commit = state
        .events
        .iter()
        .enumerate()
        .filter(|(_, (_, e))| *e == Event::Commit)
        .map(|(i, _)| i)
        .find(|&i| i > unveiled)
        .expect("commit boundary after unveil");
    let settled = state
        .position_of(|e| *e == Event::AddImageTag(SETTLED_TAG.to_string()))
        .expect("settled applied");
    let flash_off = state
        .position_of(|e| *e == Event::RemoveContainerTag(FLASH_TAG.to_string()))
        .expect("flash removed");

    // Strict phase ordering, with the commit boundary between unveil and
    // settle so the settle is never coalesced with the unveil.
    assert!(started < flash_on);
    assert!(flash_on < veiled);
    assert!(veiled < climbing);
    assert!(climbing < unveiled);
    assert!(unveiled < commit);
    assert!(commit < settled);
    assert!(settled < flash_off);
}

#[tokio::test(start_paused = true)]
async fn advance_emits_cues_in_phase_order() {
    let (controller, _state, cues) = rig(true);
    controller.initialize().await.unwrap();
    controller.advance().await.unwrap();

    let cues = cues.lock().unwrap();
    assert_eq!(cues.as_slice(), [Cue::Start, Cue::Peak, Cue::Success]);
}

// =============================================================================
// GUARD TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn advance_while_transitioning_is_a_complete_noop() {
    let (controller, state, _cues) = rig(true);
    controller.initialize().await.unwrap();

    let background = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.advance().await })
    };

    // Let the background advance reach its first suspension point.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(controller.is_transitioning().await);
    assert!(!state.lock().unwrap().trigger_enabled);

    // The overlapping call returns immediately without touching the cursor.
    let overlapping = controller.advance().await.unwrap();
    assert_eq!(overlapping, AdvanceOutcome::AlreadyTransitioning);
    assert_eq!(controller.current_index().await, 0);

    let outcome = background.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        AdvanceOutcome::Advanced {
            index: 1,
            terminal: false
        }
    );
    assert!(!controller.is_transitioning().await);
}

#[tokio::test(start_paused = true)]
async fn terminal_guard_disables_and_stays_disabled() {
    let (controller, state, _cues) = rig(true);
    controller.initialize().await.unwrap();

    for _ in 0..5 {
        controller.advance().await.unwrap();
    }
    assert_eq!(controller.current_index().await, 5);

    // Guarded calls are idempotent: same outcome, same state, forever.
    for _ in 0..3 {
        let outcome = controller.advance().await.unwrap();
        assert_eq!(outcome, AdvanceOutcome::FinalStageReached);
        assert_eq!(controller.current_index().await, 5);

        let state = state.lock().unwrap();
        assert_eq!(state.status, STATUS_FINAL_STAGE);
        assert!(!state.trigger_enabled);
    }
}

// =============================================================================
// FULL PLAYTHROUGH TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn five_advances_walk_the_whole_ladder() {
    let (controller, state, cues) = rig(true);
    controller.initialize().await.unwrap();

    for expected in 1..=5usize {
        let outcome = controller.advance().await.unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                index: expected,
                terminal: expected == 5
            }
        );
    }

    let state = state.lock().unwrap();
    assert_eq!(state.name, "WarGreymon 🛡️");
    assert!(state.status.contains("WarGreymon"));
    assert_eq!(state.trigger_label, TRIGGER_MAXED_LABEL);
    assert!(!state.trigger_enabled);

    // Three cues per transition, then the single victory cue at the top.
    let cues = cues.lock().unwrap();
    assert_eq!(cues.len(), 16);
    assert_eq!(cues.last(), Some(&Cue::Victory));
    assert_eq!(cues.iter().filter(|c| **c == Cue::Victory).count(), 1);
    for chunk in cues[..15].chunks(3) {
        assert_eq!(chunk, [Cue::Start, Cue::Peak, Cue::Success]);
    }
}

#[tokio::test(start_paused = true)]
async fn audio_unavailability_changes_no_visual_outcome() {
    let (silent, silent_state, silent_cues) = rig(false);
    silent.initialize().await.unwrap();

    let (voiced, voiced_state, _) = rig(true);
    voiced.initialize().await.unwrap();

    silent.advance().await.unwrap();
    voiced.advance().await.unwrap();

    let silent_state = silent_state.lock().unwrap();
    let voiced_state = voiced_state.lock().unwrap();

    assert_eq!(silent_state.name, voiced_state.name);
    assert_eq!(silent_state.label, voiced_state.label);
    assert_eq!(silent_state.status, voiced_state.status);
    assert_eq!(silent_state.trigger_enabled, voiced_state.trigger_enabled);
    assert_eq!(silent_state.image_tags, voiced_state.image_tags);

    // The only difference: nothing was ever emitted.
    assert!(silent_cues.lock().unwrap().is_empty());
}

// =============================================================================
// PROGRESS INDICATOR TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn progress_fills_monotonically_to_full_scale_then_hides() {
    let surface = RecordingSurface::new();
    let state = surface.handle();
    let surface = Arc::new(tokio::sync::Mutex::new(surface));
    let session = Arc::new(tokio::sync::RwLock::new(EvolutionSession::new()));
    session.write().await.begin_transition();

    let indicator = ProgressIndicator::new(Arc::clone(&surface), Arc::clone(&session));
    indicator.start(100).await.unwrap();

    let state = state.lock().unwrap();
    assert!(!state.progress_visible);

    // Final fill is the reset-to-zero after hiding; everything before it
    // is one monotone ramp ending exactly at full scale.
    let (reset, ramp) = state.fills.split_last().expect("at least one fill");
    assert_eq!(*reset, 0);
    assert_eq!(ramp.last(), Some(&PROGRESS_SCALE));
    assert!(ramp.windows(2).all(|pair| pair[0] <= pair[1]));

    let hide = state.position_of(|e| *e == Event::HideProgress).expect("hidden");
    let full = state
        .position_of(|e| *e == Event::Fill(PROGRESS_SCALE))
        .expect("reached full scale");
    assert!(full < hide);
}

#[tokio::test(start_paused = true)]
async fn progress_stops_cooperatively_when_the_flag_drops() {
    let surface = RecordingSurface::new();
    let state = surface.handle();
    let surface = Arc::new(tokio::sync::Mutex::new(surface));
    let session = Arc::new(tokio::sync::RwLock::new(EvolutionSession::new()));
    session.write().await.begin_transition();

    let indicator = ProgressIndicator::new(Arc::clone(&surface), Arc::clone(&session));
    let task = indicator.start(10_000);

    tokio::time::sleep(Duration::from_millis(100)).await;
    session.write().await.complete_transition();
    task.await.unwrap();

    let state = state.lock().unwrap();
    assert!(!state.progress_visible);

    // The bar never came close to full before the cooperative stop.
    let (reset, ramp) = state.fills.split_last().expect("at least one fill");
    assert_eq!(*reset, 0);
    assert!(ramp.iter().all(|fill| *fill < PROGRESS_SCALE));
}
