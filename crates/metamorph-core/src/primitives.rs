//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Metamorph engine.
//!
//! The transition choreography is fixed logic with fixed timings; these
//! constants are compiled into the binary and immutable at runtime.

/// Duration of the charging phase: the suspension between the flash being
/// applied and the image being veiled.
pub const CHARGE_DELAY_MS: u64 = 1500;

/// Duration of the vanish phase: the suspension between the image being
/// veiled and the next stage being rendered.
pub const VANISH_DELAY_MS: u64 = 500;

/// Total duration the progress bar simulates.
///
/// Intentionally LONGER than `CHARGE_DELAY_MS + VANISH_DELAY_MS`: the bar
/// is a visual pacing device, not a timer for the state machine. It is
/// cancelled cooperatively when the transition completes first.
pub const PROGRESS_DURATION_MS: u64 = 3000;

/// Interval between progress-indicator frames, animation-frame equivalent.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Full scale of the progress fill fraction.
///
/// Fill is carried as integer per-mille; 1000 means the bar is full.
pub const PROGRESS_SCALE: u16 = 1000;

/// Minimum number of stages in a valid catalog.
///
/// One stage would leave nothing to evolve into; the initial stage and the
/// terminal stage must be distinct.
pub const MIN_CATALOG_LEN: usize = 2;

// =============================================================================
// TRANSITION STYLE TAGS
// =============================================================================

/// Container tag applied for the whole transition (steps c through i).
pub const FLASH_TAG: &str = "flash";

/// Image tag applied while the outgoing stage is hidden (steps e through h).
pub const VEILED_TAG: &str = "veiled";

/// Image tag applied once the incoming stage has landed (step h onward).
pub const SETTLED_TAG: &str = "settled";

/// Base container tags present regardless of the current stage.
///
/// `DisplayPresenter::render` resets the container to these before applying
/// the stage's own tags, so dynamic tags never accumulate across stages.
pub const BASE_CONTAINER_TAGS: &[&str] = &["panel", "centered", "rounded", "animated"];
