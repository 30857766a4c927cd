//! # metamorph-core
//!
//! The deterministic evolution engine for Metamorph - THE LOGIC.
//!
//! This crate holds everything the widget knows that is not timing or I/O:
//! the stage catalog, the session cursor, the progress fill math, the
//! presenter that maps a stage onto the presentation surface, and the cue
//! definitions for the audio boundary.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the only place where widget state exists (session + catalog)
//! - Is pure and synchronous: no async, no I/O, no clocks
//! - Uses integer arithmetic only (progress is per-mille, never floats)
//! - Talks to the outside through two traits: `Surface` and
//!   `AudioCueEmitter`, both implemented by the app layer

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod cues;
pub mod presenter;
pub mod primitives;
pub mod progress;
pub mod session;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AdvanceOutcome, MetamorphError, StageDescriptor, StyleTag};

// =============================================================================
// RE-EXPORTS: Engine Pieces
// =============================================================================

pub use catalog::StageCatalog;
pub use cues::{AudioCueEmitter, Cue, NoteHold, NullCueEmitter};
pub use presenter::{DisplayPresenter, Surface};
pub use session::EvolutionSession;
pub use progress::{is_complete, progress_permille};
