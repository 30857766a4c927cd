//! # Engine Module
//!
//! The async half of the widget: the transition controller, the progress
//! tick task, and the terminal implementations of the core's two boundary
//! traits (`Surface`, `AudioCueEmitter`).

mod audio;
mod controller;
mod progress;
mod surface;

pub use audio::{ConsoleCueEmitter, MUTE_ENV};
pub use controller::EvolutionController;
pub use progress::ProgressIndicator;
pub use surface::TerminalSurface;
