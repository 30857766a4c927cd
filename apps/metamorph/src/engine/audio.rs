//! # Console Cue Emitter
//!
//! Renders audio cues on a bare terminal: one BEL per cue, with the
//! voicing detail in the debug log. Availability is probed once at
//! construction; an unavailable emitter makes every `emit` a silent
//! no-op, exactly like the null emitter.

use metamorph_core::{AudioCueEmitter, Cue};
use std::io::{self, IsTerminal, Write};

/// Environment variable that force-disables audio cues.
///
/// Any value other than "0" mutes the emitter.
pub const MUTE_ENV: &str = "METAMORPH_MUTE";

/// Terminal-bell cue emitter.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleCueEmitter {
    available: bool,
}

impl ConsoleCueEmitter {
    /// Probe the environment and build an emitter.
    ///
    /// The sink is unavailable when stdout is not a terminal (no bell to
    /// ring) or when [`MUTE_ENV`] is set.
    #[must_use]
    pub fn from_env() -> Self {
        let muted = std::env::var(MUTE_ENV).is_ok_and(|value| value != "0");
        let tty = io::stdout().is_terminal();

        if muted {
            tracing::info!("audio cues muted via {}", MUTE_ENV);
        } else if !tty {
            tracing::info!("stdout is not a terminal; audio cues disabled");
        }

        Self {
            available: !muted && tty,
        }
    }
}

impl AudioCueEmitter for ConsoleCueEmitter {
    fn emit(&self, cue: Cue) {
        if !self.available {
            return;
        }
        // One BEL carries the cue; a bell per voiced note would spam most
        // terminal emulators. The voicing itself goes to the debug log.
        print!("\x07");
        let _ = io::stdout().flush();
        tracing::debug!(cue = %cue, noise_burst = cue.has_noise_burst(), "cue emitted");
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
