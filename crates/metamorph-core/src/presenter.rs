//! # Display Presenter
//!
//! Applies a stage descriptor to the presentation surface.
//!
//! The surface itself is a trait: a small property-set sink, not a
//! rendering engine. The app supplies the real terminal surface; tests
//! supply recording fakes. The presenter is the only writer of the
//! stage-derived properties (name, label, image, container tags); the
//! controller writes the transition tags and status text directly.

use crate::primitives::BASE_CONTAINER_TAGS;
use crate::types::{StageDescriptor, StyleTag};
use std::collections::BTreeSet;

// =============================================================================
// STATUS & TRIGGER MESSAGING
// =============================================================================

/// Status shown after initialization when audio cues are available.
pub const STATUS_READY: &str = "Ready to evolve. Engage the trigger to begin the sequence.";

/// Status shown after initialization when the audio sink is unavailable.
pub const STATUS_AUDIO_DISABLED: &str =
    "Audio cues unavailable. The evolution sequence will run silently.";

/// Status emitted the moment a transition starts.
pub const STATUS_TRANSITION_STARTED: &str = "Evolution started! The digital gate is open!";

/// Status emitted at the transition peak, while the image is veiled.
pub const STATUS_ENERGY_CLIMBING: &str = "....energy climbing to maximum....";

/// Status emitted when `advance()` is refused at the terminal stage.
pub const STATUS_FINAL_STAGE: &str = "Already at the final stage!";

/// Status installed by terminal messaging once the last stage is rendered.
pub const STATUS_QUEST_OVER: &str = "The quest for more power is over!";

/// Trigger label while further evolutions are possible.
pub const TRIGGER_READY_LABEL: &str = "EVOLVE!";

/// Trigger label once the terminal stage is reached.
pub const TRIGGER_MAXED_LABEL: &str = "MAX LEVEL REACHED!";

/// Congratulatory status naming the freshly reached stage.
#[must_use]
pub fn congratulation(stage_name: &str) -> String {
    format!("Congratulations! Evolved into {stage_name}. Ready for battle!")
}

// =============================================================================
// SURFACE TRAIT
// =============================================================================

/// The presentation boundary: a settable property sink.
///
/// Implementors render however they like (ANSI terminal, recording fake);
/// the engine only promises the ORDER of mutations. `commit` is a forced
/// visual-state boundary: tag changes before it must not be coalesced with
/// tag changes after it.
pub trait Surface: Send {
    /// Set the displayed entity name (already icon-suffixed).
    fn set_name(&mut self, name: &str);
    /// Set the stage label text.
    fn set_stage_label(&mut self, label: &str);
    /// Set the image reference.
    fn set_image(&mut self, image_ref: &str);
    /// Replace the container's full dynamic tag set.
    fn replace_container_tags(&mut self, tags: &BTreeSet<StyleTag>);
    /// Add one tag to the container.
    fn add_container_tag(&mut self, tag: StyleTag);
    /// Remove one tag from the container.
    fn remove_container_tag(&mut self, tag: &StyleTag);
    /// Add one tag to the image surface.
    fn add_image_tag(&mut self, tag: StyleTag);
    /// Remove one tag from the image surface.
    fn remove_image_tag(&mut self, tag: &StyleTag);
    /// Force a visual-state commit boundary.
    fn commit(&mut self);
    /// Set the status message text.
    fn set_status(&mut self, text: &str);
    /// Enable or disable the external trigger.
    fn set_trigger_enabled(&mut self, enabled: bool);
    /// Set the trigger-control label text.
    fn set_trigger_label(&mut self, label: &str);
    /// Make the progress indicator visible.
    fn show_progress(&mut self);
    /// Set the progress fill level in per-mille (0..=1000).
    fn set_progress_permille(&mut self, permille: u16);
    /// Hide the progress indicator.
    fn hide_progress(&mut self);
}

// =============================================================================
// DISPLAY PRESENTER
// =============================================================================

/// Stateless renderer of stage descriptors onto a surface.
#[derive(Debug, Clone)]
pub struct DisplayPresenter {
    base_tags: BTreeSet<StyleTag>,
}

impl Default for DisplayPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPresenter {
    /// Presenter with the built-in base container tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_tags: BASE_CONTAINER_TAGS.iter().copied().map(StyleTag::new).collect(),
        }
    }

    /// Presenter with a custom base tag set.
    #[must_use]
    pub fn with_base_tags(base_tags: BTreeSet<StyleTag>) -> Self {
        Self { base_tags }
    }

    /// Apply a stage descriptor to the surface.
    ///
    /// The container's dynamic tags are fully replaced with the base set
    /// union the descriptor's tags; previous stage tags never accumulate.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, descriptor: &StageDescriptor) {
        surface.set_name(&descriptor.display_name());
        surface.set_stage_label(&descriptor.label);
        surface.set_image(&descriptor.image_ref);

        let mut tags = self.base_tags.clone();
        tags.extend(descriptor.style_tags.iter().cloned());
        surface.replace_container_tags(&tags);
    }

    /// Switch trigger/status messaging between ready and max-level states.
    ///
    /// The non-terminal branch only restores the trigger label; it leaves
    /// the status line to the controller.
    pub fn set_terminal_messaging<S: Surface + ?Sized>(&self, surface: &mut S, is_terminal: bool) {
        if is_terminal {
            surface.set_trigger_label(TRIGGER_MAXED_LABEL);
            surface.set_status(STATUS_QUEST_OVER);
        } else {
            surface.set_trigger_label(TRIGGER_READY_LABEL);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
