//! # Core Type Definitions
//!
//! This module contains the value types for the Metamorph evolution engine:
//! - Stage descriptors and presentation tokens (`StageDescriptor`, `StyleTag`)
//! - Operation outcomes (`AdvanceOutcome`)
//! - Error types (`MetamorphError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they participate in `BTreeSet` collections
//! - Are plain values; all mutation happens in `session`

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

// =============================================================================
// STYLE TAGS
// =============================================================================

/// An opaque presentation token attached to the container or image surface.
///
/// The engine never interprets tag contents; it only adds, removes, and
/// replaces them. The surface decides what (if anything) a tag looks like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleTag(pub String);

impl StyleTag {
    /// Create a new style tag from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StyleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// STAGE DESCRIPTOR
// =============================================================================

/// One entry in the evolution sequence.
///
/// Descriptors are immutable value types. All visual state shown by the
/// widget is a pure function of the current descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Display name ("Agumon").
    pub name: String,
    /// Stage label ("Principiante").
    pub label: String,
    /// Single-grapheme icon shown next to the name.
    pub icon: String,
    /// Presentation tokens applied to the container while this stage is
    /// current. Non-empty; enforced at catalog construction.
    /// Uses BTreeSet for deterministic ordering.
    pub style_tags: BTreeSet<StyleTag>,
    /// Resource locator for the stage image.
    pub image_ref: String,
}

impl StageDescriptor {
    /// Create a new stage descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        style_tags: BTreeSet<StyleTag>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            icon: icon.into(),
            style_tags,
            image_ref: image_ref.into(),
        }
    }

    /// The name with its icon appended, as shown on the surface.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.icon)
    }
}

// =============================================================================
// ADVANCE OUTCOME
// =============================================================================

/// Result of one `advance()` invocation on the controller.
///
/// The two guarded paths are not errors; they are ordinary outcomes that
/// the trigger loop inspects to decide whether to keep accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
    /// The session moved to a new stage.
    Advanced {
        /// The new current index.
        index: usize,
        /// True when the new stage is the last one in the catalog.
        terminal: bool,
    },
    /// A transition was already in flight; the call was a complete no-op.
    AlreadyTransitioning,
    /// The session was already at the terminal stage; the trigger is now
    /// permanently disabled.
    FinalStageReached,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Metamorph engine.
///
/// Out-of-range access is a programming defect surfaced loudly, never
/// clamped. Catalog and configuration failures are startup-time errors.
#[derive(Debug, Error)]
pub enum MetamorphError {
    /// A stage index outside the catalog bounds was requested.
    #[error("Stage index {index} out of range (catalog has {len} stages)")]
    StageOutOfRange {
        /// The offending index.
        index: usize,
        /// The catalog length at the time of the access.
        len: usize,
    },

    /// The catalog has fewer stages than the required minimum.
    #[error("Catalog needs at least {min} stages, got {got}")]
    CatalogTooSmall {
        /// Required minimum length.
        min: usize,
        /// Actual length supplied.
        got: usize,
    },

    /// A stage descriptor carried an empty style-tag set.
    #[error("Stage '{0}' has an empty style-tag set")]
    EmptyStyleTags(String),

    /// A configuration source (catalog file, environment) was invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
