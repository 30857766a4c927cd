//! # Stage Catalog
//!
//! The immutable ordered ladder of evolution stages.
//!
//! A catalog is fixed at construction and never mutated. Index 0 is the
//! initial stage; index `len - 1` is terminal. The engine reads the catalog
//! through `get` and `is_terminal`; nothing else ever inspects it.

use crate::primitives::MIN_CATALOG_LEN;
use crate::types::{MetamorphError, StageDescriptor, StyleTag};
use std::collections::BTreeSet;

/// Ordered, immutable sequence of stage descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalog {
    stages: Vec<StageDescriptor>,
}

impl StageCatalog {
    /// Build a catalog from a descriptor list, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogTooSmall` for fewer than [`MIN_CATALOG_LEN`] stages
    /// and `EmptyStyleTags` if any stage carries no presentation tokens.
    pub fn new(stages: Vec<StageDescriptor>) -> Result<Self, MetamorphError> {
        if stages.len() < MIN_CATALOG_LEN {
            return Err(MetamorphError::CatalogTooSmall {
                min: MIN_CATALOG_LEN,
                got: stages.len(),
            });
        }
        for stage in &stages {
            if stage.style_tags.is_empty() {
                return Err(MetamorphError::EmptyStyleTags(stage.name.clone()));
            }
        }
        Ok(Self { stages })
    }

    /// The built-in six-stage sequence.
    #[must_use]
    pub fn builtin() -> Self {
        // Static data is known-valid; constructed directly so that the
        // built-in path cannot fail.
        Self {
            stages: vec![
                builtin_stage(
                    "Botamon",
                    "Bebé I",
                    "🥚",
                    &["ring-indigo-400", "bg-indigo-900/20"],
                    "https://placehold.co/180x180/6366f1/white?text=Botamon",
                ),
                builtin_stage(
                    "Koromon",
                    "Bebé II",
                    "✨",
                    &["ring-purple-500", "bg-purple-900/30"],
                    "https://placehold.co/180x180/a855f7/white?text=Koromon",
                ),
                builtin_stage(
                    "Agumon",
                    "Principiante",
                    "🦖",
                    &["ring-red-600", "bg-red-900/30"],
                    "https://placehold.co/180x180/f87171/white?text=Agumon",
                ),
                builtin_stage(
                    "Greymon",
                    "Campeón",
                    "🔥",
                    &["ring-yellow-500", "bg-yellow-900/50"],
                    "https://placehold.co/180x180/facc15/black?text=Greymon",
                ),
                builtin_stage(
                    "MetalGreymon",
                    "Definitivo",
                    "⚙️",
                    &["ring-sky-500", "bg-sky-900/50"],
                    "https://placehold.co/180x180/0ea5e9/white?text=MetalGreymon",
                ),
                builtin_stage(
                    "WarGreymon",
                    "Mega",
                    "🛡️",
                    &["ring-amber-500", "bg-amber-900/60"],
                    "https://placehold.co/180x180/f59e0b/white?text=WarGreymon",
                ),
            ],
        }
    }

    /// Get the descriptor at `index`.
    ///
    /// # Errors
    ///
    /// Returns `StageOutOfRange` for indices outside `[0, len - 1]`. Given
    /// the controller's guards this should never fire; if it does, it is a
    /// programming defect and must be surfaced, not clamped.
    pub fn get(&self, index: usize) -> Result<&StageDescriptor, MetamorphError> {
        self.stages
            .get(index)
            .ok_or(MetamorphError::StageOutOfRange {
                index,
                len: self.stages.len(),
            })
    }

    /// Number of stages in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the catalog is empty. Never true for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// True iff `index` is the last stage in the sequence.
    #[must_use]
    pub fn is_terminal(&self, index: usize) -> bool {
        index.saturating_add(1) == self.stages.len()
    }

    /// Index of the terminal stage.
    #[must_use]
    pub fn terminal_index(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// Iterate the stages in order.
    pub fn iter(&self) -> impl Iterator<Item = &StageDescriptor> {
        self.stages.iter()
    }
}

fn builtin_stage(
    name: &str,
    label: &str,
    icon: &str,
    tags: &[&str],
    image: &str,
) -> StageDescriptor {
    let style_tags: BTreeSet<StyleTag> = tags.iter().copied().map(StyleTag::new).collect();
    StageDescriptor::new(name, label, icon, style_tags, image)
}

// =============================================================================
// TESTS
// =============================================================================
