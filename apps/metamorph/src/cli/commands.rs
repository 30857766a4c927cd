//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands, plus
//! the TOML catalog loader.

use crate::engine::{ConsoleCueEmitter, EvolutionController, TerminalSurface};
use metamorph_core::primitives::{CHARGE_DELAY_MS, PROGRESS_DURATION_MS, VANISH_DELAY_MS};
use metamorph_core::{AdvanceOutcome, MetamorphError, StageCatalog, StageDescriptor, StyleTag};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

// =============================================================================
// CATALOG FILE LOADING
// =============================================================================

/// Maximum size for a catalog file (1 MB).
///
/// A stage ladder is a handful of descriptors; anything larger is a
/// mistake, not a catalog.
const MAX_CATALOG_FILE_SIZE: u64 = 1024 * 1024;

/// On-disk catalog shape: a list of `[[stage]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "stage")]
    stages: Vec<StageEntry>,
}

/// One `[[stage]]` table.
#[derive(Debug, Deserialize)]
struct StageEntry {
    name: String,
    label: String,
    icon: String,
    style_tags: Vec<String>,
    image: String,
}

impl StageEntry {
    fn into_descriptor(self) -> StageDescriptor {
        StageDescriptor::new(
            self.name,
            self.label,
            self.icon,
            self.style_tags.into_iter().map(StyleTag::new).collect(),
            self.image,
        )
    }
}

/// Validate a catalog file path before reading.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is
/// a regular file of sane size.
fn validate_catalog_path(path: &Path) -> Result<PathBuf, MetamorphError> {
    let canonical = path.canonicalize().map_err(|e| {
        MetamorphError::IoError(format!("Invalid catalog path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(MetamorphError::IoError(format!(
            "Catalog path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| MetamorphError::IoError(format!("Cannot read catalog metadata: {}", e)))?;
    if metadata.len() > MAX_CATALOG_FILE_SIZE {
        return Err(MetamorphError::ConfigError(format!(
            "Catalog file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_CATALOG_FILE_SIZE
        )));
    }

    Ok(canonical)
}

/// Load the stage catalog: the built-in ladder, or a TOML file.
pub fn load_catalog(path: Option<&Path>) -> Result<StageCatalog, MetamorphError> {
    let Some(path) = path else {
        return Ok(StageCatalog::builtin());
    };

    let validated = validate_catalog_path(path)?;
    tracing::info!("loading stage catalog from {:?}", validated);

    let contents = std::fs::read_to_string(&validated)
        .map_err(|e| MetamorphError::IoError(format!("Read catalog: {}", e)))?;

    let file: CatalogFile = toml::from_str(&contents)
        .map_err(|e| MetamorphError::ConfigError(format!("Parse catalog: {}", e)))?;

    let stages: Vec<StageDescriptor> = file
        .stages
        .into_iter()
        .map(StageEntry::into_descriptor)
        .collect();

    StageCatalog::new(stages)
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Start the evolution widget.
pub async fn cmd_run(catalog: StageCatalog, auto: bool) -> Result<(), MetamorphError> {
    let surface = TerminalSurface::new();
    let audio = ConsoleCueEmitter::from_env();
    let controller = EvolutionController::new(catalog, surface, audio);

    controller.initialize().await?;

    if auto {
        run_auto(&controller).await
    } else {
        run_interactive(&controller).await
    }
}

/// Drive every remaining transition back to back.
async fn run_auto(
    controller: &EvolutionController<TerminalSurface, ConsoleCueEmitter>,
) -> Result<(), MetamorphError> {
    loop {
        match controller.advance().await? {
            AdvanceOutcome::Advanced { terminal: true, .. }
            | AdvanceOutcome::FinalStageReached => break,
            AdvanceOutcome::Advanced { .. } | AdvanceOutcome::AlreadyTransitioning => {}
        }
    }
    Ok(())
}

/// Read trigger pulls from stdin until the ladder tops out.
async fn run_interactive(
    controller: &EvolutionController<TerminalSurface, ConsoleCueEmitter>,
) -> Result<(), MetamorphError> {
    println!();
    println!("  Press Enter to evolve, 'q' + Enter to quit.");

    let surface = controller.surface();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line
                    .map_err(|e| MetamorphError::IoError(format!("Read trigger: {}", e)))?;
                let Some(line) = line else {
                    break;
                };
                if line.trim().eq_ignore_ascii_case("q") {
                    break;
                }
                if !surface.lock().await.trigger_enabled() {
                    tracing::debug!("trigger pull ignored: control disarmed");
                    continue;
                }
                match controller.advance().await? {
                    AdvanceOutcome::Advanced { terminal: true, .. }
                    | AdvanceOutcome::FinalStageReached => break,
                    AdvanceOutcome::Advanced { .. }
                    | AdvanceOutcome::AlreadyTransitioning => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    tracing::info!(
        final_stage = controller.current_index().await,
        stage_count = controller.catalog().len(),
        "evolution session ended"
    );
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalog and timing summary.
pub fn cmd_status(catalog: &StageCatalog, json_mode: bool) -> Result<(), MetamorphError> {
    let initial = catalog.get(0)?;
    let terminal = catalog.get(catalog.terminal_index())?;

    if json_mode {
        let output = serde_json::json!({
            "stage_count": catalog.len(),
            "initial_stage": initial.name,
            "terminal_stage": terminal.name,
            "charge_delay_ms": CHARGE_DELAY_MS,
            "vanish_delay_ms": VANISH_DELAY_MS,
            "progress_duration_ms": PROGRESS_DURATION_MS,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Metamorph Widget Status");
    println!("=======================");
    println!();
    println!("Stages:          {}", catalog.len());
    println!("Initial stage:   {}", initial.display_name());
    println!("Terminal stage:  {}", terminal.display_name());
    println!();
    println!("Charge delay:    {} ms", CHARGE_DELAY_MS);
    println!("Vanish delay:    {} ms", VANISH_DELAY_MS);
    println!("Progress bar:    {} ms (pacing, deliberately longer)", PROGRESS_DURATION_MS);

    Ok(())
}

// =============================================================================
// CATALOG COMMAND
// =============================================================================

/// List the stage sequence.
pub fn cmd_catalog(catalog: &StageCatalog, json_mode: bool) -> Result<(), MetamorphError> {
    if json_mode {
        let stages: Vec<serde_json::Value> = catalog
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                serde_json::json!({
                    "index": index,
                    "name": stage.name,
                    "label": stage.label,
                    "icon": stage.icon,
                    "terminal": catalog.is_terminal(index),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&stages).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Evolution Ladder");
    println!("================");
    for (index, stage) in catalog.iter().enumerate() {
        let marker = if catalog.is_terminal(index) {
            " (terminal)"
        } else {
            ""
        };
        println!(
            "  {}. {} — {}{}",
            index,
            stage.display_name(),
            stage.label,
            marker
        );
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
