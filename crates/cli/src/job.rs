//! Nesting job files and their execution.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use u_cutlist_core::{
    build_pool, BoardTemplate, NestConfig, PieceDefinition, RejectedPiece, UtilizationReport,
};
use u_cutlist_guillotine::{BatchResult, GuillotineNester};

/// A nesting job as read from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestingJob {
    /// One board template per material.
    pub boards: Vec<BoardTemplate>,
    /// Module piece list.
    pub pieces: Vec<PieceDefinition>,
    /// Engine configuration.
    #[serde(default)]
    pub config: NestConfig,
}

impl NestingJob {
    /// Loads a job from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        let job: NestingJob = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse job file {}", path.display()))?;
        log::debug!(
            "Loaded job {}: {} board template(s), {} piece definition(s)",
            path.display(),
            job.boards.len(),
            job.pieces.len()
        );
        Ok(job)
    }

    /// Overrides the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    /// Builds the pool, packs every material and summarizes the result.
    pub fn run(&self) -> Result<NestOutput> {
        let nester = GuillotineNester::new(self.config.clone());
        let batch = nester
            .nest(&self.pieces, &self.boards)
            .context("Nesting failed")?;
        Ok(NestOutput::from_batch(batch))
    }

    /// Validates boards and resolves every piece without packing.
    pub fn check(&self) -> Result<CheckReport> {
        self.config.validate().context("Invalid configuration")?;
        for board in &self.boards {
            board
                .validate()
                .with_context(|| format!("Invalid board for material '{}'", board.material))?;
        }

        let pool = build_pool(&self.pieces);
        let mut missing: Vec<String> = pool
            .pieces
            .iter()
            .map(|p| p.material().to_string())
            .filter(|m| !self.boards.iter().any(|b| &b.material == m))
            .collect();
        missing.sort();
        missing.dedup();

        Ok(CheckReport {
            piece_count: pool.len(),
            total_area: pool.total_area(),
            rejected: pool.rejected,
            missing_materials: missing,
        })
    }
}

/// Everything written by `cutlist nest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestOutput {
    /// Aggregate utilization over all materials.
    pub report: UtilizationReport,
    /// Layouts per material.
    pub batch: BatchResult,
}

impl NestOutput {
    /// Summarizes a batch result.
    pub fn from_batch(batch: BatchResult) -> Self {
        Self {
            report: batch.report(),
            batch,
        }
    }
}

/// Outcome of `cutlist check`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Pieces that would be nested.
    pub piece_count: usize,
    /// Their total cut area.
    pub total_area: f64,
    /// Definitions whose geometry could not be resolved.
    pub rejected: Vec<RejectedPiece>,
    /// Materials used by pieces but without a board template.
    pub missing_materials: Vec<String>,
}

impl CheckReport {
    /// Returns true if every piece resolved and has a board.
    pub fn is_ok(&self) -> bool {
        self.rejected.is_empty() && self.missing_materials.is_empty()
    }
}
