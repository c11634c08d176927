//! Parallel nesting of several material groups.
//!
//! Pieces of different materials never share a board, so every group is an
//! independent run with its own boards and free rectangles. Groups are
//! packed on rayon workers and returned in material-name order.

use std::collections::BTreeMap;

use rayon::prelude::*;
use u_cutlist_core::{
    build_pool, summarize_all, BoardTemplate, CutPiece, Error, NestingResult, PieceDefinition,
    PiecePool, RejectedPiece, Result, UtilizationReport,
};

use crate::nester::GuillotineNester;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Results of a multi-material nesting run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchResult {
    /// One result per material that had both pieces and a board template.
    pub results: Vec<NestingResult>,
    /// Rejections that belong to no packed material: pieces without a board
    /// template and invalid definitions of such materials. Rejections of a
    /// packed material are reported in that material's result.
    pub rejected: Vec<RejectedPiece>,
}

impl BatchResult {
    /// Result for a material, if it was packed.
    pub fn result_for(&self, material: &str) -> Option<&NestingResult> {
        self.results.iter().find(|r| r.material() == material)
    }

    /// Total boards used over all materials.
    pub fn boards_used(&self) -> usize {
        self.results.iter().map(NestingResult::boards_used).sum()
    }

    /// Total placed pieces over all materials.
    pub fn placed_count(&self) -> usize {
        self.results.iter().map(NestingResult::placed_count).sum()
    }

    /// Aggregate utilization, counting batch-level rejections as well.
    pub fn report(&self) -> UtilizationReport {
        let mut report = summarize_all(&self.results);
        report.rejected_count += self.rejected.iter().map(|r| r.quantity).sum::<usize>();
        report
    }
}

/// Splits pieces by material, keeping their relative order within each group.
pub fn group_by_material(pieces: &[CutPiece]) -> BTreeMap<String, Vec<CutPiece>> {
    let mut groups: BTreeMap<String, Vec<CutPiece>> = BTreeMap::new();
    for piece in pieces {
        groups
            .entry(piece.material().to_string())
            .or_default()
            .push(piece.clone());
    }
    groups
}

impl GuillotineNester {
    /// Packs every material group of `pool` onto its board template.
    ///
    /// All templates are validated first; any invalid or duplicated template
    /// aborts the whole batch. Pieces whose material has no template are
    /// rejected. Pool rejections are moved into the result of their material
    /// when it was packed. Cancelling stops every group and returns
    /// [`Error::Cancelled`].
    pub fn pack_batch(&self, pool: &PiecePool, templates: &[BoardTemplate]) -> Result<BatchResult> {
        self.config().validate()?;
        validate_templates(templates)?;
        self.reset_cancel();

        let mut rejected = pool.rejected.clone();
        let mut jobs: Vec<(&BoardTemplate, Vec<CutPiece>)> = Vec::new();

        for (material, pieces) in group_by_material(&pool.pieces) {
            match templates.iter().find(|t| t.material == material) {
                Some(template) => jobs.push((template, pieces)),
                None => {
                    let err = Error::InvalidBoardTemplate(format!(
                        "no board template for material '{}'",
                        material
                    ));
                    log::warn!("{} piece(s) rejected: {}", pieces.len(), err);
                    rejected.extend(pieces.iter().map(|p| RejectedPiece::from_piece(p, &err)));
                }
            }
        }

        log::debug!(
            "Packing {} material group(s) with {} thread(s)",
            jobs.len(),
            if self.config().threads == 0 {
                rayon::current_num_threads()
            } else {
                self.config().threads
            }
        );

        let mut results = self.install(|| {
            jobs.par_iter()
                .map(|(template, pieces)| self.run(pieces, template, None))
                .collect::<Result<Vec<_>>>()
        })??;

        let mut unassigned = Vec::new();
        for reject in rejected {
            match results.iter_mut().find(|r| r.material() == reject.material) {
                Some(result) => result.rejected.push(reject),
                None => unassigned.push(reject),
            }
        }

        Ok(BatchResult {
            results,
            rejected: unassigned,
        })
    }

    /// Builds the piece pool from `definitions` and packs it with [`pack_batch`](Self::pack_batch).
    pub fn nest(
        &self,
        definitions: &[PieceDefinition],
        templates: &[BoardTemplate],
    ) -> Result<BatchResult> {
        let pool = build_pool(definitions);
        self.pack_batch(&pool, templates)
    }

    /// Runs `op` on a dedicated pool when a thread count is configured.
    fn install<T, F>(&self, op: F) -> Result<T>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        if self.config().threads == 0 {
            return Ok(op());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config().threads)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build thread pool: {}", e)))?;
        Ok(pool.install(op))
    }
}

fn validate_templates(templates: &[BoardTemplate]) -> Result<()> {
    for (i, template) in templates.iter().enumerate() {
        template.validate()?;
        if templates[..i].iter().any(|t| t.material == template.material) {
            return Err(Error::InvalidBoardTemplate(format!(
                "duplicate board template for material '{}'",
                template.material
            )));
        }
    }
    Ok(())
}
