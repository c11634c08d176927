//! Material utilization reporting.
//!
//! Efficiency follows the shop convention of charging every piece its full
//! kerf allowance: `used = sum((w + kerf) * (h + kerf))`. Kerf lines shared by
//! neighbouring pieces are therefore counted twice, so `efficiency` slightly
//! overstates true board usage. `net_efficiency` (cut area only) is reported
//! next to it so the two can be compared.

use crate::geometry::Rect;
use crate::piece::PieceId;
use crate::result::NestingResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Utilization figures for one board instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardUtilization {
    /// Board index within the result.
    pub index: usize,
    /// Material of the board.
    pub material: String,
    /// Number of pieces on the board.
    pub piece_count: usize,
    /// Full board area.
    pub board_area: f64,
    /// Kerf-inclusive area of the placements.
    pub used_area: f64,
    /// Cut area of the placements, without kerf.
    pub net_area: f64,
    /// `board_area - used_area`.
    pub offcut_area: f64,
    /// `used_area / board_area`.
    pub efficiency: f64,
    /// `net_area / board_area`.
    pub net_efficiency: f64,
    /// Largest leftover free rectangle.
    pub largest_offcut: Option<Rect>,
}

/// Aggregate utilization of one or more nesting results.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilizationReport {
    /// Per-board figures, in result order.
    pub boards: Vec<BoardUtilization>,
    /// Total number of boards used.
    pub boards_used: usize,
    /// Total number of placed pieces.
    pub placed_count: usize,
    /// Sum of board areas.
    pub total_board_area: f64,
    /// Sum of kerf-inclusive used areas.
    pub total_used_area: f64,
    /// Sum of cut areas.
    pub total_net_area: f64,
    /// Sum of offcut areas.
    pub total_offcut_area: f64,
    /// Board-area weighted efficiency (`total_used_area / total_board_area`).
    pub efficiency: f64,
    /// Board-area weighted net efficiency.
    pub net_efficiency: f64,
    /// Number of unplaced pieces.
    pub unplaced_count: usize,
    /// Ids of unplaced pieces.
    pub unplaced_ids: Vec<PieceId>,
    /// Number of parts lost to rejected definitions.
    pub rejected_count: usize,
}

impl UtilizationReport {
    /// Efficiency as a percentage string, e.g. `"50.9%"`.
    pub fn efficiency_percent(&self) -> String {
        format!("{:.1}%", self.efficiency * 100.0)
    }

    /// Returns true if nothing was left unplaced or rejected.
    pub fn is_complete(&self) -> bool {
        self.unplaced_count == 0 && self.rejected_count == 0
    }

    fn finalize(&mut self) {
        if self.total_board_area > 0.0 {
            self.efficiency = self.total_used_area / self.total_board_area;
            self.net_efficiency = self.total_net_area / self.total_board_area;
        } else {
            self.efficiency = 0.0;
            self.net_efficiency = 0.0;
        }
    }

    fn absorb(&mut self, result: &NestingResult) {
        let board_area = result.board.area();

        for layout in &result.boards {
            let used_area = layout.used_area();
            let net_area: f64 = layout.placements.iter().map(|p| p.net_area()).sum();
            let (efficiency, net_efficiency) = if board_area > 0.0 {
                (used_area / board_area, net_area / board_area)
            } else {
                (0.0, 0.0)
            };

            self.boards.push(BoardUtilization {
                index: layout.index,
                material: result.board.material.clone(),
                piece_count: layout.placements.len(),
                board_area,
                used_area,
                net_area,
                offcut_area: board_area - used_area,
                efficiency,
                net_efficiency,
                largest_offcut: layout.largest_free_rect(),
            });

            self.placed_count += layout.placements.len();
            self.total_board_area += board_area;
            self.total_used_area += used_area;
            self.total_net_area += net_area;
            self.total_offcut_area += board_area - used_area;
        }

        self.boards_used += result.boards.len();
        self.unplaced_count += result.unplaced.len();
        self.unplaced_ids.extend(result.unplaced_ids());
        self.rejected_count += result.rejected.iter().map(|r| r.quantity).sum::<usize>();
    }
}

/// Computes per-board and aggregate utilization for one nesting result.
///
/// Read-only: the result is not modified.
pub fn summarize(result: &NestingResult) -> UtilizationReport {
    summarize_all(std::slice::from_ref(result))
}

/// Aggregates utilization over several results (e.g. one per material).
pub fn summarize_all(results: &[NestingResult]) -> UtilizationReport {
    let mut report = UtilizationReport::default();
    for result in results {
        report.absorb(result);
    }
    report.finalize();
    report
}
