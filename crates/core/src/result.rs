//! Nesting result representation.

use crate::board::BoardTemplate;
use crate::geometry::Rect;
use crate::piece::{CutPiece, PieceId, RejectedPiece};
use crate::placement::Placement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One board instance with its placements and leftover free space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardLayout {
    /// Position of the board in the result (0-based, in opening order).
    pub index: usize,
    /// Pieces placed on this board, in placement order.
    pub placements: Vec<Placement>,
    /// Free rectangles left after the last placement.
    pub free_rects: Vec<Rect>,
}

impl BoardLayout {
    /// Creates an empty layout.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            placements: Vec::new(),
            free_rects: Vec::new(),
        }
    }

    /// Kerf-inclusive area consumed by placements.
    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(Placement::occupied_area).sum()
    }

    /// Largest leftover free rectangle, if any.
    pub fn largest_free_rect(&self) -> Option<Rect> {
        self.free_rects
            .iter()
            .copied()
            .fold(None, |best: Option<Rect>, r| match best {
                Some(b) if b.area() >= r.area() => Some(b),
                _ => Some(r),
            })
    }
}

/// Why a piece could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnplacedReason {
    /// Larger than an empty board in every allowed orientation.
    TooLarge,
    /// Would need a new board but the configured board limit was reached.
    BoardLimit,
}

/// A valid piece that did not receive a placement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnplacedPiece {
    /// The piece.
    pub piece: CutPiece,
    /// Why it was not placed.
    pub reason: UnplacedReason,
}

/// Result of nesting one material group onto boards of one template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestingResult {
    /// Board template every board instance was cut from.
    pub board: BoardTemplate,
    /// Boards used, in opening order.
    pub boards: Vec<BoardLayout>,
    /// Pieces that could not be placed.
    pub unplaced: Vec<UnplacedPiece>,
    /// Pieces rejected before packing (invalid geometry).
    pub rejected: Vec<RejectedPiece>,
    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl NestingResult {
    /// Creates an empty result for the given template.
    pub fn new(board: BoardTemplate) -> Self {
        Self {
            board,
            boards: Vec::new(),
            unplaced: Vec::new(),
            rejected: Vec::new(),
            computation_time_ms: 0,
        }
    }

    /// Material the result was packed for.
    pub fn material(&self) -> &str {
        &self.board.material
    }

    /// Number of board instances used.
    pub fn boards_used(&self) -> usize {
        self.boards.len()
    }

    /// Iterates over every placement, board by board.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.boards.iter().flat_map(|b| b.placements.iter())
    }

    /// Number of placed pieces.
    pub fn placed_count(&self) -> usize {
        self.boards.iter().map(|b| b.placements.len()).sum()
    }

    /// Number of unplaced pieces.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Returns true if every piece handed to the engine was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty() && self.rejected.is_empty()
    }

    /// Ids of the unplaced pieces, in processing order.
    pub fn unplaced_ids(&self) -> Vec<PieceId> {
        self.unplaced.iter().map(|u| u.piece.id().clone()).collect()
    }

    /// Looks up the placement of a piece.
    pub fn placement_of(&self, piece_id: &str) -> Option<&Placement> {
        self.placements().find(|p| p.piece_id == piece_id)
    }
}
