//! Placement of a cut piece on a board.

use crate::geometry::Rect;
use crate::piece::PieceId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of one piece on one board.
///
/// `width`/`height` are the cut dimensions as laid on the board, i.e. already
/// swapped when `rotated` is set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Index of the board within its nesting result (0-based).
    pub board_index: usize,
    /// Material of the board.
    pub board_id: String,
    /// Piece placed here.
    pub piece_id: PieceId,
    /// Left edge in board coordinates.
    pub x: f64,
    /// Top edge in board coordinates.
    pub y: f64,
    /// Cut width along the board x axis.
    pub width: f64,
    /// Cut height along the board y axis.
    pub height: f64,
    /// Whether the piece was turned 90 degrees.
    pub rotated: bool,
    /// Kerf reserved on the right and bottom of the piece.
    pub kerf: f64,
}

impl Placement {
    /// The piece itself, without kerf.
    pub fn cut_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Board area consumed by the piece: `[x, x+w+kerf) x [y, y+h+kerf)`.
    pub fn occupied_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width + self.kerf, self.height + self.kerf)
    }

    /// Kerf-inclusive area, the quantity efficiency is computed from.
    pub fn occupied_area(&self) -> f64 {
        (self.width + self.kerf) * (self.height + self.kerf)
    }

    /// Cut area without kerf.
    pub fn net_area(&self) -> f64 {
        self.width * self.height
    }
}

/// Returns the first pair of placements whose occupied rectangles overlap.
pub fn find_overlap(placements: &[Placement]) -> Option<(&Placement, &Placement)> {
    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.board_index == b.board_index && a.occupied_rect().intersects(&b.occupied_rect()) {
                return Some((a, b));
            }
        }
    }
    None
}
