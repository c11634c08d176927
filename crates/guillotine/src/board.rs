//! Packing state of a single board instance.

use u_cutlist_core::{BoardLayout, BoardTemplate, CutPiece, Placement};

use crate::free_rects::{Fit, FreeRectangles};

/// One open board: its free space and the pieces placed so far.
#[derive(Debug, Clone)]
pub struct BoardState {
    index: usize,
    material: String,
    kerf: f64,
    free: FreeRectangles,
    placements: Vec<Placement>,
}

impl BoardState {
    /// Opens a fresh board from `template`.
    pub fn new(index: usize, template: &BoardTemplate) -> Self {
        Self {
            index,
            material: template.material.clone(),
            kerf: template.kerf,
            free: FreeRectangles::new(template.usable_rect()),
            placements: Vec::new(),
        }
    }

    /// Board index within the run.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Placements made so far.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Current free space.
    pub fn free(&self) -> &FreeRectangles {
        &self.free
    }

    /// Best position for `piece` on this board, if it fits anywhere.
    pub fn find_fit(&self, piece: &CutPiece) -> Option<Fit> {
        self.free.find_best(
            piece.width(),
            piece.height(),
            piece.allow_rotation() && !piece.is_square(),
            self.kerf,
        )
    }

    /// Places `piece` at `fit`, which must come from [`BoardState::find_fit`]
    /// on this board with no placement in between.
    pub fn place(&mut self, piece: &CutPiece, fit: &Fit) -> &Placement {
        let occupied = self.free.place(fit, self.kerf);
        log::trace!(
            "Board {} ({}): {} occupies ({:.1}, {:.1}) {:.1}x{:.1}{}, {} free rect(s) left",
            self.index,
            self.material,
            piece.id(),
            occupied.x,
            occupied.y,
            occupied.width,
            occupied.height,
            if fit.rotated { " rotated" } else { "" },
            self.free.len()
        );

        self.placements.push(Placement {
            board_index: self.index,
            board_id: self.material.clone(),
            piece_id: piece.id().clone(),
            x: fit.x,
            y: fit.y,
            width: fit.width,
            height: fit.height,
            rotated: fit.rotated,
            kerf: self.kerf,
        });
        &self.placements[self.placements.len() - 1]
    }

    /// Finishes the board, keeping placements and leftover free rectangles.
    pub fn into_layout(self) -> BoardLayout {
        BoardLayout {
            index: self.index,
            placements: self.placements,
            free_rects: self.free.into_rects(),
        }
    }
}
