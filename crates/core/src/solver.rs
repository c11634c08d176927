//! Nesting configuration, progress reporting and the nester trait.

use crate::board::BoardTemplate;
use crate::piece::CutPiece;
use crate::result::NestingResult;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which open boards are searched before a new board is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoardSelection {
    /// Only the most recently opened board.
    #[default]
    CurrentOnly,
    /// Best fit over every open board (ties go to the lower board index).
    AllOpen,
}

/// Common configuration for nesting runs.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NestConfig {
    /// Board search policy.
    pub board_selection: BoardSelection,

    /// Maximum boards per material group (`None` = unlimited).
    pub max_boards: Option<usize>,

    /// Worker threads for batch runs (0 = rayon's global pool).
    pub threads: usize,
}

impl NestConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the board search policy.
    pub fn with_board_selection(mut self, selection: BoardSelection) -> Self {
        self.board_selection = selection;
        self
    }

    /// Limits the number of boards per material group.
    pub fn with_max_boards(mut self, max_boards: usize) -> Self {
        self.max_boards = Some(max_boards);
        self
    }

    /// Sets the number of worker threads for batch runs.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_boards == Some(0) {
            return Err(Error::InvalidConfig(
                "max_boards must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Progress callback invoked after every processed piece.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during a nesting run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressInfo {
    /// Material group being packed.
    pub material: String,
    /// Pieces processed so far (placed or not).
    pub items_processed: usize,
    /// Pieces in the run.
    pub total_items: usize,
    /// Boards opened so far.
    pub boards_used: usize,
    /// Current phase description.
    pub phase: String,
    /// Whether the run is still going.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a running progress record.
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            running: true,
            ..Default::default()
        }
    }

    /// Sets the processed/total counts.
    pub fn with_items(mut self, processed: usize, total: usize) -> Self {
        self.items_processed = processed;
        self.total_items = total;
        self
    }

    /// Sets the number of boards opened.
    pub fn with_boards(mut self, boards: usize) -> Self {
        self.boards_used = boards;
        self
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the run as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Fraction of pieces processed (0.0 to 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.total_items > 0 {
            self.items_processed as f64 / self.total_items as f64
        } else {
            0.0
        }
    }
}

/// A rectangle nesting engine.
pub trait Nester {
    /// Packs `pieces`, in the given order, onto boards cut from `board`.
    fn pack(&self, pieces: &[CutPiece], board: &BoardTemplate) -> Result<NestingResult>;

    /// Same as [`Nester::pack`], reporting progress after every piece.
    fn pack_with_progress(
        &self,
        pieces: &[CutPiece],
        board: &BoardTemplate,
        callback: ProgressCallback,
    ) -> Result<NestingResult>;

    /// Requests cancellation of the running pack operation.
    fn cancel(&self);
}
