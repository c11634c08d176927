//! Error types for U-Cutlist.

use thiserror::Error;

/// Errors raised while resolving, pooling or nesting panel pieces.
///
/// Per-piece problems are normally collected into the result (see
/// [`RejectedPiece`](crate::piece::RejectedPiece) and
/// [`UnplacedPiece`](crate::result::UnplacedPiece)); only configuration
/// errors and cancellation abort a whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Piece dimensions are not usable (banding consumes the piece, zero quantity, ...).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Board template cannot hold anything (non-positive size, negative kerf, ...).
    #[error("invalid board template: {0}")]
    InvalidBoardTemplate(String),

    /// Nesting configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The run was cancelled between two placements; partial results are discarded.
    #[error("nesting run cancelled")]
    Cancelled,

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if this error aborts a whole nesting run rather than a single piece.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidGeometry(_))
    }
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
