//! # U-Cutlist Guillotine
//!
//! Guillotine-cut nesting of rectangular panel parts onto stock boards.
//!
//! Every board keeps a set of free rectangles. Pieces are taken in the order
//! delivered by the piece pool (largest area first) and dropped into the free
//! rectangle that leaves the least area behind (best-area-fit, ties by
//! leftover width, then `y`, then `x`). The used corner is split off by one
//! straight cut, so every layout can be cut on a panel saw.
//!
//! ## Quick Start
//!
//! ```rust
//! use u_cutlist_guillotine::{build_pool, summarize, BoardTemplate, GuillotineNester, PieceDefinition};
//!
//! let defs = vec![PieceDefinition::new("wall-800", "shelf", 500.0, 300.0).with_quantity(10)];
//! let pool = build_pool(&defs);
//!
//! let board = BoardTemplate::new("", 1220.0, 2440.0).with_kerf(2.0);
//! let nester = GuillotineNester::default_config();
//! let result = nester.pack_pool(&pool, &board).unwrap();
//!
//! let report = summarize(&result);
//! assert_eq!(report.boards_used, 1);
//! println!("efficiency: {}", report.efficiency_percent());
//! ```
//!
//! ## Several materials
//!
//! [`GuillotineNester::pack_batch`] groups pieces by material and packs the
//! groups in parallel with rayon.

pub mod batch;
pub mod board;
pub mod free_rects;
pub mod nester;

// Re-exports
pub use batch::{group_by_material, BatchResult};
pub use board::BoardState;
pub use free_rects::{guillotine_split, Fit, FreeRectangles, SplitAxis};
pub use nester::{fits_empty_board, pack, GuillotineNester};
pub use u_cutlist_core::{
    build_pool, resolve_cut_dimensions, summarize, summarize_all, BoardLayout, BoardSelection,
    BoardTemplate, CutPiece, EdgeBanding, Error, Grain, NestConfig, Nester, NestingResult,
    PieceDefinition, PiecePool, Placement, ProgressCallback, ProgressInfo, Rect, RejectedPiece,
    Result, UnplacedPiece, UnplacedReason, UtilizationReport,
};
