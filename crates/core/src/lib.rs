//! # U-Cutlist Core
//!
//! Core types for nesting rectangular cabinet parts onto stock panels.
//!
//! This crate holds everything that surrounds the packing algorithm itself,
//! which lives in `u-cutlist-guillotine`.
//!
//! ## Core Components
//!
//! - **Geometry resolver**: [`resolve_cut_dimensions`], [`EdgeBanding`] - nominal size to saw size
//! - **Piece pool**: [`build_pool`], [`PieceDefinition`], [`CutPiece`] - module list to ordered cut list
//! - **Boards**: [`BoardTemplate`] - stock sheet with kerf and edge trim
//! - **Results**: [`NestingResult`], [`BoardLayout`], [`Placement`]
//! - **Reporting**: [`summarize`], [`UtilizationReport`]
//! - **Nester trait**: [`Nester`] - common interface for packing engines
//!
//! ## Pipeline
//!
//! | Step | Input | Output |
//! |------|-------|--------|
//! | Resolve | nominal size + banding | cut size (0.1 mm) |
//! | Pool | module piece definitions | [`CutPiece`]s, largest first |
//! | Pack | pieces + board template | [`NestingResult`] |
//! | Report | nesting result | [`UtilizationReport`] |
//!
//! ```rust
//! use u_cutlist_core::{build_pool, EdgeBanding, PieceDefinition};
//!
//! let defs = vec![
//!     PieceDefinition::new("base-600", "side", 720.0, 560.0)
//!         .with_edges(EdgeBanding::new(1.0, 0.0, 0.0, 0.0))
//!         .with_quantity(2),
//! ];
//! let pool = build_pool(&defs);
//! assert_eq!(pool.pieces.len(), 2);
//! assert_eq!(pool.pieces[0].height(), 559.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialization/deserialization of all data types

pub mod board;
pub mod error;
pub mod geometry;
pub mod piece;
pub mod placement;
pub mod report;
pub mod result;
pub mod solver;

// Re-exports
pub use board::BoardTemplate;
pub use error::{Error, Result};
pub use geometry::{resolve_cut_dimensions, round_to_tenth, CutDimensions, EdgeBanding, Rect, EPSILON};
pub use piece::{build_pool, CutPiece, Grain, PieceDefinition, PieceId, PiecePool, RejectedPiece};
pub use placement::{find_overlap, Placement};
pub use report::{summarize, summarize_all, BoardUtilization, UtilizationReport};
pub use result::{BoardLayout, NestingResult, UnplacedPiece, UnplacedReason};
pub use solver::{BoardSelection, NestConfig, Nester, ProgressCallback, ProgressInfo};
