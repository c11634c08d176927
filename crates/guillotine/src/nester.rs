//! Guillotine best-area-fit nester.

use u_cutlist_core::solver::{BoardSelection, NestConfig, Nester, ProgressCallback, ProgressInfo};
use u_cutlist_core::{
    BoardTemplate, CutPiece, Error, NestingResult, PiecePool, RejectedPiece, Result,
    UnplacedPiece, UnplacedReason,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::board::BoardState;
use crate::free_rects::Fit;

/// Guillotine free-rectangle nester.
///
/// Pieces are placed in the order given (the piece pool delivers them
/// largest first). Each piece goes to the free rectangle leaving the least
/// area behind. By default only the most recently opened board is searched;
/// when it cannot take the piece a new board is opened.
pub struct GuillotineNester {
    config: NestConfig,
    cancelled: Arc<AtomicBool>,
}

impl GuillotineNester {
    /// Creates a new nester with the given configuration.
    pub fn new(config: NestConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a nester with default configuration.
    pub fn default_config() -> Self {
        Self::new(NestConfig::default())
    }

    /// The nester's configuration.
    pub fn config(&self) -> &NestConfig {
        &self.config
    }

    /// Shared cancellation flag, for cancelling from another thread.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub(crate) fn reset_cancel(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Packs one material group. Does not reset the cancellation flag.
    pub(crate) fn run(
        &self,
        pieces: &[CutPiece],
        board: &BoardTemplate,
        progress: Option<&ProgressCallback>,
    ) -> Result<NestingResult> {
        board.validate()?;
        self.config.validate()?;

        let start = Instant::now();
        let mut result = NestingResult::new(board.clone());
        let mut boards: Vec<BoardState> = Vec::new();
        let total = pieces.len();

        for (processed, piece) in pieces.iter().enumerate() {
            if let Err(err) = piece.validate() {
                log::warn!("Rejected piece {}: {}", piece.id(), err);
                result.rejected.push(RejectedPiece::from_piece(piece, &err));
            } else if !fits_empty_board(piece, board) {
                log::warn!(
                    "Piece {} ({} x {}) does not fit a {} x {} board",
                    piece.id(),
                    piece.width(),
                    piece.height(),
                    board.width,
                    board.height
                );
                result.unplaced.push(UnplacedPiece {
                    piece: piece.clone(),
                    reason: UnplacedReason::TooLarge,
                });
            } else if let Some((board_idx, fit)) = self.select_board(&boards, piece) {
                boards[board_idx].place(piece, &fit);
            } else if self.config.max_boards.is_some_and(|max| boards.len() >= max) {
                log::warn!(
                    "Piece {} left unplaced: board limit of {} reached",
                    piece.id(),
                    boards.len()
                );
                result.unplaced.push(UnplacedPiece {
                    piece: piece.clone(),
                    reason: UnplacedReason::BoardLimit,
                });
            } else {
                let mut fresh = BoardState::new(boards.len(), board);
                log::debug!(
                    "Opening board {} ({}) for piece {}",
                    fresh.index(),
                    board.material,
                    piece.id()
                );
                let fit = fresh.find_fit(piece).ok_or_else(|| {
                    Error::Internal(format!(
                        "piece {} fits the board template but not a fresh board",
                        piece.id()
                    ))
                })?;
                fresh.place(piece, &fit);
                boards.push(fresh);
            }

            // Cooperative checkpoint: partial results are dropped on cancellation.
            if self.is_cancelled() {
                log::info!(
                    "Nesting of '{}' cancelled after {} of {} pieces",
                    board.material,
                    processed + 1,
                    total
                );
                return Err(Error::Cancelled);
            }

            if let Some(callback) = progress {
                callback(
                    ProgressInfo::new(board.material.clone())
                        .with_items(processed + 1, total)
                        .with_boards(boards.len())
                        .with_phase("placing"),
                );
            }
        }

        result.boards = boards.into_iter().map(BoardState::into_layout).collect();
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Nested '{}': {} placed on {} board(s), {} unplaced, {} rejected in {} ms",
            board.material,
            result.placed_count(),
            result.boards_used(),
            result.unplaced_count(),
            result.rejected.len(),
            result.computation_time_ms
        );

        if let Some(callback) = progress {
            callback(
                ProgressInfo::new(board.material.clone())
                    .with_items(total, total)
                    .with_boards(result.boards_used())
                    .with_phase("done")
                    .finished(),
            );
        }

        Ok(result)
    }

    /// Packs a whole piece pool, carrying its rejected definitions into the result.
    ///
    /// The pool is packed as one group; materials are not separated (see
    /// [`pack_batch`](Self::pack_batch) for that).
    pub fn pack_pool(&self, pool: &PiecePool, board: &BoardTemplate) -> Result<NestingResult> {
        self.reset_cancel();
        let mut result = self.run(&pool.pieces, board, None)?;
        result.rejected.splice(0..0, pool.rejected.iter().cloned());
        Ok(result)
    }

    /// Picks the open board and free rectangle for `piece`.
    fn select_board(&self, boards: &[BoardState], piece: &CutPiece) -> Option<(usize, Fit)> {
        match self.config.board_selection {
            BoardSelection::CurrentOnly => {
                let current = boards.last()?;
                current.find_fit(piece).map(|fit| (current.index(), fit))
            }
            BoardSelection::AllOpen => {
                let mut best: Option<(usize, Fit)> = None;
                for board in boards {
                    if let Some(fit) = board.find_fit(piece) {
                        if best.map_or(true, |(_, b)| fit.is_better_than(&b)) {
                            best = Some((board.index(), fit));
                        }
                    }
                }
                best
            }
        }
    }
}

/// Returns true if `piece` fits an empty board in at least one allowed orientation.
pub fn fits_empty_board(piece: &CutPiece, board: &BoardTemplate) -> bool {
    board.fits(piece.width(), piece.height())
        || (piece.allow_rotation() && board.fits(piece.height(), piece.width()))
}

/// Packs `pieces` onto `board` with the default configuration.
pub fn pack(pieces: &[CutPiece], board: &BoardTemplate) -> Result<NestingResult> {
    GuillotineNester::default_config().pack(pieces, board)
}

impl Nester for GuillotineNester {
    fn pack(&self, pieces: &[CutPiece], board: &BoardTemplate) -> Result<NestingResult> {
        self.reset_cancel();
        self.run(pieces, board, None)
    }

    fn pack_with_progress(
        &self,
        pieces: &[CutPiece],
        board: &BoardTemplate,
        callback: ProgressCallback,
    ) -> Result<NestingResult> {
        self.reset_cancel();
        self.run(pieces, board, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use u_cutlist_core::{build_pool, summarize, EdgeBanding, Grain, PieceDefinition};

    fn pieces(prefix: &str, n: usize, w: f64, h: f64) -> Vec<CutPiece> {
        (1..=n)
            .map(|i| CutPiece::new(format!("{}#{}", prefix, i), w, h))
            .collect()
    }

    #[test]
    fn test_single_piece_at_origin() {
        let board = BoardTemplate::new("mdf", 2750.0, 1830.0).with_kerf(3.0);
        let result = pack(&pieces("p", 1, 600.0, 400.0), &board).unwrap();

        assert_eq!(result.boards_used(), 1);
        let p = &result.boards[0].placements[0];
        assert_eq!((p.x, p.y), (0.0, 0.0));
        assert!(!p.rotated);
    }

    #[test]
    fn test_oversized_piece_unplaced() {
        let board = BoardTemplate::new("mdf", 2750.0, 1830.0).with_kerf(3.0);
        let result = pack(&pieces("big", 1, 3000.0, 400.0), &board).unwrap();

        assert_eq!(result.boards_used(), 0);
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(result.unplaced[0].reason, UnplacedReason::TooLarge);
    }

    #[test]
    fn test_oversized_does_not_stop_run() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let mut list = pieces("big", 1, 2000.0, 100.0);
        list.extend(pieces("ok", 2, 400.0, 400.0));
        let result = pack(&list, &board).unwrap();

        assert_eq!(result.placed_count(), 2);
        assert_eq!(result.unplaced_ids(), vec!["big#1".to_string()]);
    }

    #[test]
    fn test_opens_new_board_when_full() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let result = pack(&pieces("half", 3, 1000.0, 500.0), &board).unwrap();

        assert_eq!(result.boards_used(), 2);
        assert_eq!(result.boards[0].placements.len(), 2);
        assert_eq!(result.boards[1].placements.len(), 1);
        assert_eq!(result.boards[1].placements[0].board_index, 1);
    }

    #[test]
    fn test_all_open_fills_earlier_board() {
        // Second piece opens board 1; the small third piece still fits board 0.
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let mut list = pieces("a", 1, 1000.0, 700.0);
        list.extend(pieces("b", 1, 1000.0, 600.0));
        list.extend(pieces("c", 1, 1000.0, 300.0));

        let nester =
            GuillotineNester::new(NestConfig::new().with_board_selection(BoardSelection::AllOpen));
        let result = nester.pack(&list, &board).unwrap();
        assert_eq!(result.boards_used(), 2);
        assert_eq!(result.placement_of("c#1").unwrap().board_index, 0);
    }

    #[test]
    fn test_default_only_searches_current_board() {
        // Once board 1 is open, board 0 is no longer offered to later pieces.
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let mut list = pieces("a", 1, 1000.0, 700.0);
        list.extend(pieces("b", 1, 1000.0, 600.0));
        list.extend(pieces("c", 1, 1000.0, 300.0));

        let result = pack(&list, &board).unwrap();
        assert_eq!(result.boards_used(), 2);
        assert_eq!(result.placement_of("c#1").unwrap().board_index, 1);
    }

    #[test]
    fn test_current_only_ignores_earlier_board() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let mut list = pieces("a", 1, 1000.0, 700.0);
        list.extend(pieces("b", 1, 1000.0, 600.0));
        list.extend(pieces("c", 1, 1000.0, 300.0));

        let nester = GuillotineNester::new(
            NestConfig::new().with_board_selection(BoardSelection::CurrentOnly),
        );
        let result = nester.pack(&list, &board).unwrap();
        assert_eq!(result.placement_of("c#1").unwrap().board_index, 1);
    }

    #[test]
    fn test_max_boards_limit() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let nester = GuillotineNester::new(NestConfig::new().with_max_boards(1));
        let result = nester.pack(&pieces("half", 3, 1000.0, 500.0), &board).unwrap();

        assert_eq!(result.boards_used(), 1);
        assert_eq!(result.placed_count(), 2);
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(result.unplaced[0].reason, UnplacedReason::BoardLimit);
    }

    #[test]
    fn test_invalid_board_is_fatal() {
        let board = BoardTemplate::new("mdf", 1000.0, 0.0);
        let err = pack(&pieces("a", 1, 10.0, 10.0), &board).unwrap_err();
        assert!(matches!(err, Error::InvalidBoardTemplate(_)));

        let board = BoardTemplate::new("mdf", 1000.0, 1000.0).with_kerf(-1.0);
        assert!(pack(&[], &board).is_err());
    }

    #[test]
    fn test_invalid_piece_rejected_not_fatal() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let mut list = pieces("bad", 1, -5.0, 400.0);
        list.extend(pieces("ok", 1, 100.0, 100.0));
        let result = pack(&list, &board).unwrap();

        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.placed_count(), 1);
    }

    #[test]
    fn test_grain_blocks_rotation() {
        let board = BoardTemplate::new("oak", 500.0, 2000.0);
        let list = vec![
            CutPiece::new("door", 1200.0, 400.0).with_grain(Grain::AlongWidth),
            CutPiece::new("shelf", 1200.0, 400.0),
        ];
        let result = pack(&list, &board).unwrap();

        assert_eq!(result.unplaced_ids(), vec!["door".to_string()]);
        assert!(result.placement_of("shelf").unwrap().rotated);
    }

    #[test]
    fn test_empty_input() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let result = pack(&[], &board).unwrap();
        assert_eq!(result.boards_used(), 0);
        assert!(result.all_placed());
    }

    #[test]
    fn test_cancel_discards_result() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let nester = GuillotineNester::default_config();
        let flag = nester.cancel_flag();
        let list = pieces("p", 10, 100.0, 100.0);

        let callback: ProgressCallback = Box::new(move |info: ProgressInfo| {
            if info.items_processed == 3 {
                flag.store(true, Ordering::Relaxed);
            }
        });
        let err = nester.pack_with_progress(&list, &board, callback).unwrap_err();
        assert_eq!(err, Error::Cancelled);

        // The flag is reset by the next run.
        assert!(nester.pack(&list, &board).is_ok());
    }

    #[test]
    fn test_progress_reported_per_piece() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Box::new(move |info: ProgressInfo| {
            if let Ok(mut v) = sink.lock() {
                v.push((info.items_processed, info.running));
            }
        });

        let nester = GuillotineNester::default_config();
        nester
            .pack_with_progress(&pieces("p", 4, 100.0, 100.0), &board, callback)
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[3], (4, true));
        assert_eq!(seen[4], (4, false));
    }

    #[test]
    fn test_kerf_separates_neighbours() {
        let board = BoardTemplate::new("mdf", 1000.0, 1000.0).with_kerf(4.0);
        let list: Vec<CutPiece> = pieces("p", 2, 400.0, 996.0)
            .into_iter()
            .map(|p| p.with_grain(Grain::AlongHeight))
            .collect();
        let result = pack(&list, &board).unwrap();
        let a = &result.boards[0].placements[0];
        let b = &result.boards[0].placements[1];
        assert_eq!(result.boards_used(), 1);
        assert_eq!(b.x - a.x, 404.0);
        assert!(!a.occupied_rect().intersects(&b.occupied_rect()));
    }

    #[test]
    fn test_pack_pool_carries_rejections() {
        let defs = vec![
            PieceDefinition::new("base", "strip", 15.0, 400.0)
                .with_edges(EdgeBanding::left_right(10.0)),
            PieceDefinition::new("base", "shelf", 500.0, 300.0),
        ];
        let pool = build_pool(&defs);
        let board = BoardTemplate::new("", 2750.0, 1830.0).with_kerf(3.0);

        let result = GuillotineNester::default_config()
            .pack_pool(&pool, &board)
            .unwrap();
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].name, "strip");

        let report = summarize(&result);
        assert_eq!(report.rejected_count, 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_report_of_packed_result() {
        let board = BoardTemplate::new("mdf", 1220.0, 2440.0).with_kerf(2.0);
        let result = pack(&pieces("p", 10, 500.0, 300.0), &board).unwrap();
        let report = summarize(&result);
        assert_eq!(report.boards_used, 1);
        assert!((report.total_used_area - 10.0 * 502.0 * 302.0).abs() < 1e-6);
    }
}
