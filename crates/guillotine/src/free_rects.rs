//! Free-rectangle bookkeeping for guillotine packing.
//!
//! Every board keeps a list of disjoint free rectangles. A piece is always
//! placed in the top-left corner of one of them; the remainder is split by a
//! single straight cut into at most two new free rectangles, so every layout
//! can be reproduced on a panel saw.

use std::cmp::Ordering;

use u_cutlist_core::geometry::{Rect, EPSILON};

/// Compares two lengths or areas with [`EPSILON`] tolerance.
pub fn cmp_len(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= EPSILON {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// A candidate position for a piece inside one free rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Index of the free rectangle in its [`FreeRectangles`].
    pub rect_index: usize,
    /// Placement corner (top-left of the free rectangle).
    pub x: f64,
    /// Placement corner (top-left of the free rectangle).
    pub y: f64,
    /// Cut width as laid on the board.
    pub width: f64,
    /// Cut height as laid on the board.
    pub height: f64,
    /// Whether width and height were swapped.
    pub rotated: bool,
    /// Free area left in the rectangle after placement.
    pub leftover_area: f64,
    /// Free width left in the rectangle after placement.
    pub leftover_width: f64,
}

impl Fit {
    /// Best-area-fit ordering: smaller leftover area, then smaller leftover
    /// width, then lower `y`, then lower `x`.
    pub fn compare(&self, other: &Fit) -> Ordering {
        cmp_len(self.leftover_area, other.leftover_area)
            .then_with(|| cmp_len(self.leftover_width, other.leftover_width))
            .then_with(|| cmp_len(self.y, other.y))
            .then_with(|| cmp_len(self.x, other.x))
    }

    /// Returns true if this fit is strictly better than `other`.
    pub fn is_better_than(&self, other: &Fit) -> bool {
        self.compare(other) == Ordering::Less
    }
}

/// Axis of the guillotine cut that separates the two remainders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Full-width cut under the piece: the right remainder is as tall as the piece.
    Horizontal,
    /// Full-height cut beside the piece: the bottom remainder is as wide as the piece.
    Vertical,
}

/// Splits `free` after a `used_width` x `used_height` block was taken from its corner.
///
/// The axis is chosen so that the larger of the two remainders is as large
/// as possible; on a tie the horizontal cut wins. Returns the right and the
/// bottom remainder, dropping degenerate ones.
pub fn guillotine_split(free: &Rect, used_width: f64, used_height: f64) -> (SplitAxis, Vec<Rect>) {
    let rest_width = free.width - used_width;
    let rest_height = free.height - used_height;

    let horizontal = [
        Rect::new(free.x + used_width, free.y, rest_width, used_height),
        Rect::new(free.x, free.y + used_height, free.width, rest_height),
    ];
    let vertical = [
        Rect::new(free.x + used_width, free.y, rest_width, free.height),
        Rect::new(free.x, free.y + used_height, used_width, rest_height),
    ];

    let largest = |rects: &[Rect; 2]| rects[0].area().max(rects[1].area());
    let (axis, rects) = if cmp_len(largest(&vertical), largest(&horizontal)) == Ordering::Greater {
        (SplitAxis::Vertical, vertical)
    } else {
        (SplitAxis::Horizontal, horizontal)
    };

    (
        axis,
        rects.into_iter().filter(|r| !r.is_degenerate()).collect(),
    )
}

/// The free space of one board.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeRectangles {
    rects: Vec<Rect>,
}

impl FreeRectangles {
    /// Starts with a single free rectangle covering `area`.
    pub fn new(area: Rect) -> Self {
        Self { rects: vec![area] }
    }

    /// Current free rectangles.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of free rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns true if no free space is left.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Total free area.
    pub fn free_area(&self) -> f64 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// Finds the best free rectangle for a `width` x `height` piece.
    ///
    /// `kerf` is added to both dimensions. With `allow_rotation` the swapped
    /// orientation is tried as well; on equal score the unrotated one is kept.
    pub fn find_best(&self, width: f64, height: f64, allow_rotation: bool, kerf: f64) -> Option<Fit> {
        let mut orientations = vec![(width, height, false)];
        if allow_rotation && cmp_len(width, height) != Ordering::Equal {
            orientations.push((height, width, true));
        }

        let mut best: Option<Fit> = None;
        for (rect_index, free) in self.rects.iter().enumerate() {
            for &(w, h, rotated) in &orientations {
                let used_width = w + kerf;
                let used_height = h + kerf;
                if !free.can_hold(used_width, used_height) {
                    continue;
                }

                let fit = Fit {
                    rect_index,
                    x: free.x,
                    y: free.y,
                    width: w,
                    height: h,
                    rotated,
                    leftover_area: free.area() - used_width * used_height,
                    leftover_width: free.width - used_width,
                };
                if best.map_or(true, |b| fit.is_better_than(&b)) {
                    best = Some(fit);
                }
            }
        }
        best
    }

    /// Commits `fit`: removes its free rectangle and inserts the split remainders.
    ///
    /// Returns the occupied (kerf-inclusive) rectangle.
    pub fn place(&mut self, fit: &Fit, kerf: f64) -> Rect {
        let free = self.rects.remove(fit.rect_index);
        let used_width = (fit.width + kerf).min(free.width);
        let used_height = (fit.height + kerf).min(free.height);

        let (_, remainders) = guillotine_split(&free, used_width, used_height);
        self.rects.extend(remainders);
        self.prune();

        Rect::new(free.x, free.y, fit.width + kerf, fit.height + kerf)
    }

    /// Drops free rectangles contained in another one.
    ///
    /// Of two identical rectangles the earlier one is kept.
    fn prune(&mut self) {
        let rects = &self.rects;
        let keep: Vec<bool> = (0..rects.len())
            .map(|i| {
                !(0..rects.len()).any(|j| {
                    j != i && rects[j].contains(&rects[i]) && (j < i || !rects[i].contains(&rects[j]))
                })
            })
            .collect();

        let mut flags = keep.into_iter();
        self.rects.retain(|_| flags.next().unwrap_or(true));
    }

    /// Consumes the set, returning the free rectangles.
    pub fn into_rects(self) -> Vec<Rect> {
        self.rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_len_tolerance() {
        assert_eq!(cmp_len(1.0, 1.0 + 1e-9), Ordering::Equal);
        assert_eq!(cmp_len(1.0, 1.1), Ordering::Less);
        assert_eq!(cmp_len(2.0, 1.0), Ordering::Greater);
    }

    #[test]
    fn test_split_prefers_larger_remainder() {
        // Wide free area, narrow piece: the vertical cut keeps a full-height right strip.
        let free = Rect::new(0.0, 0.0, 2750.0, 1830.0);
        let (axis, rects) = guillotine_split(&free, 603.0, 403.0);
        assert_eq!(axis, SplitAxis::Vertical);
        assert_eq!(
            rects,
            vec![
                Rect::new(603.0, 0.0, 2147.0, 1830.0),
                Rect::new(0.0, 403.0, 603.0, 1427.0),
            ]
        );
    }

    #[test]
    fn test_split_horizontal_for_tall_area() {
        let free = Rect::new(0.0, 0.0, 1220.0, 2440.0);
        let (axis, rects) = guillotine_split(&free, 502.0, 302.0);
        assert_eq!(axis, SplitAxis::Horizontal);
        assert_eq!(
            rects,
            vec![
                Rect::new(502.0, 0.0, 718.0, 302.0),
                Rect::new(0.0, 302.0, 1220.0, 2138.0),
            ]
        );
    }

    #[test]
    fn test_split_discards_degenerate() {
        let free = Rect::new(10.0, 10.0, 100.0, 50.0);
        let (_, rects) = guillotine_split(&free, 100.0, 20.0);
        assert_eq!(rects, vec![Rect::new(10.0, 30.0, 100.0, 30.0)]);

        let (_, rects) = guillotine_split(&free, 100.0, 50.0);
        assert!(rects.is_empty());
    }

    #[test]
    fn test_find_best_area_fit() {
        let mut free = FreeRectangles::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        free.rects = vec![
            Rect::new(0.0, 0.0, 300.0, 300.0),
            Rect::new(300.0, 0.0, 120.0, 110.0),
            Rect::new(0.0, 300.0, 1000.0, 700.0),
        ];

        let fit = free.find_best(100.0, 100.0, false, 0.0).unwrap();
        assert_eq!(fit.rect_index, 1);
        assert_eq!((fit.x, fit.y), (300.0, 0.0));
        assert!((fit.leftover_area - (120.0 * 110.0 - 10_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_find_best_uses_rotation() {
        let free = FreeRectangles::new(Rect::new(0.0, 0.0, 100.0, 500.0));
        assert!(free.find_best(400.0, 50.0, false, 0.0).is_none());

        let fit = free.find_best(400.0, 50.0, true, 0.0).unwrap();
        assert!(fit.rotated);
        assert_eq!((fit.width, fit.height), (50.0, 400.0));
    }

    #[test]
    fn test_find_best_orientation_by_leftover_width() {
        let free = FreeRectangles::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let fit = free.find_best(200.0, 100.0, true, 0.0).unwrap();
        assert!(!fit.rotated);
    }

    #[test]
    fn test_find_best_tie_breaks_on_leftover_width() {
        let mut free = FreeRectangles::new(Rect::new(0.0, 0.0, 1.0, 1.0));
        // Same area (20000), different widths.
        free.rects = vec![
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Rect::new(0.0, 500.0, 100.0, 200.0),
        ];
        let fit = free.find_best(100.0, 100.0, false, 0.0).unwrap();
        assert_eq!(fit.rect_index, 1);
    }

    #[test]
    fn test_find_best_tie_breaks_on_y_then_x() {
        let mut free = FreeRectangles::new(Rect::new(0.0, 0.0, 1.0, 1.0));
        free.rects = vec![
            Rect::new(500.0, 200.0, 100.0, 100.0),
            Rect::new(300.0, 100.0, 100.0, 100.0),
            Rect::new(100.0, 100.0, 100.0, 100.0),
        ];
        let fit = free.find_best(100.0, 100.0, false, 0.0).unwrap();
        assert_eq!(fit.rect_index, 2);
    }

    #[test]
    fn test_find_best_kerf_must_fit() {
        let free = FreeRectangles::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(free.find_best(98.0, 98.0, false, 2.0).is_some());
        assert!(free.find_best(99.0, 98.0, false, 2.0).is_none());
    }

    #[test]
    fn test_place_splits_and_conserves_area() {
        let mut free = FreeRectangles::new(Rect::new(0.0, 0.0, 2750.0, 1830.0));
        let fit = free.find_best(600.0, 400.0, true, 3.0).unwrap();
        let occupied = free.place(&fit, 3.0);

        assert_eq!(occupied, Rect::new(0.0, 0.0, 603.0, 403.0));
        assert_eq!(free.len(), 2);
        let total = free.free_area() + occupied.area();
        assert!((total - 2750.0 * 1830.0).abs() < 1e-6);
        assert!(free.rects().iter().all(|r| !r.intersects(&occupied)));
    }

    #[test]
    fn test_prune_removes_contained() {
        let mut free = FreeRectangles::new(Rect::new(0.0, 0.0, 1.0, 1.0));
        free.rects = vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(10.0, 10.0, 20.0, 20.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(200.0, 0.0, 10.0, 10.0),
        ];
        free.prune();
        assert_eq!(
            free.rects(),
            &[Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(200.0, 0.0, 10.0, 10.0)]
        );
    }
}
