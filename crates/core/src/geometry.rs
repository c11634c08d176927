//! Panel geometry: edge banding, cut-dimension resolution and axis-aligned rectangles.
//!
//! All lengths are millimeters. Board coordinates have their origin at the
//! top-left corner with `y` growing downwards.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used for all length comparisons (mm).
pub const EPSILON: f64 = 1e-6;

/// Rounds a length to the nearest 0.1 mm, halves rounding up.
pub fn round_to_tenth(value: f64) -> f64 {
    // The extra EPSILON absorbs binary representation error on exact halves (e.g. 12.25).
    ((value * 10.0) + 0.5 + EPSILON).floor() / 10.0
}

/// Edge-banding thickness applied to each side of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeBanding {
    /// Top edge thickness.
    pub top: f64,
    /// Bottom edge thickness.
    pub bottom: f64,
    /// Left edge thickness.
    pub left: f64,
    /// Right edge thickness.
    pub right: f64,
}

impl EdgeBanding {
    /// Creates banding from explicit per-side thicknesses.
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// No banding on any edge.
    pub fn none() -> Self {
        Self::default()
    }

    /// Same thickness on all four edges.
    pub fn uniform(thickness: f64) -> Self {
        Self::new(thickness, thickness, thickness, thickness)
    }

    /// Banding on the two long edges of a part laid out along its width.
    pub fn top_bottom(thickness: f64) -> Self {
        Self::new(thickness, thickness, 0.0, 0.0)
    }

    /// Banding on the left and right edges.
    pub fn left_right(thickness: f64) -> Self {
        Self::new(0.0, 0.0, thickness, thickness)
    }

    /// Total thickness removed from the width (left + right).
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total thickness removed from the height (top + bottom).
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Checks that every thickness is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (side, value) in [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidGeometry(format!(
                    "{} banding thickness must be a non-negative number, got {}",
                    side, value
                )));
            }
        }
        Ok(())
    }
}

/// True sawing dimensions of a piece after edge banding is subtracted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutDimensions {
    /// Cut width (mm, 0.1 mm precision).
    pub width: f64,
    /// Cut height (mm, 0.1 mm precision).
    pub height: f64,
}

impl CutDimensions {
    /// Area of the cut rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Converts nominal (finished) dimensions into cut dimensions.
///
/// `cut_width = nominal_width - (left + right)` and
/// `cut_height = nominal_height - (top + bottom)`, each rounded to 0.1 mm.
///
/// # Errors
/// Returns [`Error::InvalidGeometry`] when an input is not finite, a banding
/// thickness is negative, or either cut dimension is not strictly positive.
pub fn resolve_cut_dimensions(
    nominal_width: f64,
    nominal_height: f64,
    edges: &EdgeBanding,
) -> Result<CutDimensions> {
    if !nominal_width.is_finite() || !nominal_height.is_finite() {
        return Err(Error::InvalidGeometry(format!(
            "nominal size {} x {} is not finite",
            nominal_width, nominal_height
        )));
    }
    edges.validate()?;

    let width = round_to_tenth(nominal_width - edges.horizontal());
    let height = round_to_tenth(nominal_height - edges.vertical());

    if width <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "cut width {:.1} mm: left+right banding ({}) consumes nominal width {}",
            width,
            edges.horizontal(),
            nominal_width
        )));
    }
    if height <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "cut height {:.1} mm: top+bottom banding ({}) consumes nominal height {}",
            height,
            edges.vertical(),
            nominal_height
        )));
    }

    Ok(CutDimensions { width, height })
}

/// Axis-aligned rectangle in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if the rectangle has no usable area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    /// Returns true if a `width` x `height` rectangle fits inside this one.
    pub fn can_hold(&self, width: f64, height: f64) -> bool {
        width <= self.width + EPSILON && height <= self.height + EPSILON
    }

    /// Returns true if `other` lies entirely within this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Returns true if the interiors of the two rectangles overlap.
    ///
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() - EPSILON
            && other.x < self.right() - EPSILON
            && self.y < other.bottom() - EPSILON
            && other.y < self.bottom() - EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(12.34), 12.3);
        assert_eq!(round_to_tenth(12.35), 12.4);
        assert_eq!(round_to_tenth(12.25), 12.3);
        assert_eq!(round_to_tenth(599.0), 599.0);
        assert_eq!(round_to_tenth(-0.04), 0.0);
    }

    #[test]
    fn test_resolve_subtracts_banding() {
        let edges = EdgeBanding::new(2.0, 2.0, 1.0, 0.5);
        let cut = resolve_cut_dimensions(600.0, 400.0, &edges).unwrap();
        assert_eq!(cut.width, 598.5);
        assert_eq!(cut.height, 396.0);
        assert!((cut.area() - 598.5 * 396.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_rounds_to_tenth() {
        let edges = EdgeBanding::uniform(0.45);
        let cut = resolve_cut_dimensions(100.0, 50.03, &edges).unwrap();
        assert_eq!(cut.width, 99.1);
        assert_eq!(cut.height, 49.1);
    }

    #[test]
    fn test_resolve_no_banding() {
        let cut = resolve_cut_dimensions(720.0, 560.0, &EdgeBanding::none()).unwrap();
        assert_eq!(cut, CutDimensions { width: 720.0, height: 560.0 });
    }

    #[test]
    fn test_banding_wider_than_piece() {
        let edges = EdgeBanding::left_right(10.0);
        let err = resolve_cut_dimensions(15.0, 400.0, &edges).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_banding_equal_to_piece() {
        let edges = EdgeBanding::top_bottom(1.0);
        assert!(resolve_cut_dimensions(100.0, 2.0, &edges).is_err());
    }

    #[test]
    fn test_negative_banding_rejected() {
        let edges = EdgeBanding::new(-1.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            resolve_cut_dimensions(100.0, 100.0, &edges),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(resolve_cut_dimensions(f64::NAN, 100.0, &EdgeBanding::none()).is_err());
        assert!(resolve_cut_dimensions(100.0, f64::INFINITY, &EdgeBanding::none()).is_err());
    }

    #[test]
    fn test_rect_contains_and_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 20.0);
        let touching = Rect::new(100.0, 0.0, 10.0, 10.0);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.intersects(&inner));
        assert!(!outer.intersects(&touching));
        assert!(outer.can_hold(100.0, 50.0));
        assert!(!outer.can_hold(100.1, 50.0));
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }
}
