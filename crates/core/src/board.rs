//! Stock board templates.

use crate::geometry::Rect;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A stock sheet for one material, instantiated as many times as needed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardTemplate {
    /// Material / stock type this board is made of.
    #[cfg_attr(feature = "serde", serde(default))]
    pub material: String,
    /// Board width (mm).
    pub width: f64,
    /// Board height (mm).
    pub height: f64,
    /// Blade width consumed between adjacent cuts (mm).
    #[cfg_attr(feature = "serde", serde(default))]
    pub kerf: f64,
    /// Unusable strip removed from every board edge (mm).
    #[cfg_attr(feature = "serde", serde(default))]
    pub trim: f64,
}

impl BoardTemplate {
    /// Creates a board template with no kerf and no trim.
    pub fn new(material: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            material: material.into(),
            width,
            height,
            kerf: 0.0,
            trim: 0.0,
        }
    }

    /// Sets the saw kerf.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    /// Sets the edge trim.
    pub fn with_trim(mut self, trim: f64) -> Self {
        self.trim = trim;
        self
    }

    /// Full board area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Region available for placements once the edge trim is removed.
    pub fn usable_rect(&self) -> Rect {
        Rect::new(
            self.trim,
            self.trim,
            self.width - 2.0 * self.trim,
            self.height - 2.0 * self.trim,
        )
    }

    /// Returns true if a `width` x `height` cut, plus kerf, fits an empty board.
    pub fn fits(&self, width: f64, height: f64) -> bool {
        self.usable_rect()
            .can_hold(width + self.kerf, height + self.kerf)
    }

    /// Validates the template.
    ///
    /// # Errors
    /// [`Error::InvalidBoardTemplate`] when width or height is not positive,
    /// kerf or trim is negative, or the trim leaves no usable area.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.width, self.height, self.kerf, self.trim]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidBoardTemplate(format!(
                "board '{}' has non-finite dimensions",
                self.material
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidBoardTemplate(format!(
                "board '{}' must have positive size, got {} x {}",
                self.material, self.width, self.height
            )));
        }
        if self.kerf < 0.0 {
            return Err(Error::InvalidBoardTemplate(format!(
                "board '{}' kerf must be >= 0, got {}",
                self.material, self.kerf
            )));
        }
        if self.trim < 0.0 {
            return Err(Error::InvalidBoardTemplate(format!(
                "board '{}' trim must be >= 0, got {}",
                self.material, self.trim
            )));
        }
        if self.usable_rect().is_degenerate() {
            return Err(Error::InvalidBoardTemplate(format!(
                "board '{}' trim {} leaves no usable area",
                self.material, self.trim
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_validate_ok() {
        let board = BoardTemplate::new("mdf-18", 2750.0, 1830.0).with_kerf(3.0);
        assert!(board.validate().is_ok());
        assert_eq!(board.area(), 2750.0 * 1830.0);
    }

    #[test]
    fn test_board_validate_rejects_bad_values() {
        assert!(BoardTemplate::new("a", 0.0, 100.0).validate().is_err());
        assert!(BoardTemplate::new("a", 100.0, -1.0).validate().is_err());
        assert!(BoardTemplate::new("a", 100.0, 100.0)
            .with_kerf(-0.5)
            .validate()
            .is_err());
        assert!(BoardTemplate::new("a", 100.0, 100.0)
            .with_trim(50.0)
            .validate()
            .is_err());
        assert!(matches!(
            BoardTemplate::new("a", f64::NAN, 100.0).validate(),
            Err(Error::InvalidBoardTemplate(_))
        ));
    }

    #[test]
    fn test_usable_rect_with_trim() {
        let board = BoardTemplate::new("ply", 2440.0, 1220.0).with_trim(10.0);
        let usable = board.usable_rect();
        assert_eq!(usable, Rect::new(10.0, 10.0, 2420.0, 1200.0));
    }

    #[test]
    fn test_fits_includes_kerf() {
        let board = BoardTemplate::new("mdf", 1000.0, 500.0).with_kerf(4.0);
        assert!(board.fits(996.0, 496.0));
        assert!(!board.fits(1000.0, 100.0));
    }
}
