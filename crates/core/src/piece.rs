//! Piece definitions and the cut-piece pool.
//!
//! A project's module list is flattened into one [`CutPiece`] per physical
//! part. The pool is ordered by descending cut area, which is the order the
//! nesting engine expects (best-fit-decreasing).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::geometry::{resolve_cut_dimensions, EdgeBanding, EPSILON};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier of a single cut piece instance.
pub type PieceId = String;

fn escape_id_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '#' => escaped.push_str("%23"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wood-grain direction of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Grain {
    /// No visible grain; the piece may be rotated.
    #[default]
    None,
    /// Grain runs along the piece width.
    AlongWidth,
    /// Grain runs along the piece height.
    AlongHeight,
}

impl Grain {
    /// Returns true if the grain pins the piece orientation.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A piece as described by a cabinet module, in finished (nominal) size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceDefinition {
    /// Originating module (cabinet) reference.
    pub module: String,
    /// Piece name within the module (e.g. "side", "shelf").
    pub name: String,
    /// Material / stock type the piece is cut from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub material: String,
    /// Finished width (mm).
    pub nominal_width: f64,
    /// Finished height (mm).
    pub nominal_height: f64,
    /// Edge banding applied after cutting.
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: EdgeBanding,
    /// Number of identical parts.
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: usize,
    /// Grain direction; `None` or `Some(Grain::None)` allows rotation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grain: Option<Grain>,
}

#[cfg(feature = "serde")]
fn default_quantity() -> usize {
    1
}

impl PieceDefinition {
    /// Creates a single-quantity definition without banding or grain.
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        nominal_width: f64,
        nominal_height: f64,
    ) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            material: String::new(),
            nominal_width,
            nominal_height,
            edges: EdgeBanding::none(),
            quantity: 1,
            grain: None,
        }
    }

    /// Sets the material / stock type.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Sets the edge banding.
    pub fn with_edges(mut self, edges: EdgeBanding) -> Self {
        self.edges = edges;
        self
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the grain direction.
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = Some(grain);
        self
    }

    /// Effective grain of the definition.
    pub fn grain(&self) -> Grain {
        self.grain.unwrap_or_default()
    }

    /// Reference `"{module}/{name}"` used in ids and diagnostics.
    ///
    /// `%`, `/` and `#` inside module or name are percent-escaped, so two
    /// different (module, name) pairs never share a reference.
    pub fn reference(&self) -> String {
        format!("{}/{}", escape_id_part(&self.module), escape_id_part(&self.name))
    }
}

/// A single rectangle to be cut, ready for nesting.
///
/// Immutable once created; the nesting engine only reads it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutPiece {
    id: PieceId,
    module: String,
    name: String,
    material: String,
    width: f64,
    height: f64,
    grain: Grain,
    allow_rotation: bool,
}

impl CutPiece {
    /// Creates a cut piece with explicit cut dimensions.
    ///
    /// Rotation is allowed unless the grain is directional.
    pub fn new(id: impl Into<PieceId>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            module: String::new(),
            name: String::new(),
            material: String::new(),
            width,
            height,
            grain: Grain::None,
            allow_rotation: true,
        }
    }

    /// Sets the originating module and piece name.
    pub fn with_source(mut self, module: impl Into<String>, name: impl Into<String>) -> Self {
        self.module = module.into();
        self.name = name.into();
        self
    }

    /// Sets the material / stock type.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Sets the grain; a directional grain forbids rotation.
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self.allow_rotation = !grain.is_directional();
        self
    }

    /// Unique piece id.
    pub fn id(&self) -> &PieceId {
        &self.id
    }

    /// Originating module.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Piece name within the module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Material / stock type.
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Cut width (mm).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Cut height (mm).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Grain direction.
    pub fn grain(&self) -> Grain {
        self.grain
    }

    /// Whether the engine may swap width and height.
    pub fn allow_rotation(&self) -> bool {
        self.allow_rotation
    }

    /// Cut area (without kerf).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if width and height are equal, so rotating changes nothing.
    pub fn is_square(&self) -> bool {
        (self.width - self.height).abs() <= EPSILON
    }

    /// Checks the cut dimensions are finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "piece '{}' has non-finite size {} x {}",
                self.id, self.width, self.height
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "piece '{}' has non-positive size {} x {}",
                self.id, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A definition that could not be turned into cut pieces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RejectedPiece {
    /// Originating module.
    pub module: String,
    /// Piece name within the module.
    pub name: String,
    /// Material / stock type.
    pub material: String,
    /// Number of parts lost with this definition.
    pub quantity: usize,
    /// Why the definition was rejected.
    pub reason: String,
}

impl RejectedPiece {
    /// Builds a rejection record for a definition.
    pub fn from_definition(def: &PieceDefinition, error: &Error) -> Self {
        Self {
            module: def.module.clone(),
            name: def.name.clone(),
            material: def.material.clone(),
            quantity: def.quantity,
            reason: error.to_string(),
        }
    }

    /// Builds a rejection record for an already expanded piece.
    pub fn from_piece(piece: &CutPiece, error: &Error) -> Self {
        Self {
            module: piece.module.clone(),
            name: piece.name.clone(),
            material: piece.material.clone(),
            quantity: 1,
            reason: error.to_string(),
        }
    }
}

/// Output of [`build_pool`]: pieces to nest plus rejected definitions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PiecePool {
    /// One entry per physical part, sorted by descending cut area.
    pub pieces: Vec<CutPiece>,
    /// Definitions that failed geometry resolution.
    pub rejected: Vec<RejectedPiece>,
}

impl PiecePool {
    /// Number of pieces ready for nesting.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true if no piece survived pooling.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Total cut area of the pooled pieces.
    pub fn total_area(&self) -> f64 {
        self.pieces.iter().map(CutPiece::area).sum()
    }
}

/// Expands module piece definitions into an ordered pool of cut pieces.
///
/// Each definition is resolved once; its `quantity` copies share dimensions
/// but get distinct ids `"{module}/{name}#{n}"` (see
/// [`PieceDefinition::reference`]), numbered from 1 per module/name pair
/// across the whole list. Definitions whose geometry is
/// invalid are collected into [`PiecePool::rejected`] and do not stop the
/// rest of the batch.
///
/// The resulting pieces are sorted by descending area; equal areas keep
/// their definition order.
pub fn build_pool(definitions: &[PieceDefinition]) -> PiecePool {
    let mut pool = PiecePool::default();
    let mut counters: HashMap<(&str, &str), usize> = HashMap::new();

    for def in definitions {
        let cut = match validate_definition(def)
            .and_then(|_| resolve_cut_dimensions(def.nominal_width, def.nominal_height, &def.edges))
        {
            Ok(cut) => cut,
            Err(err) => {
                log::warn!("Rejected piece definition {}: {}", def.reference(), err);
                pool.rejected.push(RejectedPiece::from_definition(def, &err));
                continue;
            }
        };

        let reference = def.reference();
        let counter = counters
            .entry((def.module.as_str(), def.name.as_str()))
            .or_insert(0);
        for _ in 0..def.quantity {
            *counter += 1;
            pool.pieces.push(
                CutPiece::new(format!("{}#{}", reference, counter), cut.width, cut.height)
                    .with_source(def.module.clone(), def.name.clone())
                    .with_material(def.material.clone())
                    .with_grain(def.grain()),
            );
        }
    }

    pool.pieces.sort_by(compare_area_desc);
    pool
}

/// Ordering used by the pool: larger area first.
pub fn compare_area_desc(a: &CutPiece, b: &CutPiece) -> Ordering {
    b.area().partial_cmp(&a.area()).unwrap_or(Ordering::Equal)
}

fn validate_definition(def: &PieceDefinition) -> Result<()> {
    if def.quantity == 0 {
        return Err(Error::InvalidGeometry(format!(
            "quantity for '{}' must be at least 1",
            def.reference()
        )));
    }
    if def.nominal_width <= 0.0 || def.nominal_height <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "nominal size of '{}' must be positive, got {} x {}",
            def.reference(),
            def.nominal_width,
            def.nominal_height
        )));
    }
    Ok(())
}
