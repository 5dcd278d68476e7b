use super::grid::{GridCoord, GridRect};
use serde::{Deserialize, Serialize};

/// The rotation convention of a molecule category.
///
/// The editor historically mixed two sign conventions for "rotate by 90°";
/// here the convention is part of the catalog data: contact pads rotate
/// clockwise (as seen from above the surface), generic molecules rotate
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationSense {
    /// Positive steps turn the molecule clockwise in the surface plane.
    Clockwise,
    /// Positive steps turn the molecule counter-clockwise in the surface plane.
    CounterClockwise,
}

/// The discrete rotation state of a placed molecule.
///
/// Rotations only ever happen in 90° steps and wrap modulo 360°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    R0,
    /// A quarter turn.
    R90,
    /// A half turn.
    R180,
    /// Three quarter turns.
    R270,
}

impl Rotation {
    /// The number of quarter turns this rotation represents (0..4).
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// The rotation angle in degrees.
    pub fn degrees(self) -> f64 {
        f64::from(self.quarter_turns()) * 90.0
    }

    /// Returns the state after one more 90° turn.
    pub fn turned(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Returns the state one 90° turn back. Used to revert a rotation whose
    /// collision resolution failed.
    pub fn turned_back(self) -> Self {
        self.turned().turned().turned()
    }

    /// Builds a rotation state from a number of quarter turns (wraps).
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }
}

/// A catalog entry describing one molecule or contact template.
///
/// This is the configuration the catalog provider supplies for every item
/// the user can drop onto the surface: its grid footprint, its pivot for
/// discrete rotation, the structure-template file holding its local atom
/// geometry, and the translation applied when composing export coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeSpec {
    /// Human-readable, catalog-unique name.
    pub name: String,
    /// Footprint in grid cells (columns, rows), unrotated.
    pub footprint: (u32, u32),
    /// Rotation pivot in cell units measured from the footprint origin.
    /// Fractional values are allowed (a contact pivots about a half-cell).
    pub pivot: (f64, f64),
    /// File name of the structure template holding the local atom geometry.
    pub template: String,
    /// Translation in Ångström added to every template atom on export.
    pub translation: [f64; 3],
    /// Whether the item may be rotated at all.
    pub rotatable: bool,
    /// The rotation convention for this item category.
    pub sense: RotationSense,
}

/// A rigid, discretely positioned instance of a catalog template.
///
/// A placed molecule must always lie fully inside its layer's bounds and must
/// not overlap another placed molecule; the engine enforces both invariants
/// at placement, move, and rotation time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMolecule {
    /// The catalog entry this instance was created from.
    pub spec: MoleculeSpec,
    /// Top-left cell of the current (rotation-adjusted) footprint.
    pub position: GridCoord,
    /// Current discrete rotation state.
    pub rotation: Rotation,
}

impl PlacedMolecule {
    /// Creates an unrotated instance of `spec` at the given cell.
    pub fn new(spec: MoleculeSpec, position: GridCoord) -> Self {
        Self {
            spec,
            position,
            rotation: Rotation::default(),
        }
    }

    /// The set of cells currently claimed by this molecule.
    ///
    /// Quarter turns swap the footprint's width and height; the top-left
    /// anchor stays fixed, so four 90° turns restore the original cell set.
    pub fn footprint(&self) -> GridRect {
        let (w, h) = self.spec.footprint;
        let (w, h) = match self.rotation {
            Rotation::R0 | Rotation::R180 => (w, h),
            Rotation::R90 | Rotation::R270 => (h, w),
        };
        // spec.footprint is validated non-degenerate by the catalog loader
        let (w, h) = (w.max(1), h.max(1));
        GridRect::from_corners(self.position, self.position.offset(w as i32 - 1, h as i32 - 1))
    }
}
