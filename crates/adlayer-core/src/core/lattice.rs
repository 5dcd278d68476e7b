//! Fixed constants of the export coordinate convention.
//!
//! The output frame follows the downstream simulation tool: x runs along the
//! dimer rows, z across them, and y is the vertical axis (negative into the
//! substrate). One grid column spans 7.68 Å (one 2×1 reconstruction cell,
//! two atoms wide) and one grid row spans 3.84 Å. The substrate repeats its
//! stacking pattern every four planes, which is why the per-layer tables
//! below are indexed by `(layer + 2) % 4`.

use crate::core::models::grid::GridCoord;
use crate::core::models::molecule::{Rotation, RotationSense};
use nalgebra::{Matrix3, Vector3};

/// World extent of one grid column, along x.
pub const X_SCALE: [f64; 3] = [7.68, 0.0, 0.0];
/// World extent of one grid row, along z.
pub const Y_SCALE: [f64; 3] = [0.0, 0.0, 3.84];
/// Vertical extent of one cell's site geometry, along y.
pub const HEIGHT: [f64; 3] = [0.0, 2.994, 0.0];

/// Fractional position of the left adsorption site within a cell.
pub const LEFT_H_POS: [f64; 3] = [0.276, 0.0, 0.5];
/// Fractional position of the right adsorption site within a cell.
pub const RIGHT_H_POS: [f64; 3] = [0.724, 0.0, 0.5];

/// Si(100) interplanar spacing in Ångström (a / 4).
const PLANE_STEP: f64 = 1.3578;

/// Vertical displacement of the first substrate plane (the dimer plane).
pub const SURFACE_Z: [f64; 3] = [0.0, -PLANE_STEP, 0.0];
/// Left dimer-atom offset within a cell of the first substrate plane.
pub const SURFACE_LEFT: [f64; 3] = [2.40, 0.0, 1.92];
/// Right dimer-atom offset within a cell of the first substrate plane.
pub const SURFACE_RIGHT: [f64; 3] = [5.28, 0.0, 1.92];

/// Vertical displacement where the bulk stacking pattern begins (layer 2).
pub const INITIAL_Z: [f64; 3] = [0.0, -2.0 * PLANE_STEP, 0.0];
/// Accumulated vertical displacement of one full four-plane stacking period.
pub const Z_OFFSET: [f64; 3] = [0.0, -4.0 * PLANE_STEP, 0.0];

/// Per-plane vertical displacement within one stacking period.
pub const LAYER_Z: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.0, -PLANE_STEP, 0.0],
    [0.0, -2.0 * PLANE_STEP, 0.0],
    [0.0, -3.0 * PLANE_STEP, 0.0],
];

/// Left-site lateral offsets of the four bulk planes of a stacking period.
pub const LAYER_LEFT: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.92, 0.0, 1.92],
    [0.0, 0.0, 1.92],
    [1.92, 0.0, 0.0],
];

/// Right-site lateral offsets of the four bulk planes of a stacking period.
pub const LAYER_RIGHT: [[f64; 3]; 4] = [
    [3.84, 0.0, 0.0],
    [5.76, 0.0, 1.92],
    [3.84, 0.0, 1.92],
    [5.76, 0.0, 0.0],
];

/// Offsets of the first terminating hydrogen, indexed by stacking parity.
pub const LEFT_BOTTOM_H: [[f64; 3]; 2] = [[-0.96, -0.96, 0.0], [0.0, -0.96, -0.96]];
/// Offsets of the second terminating hydrogen, indexed by stacking parity.
pub const RIGHT_BOTTOM_H: [[f64; 3]; 2] = [[0.96, -0.96, 0.0], [0.0, -0.96, 0.96]];

/// Converts a constant triple into a vector.
pub fn vec3(v: [f64; 3]) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

/// Componentwise scale of one full cell: column, vertical, and row extents.
pub fn total_scale() -> Vector3<f64> {
    vec3(X_SCALE) + vec3(Y_SCALE) + vec3(HEIGHT)
}

/// World offset of a cell relative to the layer's corner cell.
///
/// Column count projects along the x basis, row count along the z basis;
/// both are layer-independent constants of the output convention.
pub fn cell_offset(cell: GridCoord, corner: GridCoord) -> Vector3<f64> {
    let cols = f64::from(cell.col - corner.col);
    let rows = f64::from(cell.row - corner.row);
    cols * vec3(X_SCALE) + rows * vec3(Y_SCALE)
}

/// The per-layer site placement constants: vertical displacement plus the
/// left and right in-cell offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteDisplacement {
    /// Vertical (and accumulated bulk) displacement of the layer.
    pub vertical: Vector3<f64>,
    /// Offset of the left site within the cell.
    pub left: Vector3<f64>,
    /// Offset of the right site within the cell.
    pub right: Vector3<f64>,
}

/// Selects the site placement constants for a stacked layer.
///
/// Layer 0 is the hydrogen plane, layer 1 the dimer plane; deeper layers
/// follow the bulk stacking tables indexed by `(layer + 2) % 4`, with one
/// extra [`Z_OFFSET`] per completed four-plane period.
pub fn site_displacement(layer: usize) -> SiteDisplacement {
    match layer {
        0 => SiteDisplacement {
            vertical: Vector3::zeros(),
            left: vec3(LEFT_H_POS).component_mul(&total_scale()),
            right: vec3(RIGHT_H_POS).component_mul(&total_scale()),
        },
        1 => SiteDisplacement {
            vertical: vec3(SURFACE_Z),
            left: vec3(SURFACE_LEFT),
            right: vec3(SURFACE_RIGHT),
        },
        2 => SiteDisplacement {
            vertical: vec3(INITIAL_Z),
            left: vec3(LAYER_LEFT[(layer + 2) % 4]),
            right: vec3(LAYER_RIGHT[(layer + 2) % 4]),
        },
        _ => {
            let periods = ((layer + 2) / 4).saturating_sub(1) as f64;
            SiteDisplacement {
                vertical: periods * vec3(Z_OFFSET)
                    + vec3(INITIAL_Z)
                    + vec3(LAYER_Z[(layer + 2) % 4]),
                left: vec3(LAYER_LEFT[(layer + 2) % 4]),
                right: vec3(LAYER_RIGHT[(layer + 2) % 4]),
            }
        }
    }
}

/// Terminating-hydrogen offsets for the deepest drawn layer, selected by the
/// layer's stacking parity.
pub fn bottom_hydrogen_offsets(layer: usize) -> (Vector3<f64>, Vector3<f64>) {
    let parity = layer % 2;
    (vec3(LEFT_BOTTOM_H[parity]), vec3(RIGHT_BOTTOM_H[parity]))
}

/// The rotation matrix for a discrete molecule rotation about the vertical
/// axis, honoring the catalog entry's rotation sense.
///
/// Counter-clockwise maps (x, z) -> (x cos θ + z sin θ, -x sin θ + z cos θ);
/// clockwise is its transpose.
pub fn rotation_matrix(sense: RotationSense, rotation: Rotation) -> Matrix3<f64> {
    let angle = rotation.degrees().to_radians();
    let (sin, cos) = angle.sin_cos();
    match sense {
        RotationSense::CounterClockwise => {
            Matrix3::new(cos, 0.0, sin, 0.0, 1.0, 0.0, -sin, 0.0, cos)
        }
        RotationSense::Clockwise => Matrix3::new(cos, 0.0, -sin, 0.0, 1.0, 0.0, sin, 0.0, cos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f64>, b: Vector3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn cell_offset_projects_along_fixed_bases() {
        let corner = GridCoord::new(-10, -20);
        let offset = cell_offset(GridCoord::new(-8, -17), corner);
        assert_close(offset, Vector3::new(2.0 * 7.68, 0.0, 3.0 * 3.84));
    }

    #[test]
    fn hydrogen_layer_sites_scale_fractional_positions() {
        let d = site_displacement(0);
        assert_close(d.vertical, Vector3::zeros());
        assert_close(d.left, Vector3::new(0.276 * 7.68, 0.0, 0.5 * 3.84));
        assert_close(d.right, Vector3::new(0.724 * 7.68, 0.0, 0.5 * 3.84));
    }

    #[test]
    fn stacking_tables_repeat_every_four_planes() {
        let d3 = site_displacement(3);
        let d7 = site_displacement(7);
        assert_close(d7.left, d3.left);
        assert_close(d7.right, d3.right);
        // one full period deeper
        assert_close(d7.vertical, d3.vertical + vec3(Z_OFFSET));
    }

    #[test]
    fn bulk_offset_accumulates_beyond_first_period() {
        // layer 6 -> (6+2)/4 - 1 = 1 period of bulk offset
        let d = site_displacement(6);
        let expected = vec3(Z_OFFSET) + vec3(INITIAL_Z) + vec3(LAYER_Z[0]);
        assert_close(d.vertical, expected);
    }

    #[test]
    fn four_quarter_turns_compose_to_identity() {
        for sense in [RotationSense::Clockwise, RotationSense::CounterClockwise] {
            let m = rotation_matrix(sense, Rotation::R90);
            let full = m * m * m * m;
            assert!((full - Matrix3::identity()).norm() < 1e-9);
        }
    }

    #[test]
    fn senses_are_mutual_inverses() {
        let cw = rotation_matrix(RotationSense::Clockwise, Rotation::R90);
        let ccw = rotation_matrix(RotationSense::CounterClockwise, Rotation::R90);
        assert!((cw * ccw - Matrix3::identity()).norm() < 1e-9);
    }

    #[test]
    fn quarter_turn_moves_x_into_z() {
        let ccw = rotation_matrix(RotationSense::CounterClockwise, Rotation::R90);
        let rotated = ccw * Vector3::new(1.0, 0.0, 0.0);
        assert_close(rotated, Vector3::new(0.0, 0.0, -1.0));
    }
}
