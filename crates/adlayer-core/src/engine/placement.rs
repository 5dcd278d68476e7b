//! Collision-aware molecule placement: drop, relocate, rotate, remove.

use super::error::PlacementError;
use super::grid::{RELOCATION_STEPS, axis_candidates};
use crate::core::models::grid::{GridCoord, GridRect};
use crate::core::models::ids::MoleculeId;
use crate::core::models::layer::Layer;
use crate::core::models::molecule::{MoleculeSpec, PlacedMolecule};
use tracing::debug;

/// Checks whether `rect` lies fully inside the layer bounds and overlaps no
/// placed molecule other than `ignore`.
pub fn molecule_position_free(layer: &Layer, ignore: Option<MoleculeId>, rect: &GridRect) -> bool {
    layer.bounds.contains_rect(rect)
        && !layer
            .molecules
            .iter()
            .any(|(id, molecule)| Some(id) != ignore && molecule.footprint().intersects(rect))
}

/// Probes positions near `rect` along both axes, making [`RELOCATION_STEPS`]
/// probes per direction, and returns the first free origin found. The
/// requested origin itself is the caller's responsibility to test first.
pub(crate) fn find_free_origin(
    layer: &Layer,
    ignore: Option<MoleculeId>,
    rect: GridRect,
) -> Option<GridCoord> {
    let origin = rect.origin();
    for step in 1..=RELOCATION_STEPS {
        for candidate in axis_candidates(origin, step) {
            if molecule_position_free(layer, ignore, &rect.moved_to(candidate)) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Places an instance of `spec` with its footprint origin at `position`.
///
/// If the requested position collides or hangs off the surface, the nearby
/// relocation search runs first; placement is rejected only when every
/// probe fails.
///
/// # Errors
///
/// Returns [`PlacementError::NoRoom`] if no free position exists nearby.
pub fn place_molecule(
    layer: &mut Layer,
    spec: MoleculeSpec,
    position: GridCoord,
) -> Result<MoleculeId, PlacementError> {
    let mut molecule = PlacedMolecule::new(spec, position);
    if !molecule_position_free(layer, None, &molecule.footprint()) {
        let relocated = find_free_origin(layer, None, molecule.footprint()).ok_or_else(|| {
            PlacementError::NoRoom {
                name: molecule.spec.name.clone(),
                col: position.col,
                row: position.row,
            }
        })?;
        debug!(
            name = %molecule.spec.name,
            from = ?position,
            to = ?relocated,
            "placement conflict resolved by relocation"
        );
        molecule.position = relocated;
    }
    let id = layer.molecules.insert(molecule);
    layer.placement_order.push(id);
    Ok(id)
}

/// Rotates a placed molecule by one 90° step in its declared sense.
///
/// The footprint anchor stays fixed; if the rotated footprint collides, the
/// relocation search may move the molecule, and if that fails too the
/// rotation is not applied.
///
/// # Errors
///
/// Returns [`PlacementError::NotRotatable`] for fixed items and
/// [`PlacementError::RotationBlocked`] when no position accepts the rotated
/// footprint.
pub fn rotate_molecule(layer: &mut Layer, id: MoleculeId) -> Result<(), PlacementError> {
    let Some(current) = layer.molecules.get(id) else {
        return Err(PlacementError::UnknownMolecule);
    };
    if !current.spec.rotatable {
        return Err(PlacementError::NotRotatable {
            name: current.spec.name.clone(),
        });
    }
    let mut rotated = current.clone();
    rotated.rotation = rotated.rotation.turned();
    if !molecule_position_free(layer, Some(id), &rotated.footprint()) {
        match find_free_origin(layer, Some(id), rotated.footprint()) {
            Some(origin) => rotated.position = origin,
            None => {
                return Err(PlacementError::RotationBlocked {
                    name: rotated.spec.name.clone(),
                });
            }
        }
    }
    layer.molecules[id] = rotated;
    Ok(())
}

/// Removes a placed molecule from the layer.
pub fn remove_molecule(layer: &mut Layer, id: MoleculeId) -> bool {
    if layer.molecules.remove(id).is_some() {
        layer.placement_order.retain(|other| *other != id);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::layer::{DEFAULT_SURFACE_LABELS, Layer};
    use crate::core::models::molecule::{Rotation, RotationSense};

    fn test_layer(width: u32, height: u32) -> Layer {
        let bounds = GridRect::new(GridCoord::new(0, 0), width, height).unwrap();
        Layer::new(bounds, DEFAULT_SURFACE_LABELS)
    }

    fn spec(name: &str, footprint: (u32, u32), rotatable: bool) -> MoleculeSpec {
        MoleculeSpec {
            name: name.to_string(),
            footprint,
            pivot: (0.0, 0.0),
            template: "tpl.xyz".to_string(),
            translation: [0.0, 0.0, 0.0],
            rotatable,
            sense: RotationSense::CounterClockwise,
        }
    }

    #[test]
    fn placement_inside_bounds_keeps_requested_cell() {
        let mut layer = test_layer(8, 8);
        let id = place_molecule(&mut layer, spec("a", (2, 2), false), GridCoord::new(3, 3))
            .expect("places");
        assert_eq!(layer.molecule(id).unwrap().position, GridCoord::new(3, 3));
        assert_eq!(layer.molecule_count(), 1);
    }

    #[test]
    fn conflicting_placement_relocates_nearby() {
        let mut layer = test_layer(8, 8);
        place_molecule(&mut layer, spec("a", (2, 2), false), GridCoord::new(3, 3)).unwrap();
        let id = place_molecule(&mut layer, spec("b", (2, 2), false), GridCoord::new(3, 3))
            .expect("relocates");
        let footprint = layer.molecule(id).unwrap().footprint();
        assert!(layer.bounds().contains_rect(&footprint));
        assert!(
            !layer
                .molecules_in_order()
                .any(|(other, m)| other != id && m.footprint().intersects(&footprint))
        );
    }

    #[test]
    fn relocation_search_probes_the_full_distance() {
        let mut layer = test_layer(1, 11);
        place_molecule(&mut layer, spec("wall", (1, 10), false), GridCoord::new(0, 0)).unwrap();

        // the only free cell is exactly RELOCATION_STEPS rows down
        let id = place_molecule(&mut layer, spec("dot", (1, 1), false), GridCoord::new(0, 0))
            .expect("relocates");
        assert_eq!(
            layer.molecule(id).unwrap().position,
            GridCoord::new(0, RELOCATION_STEPS)
        );
    }

    #[test]
    fn crowded_surface_rejects_placement() {
        let mut layer = test_layer(2, 2);
        place_molecule(&mut layer, spec("a", (2, 2), false), GridCoord::new(0, 0)).unwrap();
        let err = place_molecule(&mut layer, spec("b", (2, 2), false), GridCoord::new(0, 0));
        assert!(matches!(err, Err(PlacementError::NoRoom { .. })));
        assert_eq!(layer.molecule_count(), 1);
    }

    #[test]
    fn oversized_footprint_is_rejected() {
        let mut layer = test_layer(2, 2);
        let err = place_molecule(&mut layer, spec("big", (3, 3), false), GridCoord::new(0, 0));
        assert!(matches!(err, Err(PlacementError::NoRoom { .. })));
    }

    #[test]
    fn four_rotations_restore_state_and_cells() {
        let mut layer = test_layer(10, 10);
        let id = place_molecule(&mut layer, spec("c", (3, 4), true), GridCoord::new(2, 2))
            .expect("places");
        let original = layer.molecule(id).unwrap().clone();
        for _ in 0..4 {
            rotate_molecule(&mut layer, id).expect("rotates");
        }
        let restored = layer.molecule(id).unwrap();
        assert_eq!(restored.rotation, Rotation::R0);
        assert_eq!(restored.footprint(), original.footprint());
    }

    #[test]
    fn blocked_rotation_leaves_molecule_unchanged() {
        // 3x1 strip: a 1x3 rotation cannot fit anywhere
        let mut layer = test_layer(3, 1);
        let id = place_molecule(&mut layer, spec("strip", (3, 1), true), GridCoord::new(0, 0))
            .expect("places");
        let before = layer.molecule(id).unwrap().clone();
        let err = rotate_molecule(&mut layer, id);
        assert!(matches!(err, Err(PlacementError::RotationBlocked { .. })));
        assert_eq!(layer.molecule(id).unwrap(), &before);
    }

    #[test]
    fn fixed_items_refuse_rotation() {
        let mut layer = test_layer(4, 4);
        let id = place_molecule(&mut layer, spec("pad", (1, 1), false), GridCoord::new(0, 0))
            .expect("places");
        assert!(matches!(
            rotate_molecule(&mut layer, id),
            Err(PlacementError::NotRotatable { .. })
        ));
    }

    #[test]
    fn removal_updates_placement_order() {
        let mut layer = test_layer(8, 8);
        let a = place_molecule(&mut layer, spec("a", (1, 1), false), GridCoord::new(0, 0)).unwrap();
        let b = place_molecule(&mut layer, spec("b", (1, 1), false), GridCoord::new(2, 0)).unwrap();
        assert!(remove_molecule(&mut layer, a));
        assert!(!remove_molecule(&mut layer, a));
        let order: Vec<_> = layer.molecules_in_order().map(|(id, _)| id).collect();
        assert_eq!(order, vec![b]);
    }
}
