//! The geometry composer: turns the abstract grid model into absolute 3D
//! atom records in the single-pass emission order downstream tooling keys on.
//!
//! One export pass has three global phases. First the base lattice: every
//! layer that carries a lattice template emits that template once per cell,
//! layers top-down and cells row-major. Then the painted sites, in the same
//! layer and cell order, left position before right, with the terminating
//! hydrogens of the deepest drawn layer emitted right after their site atom.
//! Finally the placed molecules, in placement order per layer. Record
//! indices are 1-based and strictly monotonic across the whole pass.

use super::error::ExportError;
use super::grid;
use super::session::Session;
use crate::core::io::template::TemplateStore;
use crate::core::io::xyz::AtomRecord;
use crate::core::lattice::{
    self, bottom_hydrogen_offsets, cell_offset, rotation_matrix, site_displacement,
};
use crate::core::models::layer::Layer;
use crate::core::models::molecule::PlacedMolecule;
use crate::core::models::site::ATOM_KIND_COUNT;
use nalgebra::{Point3, Vector3};

/// Label of the terminating hydrogens below the deepest drawn layer.
const TERMINATION_LABEL: &str = "H";

/// Options of one export pass.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// How many layers to draw, top-down; `None` draws the whole stack.
    pub layers_to_draw: Option<usize>,
    /// Whether to terminate the deepest drawn layer's occupied sites with
    /// a hydrogen pair each.
    pub hydrogen_termination: bool,
    /// Overrides the surface layer's atom labels for this pass only.
    pub surface_labels: Option<[String; ATOM_KIND_COUNT]>,
    /// Overrides the substrate layers' atom labels for this pass only.
    pub substrate_labels: Option<[String; ATOM_KIND_COUNT]>,
}

/// Accumulates atom records, assigning 1-based monotonic indices.
#[derive(Debug, Default)]
struct RecordSink {
    records: Vec<AtomRecord>,
}

impl RecordSink {
    fn emit(&mut self, label: &str, position: Point3<f64>) {
        let index = self.records.len() + 1;
        self.records.push(AtomRecord {
            label: label.to_string(),
            position,
            index,
        });
    }
}

/// Composes the complete atom listing of a session.
///
/// The pass is read-only with respect to the session: composing the same
/// session twice yields identical records. All cell offsets are measured
/// from the top layer's corner cell, so the output frame is independent of
/// where the grid bounds happen to lie.
///
/// # Errors
///
/// A single missing or malformed structure template aborts the whole pass;
/// no partial listing is returned.
pub fn compose(
    session: &Session,
    templates: &mut TemplateStore,
    options: &ExportOptions,
) -> Result<Vec<AtomRecord>, ExportError> {
    let depth = options
        .layers_to_draw
        .map_or(session.layer_count(), |n| n.min(session.layer_count()));
    let corner = match session.layer(0) {
        Some(layer) => layer.bounds().origin(),
        None => return Ok(Vec::new()),
    };
    let mut sink = RecordSink::default();

    // phase 1: base lattice
    for index in 0..depth {
        let Some(layer) = session.layer(index) else {
            break;
        };
        let Some(name) = &layer.lattice_template else {
            continue;
        };
        let template = templates
            .get(name)
            .map_err(|source| ExportError::LatticeTemplate {
                layer: index,
                source,
            })?;
        let vertical = site_displacement(index).vertical;
        for cell in layer.bounds().cells() {
            let base = cell_offset(cell, corner) + vertical;
            for atom in &template.atoms {
                sink.emit(&atom.element, atom.position + base);
            }
        }
    }

    // phase 2: painted sites
    for index in 0..depth {
        let Some(layer) = session.layer(index) else {
            break;
        };
        let labels = pass_labels(index, layer, options);
        let displacement = site_displacement(index);
        let terminate = options.hydrogen_termination && index + 1 == depth;
        let bottom = bottom_hydrogen_offsets(index);
        for cell in layer.bounds().cells() {
            let Some(site) = grid::lookup(layer, cell) else {
                continue;
            };
            let base = cell_offset(cell, corner) + displacement.vertical;
            for (status, offset) in [(site.left, displacement.left), (site.right, displacement.right)]
            {
                let Some(kind) = status.kind() else {
                    continue;
                };
                let position = Point3::from(base + offset);
                sink.emit(&labels[usize::from(kind)], position);
                if terminate {
                    sink.emit(TERMINATION_LABEL, position + bottom.0);
                    sink.emit(TERMINATION_LABEL, position + bottom.1);
                }
            }
        }
    }

    // phase 3: placed molecules
    for index in 0..depth {
        let Some(layer) = session.layer(index) else {
            break;
        };
        let vertical = site_displacement(index).vertical;
        for (_, molecule) in layer.molecules_in_order() {
            let template = templates.get(&molecule.spec.template).map_err(|source| {
                ExportError::MoleculeTemplate {
                    molecule: molecule.spec.name.clone(),
                    source,
                }
            })?;
            let base = cell_offset(molecule.position, corner) + vertical;
            emit_molecule(&mut sink, molecule, &template.atoms, base);
        }
    }

    Ok(sink.records)
}

/// Emits one placed molecule: the template atoms rotated about the catalog
/// pivot in the molecule's rotation sense, then translated to the cell.
fn emit_molecule(
    sink: &mut RecordSink,
    molecule: &PlacedMolecule,
    atoms: &[crate::core::io::template::TemplateAtom],
    base: Vector3<f64>,
) {
    let spec = &molecule.spec;
    let translation = lattice::vec3(spec.translation);
    let pivot = spec.pivot.0 * lattice::vec3(lattice::X_SCALE)
        + spec.pivot.1 * lattice::vec3(lattice::Y_SCALE)
        - translation;
    let rotation = rotation_matrix(spec.sense, molecule.rotation);
    for atom in atoms {
        let local = rotation * (atom.position.coords - pivot) + pivot;
        sink.emit(&atom.element, Point3::from(local + base + translation));
    }
}

fn pass_labels<'a>(
    index: usize,
    layer: &'a Layer,
    options: &'a ExportOptions,
) -> &'a [String; ATOM_KIND_COUNT] {
    let over = if index == 0 {
        options.surface_labels.as_ref()
    } else {
        options.substrate_labels.as_ref()
    };
    over.unwrap_or(&layer.atom_labels)
}
