//! The editing session: the stack of surface/substrate layers, the active
//! layer and paint-gesture state, and conversion to and from the
//! serializable snapshot form.

use super::error::{GridError, PlacementError};
use super::{grid, placement};
use crate::core::io::session::{
    BlockState, LayerState, MoleculeState, SessionFileError, SessionState, SiteState,
};
use crate::core::models::catalog::Catalog;
use crate::core::models::grid::{GridCoord, GridRect};
use crate::core::models::ids::{BlockId, MoleculeId};
use crate::core::models::layer::{DEFAULT_SUBSTRATE_LABELS, DEFAULT_SURFACE_LABELS, Layer};
use crate::core::models::molecule::{MoleculeSpec, PlacedMolecule, Rotation};
use crate::core::models::site::{ATOM_KIND_COUNT, Site, SitePosition, SiteStatus};
use tracing::debug;

/// The hard upper limit on the number of stacked layers.
pub const MAX_LAYERS: usize = 100;

/// Number of substrate layers below the surface in a fresh session.
const DEFAULT_SUBSTRATE_LAYERS: usize = 5;

fn default_bounds() -> GridRect {
    GridRect::from_corners(GridCoord::new(-10, -20), GridCoord::new(9, 19))
}

/// A complete editing session.
///
/// The session owns the layer stack (layer 0 is the top surface plane,
/// deeper indices are substrate planes), tracks which layer edits currently
/// target, and carries the transient state of an in-progress paint gesture
/// so that dragging applies one consistent status to every crossed site.
#[derive(Debug, Clone)]
pub struct Session {
    layers: Vec<Layer>,
    current: usize,
    /// Layer to return to when a peek ends, if a peek is active.
    peek_return: Option<usize>,
    /// Status applied by the paint gesture in progress, if any.
    painting: Option<SiteStatus>,
    current_atom: u8,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with one surface layer and the default substrate
    /// stack, all covering the default bounds.
    pub fn new() -> Self {
        let bounds = default_bounds();
        let mut layers = vec![Layer::new(bounds, DEFAULT_SURFACE_LABELS)];
        for _ in 0..DEFAULT_SUBSTRATE_LAYERS {
            layers.push(Layer::new(bounds, DEFAULT_SUBSTRATE_LABELS));
        }
        Self {
            layers,
            current: 0,
            peek_return: None,
            painting: None,
            current_atom: 0,
        }
    }

    /// The number of layers in the stack.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The layer at the given depth index.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Mutable access to the layer at the given depth index.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// The depth index of the layer edits currently target.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The layer edits currently target.
    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.current]
    }

    /// Mutable access to the layer edits currently target.
    pub fn current_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.current]
    }

    /// The atom kind newly painted sites receive.
    pub fn current_atom(&self) -> u8 {
        self.current_atom
    }

    /// Selects the atom kind newly painted sites receive.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAtomKind`] for an index outside the
    /// label list.
    pub fn set_current_atom(&mut self, kind: u8) -> Result<(), GridError> {
        if usize::from(kind) >= ATOM_KIND_COUNT {
            return Err(GridError::InvalidAtomKind(kind));
        }
        self.current_atom = kind;
        Ok(())
    }

    /// Switches editing to the given layer, creating intermediate substrate
    /// layers on demand.
    ///
    /// Indices at or beyond [`MAX_LAYERS`] are ignored and `false` is
    /// returned; this mirrors the front end silently refusing to scroll
    /// deeper. New layers inherit the current layer's bounds, and switching
    /// ends any paint gesture or peek in progress.
    pub fn set_layer(&mut self, index: usize) -> bool {
        if index >= MAX_LAYERS {
            debug!(index, "refused to switch beyond the layer limit");
            return false;
        }
        let bounds = self.current_layer().bounds();
        while self.layers.len() <= index {
            self.layers.push(Layer::new(bounds, DEFAULT_SUBSTRATE_LABELS));
        }
        grid::resize(&mut self.layers[index], bounds);
        self.current = index;
        self.peek_return = None;
        self.painting = None;
        true
    }

    /// Temporarily shows the given layer without ending the editing context.
    ///
    /// Only one peek can be active; a second call simply retargets it. The
    /// peeked layer must already exist.
    pub fn peek_layer(&mut self, index: usize) -> bool {
        if index >= self.layers.len() {
            return false;
        }
        if self.peek_return.is_none() {
            self.peek_return = Some(self.current);
        }
        self.current = index;
        true
    }

    /// Ends an active peek, restoring the previously edited layer.
    pub fn end_peek(&mut self) {
        if let Some(previous) = self.peek_return.take() {
            self.current = previous;
        }
    }

    /// Resizes every layer to the requested whole-cell bounds.
    ///
    /// Each layer clamps independently around its own placed items; the
    /// bounds applied to the current layer are returned.
    pub fn resize_surface(&mut self, requested: GridRect) -> GridRect {
        for layer in &mut self.layers {
            grid::resize(layer, requested);
        }
        self.current_layer().bounds()
    }

    /// Brings every layer to the current layer's bounds. Export runs this
    /// first so all stacked planes cover the same cells.
    pub fn sync_layer_bounds(&mut self) {
        let bounds = self.current_layer().bounds();
        for layer in &mut self.layers {
            grid::resize(layer, bounds);
        }
    }

    /// Starts a paint gesture at the given site position.
    ///
    /// The first touched site decides the gesture's effect: a site not
    /// already holding the current atom kind becomes occupied with it,
    /// otherwise it becomes vacant. The decided status is applied to this
    /// site and to every site the gesture continues over.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutsideBounds`] if the cell is off the surface.
    pub fn begin_paint(
        &mut self,
        cell: GridCoord,
        position: SitePosition,
    ) -> Result<SiteStatus, GridError> {
        let current = self.current;
        let site = grid::lookup(&self.layers[current], cell).ok_or(GridError::OutsideBounds {
            col: cell.col,
            row: cell.row,
        })?;
        let applied = if site.status(position) != SiteStatus::Occupied(self.current_atom) {
            SiteStatus::Occupied(self.current_atom)
        } else {
            SiteStatus::Vacant
        };
        grid::paint(&mut self.layers[current], cell, position, applied)?;
        self.painting = Some(applied);
        Ok(applied)
    }

    /// Continues an active paint gesture over another site position.
    ///
    /// Without an active gesture, or over a cell off the surface, this does
    /// nothing: dragging past the edge is not an error.
    pub fn continue_paint(&mut self, cell: GridCoord, position: SitePosition) {
        let Some(status) = self.painting else {
            return;
        };
        let current = self.current;
        if self.layers[current].bounds().contains(cell) {
            // the status was validated when the gesture began
            let _ = grid::paint(&mut self.layers[current], cell, position, status);
        }
    }

    /// Ends any paint gesture in progress.
    pub fn end_gesture(&mut self) {
        self.painting = None;
    }

    /// Places a catalog item on the current layer.
    ///
    /// # Errors
    ///
    /// See [`placement::place_molecule`].
    pub fn place_molecule(
        &mut self,
        spec: MoleculeSpec,
        position: GridCoord,
    ) -> Result<MoleculeId, PlacementError> {
        placement::place_molecule(self.current_layer_mut(), spec, position)
    }

    /// Rotates a molecule on the current layer by one 90° step.
    ///
    /// # Errors
    ///
    /// See [`placement::rotate_molecule`].
    pub fn rotate_molecule(&mut self, id: MoleculeId) -> Result<(), PlacementError> {
        placement::rotate_molecule(self.current_layer_mut(), id)
    }

    /// Removes a molecule from the current layer.
    pub fn remove_molecule(&mut self, id: MoleculeId) -> bool {
        placement::remove_molecule(self.current_layer_mut(), id)
    }

    /// Attaches a selection block on the current layer, relocating nearby if
    /// the requested footprint is taken.
    pub fn attach_block(&mut self, rect: GridRect) -> Option<BlockId> {
        grid::attach_block_near(self.current_layer_mut(), rect)
    }

    /// Detaches a block on the current layer, merging its sites back.
    pub fn detach_block(&mut self, id: BlockId) -> bool {
        grid::detach_block(self.current_layer_mut(), id)
    }

    /// Moves a block on the current layer with per-axis fallback.
    pub fn move_block(&mut self, id: BlockId, origin: GridCoord) -> bool {
        grid::move_block(self.current_layer_mut(), id, origin)
    }

    /// Builds a serializable snapshot of the whole session.
    ///
    /// Sites are recorded sparsely (only non-vacant ones, in row-major
    /// order) and blocks are ordered by footprint origin so equal sessions
    /// produce identical snapshots.
    pub fn to_state(&self) -> SessionState {
        SessionState {
            current_layer: self.current,
            layers: self.layers.iter().map(layer_state).collect(),
        }
    }

    /// Reconstructs a session from a snapshot, resolving molecule names
    /// through the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SessionFileError::UnknownMolecule`] for names missing from
    /// the catalog and [`SessionFileError::Inconsistent`] for snapshots
    /// violating a structural invariant (degenerate bounds, out-of-range
    /// atom kinds, overlapping footprints).
    pub fn from_state(state: &SessionState, catalog: &Catalog) -> Result<Self, SessionFileError> {
        if state.layers.is_empty() {
            return Err(SessionFileError::Inconsistent(
                "session has no layers".to_string(),
            ));
        }
        if state.current_layer >= state.layers.len() {
            return Err(SessionFileError::Inconsistent(format!(
                "current layer {} out of range",
                state.current_layer
            )));
        }
        let layers = state
            .layers
            .iter()
            .enumerate()
            .map(|(index, layer)| restore_layer(index, layer, catalog))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            layers,
            current: state.current_layer,
            peek_return: None,
            painting: None,
            current_atom: 0,
        })
    }
}

fn layer_state(layer: &Layer) -> LayerState {
    let bounds = layer.bounds();

    let sites = bounds
        .cells()
        .filter_map(|cell| layer.base_site(cell).map(|site| (cell, site)))
        .filter(|(_, site)| !site.is_vacant())
        .map(|(cell, site)| site_state(cell, site))
        .collect();

    let mut blocks: Vec<&crate::core::models::block::SelectionBlock> =
        layer.blocks().map(|(_, block)| block).collect();
    blocks.sort_by_key(|block| (block.rect().top(), block.rect().left()));
    let blocks = blocks
        .into_iter()
        .map(|block| BlockState {
            col: block.rect().left(),
            row: block.rect().top(),
            width: block.rect().width(),
            height: block.rect().height(),
            sites: block
                .rect()
                .cells()
                .filter_map(|cell| block.site(cell).map(|site| (cell, site)))
                .filter(|(_, site)| !site.is_vacant())
                .map(|(cell, site)| site_state(cell, site))
                .collect(),
        })
        .collect();

    let molecules = layer
        .molecules_in_order()
        .map(|(_, molecule)| MoleculeState {
            name: molecule.spec.name.clone(),
            col: molecule.position.col,
            row: molecule.position.row,
            rotation: molecule.rotation.quarter_turns(),
        })
        .collect();

    LayerState {
        col: bounds.left(),
        row: bounds.top(),
        width: bounds.width(),
        height: bounds.height(),
        atom_labels: layer.atom_labels.to_vec(),
        lattice_template: layer.lattice_template.clone(),
        sites,
        blocks,
        molecules,
    }
}

fn site_state(cell: GridCoord, site: &Site) -> SiteState {
    SiteState {
        col: cell.col,
        row: cell.row,
        left: site.left.kind(),
        right: site.right.kind(),
    }
}

fn status_from(kind: Option<u8>) -> Result<SiteStatus, SessionFileError> {
    match kind {
        None => Ok(SiteStatus::Vacant),
        Some(kind) if usize::from(kind) < ATOM_KIND_COUNT => Ok(SiteStatus::Occupied(kind)),
        Some(kind) => Err(SessionFileError::Inconsistent(format!(
            "atom kind {kind} out of range"
        ))),
    }
}

fn restore_layer(
    index: usize,
    state: &LayerState,
    catalog: &Catalog,
) -> Result<Layer, SessionFileError> {
    let bounds = GridRect::new(GridCoord::new(state.col, state.row), state.width, state.height)
        .ok_or_else(|| {
            SessionFileError::Inconsistent(format!("layer {index} has degenerate bounds"))
        })?;
    let labels: [&str; ATOM_KIND_COUNT] = state
        .atom_labels
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| {
            SessionFileError::Inconsistent(format!(
                "layer {index} has {} atom labels, expected {ATOM_KIND_COUNT}",
                state.atom_labels.len()
            ))
        })?;
    let mut layer = Layer::new(bounds, labels);
    layer.lattice_template = state.lattice_template.clone();

    for saved in &state.sites {
        let cell = GridCoord::new(saved.col, saved.row);
        let site = layer.sites.get_mut(&cell).ok_or_else(|| {
            SessionFileError::Inconsistent(format!(
                "site ({}, {}) outside layer {index}",
                cell.col, cell.row
            ))
        })?;
        site.left = status_from(saved.left)?;
        site.right = status_from(saved.right)?;
    }

    for saved in &state.blocks {
        let rect = GridRect::new(GridCoord::new(saved.col, saved.row), saved.width, saved.height)
            .ok_or_else(|| {
                SessionFileError::Inconsistent(format!("degenerate block on layer {index}"))
            })?;
        let id = grid::attach_block(&mut layer, rect).ok_or_else(|| {
            SessionFileError::Inconsistent(format!(
                "block at ({}, {}) overlaps on layer {index}",
                saved.col, saved.row
            ))
        })?;
        for shadow in &saved.sites {
            let cell = GridCoord::new(shadow.col, shadow.row);
            let site = layer.blocks[id].site_mut(cell).ok_or_else(|| {
                SessionFileError::Inconsistent(format!(
                    "block site ({}, {}) outside its block on layer {index}",
                    cell.col, cell.row
                ))
            })?;
            site.left = status_from(shadow.left)?;
            site.right = status_from(shadow.right)?;
        }
    }

    for saved in &state.molecules {
        let spec = catalog
            .get(&saved.name)
            .ok_or_else(|| SessionFileError::UnknownMolecule(saved.name.clone()))?;
        let mut molecule =
            PlacedMolecule::new(spec.clone(), GridCoord::new(saved.col, saved.row));
        molecule.rotation = Rotation::from_quarter_turns(saved.rotation);
        if !placement::molecule_position_free(&layer, None, &molecule.footprint()) {
            return Err(SessionFileError::Inconsistent(format!(
                "molecule '{}' at ({}, {}) collides on layer {index}",
                saved.name, saved.col, saved.row
            )));
        }
        let id = layer.molecules.insert(molecule);
        layer.placement_order.push(id);
    }

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::RotationSense;

    fn test_catalog() -> Catalog {
        Catalog::from_entries(vec![
            MoleculeSpec {
                name: "Contact".to_string(),
                footprint: (3, 4),
                pivot: (1.0, 2.0),
                template: "contact.xyz".to_string(),
                translation: [7.68, 0.0, 7.68],
                rotatable: true,
                sense: RotationSense::Clockwise,
            },
            MoleculeSpec {
                name: "Test Molecule".to_string(),
                footprint: (1, 1),
                pivot: (0.0, 0.0),
                template: "test_molecule.xyz".to_string(),
                translation: [0.0, 0.0, 0.0],
                rotatable: false,
                sense: RotationSense::CounterClockwise,
            },
        ])
        .expect("valid catalog")
    }

    #[test]
    fn new_session_has_default_stack_and_bounds() {
        let session = Session::new();
        assert_eq!(session.layer_count(), 1 + DEFAULT_SUBSTRATE_LAYERS);
        assert_eq!(session.current_index(), 0);
        let bounds = session.current_layer().bounds();
        assert_eq!(bounds.origin(), GridCoord::new(-10, -20));
        assert_eq!((bounds.width(), bounds.height()), (20, 40));
        assert_eq!(session.layer(0).unwrap().atom_labels[0], "H");
        assert_eq!(session.layer(1).unwrap().atom_labels[0], "SI");
    }

    #[test]
    fn set_layer_grows_on_demand_and_respects_the_limit() {
        let mut session = Session::new();
        assert!(session.set_layer(10));
        assert_eq!(session.current_index(), 10);
        assert_eq!(session.layer_count(), 11);
        assert_eq!(
            session.current_layer().bounds(),
            session.layer(0).unwrap().bounds()
        );

        assert!(!session.set_layer(MAX_LAYERS));
        assert_eq!(session.current_index(), 10);
        assert_eq!(session.layer_count(), 11);
    }

    #[test]
    fn peek_restores_the_edited_layer() {
        let mut session = Session::new();
        session.set_layer(2);
        assert!(session.peek_layer(0));
        assert_eq!(session.current_index(), 0);
        assert!(session.peek_layer(4));
        assert_eq!(session.current_index(), 4);
        session.end_peek();
        assert_eq!(session.current_index(), 2);
        // a second end is harmless
        session.end_peek();
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn paint_gesture_toggles_and_drags_one_status() {
        let mut session = Session::new();
        session.set_current_atom(3).unwrap();
        let cell = GridCoord::new(0, 0);

        let applied = session.begin_paint(cell, SitePosition::Left).unwrap();
        assert_eq!(applied, SiteStatus::Occupied(3));

        // dragging applies the same status, even over already-matching sites
        session.continue_paint(GridCoord::new(1, 0), SitePosition::Left);
        session.continue_paint(GridCoord::new(-99, 0), SitePosition::Left);
        session.end_gesture();
        assert_eq!(
            grid::lookup(session.current_layer(), GridCoord::new(1, 0))
                .unwrap()
                .left,
            SiteStatus::Occupied(3)
        );

        // a second gesture on the same site toggles it back to vacant
        let applied = session.begin_paint(cell, SitePosition::Left).unwrap();
        assert_eq!(applied, SiteStatus::Vacant);
        session.end_gesture();
        assert!(
            grid::lookup(session.current_layer(), cell)
                .unwrap()
                .left
                == SiteStatus::Vacant
        );
    }

    #[test]
    fn continue_without_begin_is_inert() {
        let mut session = Session::new();
        session.continue_paint(GridCoord::new(0, 0), SitePosition::Right);
        assert!(
            grid::lookup(session.current_layer(), GridCoord::new(0, 0))
                .unwrap()
                .is_vacant()
        );
    }

    #[test]
    fn invalid_atom_kind_is_refused() {
        let mut session = Session::new();
        assert!(matches!(
            session.set_current_atom(5),
            Err(GridError::InvalidAtomKind(5))
        ));
        assert!(session.set_current_atom(4).is_ok());
    }

    #[test]
    fn snapshot_round_trip_preserves_the_session() {
        let catalog = test_catalog();
        let mut session = Session::new();
        session.set_current_atom(2).unwrap();
        session
            .begin_paint(GridCoord::new(1, 1), SitePosition::Left)
            .unwrap();
        session.end_gesture();
        let contact = catalog.get("Contact").unwrap().clone();
        session.place_molecule(contact, GridCoord::new(-5, -5)).unwrap();
        let block = session
            .attach_block(GridRect::new(GridCoord::new(3, 3), 2, 2).unwrap())
            .unwrap();
        grid::fill_block(session.current_layer_mut(), block, 1).unwrap();
        session.set_layer(1);
        session
            .begin_paint(GridCoord::new(0, 0), SitePosition::Right)
            .unwrap();
        session.end_gesture();

        let state = session.to_state();
        let restored = Session::from_state(&state, &catalog).expect("restores");
        assert_eq!(restored.to_state(), state);
        assert_eq!(restored.current_index(), 1);
        assert_eq!(restored.layer(0).unwrap().molecule_count(), 1);
        assert_eq!(restored.layer(0).unwrap().block_count(), 1);
        assert_eq!(
            grid::lookup(restored.layer(0).unwrap(), GridCoord::new(3, 3))
                .unwrap()
                .left,
            SiteStatus::Occupied(1)
        );
    }

    #[test]
    fn snapshot_with_unknown_molecule_fails_to_load() {
        let catalog = test_catalog();
        let mut state = Session::new().to_state();
        state.layers[0].molecules.push(MoleculeState {
            name: "Mystery".to_string(),
            col: 0,
            row: 0,
            rotation: 0,
        });
        let err = Session::from_state(&state, &catalog).unwrap_err();
        assert!(matches!(err, SessionFileError::UnknownMolecule(name) if name == "Mystery"));
    }

    #[test]
    fn inconsistent_snapshots_are_refused() {
        let catalog = test_catalog();

        let mut out_of_range = Session::new().to_state();
        out_of_range.current_layer = 99;
        assert!(matches!(
            Session::from_state(&out_of_range, &catalog),
            Err(SessionFileError::Inconsistent(_))
        ));

        let mut bad_kind = Session::new().to_state();
        bad_kind.layers[0].sites.push(SiteState {
            col: 0,
            row: 0,
            left: Some(9),
            right: None,
        });
        assert!(matches!(
            Session::from_state(&bad_kind, &catalog),
            Err(SessionFileError::Inconsistent(_))
        ));

        let mut colliding = Session::new().to_state();
        for _ in 0..2 {
            colliding.layers[0].molecules.push(MoleculeState {
                name: "Test Molecule".to_string(),
                col: 0,
                row: 0,
                rotation: 0,
            });
        }
        assert!(matches!(
            Session::from_state(&colliding, &catalog),
            Err(SessionFileError::Inconsistent(_))
        ));
    }

    #[test]
    fn resize_surface_applies_to_all_layers() {
        let mut session = Session::new();
        let requested = GridRect::new(GridCoord::new(-1, -1), 6, 6).unwrap();
        let applied = session.resize_surface(requested);
        assert_eq!(applied, requested);
        for index in 0..session.layer_count() {
            assert_eq!(session.layer(index).unwrap().bounds(), requested);
        }
    }
}
