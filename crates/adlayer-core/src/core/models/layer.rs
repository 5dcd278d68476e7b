use super::block::SelectionBlock;
use super::grid::{GridCoord, GridRect};
use super::ids::{BlockId, MoleculeId};
use super::molecule::PlacedMolecule;
use super::site::{ATOM_KIND_COUNT, Site};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Default atom labels for the top surface layer.
pub const DEFAULT_SURFACE_LABELS: [&str; ATOM_KIND_COUNT] = ["H", "H", "H", "H", "H"];

/// Default atom labels for substrate layers.
pub const DEFAULT_SUBSTRATE_LABELS: [&str; ATOM_KIND_COUNT] = ["SI", "SI", "SI", "SI", "SI"];

/// One stacked surface plane of the editing session.
///
/// A layer owns a rectangular bound of base sites, the selection blocks
/// overlaid on them, and the molecules placed on it. Layer 0 is the top
/// "surface" plane; deeper layers represent successive substrate planes.
///
/// The base site map and the overlay index are maintained exclusively by the
/// engine's grid-index operations; every cell inside `bounds` has exactly one
/// base site and no base site exists outside the bounds.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) bounds: GridRect,
    pub(crate) sites: HashMap<GridCoord, Site>,
    pub(crate) blocks: SlotMap<BlockId, SelectionBlock>,
    /// Overlay dictionary: which block currently claims each covered cell.
    pub(crate) overlay: HashMap<GridCoord, BlockId>,
    pub(crate) molecules: SlotMap<MoleculeId, PlacedMolecule>,
    /// Molecule emission order for export (placement order).
    pub(crate) placement_order: Vec<MoleculeId>,
    /// The atom-kind label list occupied sites index into.
    pub atom_labels: [String; ATOM_KIND_COUNT],
    /// Structure template emitted once per cell as the layer's base lattice,
    /// or `None` if the layer contributes no base lattice atoms.
    pub lattice_template: Option<String>,
}

impl Layer {
    /// Creates a layer covering `bounds`, with one vacant base site per cell.
    pub fn new(bounds: GridRect, labels: [&str; ATOM_KIND_COUNT]) -> Self {
        let sites = bounds.cells().map(|cell| (cell, Site::new())).collect();
        Self {
            bounds,
            sites,
            blocks: SlotMap::with_key(),
            overlay: HashMap::new(),
            molecules: SlotMap::with_key(),
            placement_order: Vec::new(),
            atom_labels: labels.map(str::to_string),
            lattice_template: None,
        }
    }

    /// The current rectangular bounds of the layer.
    pub fn bounds(&self) -> GridRect {
        self.bounds
    }

    /// The base site at the given cell, ignoring any overlay.
    pub fn base_site(&self, cell: GridCoord) -> Option<&Site> {
        self.sites.get(&cell)
    }

    /// The selection block with the given id.
    pub fn block(&self, id: BlockId) -> Option<&SelectionBlock> {
        self.blocks.get(id)
    }

    /// Iterates over all attached selection blocks.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &SelectionBlock)> {
        self.blocks.iter()
    }

    /// The number of attached selection blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The placed molecule with the given id.
    pub fn molecule(&self, id: MoleculeId) -> Option<&PlacedMolecule> {
        self.molecules.get(id)
    }

    /// Iterates over placed molecules in placement order.
    pub fn molecules_in_order(&self) -> impl Iterator<Item = (MoleculeId, &PlacedMolecule)> {
        self.placement_order
            .iter()
            .filter_map(|id| self.molecules.get(*id).map(|m| (*id, m)))
    }

    /// The number of placed molecules.
    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    /// Counts occupied site positions, overlay sites winning over base sites.
    pub fn occupied_position_count(&self) -> usize {
        self.bounds
            .cells()
            .filter_map(|cell| self.effective_site(cell))
            .map(|site| {
                usize::from(site.left.kind().is_some()) + usize::from(site.right.kind().is_some())
            })
            .sum()
    }

    /// The site that currently answers for `cell`: the covering block's
    /// shadow site if there is one, else the base site.
    pub(crate) fn effective_site(&self, cell: GridCoord) -> Option<&Site> {
        if let Some(block_id) = self.overlay.get(&cell) {
            return self.blocks.get(*block_id).and_then(|b| b.site(cell));
        }
        self.sites.get(&cell)
    }
}
