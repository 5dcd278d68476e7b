use super::grid::{GridCoord, GridRect};
use super::site::Site;
use std::collections::HashMap;

/// A movable overlay region of sites shadowing part of the base surface.
///
/// A selection block exclusively owns one shadow [`Site`] per covered cell,
/// keyed by absolute grid coordinate. While attached, the shadow sites win
/// over the base sites for lookup and export; on detach their state is copied
/// back onto the base surface and the overlay is discarded. The engine
/// guarantees that no two blocks ever claim the same cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionBlock {
    pub(crate) rect: GridRect,
    pub(crate) sites: HashMap<GridCoord, Site>,
}

impl SelectionBlock {
    /// Creates a block over `rect` with the given shadow sites.
    ///
    /// Intended for the engine's attach operation and for session loading;
    /// `sites` must hold exactly one entry per covered cell.
    pub(crate) fn new(rect: GridRect, sites: HashMap<GridCoord, Site>) -> Self {
        debug_assert_eq!(sites.len(), rect.cell_count());
        Self { rect, sites }
    }

    /// The footprint of the block in absolute grid coordinates.
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// The shadow site at the given cell, if the block covers it.
    pub fn site(&self, cell: GridCoord) -> Option<&Site> {
        self.sites.get(&cell)
    }

    /// Mutable access to the shadow site at the given cell.
    pub fn site_mut(&mut self, cell: GridCoord) -> Option<&mut Site> {
        self.sites.get_mut(&cell)
    }

    /// Iterates over the shadow sites together with their cells.
    pub fn sites(&self) -> impl Iterator<Item = (GridCoord, &Site)> {
        self.sites.iter().map(|(cell, site)| (*cell, site))
    }

    /// Moves the block footprint and all shadow sites by the given deltas.
    pub(crate) fn translate(&mut self, dc: i32, dr: i32) {
        self.rect = self.rect.translated(dc, dr);
        self.sites = self
            .sites
            .drain()
            .map(|(cell, site)| (cell.offset(dc, dr), site))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::site::SiteStatus;

    fn block_with_one_marked_site() -> SelectionBlock {
        let rect = GridRect::new(GridCoord::new(1, 1), 2, 1).unwrap();
        let mut sites: HashMap<GridCoord, Site> =
            rect.cells().map(|cell| (cell, Site::new())).collect();
        sites.get_mut(&GridCoord::new(2, 1)).unwrap().left = SiteStatus::Occupied(4);
        SelectionBlock::new(rect, sites)
    }

    #[test]
    fn translate_moves_footprint_and_sites() {
        let mut block = block_with_one_marked_site();
        block.translate(-3, 2);
        assert_eq!(block.rect().origin(), GridCoord::new(-2, 3));
        assert_eq!(
            block.site(GridCoord::new(-1, 3)).unwrap().left,
            SiteStatus::Occupied(4)
        );
        assert!(block.site(GridCoord::new(2, 1)).is_none());
    }
}
