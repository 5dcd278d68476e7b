/// The number of distinct atom kinds a site position can hold.
///
/// Each layer carries a label list of exactly this many entries; an occupied
/// site position stores an index into that list.
pub const ATOM_KIND_COUNT: usize = 5;

/// The two chemically distinct adsorption positions of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitePosition {
    /// The left adsorption position of the cell.
    Left,
    /// The right adsorption position of the cell.
    Right,
}

/// The occupancy state of a single adsorption position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiteStatus {
    /// No atom adsorbed at this position.
    #[default]
    Vacant,
    /// An atom of the given kind (an index into the layer's label list).
    Occupied(u8),
}

impl SiteStatus {
    /// Returns the atom-kind index if the position is occupied.
    pub fn kind(&self) -> Option<u8> {
        match self {
            SiteStatus::Vacant => None,
            SiteStatus::Occupied(kind) => Some(*kind),
        }
    }
}

/// One grid cell's left/right occupancy record.
///
/// Sites are created when a surface is populated or resized into new
/// territory, mutated by paint operations, and destroyed only together with
/// their owning layer or selection block. A freshly created site is vacant
/// on both positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Site {
    /// Occupancy of the left adsorption position.
    pub left: SiteStatus,
    /// Occupancy of the right adsorption position.
    pub right: SiteStatus,
}

impl Site {
    /// Creates a new site with both positions vacant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether both positions are vacant.
    pub fn is_vacant(&self) -> bool {
        self.left == SiteStatus::Vacant && self.right == SiteStatus::Vacant
    }

    /// Returns the status of the given position.
    pub fn status(&self, position: SitePosition) -> SiteStatus {
        match position {
            SitePosition::Left => self.left,
            SitePosition::Right => self.right,
        }
    }

    /// Sets the status of the given position.
    pub fn set_status(&mut self, position: SitePosition, status: SiteStatus) {
        match position {
            SitePosition::Left => self.left = status,
            SitePosition::Right => self.right = status,
        }
    }

    /// Occupies both positions with the given atom kind.
    pub fn fill(&mut self, kind: u8) {
        self.left = SiteStatus::Occupied(kind);
        self.right = SiteStatus::Occupied(kind);
    }

    /// Vacates both positions.
    pub fn vacate(&mut self) {
        self.left = SiteStatus::Vacant;
        self.right = SiteStatus::Vacant;
    }

    /// Resets the site to its default (vacant) state.
    pub fn reset(&mut self) {
        *self = Site::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sites_are_vacant() {
        let site = Site::new();
        assert!(site.is_vacant());
        assert_eq!(site.left, SiteStatus::Vacant);
        assert_eq!(site.right, SiteStatus::Vacant);
    }

    #[test]
    fn fill_and_vacate_cover_both_positions() {
        let mut site = Site::new();
        site.fill(3);
        assert_eq!(site.status(SitePosition::Left), SiteStatus::Occupied(3));
        assert_eq!(site.status(SitePosition::Right), SiteStatus::Occupied(3));
        site.vacate();
        assert!(site.is_vacant());
    }

    #[test]
    fn positions_are_independent() {
        let mut site = Site::new();
        site.set_status(SitePosition::Left, SiteStatus::Occupied(0));
        assert_eq!(site.left, SiteStatus::Occupied(0));
        assert_eq!(site.right, SiteStatus::Vacant);
    }
}
