//! The grid index: overlay-aware site lookup, whole-cell surface resizing,
//! and selection-block attach/detach/move with exclusive cell ownership.

use super::error::GridError;
use crate::core::models::block::SelectionBlock;
use crate::core::models::grid::{GridCoord, GridRect};
use crate::core::models::ids::BlockId;
use crate::core::models::layer::Layer;
use crate::core::models::site::{ATOM_KIND_COUNT, Site, SitePosition, SiteStatus};
use std::collections::HashMap;
use tracing::debug;

/// How far (in cells) the relocation search probes along each axis.
pub(crate) const RELOCATION_STEPS: i32 = 10;

/// Resolves the site that currently answers for a cell.
///
/// Returns the covering selection block's shadow site if the cell is
/// claimed by a block, else the base site, else `None` outside the bounds.
pub fn lookup(layer: &Layer, cell: GridCoord) -> Option<&Site> {
    if !layer.bounds.contains(cell) {
        return None;
    }
    layer.effective_site(cell)
}

/// Mutable variant of [`lookup`], used by paint operations.
pub fn lookup_mut(layer: &mut Layer, cell: GridCoord) -> Option<&mut Site> {
    if !layer.bounds.contains(cell) {
        return None;
    }
    if let Some(id) = layer.overlay.get(&cell).copied() {
        return layer.blocks.get_mut(id).and_then(|block| block.site_mut(cell));
    }
    layer.sites.get_mut(&cell)
}

/// Paints one site position of a cell.
///
/// # Errors
///
/// Returns [`GridError::InvalidAtomKind`] for an occupancy index outside the
/// label list and [`GridError::OutsideBounds`] for a cell outside the layer.
pub fn paint(
    layer: &mut Layer,
    cell: GridCoord,
    position: SitePosition,
    status: SiteStatus,
) -> Result<(), GridError> {
    validate_status(status)?;
    let site = lookup_mut(layer, cell).ok_or(GridError::OutsideBounds {
        col: cell.col,
        row: cell.row,
    })?;
    site.set_status(position, status);
    Ok(())
}

/// Resizes the layer to whole-cell bounds, clamped so that no placed
/// molecule or attached selection block would be orphaned.
///
/// Growing instantiates a default-vacant base site for every newly covered
/// cell; shrinking drops base sites outside the final bounds. The clamp is
/// an intentional policy, not an error: the applied bounds are returned.
pub fn resize(layer: &mut Layer, requested: GridRect) -> GridRect {
    let mut left = requested.left();
    let mut top = requested.top();
    let mut right = requested.right();
    let mut bottom = requested.bottom();

    let mut claims: Vec<GridRect> = layer
        .molecules
        .values()
        .map(|molecule| molecule.footprint())
        .collect();
    claims.extend(layer.blocks.values().map(|block| block.rect()));
    for claim in claims {
        left = left.min(claim.left());
        top = top.min(claim.top());
        right = right.max(claim.right());
        bottom = bottom.max(claim.bottom());
    }

    let bounds = GridRect::from_corners(
        GridCoord::new(left, top),
        GridCoord::new(right - 1, bottom - 1),
    );
    if bounds != requested {
        debug!(?requested, applied = ?bounds, "resize clamped to keep placed items on the surface");
    }

    layer.sites.retain(|cell, _| bounds.contains(*cell));
    for cell in bounds.cells() {
        layer.sites.entry(cell).or_default();
    }
    layer.bounds = bounds;
    bounds
}

/// Attaches a selection block over `rect`.
///
/// Each shadow site copies the base site's state and the base site resets to
/// default. Refuses (returns `None`) if the footprint leaves the surface or
/// any cell is already claimed by another block; the caller may then probe
/// alternate positions via [`attach_block_near`].
pub fn attach_block(layer: &mut Layer, rect: GridRect) -> Option<BlockId> {
    if !block_position_free(layer, None, &rect) {
        return None;
    }
    let mut sites = HashMap::with_capacity(rect.cell_count());
    for cell in rect.cells() {
        let base = layer.sites.get_mut(&cell)?;
        sites.insert(cell, *base);
        base.reset();
    }
    let id = layer.blocks.insert(SelectionBlock::new(rect, sites));
    for cell in rect.cells() {
        layer.overlay.insert(cell, id);
    }
    Some(id)
}

/// Attaches a block at `rect` or at the nearest free position found by the
/// axis search, making [`RELOCATION_STEPS`] probes per direction.
pub fn attach_block_near(layer: &mut Layer, rect: GridRect) -> Option<BlockId> {
    if let Some(id) = attach_block(layer, rect) {
        return Some(id);
    }
    let origin = rect.origin();
    for step in 1..=RELOCATION_STEPS {
        for candidate in axis_candidates(origin, step) {
            if let Some(id) = attach_block(layer, rect.moved_to(candidate)) {
                return Some(id);
            }
        }
    }
    None
}

/// Detaches a block: copies its shadow sites back onto the base surface at
/// the block's current position and discards the overlay.
pub fn detach_block(layer: &mut Layer, id: BlockId) -> bool {
    let Some(block) = layer.blocks.remove(id) else {
        return false;
    };
    for (cell, site) in block.sites() {
        layer.overlay.remove(&cell);
        if let Some(base) = layer.sites.get_mut(&cell) {
            *base = *site;
        }
    }
    true
}

/// Moves a block so its top-left cell is `origin`, with the original
/// editor's axis fallback: the full move is tried first, then the
/// horizontal-only and vertical-only components; if all three collide or
/// leave the surface, the block stays put and `false` is returned.
pub fn move_block(layer: &mut Layer, id: BlockId, origin: GridCoord) -> bool {
    let Some(rect) = layer.blocks.get(id).map(|block| block.rect()) else {
        return false;
    };
    let old = rect.origin();
    let candidates = [
        origin,
        GridCoord::new(origin.col, old.row),
        GridCoord::new(old.col, origin.row),
    ];
    for candidate in candidates {
        let target = rect.moved_to(candidate);
        if !block_position_free(layer, Some(id), &target) {
            continue;
        }
        for cell in rect.cells() {
            layer.overlay.remove(&cell);
        }
        if let Some(block) = layer.blocks.get_mut(id) {
            block.translate(candidate.col - old.col, candidate.row - old.row);
        }
        for cell in target.cells() {
            layer.overlay.insert(cell, id);
        }
        return true;
    }
    false
}

/// Occupies both positions of every shadow site of a block.
pub fn fill_block(layer: &mut Layer, id: BlockId, kind: u8) -> Result<bool, GridError> {
    validate_status(SiteStatus::Occupied(kind))?;
    let Some(block) = layer.blocks.get_mut(id) else {
        return Ok(false);
    };
    let rect = block.rect();
    for cell in rect.cells() {
        if let Some(site) = block.site_mut(cell) {
            site.fill(kind);
        }
    }
    Ok(true)
}

/// Vacates both positions of every shadow site of a block.
pub fn vacate_block(layer: &mut Layer, id: BlockId) -> bool {
    let Some(block) = layer.blocks.get_mut(id) else {
        return false;
    };
    let rect = block.rect();
    for cell in rect.cells() {
        if let Some(site) = block.site_mut(cell) {
            site.vacate();
        }
    }
    true
}

/// Checks whether `rect` lies on the surface and claims no cell owned by a
/// block other than `ignore`. This is the explicit bounds-containment
/// predicate the front end uses instead of scene-graph collision queries.
pub fn block_position_free(layer: &Layer, ignore: Option<BlockId>, rect: &GridRect) -> bool {
    layer.bounds.contains_rect(rect)
        && rect
            .cells()
            .all(|cell| match layer.overlay.get(&cell) {
                None => true,
                Some(owner) => Some(*owner) == ignore,
            })
}

pub(crate) fn axis_candidates(origin: GridCoord, step: i32) -> [GridCoord; 4] {
    [
        origin.offset(0, step),
        origin.offset(0, -step),
        origin.offset(step, 0),
        origin.offset(-step, 0),
    ]
}

fn validate_status(status: SiteStatus) -> Result<(), GridError> {
    if let SiteStatus::Occupied(kind) = status
        && usize::from(kind) >= ATOM_KIND_COUNT
    {
        return Err(GridError::InvalidAtomKind(kind));
    }
    Ok(())
}
