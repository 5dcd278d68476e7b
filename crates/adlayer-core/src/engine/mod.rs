//! # Engine Module
//!
//! The stateful logic layer of the editor core: the grid index resolving
//! "what occupies cell (c, r) on layer L" with overlay-wins-over-base
//! priority, collision-aware molecule placement with nearby relocation, the
//! editing session holding the stacked layers and per-gesture state, and the
//! geometry composer turning the abstract grid model into absolute 3D atom
//! records for export.

pub mod composer;
pub mod error;
pub mod grid;
pub mod placement;
pub mod session;
