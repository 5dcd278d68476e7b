//! Data structures describing the editable surface: grid geometry, adsorption
//! sites, stacked layers, selection-block overlays, placed molecules, and the
//! catalog of available molecule templates.

pub mod block;
pub mod catalog;
pub mod grid;
pub mod ids;
pub mod layer;
pub mod molecule;
pub mod site;
