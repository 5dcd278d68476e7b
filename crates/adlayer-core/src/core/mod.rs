//! # Core Module
//!
//! Fundamental building blocks for the surface editor: the grid-based data
//! model, the fixed lattice constants of the export coordinate convention,
//! and the file formats the editor reads and writes.
//!
//! ## Architecture
//!
//! - **Surface Representation** ([`models`]) - Grid coordinates, sites,
//!   layers, selection blocks, placed molecules, and the molecule catalog
//! - **Lattice Constants** ([`lattice`]) - The output coordinate basis,
//!   per-layer stacking displacement tables, and discrete rotations
//! - **File I/O** ([`io`]) - Structure-template files, the positional atom
//!   listing, and serializable session snapshots

pub mod io;
pub mod lattice;
pub mod models;
