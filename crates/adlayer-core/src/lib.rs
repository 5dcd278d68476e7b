//! # Adlayer Core Library
//!
//! A library for laying out atomic "molecular machine" surfaces (multi-layer
//! grids of hydrogen-passivated adsorption sites decorated with selection
//! blocks and rigid molecule templates) and exporting the arrangement as a
//! positional atom listing consumed by downstream AFM/MD simulation tools.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to keep the
//! editable surface model independent from any GUI toolkit. The interactive
//! front end is an external collaborator that calls into this crate through a
//! narrow interface; nothing here depends on an event loop or a scene graph.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Layer`, `Site`,
//!   `SelectionBlock`, `PlacedMolecule`), the fixed lattice constants of the
//!   output coordinate convention, and file I/O (structure templates, the
//!   positional atom listing, session snapshots).
//!
//! - **[`engine`]: The Logic Core.** The stateful layer: the grid index with
//!   its overlay-wins-over-base resolution, bounded resizing, collision-aware
//!   molecule placement, session state, and the geometry composer that turns
//!   grid cells into absolute 3D atom records.
//!
//! - **[`workflows`]: The Public API.** High-level entry points tying the
//!   engine and core together: exporting a session to an atom listing and
//!   saving/loading sessions with exact round-trip fidelity.

pub mod core;
pub mod engine;
pub mod workflows;
