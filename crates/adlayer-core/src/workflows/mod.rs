//! # Workflows Module
//!
//! The public entry points of the crate: complete, instrumented operations
//! that front ends and the CLI call directly. Each workflow wires the
//! engine's stateful pieces together for one user-visible task: exporting
//! the positional atom listing, saving a session, or loading one back.

pub mod export;
pub mod session_io;
