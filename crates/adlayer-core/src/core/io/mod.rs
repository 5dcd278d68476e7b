//! File formats the editor reads and writes: structure-template atom lists,
//! the exported positional atom listing, and serializable session snapshots.

pub mod session;
pub mod template;
pub mod xyz;
