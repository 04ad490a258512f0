//! Atom header, tree walker and resync engine.

mod header;
pub(crate) mod resync;
pub(crate) mod walker;

pub use header::AtomHeader;
