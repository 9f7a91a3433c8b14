//! Shopping cart entries.

mod entry;

pub use entry::CartEntry;
