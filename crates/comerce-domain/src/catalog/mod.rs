//! Product catalog module.
//!
//! Contains products, the businesses that sell them, and the inventory lots
//! that back them.

mod business;
mod inventory;
mod product;

pub use business::Business;
pub use inventory::InventoryLot;
pub use product::Product;
