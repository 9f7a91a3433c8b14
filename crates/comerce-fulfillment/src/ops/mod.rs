//! Fulfillment operations, one module per pipeline stage.
//!
//! Every operation is a method on [`FulfillmentService`](crate::FulfillmentService).

mod cart;
mod delivery;
mod inventory;
mod pack;
mod pick_up;
mod placement;
mod rating;
mod ship;

pub use cart::CartItem;
pub use placement::PlaceOrderOutcome;
