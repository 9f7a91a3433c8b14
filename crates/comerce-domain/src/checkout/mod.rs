//! Order placement inputs and the order aggregate.

mod address;
mod order;
mod payment;

pub use address::{Address, ShipmentDetails};
pub use order::{LineItem, Order};
pub use payment::{PaymentDetails, PaymentMethod};
