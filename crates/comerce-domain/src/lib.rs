//! Domain types for the Comerce order fulfillment backend.
//!
//! - **Catalog**: products, businesses, inventory lots
//! - **Checkout**: orders, line items, shipment and payment details
//! - **Status**: the fulfillment hierarchy shared by orders and line items
//! - **Logistics**: pick-up and delivery rounds
//! - **Cart**: cart entries
//!
//! Every persisted type implements [`comerce_store::Document`].

pub mod error;
pub mod ids;
pub mod money;
pub mod status;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod logistics;
pub mod message;
pub mod people;

pub use error::{CommerceError, CommerceResult, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};
pub use status::OrderStatus;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, CommerceResult, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::status::OrderStatus;

    pub use crate::cart::CartEntry;
    pub use crate::catalog::{Business, InventoryLot, Product};
    pub use crate::checkout::{
        Address, LineItem, Order, PaymentDetails, PaymentMethod, ShipmentDetails,
    };
    pub use crate::logistics::{
        Counterparty, CoveredOrder, FailedAttempt, LogisticsRecord, LogisticsType,
    };
    pub use crate::message::{Message, Report, Severity};
    pub use crate::people::{Customer, Deliverer, UserType};
}
