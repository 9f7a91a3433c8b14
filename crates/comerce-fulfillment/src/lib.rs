//! Order placement, inventory allocation and the fulfillment pipeline.
//!
//! ```text
//! PLACED -> LOGISTICS -> PACKED -> PICK_UP -> WAREHOUSE -> DELIVERY -> REVIEW -> FULFILLED
//!   place     ship        pack      pick_up    pick-up       dispatch    delivery   rate
//!                                              success                   success
//! ```
//!
//! Line items move through the pipeline on their own; an order's status is
//! always the lowest status among its line items.

pub mod allocation;
pub mod config;
pub mod loader;
pub mod queries;
pub mod request;

mod ops;
mod service;

pub use allocation::{allocate, plan, Allocation};
pub use config::{generate_default_config, ComerceConfig, ConfigError, FulfillmentSettings};
pub use loader::{HydratedOrder, ProductStock};
pub use ops::{CartItem, PlaceOrderOutcome};
pub use queries::{
    parse_waybill_ids, ListedItem, PickUpListing, PickUpOrder, RateCandidate, StockSummary, Waybill,
    WaybillBatch,
};
pub use request::{OrderClaim, OrderItemRequest, PickUpRequest, PlaceOrderRequest, RateRequest};
pub use service::FulfillmentService;
