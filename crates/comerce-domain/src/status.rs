//! Fulfillment status hierarchy.
//!
//! Line items and orders share one totally ordered status enumeration:
//!
//! ```text
//! PLACED < LOGISTICS < PACKED < PICK_UP < WAREHOUSE < DELIVERY < REVIEW < FULFILLED
//! ```
//!
//! plus the terminal `FAILED_CANCELLED`, reachable from any non-terminal
//! status once delivery attempts are exhausted. An order's status is the
//! minimum-rank status of its line items.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CommerceError, CommerceResult};

/// Status of a line item or an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed by the customer; no inventory committed yet.
    #[default]
    Placed,
    /// Inventory allocated by the seller, waiting to be packed.
    Logistics,
    /// Waybill generated, waiting for pick-up.
    Packed,
    /// Collected from the seller by a deliverer.
    #[serde(alias = "SELLER_PICK_UP", alias = "SELLER PICK UP")]
    PickUp,
    /// Arrived at the warehouse.
    Warehouse,
    /// Out for delivery to the customer.
    #[serde(alias = "CUSTOMER_DELIVERY")]
    Delivery,
    /// Delivered, waiting for the customer's rating.
    #[serde(alias = "DELIVERED_AND_FOR_REVIEW")]
    Review,
    /// Rated by the customer.
    Fulfilled,
    /// Cancelled after too many failed delivery attempts.
    FailedCancelled,
}

impl OrderStatus {
    /// The pipeline in rank order, excluding `FailedCancelled`.
    pub const PIPELINE: [OrderStatus; 8] = [
        OrderStatus::Placed,
        OrderStatus::Logistics,
        OrderStatus::Packed,
        OrderStatus::PickUp,
        OrderStatus::Warehouse,
        OrderStatus::Delivery,
        OrderStatus::Review,
        OrderStatus::Fulfilled,
    ];

    /// Canonical serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Logistics => "LOGISTICS",
            OrderStatus::Packed => "PACKED",
            OrderStatus::PickUp => "PICK_UP",
            OrderStatus::Warehouse => "WAREHOUSE",
            OrderStatus::Delivery => "DELIVERY",
            OrderStatus::Review => "REVIEW",
            OrderStatus::Fulfilled => "FULFILLED",
            OrderStatus::FailedCancelled => "FAILED_CANCELLED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Logistics => "Waiting to be packed",
            OrderStatus::Packed => "Packed",
            OrderStatus::PickUp => "Picked up",
            OrderStatus::Warehouse => "At warehouse",
            OrderStatus::Delivery => "Out for delivery",
            OrderStatus::Review => "Delivered, for review",
            OrderStatus::Fulfilled => "Fulfilled",
            OrderStatus::FailedCancelled => "Cancelled",
        }
    }

    /// Position in the hierarchy. `FailedCancelled` sits outside the
    /// pipeline and ranks after every pipeline status.
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Placed => 0,
            OrderStatus::Logistics => 1,
            OrderStatus::Packed => 2,
            OrderStatus::PickUp => 3,
            OrderStatus::Warehouse => 4,
            OrderStatus::Delivery => 5,
            OrderStatus::Review => 6,
            OrderStatus::Fulfilled => 7,
            OrderStatus::FailedCancelled => 8,
        }
    }

    /// Status for a pipeline rank.
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::PIPELINE.get(rank as usize).copied()
    }

    /// The next pipeline status, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            OrderStatus::Fulfilled | OrderStatus::FailedCancelled => None,
            other => Self::from_rank(other.rank() + 1),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Fulfilled | OrderStatus::FailedCancelled)
    }

    /// Whether `self` is at least `other` in the pipeline.
    ///
    /// Always false for `FailedCancelled` on either side.
    pub fn at_least(&self, other: OrderStatus) -> bool {
        if *self == OrderStatus::FailedCancelled || other == OrderStatus::FailedCancelled {
            return false;
        }
        self.rank() >= other.rank()
    }

    /// Whether a single step from `self` to `target` is allowed: exactly one
    /// rank forward, or cancellation from any non-terminal status.
    pub fn can_advance(&self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == OrderStatus::FailedCancelled {
            return true;
        }
        target.rank() == self.rank() + 1
    }

    /// Rank-level form of [`OrderStatus::can_advance`].
    pub fn can_advance_rank(current: u8, target: u8) -> bool {
        match (Self::from_rank(current), Self::from_rank(target)) {
            (Some(c), Some(t)) => c.can_advance(t),
            (Some(c), None) if target == OrderStatus::FailedCancelled.rank() => c.can_advance(OrderStatus::FailedCancelled),
            _ => false,
        }
    }

    /// Step to `target`, or fail with `InvalidStateTransition`.
    pub fn advance(&mut self, target: OrderStatus) -> CommerceResult<()> {
        if !self.can_advance(target) {
            return Err(CommerceError::transition(*self, target));
        }
        *self = target;
        Ok(())
    }

    /// Aggregate status of a set of line item statuses: the minimum rank,
    /// or `FailedCancelled` if any item was cancelled.
    pub fn aggregate<I>(statuses: I) -> CommerceResult<OrderStatus>
    where
        I: IntoIterator<Item = OrderStatus>,
    {
        let mut lowest: Option<OrderStatus> = None;
        for status in statuses {
            if status == OrderStatus::FailedCancelled {
                return Ok(OrderStatus::FailedCancelled);
            }
            lowest = match lowest {
                Some(l) if l.rank() <= status.rank() => Some(l),
                _ => Some(status),
            };
        }
        lowest.ok_or_else(|| CommerceError::InvalidState("order has no line items".to_string()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    /// Case-insensitive; spaces, dashes and underscores are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.as_str() {
            "PLACED" => Ok(OrderStatus::Placed),
            "LOGISTICS" => Ok(OrderStatus::Logistics),
            "PACKED" => Ok(OrderStatus::Packed),
            "PICK_UP" | "SELLER_PICK_UP" => Ok(OrderStatus::PickUp),
            "WAREHOUSE" => Ok(OrderStatus::Warehouse),
            "DELIVERY" | "CUSTOMER_DELIVERY" => Ok(OrderStatus::Delivery),
            "REVIEW" | "DELIVERED_AND_FOR_REVIEW" => Ok(OrderStatus::Review),
            "FULFILLED" => Ok(OrderStatus::Fulfilled),
            "FAILED_CANCELLED" | "CANCELLED" => Ok(OrderStatus::FailedCancelled),
            _ => Err(CommerceError::Validation(format!("unknown status: {}", s))),
        }
    }
}
