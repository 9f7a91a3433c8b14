//! Order types.

use chrono::{DateTime, Duration, Utc};
use comerce_store::Document;
use serde::{Deserialize, Serialize};

use crate::checkout::{PaymentDetails, PaymentMethod, ShipmentDetails};
use crate::error::{CommerceError, CommerceResult};
use crate::ids::{CustomerId, OrderId, ProductId};
use crate::money::{Currency, Money};
use crate::status::OrderStatus;

/// One product within an order, tracked through fulfillment on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Requested quantity, fixed at placement.
    pub quantity: u32,
    /// Unit price snapshot, fixed at placement.
    pub price_at_point: Money,
    #[serde(default)]
    pub rated: bool,
    #[serde(default)]
    pub status: OrderStatus,
}

impl LineItem {
    pub fn new(product_id: ProductId, quantity: u32, price_at_point: Money) -> Self {
        Self {
            product_id,
            quantity,
            price_at_point,
            rated: false,
            status: OrderStatus::Placed,
        }
    }

    /// Step this line item to `target`.
    pub fn advance(&mut self, target: OrderStatus) -> CommerceResult<()> {
        self.status.advance(target)
    }

    pub fn total(&self) -> Money {
        self.price_at_point.times(self.quantity)
    }
}

/// A customer's order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub placed_at: DateTime<Utc>,
    pub eta: DateTime<Utc>,
    /// Minimum-rank status of the line items.
    pub status: OrderStatus,
    pub shipping_fee: Money,
    pub shipment_details: ShipmentDetails,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_information: PaymentDetails,
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Create a placed order. Every line item starts at `PLACED`.
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        shipment_details: ShipmentDetails,
        payment_method: PaymentMethod,
        payment_information: PaymentDetails,
        shipping_fee: Money,
        line_items: Vec<LineItem>,
    ) -> Self {
        let placed_at = Utc::now();
        Self {
            id,
            customer_id,
            placed_at,
            eta: placed_at,
            status: OrderStatus::Placed,
            shipping_fee,
            shipment_details,
            payment_method,
            payment_information,
            line_items,
        }
    }

    /// Set the placement time and derive the ETA from it.
    pub fn with_placed_at(mut self, placed_at: DateTime<Utc>, eta_days: i64) -> Self {
        self.placed_at = placed_at;
        self.eta = placed_at + Duration::days(eta_days);
        self
    }

    pub fn line_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.line_items.iter().find(|li| &li.product_id == product_id)
    }

    pub fn line_item_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.line_items.iter_mut().find(|li| &li.product_id == product_id)
    }

    /// Look up a line item, failing with `ProductNotFound` if the order has none
    /// for this product.
    pub fn require_line_item_mut(&mut self, product_id: &ProductId) -> CommerceResult<&mut LineItem> {
        let order_id = self.id.clone();
        self.line_item_mut(product_id).ok_or_else(|| {
            CommerceError::ProductNotFound(format!("{} in order {}", product_id, order_id))
        })
    }

    /// Recompute the aggregate status from the line items.
    pub fn refresh_status(&mut self) -> CommerceResult<OrderStatus> {
        self.status = OrderStatus::aggregate(self.line_items.iter().map(|li| li.status))?;
        Ok(self.status)
    }

    /// Whether every line item is at `status` or beyond.
    pub fn all_at_least(&self, status: OrderStatus) -> bool {
        self.line_items.iter().all(|li| li.status.at_least(status))
    }

    pub fn is_fully_rated(&self) -> bool {
        self.line_items.iter().all(|li| li.rated)
    }

    /// Sum of line item totals, or None on a currency mismatch.
    pub fn subtotal(&self) -> Option<Money> {
        let totals: Vec<Money> = self.line_items.iter().map(LineItem::total).collect();
        let currency = totals.first().map(|m| m.currency).unwrap_or(self.shipping_fee.currency);
        Money::sum(&totals, currency)
    }

    pub fn total(&self) -> Option<Money> {
        self.subtotal()?.checked_add(&self.shipping_fee)
    }

    pub fn currency(&self) -> Currency {
        self.shipping_fee.currency
    }
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if self.line_items.is_empty() {
            return Err("an order needs at least one line item".to_string());
        }
        if self.shipping_fee.is_negative() {
            return Err("shipping fee must not be negative".to_string());
        }
        for li in &self.line_items {
            if li.quantity < 1 {
                return Err(format!("quantity of {} must be at least 1", li.product_id));
            }
            if li.price_at_point.is_negative() {
                return Err(format!("price of {} must not be negative", li.product_id));
            }
        }
        let aggregate = OrderStatus::aggregate(self.line_items.iter().map(|li| li.status))
            .map_err(|e| e.to_string())?;
        if aggregate != self.status {
            return Err(format!(
                "order status {} does not match line items ({})",
                self.status, aggregate
            ));
        }
        Ok(())
    }
}
