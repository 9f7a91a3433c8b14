//! Inventory lots.

use chrono::{DateTime, Utc};
use comerce_store::Document;
use serde::{Deserialize, Serialize};

use crate::ids::{LotId, ProductId};

/// A batch of stock for one product, received at one time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLot {
    pub id: LotId,
    pub product_id: ProductId,
    pub date_stored: DateTime<Utc>,
    /// Total ever stored in this lot.
    pub quantity: u32,
    /// Currently available. Never exceeds `quantity`.
    pub on_hand: u32,
}

impl InventoryLot {
    /// Create a full lot.
    pub fn new(id: LotId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id,
            product_id,
            date_stored: Utc::now(),
            quantity,
            on_hand: quantity,
        }
    }

    pub fn with_on_hand(mut self, on_hand: u32) -> Self {
        self.on_hand = on_hand.min(self.quantity);
        self
    }

    pub fn with_date_stored(mut self, date: DateTime<Utc>) -> Self {
        self.date_stored = date;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_hand == 0
    }

    /// Take up to `amount` units and return how many were taken.
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.on_hand);
        self.on_hand -= taken;
        taken
    }

    /// Add received stock.
    pub fn restock(&mut self, amount: u32) {
        self.quantity = self.quantity.saturating_add(amount);
        self.on_hand = self.on_hand.saturating_add(amount);
    }
}

impl Document for InventoryLot {
    const COLLECTION: &'static str = "inventories";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if self.on_hand > self.quantity {
            return Err(format!(
                "on hand {} exceeds stored quantity {}",
                self.on_hand, self.quantity
            ));
        }
        Ok(())
    }
}
