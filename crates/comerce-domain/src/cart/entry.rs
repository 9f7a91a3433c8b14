//! Cart entry type.

use chrono::{DateTime, Utc};
use comerce_store::Document;
use serde::{Deserialize, Serialize};

use crate::ids::{CartEntryId, CustomerId, ProductId};

/// One product in a customer's cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    pub id: CartEntryId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub date_added: DateTime<Utc>,
}

impl CartEntry {
    /// A new entry holding a single unit.
    pub fn new(customer_id: CustomerId, product_id: ProductId) -> Self {
        Self {
            id: CartEntryId::generate(),
            customer_id,
            product_id,
            quantity: 1,
            date_added: Utc::now(),
        }
    }

    /// Add one more unit and refresh the date added.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
        self.date_added = Utc::now();
    }
}

impl Document for CartEntry {
    const COLLECTION: &'static str = "carts";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if self.quantity == 0 {
            return Err("cart quantity must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment() {
        let mut entry = CartEntry::new(CustomerId::new("c1"), ProductId::new("p1"));
        assert_eq!(entry.quantity, 1);
        entry.increment();
        assert_eq!(entry.quantity, 2);
    }
}
