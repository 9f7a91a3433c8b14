//! Product types.

use comerce_store::Document;
use serde::{Deserialize, Serialize};

use crate::ids::{BusinessId, LotId, ProductId};
use crate::money::Money;

/// A product sold by one business.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Display name.
    pub item: String,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub image_address: Option<String>,
    /// Current retail price; snapshotted into line items at placement.
    pub retail_price: Money,
    #[serde(default)]
    pub wholesale_price: Option<Money>,
    /// Minimum quantity for the wholesale price.
    #[serde(default)]
    pub wholesale_cap: Option<u32>,
    /// Ratings appended by customers.
    #[serde(default)]
    pub ratings: Vec<u8>,
    /// Inventory lots, in allocation order.
    #[serde(default)]
    pub lots: Vec<LotId>,
}

impl Product {
    pub fn new(
        id: ProductId,
        business_id: BusinessId,
        item: impl Into<String>,
        retail_price: Money,
    ) -> Self {
        Self {
            id,
            business_id,
            item: item.into(),
            brand: None,
            category: None,
            description: None,
            keywords: Vec::new(),
            image_address: None,
            retail_price,
            wholesale_price: None,
            wholesale_cap: None,
            ratings: Vec::new(),
            lots: Vec::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_wholesale(mut self, price: Money, cap: u32) -> Self {
        self.wholesale_price = Some(price);
        self.wholesale_cap = Some(cap);
        self
    }

    /// Append a lot reference. Lots are consumed in the order they were added.
    pub fn with_lot(mut self, lot: LotId) -> Self {
        self.add_lot(lot);
        self
    }

    pub fn add_lot(&mut self, lot: LotId) {
        if !self.lots.contains(&lot) {
            self.lots.push(lot);
        }
    }

    /// Unit price for a quantity, using the wholesale price at or above the cap.
    pub fn unit_price(&self, quantity: u32) -> Money {
        match (self.wholesale_price, self.wholesale_cap) {
            (Some(price), Some(cap)) if quantity >= cap => price,
            _ => self.retail_price,
        }
    }

    pub fn add_rating(&mut self, rating: u8) {
        self.ratings.push(rating);
    }

    /// Mean of all ratings, or None if unrated.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: u32 = self.ratings.iter().map(|r| *r as u32).sum();
        Some(total as f64 / self.ratings.len() as f64)
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if self.item.trim().is_empty() {
            return Err("item name is required".to_string());
        }
        if self.retail_price.is_negative() {
            return Err("retail price must not be negative".to_string());
        }
        if self.wholesale_price.is_some_and(|p| p.is_negative()) {
            return Err("wholesale price must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn product() -> Product {
        Product::new(
            ProductId::new("p1"),
            BusinessId::new("b1"),
            "Rice 5kg",
            Money::new(25000, Currency::PHP),
        )
    }

    #[test]
    fn test_unit_price_uses_wholesale_at_cap() {
        let p = product().with_wholesale(Money::new(22000, Currency::PHP), 10);
        assert_eq!(p.unit_price(9).centavos, 25000);
        assert_eq!(p.unit_price(10).centavos, 22000);
    }

    #[test]
    fn test_average_rating() {
        let mut p = product();
        assert_eq!(p.average_rating(), None);
        p.add_rating(5);
        p.add_rating(4);
        assert_eq!(p.average_rating(), Some(4.5));
    }

    #[test]
    fn test_lot_order_preserved_without_duplicates() {
        let p = product()
            .with_lot(LotId::new("l2"))
            .with_lot(LotId::new("l1"))
            .with_lot(LotId::new("l2"));
        assert_eq!(p.lots, vec![LotId::new("l2"), LotId::new("l1")]);
    }

    #[test]
    fn test_validate_requires_item() {
        let mut p = product();
        p.item = " ".to_string();
        assert!(p.validate().is_err());
    }
}
