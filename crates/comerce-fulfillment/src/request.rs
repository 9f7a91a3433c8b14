//! Operation inputs.

use std::collections::BTreeMap;

use comerce_domain::checkout::{PaymentDetails, PaymentMethod, ShipmentDetails};
use comerce_domain::{BusinessId, CommerceError, CommerceResult, Money, OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// A claim over specific line items of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClaim {
    pub order_id: OrderId,
    pub product_ids: Vec<ProductId>,
}

impl OrderClaim {
    pub fn new(order_id: impl Into<OrderId>, product_ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            order_id: order_id.into(),
            product_ids: product_ids.into_iter().collect(),
        }
    }

    pub fn validate(&self) -> CommerceResult<()> {
        if self.order_id.as_str().trim().is_empty() {
            return Err(CommerceError::incomplete("order id"));
        }
        if self.product_ids.is_empty() {
            return Err(CommerceError::incomplete(format!("products of order {}", self.order_id)));
        }
        Ok(())
    }
}

/// Reject an empty batch or any incomplete claim.
pub(crate) fn validate_claims(claims: &[OrderClaim]) -> CommerceResult<()> {
    if claims.is_empty() {
        return Err(CommerceError::incomplete("no orders given"));
    }
    claims.iter().try_for_each(OrderClaim::validate)
}

/// Pick-up submission: claims grouped by the business they are collected from.
pub type PickUpRequest = BTreeMap<BusinessId, Vec<OrderClaim>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipment_details: ShipmentDetails,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_details: PaymentDetails,
    pub shipping_fee: Money,
}

impl PlaceOrderRequest {
    /// Items with duplicate products merged, in first-seen order.
    pub(crate) fn merged_items(&self) -> CommerceResult<Vec<(ProductId, u32)>> {
        if self.items.is_empty() {
            return Err(CommerceError::incomplete("no products ordered"));
        }
        let mut merged: Vec<(ProductId, u32)> = Vec::new();
        for item in &self.items {
            if item.quantity == 0 {
                return Err(CommerceError::Validation(format!(
                    "quantity of {} must be at least 1",
                    item.product_id
                )));
            }
            match merged.iter_mut().find(|(id, _)| id == &item.product_id) {
                Some((_, qty)) => *qty = qty.saturating_add(item.quantity),
                None => merged.push((item.product_id.clone(), item.quantity)),
            }
        }
        Ok(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRequest {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub rating: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use comerce_domain::Currency;

    fn item(id: &str, quantity: u32) -> OrderItemRequest {
        OrderItemRequest {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    fn request(items: Vec<OrderItemRequest>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            items,
            shipment_details: ShipmentDetails::default(),
            payment_method: PaymentMethod::CashOnDelivery,
            payment_details: PaymentDetails::default(),
            shipping_fee: Money::zero(Currency::PHP),
        }
    }

    #[test]
    fn test_merges_duplicate_products() {
        let merged = request(vec![item("a", 1), item("b", 2), item("a", 3)])
            .merged_items()
            .unwrap();
        assert_eq!(merged, vec![(ProductId::new("a"), 4), (ProductId::new("b"), 2)]);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(request(vec![item("a", 0)]).merged_items().is_err());
        assert!(matches!(
            request(vec![]).merged_items(),
            Err(CommerceError::IncompleteData(_))
        ));
    }

    #[test]
    fn test_claims_need_products() {
        let claims = vec![OrderClaim::new("o1", vec![])];
        assert!(matches!(
            validate_claims(&claims),
            Err(CommerceError::IncompleteData(_))
        ));
        assert!(validate_claims(&[]).is_err());
    }
}
