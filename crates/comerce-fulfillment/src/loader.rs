//! Hydrating loaders.
//!
//! Operations work on fully loaded domain structs. Loaders that take a
//! [`Session`] record what they read, so the enclosing unit's commit fails if
//! any of it changed; loaders that take a [`Store`] are plain reads for the
//! query side.

use std::collections::BTreeMap;

use comerce_domain::catalog::{Business, InventoryLot, Product};
use comerce_domain::checkout::Order;
use comerce_domain::logistics::LogisticsRecord;
use comerce_domain::people::{Customer, Deliverer};
use comerce_domain::{
    BusinessId, CommerceError, CommerceResult, CustomerId, DelivererId, LogisticsId, OrderId,
    ProductId,
};
use comerce_store::{Session, Store};

/// A product together with its inventory lots, in allocation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStock {
    pub product: Product,
    pub lots: Vec<InventoryLot>,
}

impl ProductStock {
    /// Aggregate on-hand across every lot. Widened, since each lot alone
    /// may hold up to `u32::MAX`.
    pub fn on_hand(&self) -> u64 {
        self.lots.iter().map(|l| u64::from(l.on_hand)).sum()
    }

    pub fn quantity(&self) -> u64 {
        self.lots.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn is_available(&self) -> bool {
        self.lots.iter().any(|l| l.on_hand > 0)
    }
}

/// An order with every product it references.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedOrder {
    pub order: Order,
    pub products: BTreeMap<ProductId, Product>,
}

impl HydratedOrder {
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Display name of a line item's product, falling back to its id.
    pub fn item_name(&self, id: &ProductId) -> String {
        self.product(id)
            .map(|p| p.item.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

pub async fn load_order(session: &mut Session, id: &OrderId) -> CommerceResult<Order> {
    session
        .find_by_id::<Order>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))
}

pub async fn load_product(session: &mut Session, id: &ProductId) -> CommerceResult<Product> {
    session
        .find_by_id::<Product>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
}

/// Load a product and its lots inside a transaction.
pub async fn load_stock(session: &mut Session, id: &ProductId) -> CommerceResult<ProductStock> {
    let product = load_product(session, id).await?;
    let mut lots = Vec::with_capacity(product.lots.len());
    for lot_id in &product.lots {
        let lot = session
            .find_by_id::<InventoryLot>(lot_id.as_str())
            .await?
            .ok_or_else(|| CommerceError::LotNotFound(lot_id.to_string()))?;
        lots.push(lot);
    }
    Ok(ProductStock { product, lots })
}

pub async fn load_logistics(session: &mut Session, id: &LogisticsId) -> CommerceResult<LogisticsRecord> {
    session
        .find_by_id::<LogisticsRecord>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::LogisticsNotFound(id.to_string()))
}

/// Load a product and its lots outside any transaction.
pub async fn read_stock(store: &Store, id: &ProductId) -> CommerceResult<ProductStock> {
    let product = read_product(store, id).await?;
    let mut lots = Vec::with_capacity(product.lots.len());
    for lot_id in &product.lots {
        match store.find_by_id::<InventoryLot>(lot_id.as_str()).await? {
            Some(lot) => lots.push(lot),
            None => return Err(CommerceError::LotNotFound(lot_id.to_string())),
        }
    }
    Ok(ProductStock { product, lots })
}

pub async fn read_product(store: &Store, id: &ProductId) -> CommerceResult<Product> {
    store
        .find_by_id::<Product>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
}

/// Load an order and every product it references.
pub async fn read_order_with_products(store: &Store, id: &OrderId) -> CommerceResult<HydratedOrder> {
    let order = store
        .find_by_id::<Order>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;
    let mut products = BTreeMap::new();
    for li in &order.line_items {
        if !products.contains_key(&li.product_id) {
            products.insert(li.product_id.clone(), read_product(store, &li.product_id).await?);
        }
    }
    Ok(HydratedOrder { order, products })
}

pub async fn require_business(store: &Store, id: &BusinessId) -> CommerceResult<Business> {
    store
        .find_by_id::<Business>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::BusinessNotFound(id.to_string()))
}

pub async fn require_deliverer(store: &Store, id: &DelivererId) -> CommerceResult<Deliverer> {
    store
        .find_by_id::<Deliverer>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::DelivererNotFound(id.to_string()))
}

pub async fn require_customer(store: &Store, id: &CustomerId) -> CommerceResult<Customer> {
    store
        .find_by_id::<Customer>(id.as_str())
        .await?
        .ok_or_else(|| CommerceError::CustomerNotFound(id.to_string()))
}
