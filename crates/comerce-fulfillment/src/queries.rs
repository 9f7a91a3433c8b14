//! Read-side queries. None of these open a transaction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use comerce_domain::catalog::{Business, Product};
use comerce_domain::checkout::{Order, PaymentMethod, ShipmentDetails};
use comerce_domain::logistics::{LogisticsRecord, LogisticsType};
use comerce_domain::message::{Message, Report};
use comerce_domain::{
    BusinessId, CommerceResult, CustomerId, DelivererId, Money, OrderId, OrderStatus, ProductId,
};
use serde::{Deserialize, Serialize};

use crate::loader::{read_order_with_products, read_product, read_stock, require_business};
use crate::request::OrderClaim;
use crate::service::FulfillmentService;

/// A line item as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedItem {
    pub product_id: ProductId,
    pub item: String,
    pub quantity: u32,
    pub price_at_point: Money,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickUpOrder {
    pub order_id: OrderId,
    pub customer_name: String,
    pub items: Vec<ListedItem>,
}

/// Packed line items waiting at one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickUpListing {
    pub business: Business,
    pub orders: Vec<PickUpOrder>,
    pub total_quantity: u64,
}

impl PickUpListing {
    /// The claims to submit when picking everything up.
    pub fn claims(&self) -> Vec<OrderClaim> {
        self.orders
            .iter()
            .map(|o| OrderClaim::new(o.order_id.clone(), o.items.iter().map(|i| i.product_id.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waybill {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub shipment_details: ShipmentDetails,
    pub payment_method: PaymentMethod,
    pub items: Vec<ListedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaybillBatch {
    pub waybills: Vec<Waybill>,
    pub report: Report,
}

/// An unrated line item of a delivered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCandidate {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub item: String,
    pub quantity: u32,
}

/// Stock of one product across its lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub product_id: ProductId,
    pub item: String,
    pub lots: usize,
    pub quantity: u64,
    pub on_hand: u64,
}

fn listed(product: Option<&Product>, li: &comerce_domain::checkout::LineItem) -> ListedItem {
    ListedItem {
        product_id: li.product_id.clone(),
        item: product.map(|p| p.item.clone()).unwrap_or_else(|| li.product_id.to_string()),
        quantity: li.quantity,
        price_at_point: li.price_at_point,
        status: li.status,
    }
}

/// Parse waybill path parameters.
///
/// `orders` is `o1+o2`; `products` holds one group per order separated by
/// `-`, products within a group separated by `+` (`p1+p2-p3`). Orders
/// without a matching group are dropped.
pub fn parse_waybill_ids(orders: &str, products: &str) -> Vec<OrderClaim> {
    let groups: Vec<Vec<ProductId>> = products
        .split('-')
        .map(|group| {
            group
                .split('+')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ProductId::new)
                .collect()
        })
        .collect();

    orders
        .split('+')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .zip(groups)
        .filter(|(_, group)| !group.is_empty())
        .map(|(order, group)| OrderClaim::new(OrderId::new(order), group))
        .collect()
}

impl FulfillmentService {
    /// Every packed line item, grouped by business and then by order.
    pub async fn for_pick_up(&self) -> CommerceResult<Vec<PickUpListing>> {
        let orders = self
            .store()
            .find::<Order, _>(|o| o.line_items.iter().any(|li| li.status == OrderStatus::Packed))
            .await?;

        let mut products: BTreeMap<ProductId, Product> = BTreeMap::new();
        let mut grouped: BTreeMap<BusinessId, BTreeMap<OrderId, PickUpOrder>> = BTreeMap::new();
        for order in &orders {
            for li in order.line_items.iter().filter(|li| li.status == OrderStatus::Packed) {
                if !products.contains_key(&li.product_id) {
                    let product = read_product(self.store(), &li.product_id).await?;
                    products.insert(li.product_id.clone(), product);
                }
                let Some(product) = products.get(&li.product_id) else {
                    continue;
                };
                grouped
                    .entry(product.business_id.clone())
                    .or_default()
                    .entry(order.id.clone())
                    .or_insert_with(|| PickUpOrder {
                        order_id: order.id.clone(),
                        customer_name: order.shipment_details.full_name(),
                        items: Vec::new(),
                    })
                    .items
                    .push(listed(Some(product), li));
            }
        }

        let mut listings = Vec::with_capacity(grouped.len());
        for (business_id, orders) in grouped {
            let business = require_business(self.store(), &business_id).await?;
            let orders: Vec<PickUpOrder> = orders.into_values().collect();
            let total_quantity = orders
                .iter()
                .flat_map(|o| o.items.iter())
                .map(|i| u64::from(i.quantity))
                .sum();
            listings.push(PickUpListing {
                business,
                orders,
                total_quantity,
            });
        }
        Ok(listings)
    }

    /// Waybill contents for a seller: each order's shipment details with only
    /// the claimed line items of `business_id`.
    pub async fn waybill_data(&self, business_id: &BusinessId, claims: &[OrderClaim]) -> CommerceResult<WaybillBatch> {
        require_business(self.store(), business_id).await?;
        let mut waybills = Vec::with_capacity(claims.len());
        let mut report = Report::new();

        for claim in claims {
            let hydrated = match read_order_with_products(self.store(), &claim.order_id).await {
                Ok(hydrated) => hydrated,
                Err(e) => {
                    report.push(Message::from(&e));
                    continue;
                }
            };
            let items: Vec<ListedItem> = hydrated
                .order
                .line_items
                .iter()
                .filter(|li| claim.product_ids.contains(&li.product_id))
                .filter(|li| {
                    hydrated
                        .product(&li.product_id)
                        .is_some_and(|p| &p.business_id == business_id)
                })
                .map(|li| listed(hydrated.product(&li.product_id), li))
                .collect();

            if items.is_empty() {
                report.push(Message::warning(format!(
                    "Order {} has none of your products",
                    claim.order_id
                )));
                continue;
            }
            let order = hydrated.order;
            waybills.push(Waybill {
                order_id: order.id,
                placed_at: order.placed_at,
                shipment_details: order.shipment_details,
                payment_method: order.payment_method,
                items,
            });
        }
        Ok(WaybillBatch { waybills, report })
    }

    /// Open logistics records of a deliverer, oldest first.
    pub async fn logistics_with_me(
        &self,
        deliverer_id: &DelivererId,
        logistics_type: LogisticsType,
    ) -> CommerceResult<Vec<LogisticsRecord>> {
        let mut records = self
            .store()
            .find::<LogisticsRecord, _>(|r| {
                &r.deliverer_id == deliverer_id && r.logistics_type == logistics_type && !r.is_terminal()
            })
            .await?;
        records.sort_by(|a, b| a.date_started.cmp(&b.date_started));
        Ok(records)
    }

    /// Unrated line items of the customer's orders under review.
    pub async fn products_to_rate(&self, customer_id: &CustomerId) -> CommerceResult<Vec<RateCandidate>> {
        let orders = self
            .store()
            .find::<Order, _>(|o| &o.customer_id == customer_id && o.status == OrderStatus::Review)
            .await?;

        let mut candidates = Vec::new();
        for order in orders {
            for li in order.line_items.iter().filter(|li| !li.rated) {
                let product = read_product(self.store(), &li.product_id).await?;
                candidates.push(RateCandidate {
                    order_id: order.id.clone(),
                    product_id: li.product_id.clone(),
                    item: product.item,
                    quantity: li.quantity,
                });
            }
        }
        Ok(candidates)
    }

    /// Stock per product of a business.
    pub async fn inventory_summary(&self, business_id: &BusinessId) -> CommerceResult<Vec<StockSummary>> {
        require_business(self.store(), business_id).await?;
        let products = self
            .store()
            .find::<Product, _>(|p| &p.business_id == business_id)
            .await?;

        let mut summary = Vec::with_capacity(products.len());
        for product in products {
            let stock = read_stock(self.store(), &product.id).await?;
            summary.push(StockSummary {
                product_id: product.id,
                item: product.item,
                lots: stock.lots.len(),
                quantity: stock.quantity(),
                on_hand: stock.on_hand(),
            });
        }
        Ok(summary)
    }

    /// Whether a product has any stock on hand.
    pub async fn is_available(&self, product_id: &ProductId) -> CommerceResult<bool> {
        Ok(read_stock(self.store(), product_id).await?.is_available())
    }
}
