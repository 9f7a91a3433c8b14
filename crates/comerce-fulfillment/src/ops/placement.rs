//! Order placement.
//!
//! Placement only checks that every product exists and has stock on hand.
//! Nothing is reserved: lots are allocated when the seller ships.

use chrono::Utc;
use comerce_domain::cart::CartEntry;
use comerce_domain::checkout::{LineItem, Order};
use comerce_domain::message::{Message, Report};
use comerce_domain::{CommerceError, CommerceResult, CustomerId, OrderId};
use tracing::Instrument;

use crate::loader::{read_stock, require_customer};
use crate::request::PlaceOrderRequest;
use crate::service::FulfillmentService;

/// A freshly placed order and the messages for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrderOutcome {
    pub order: Order,
    pub report: Report,
}

impl FulfillmentService {
    /// Place an order for `customer_id`.
    ///
    /// Fails as a whole on any invalid input; on success the order is stored
    /// with every line item at `PLACED`, and the customer's cart entries for
    /// the ordered products are removed in the same transaction.
    pub async fn place_order(
        &self,
        customer_id: &CustomerId,
        request: &PlaceOrderRequest,
    ) -> CommerceResult<PlaceOrderOutcome> {
        let span = tracing::info_span!("place_order", customer_id = %customer_id);
        self.place_order_inner(customer_id, request).instrument(span).await
    }

    async fn place_order_inner(
        &self,
        customer_id: &CustomerId,
        request: &PlaceOrderRequest,
    ) -> CommerceResult<PlaceOrderOutcome> {
        require_customer(self.store(), customer_id).await?;
        let items = request.merged_items()?;
        request.shipment_details.validate()?;
        let payment = request.payment_details.for_method(request.payment_method)?;
        if request.shipping_fee.is_negative() {
            return Err(CommerceError::Validation("shipping fee must not be negative".to_string()));
        }
        if request.shipping_fee.currency != self.settings().currency() {
            return Err(CommerceError::Validation(format!(
                "shipping fee must be in {}",
                self.settings().currency().code()
            )));
        }

        let mut line_items = Vec::with_capacity(items.len());
        for (product_id, quantity) in &items {
            let stock = read_stock(self.store(), product_id).await?;
            if !stock.is_available() {
                return Err(CommerceError::ProductNotFound(format!(
                    "{} is not available",
                    stock.product.item
                )));
            }
            line_items.push(LineItem::new(
                product_id.clone(),
                *quantity,
                stock.product.unit_price(*quantity),
            ));
        }

        let order = Order::new(
            OrderId::generate(),
            customer_id.clone(),
            request.shipment_details.clone(),
            request.payment_method,
            payment,
            request.shipping_fee,
            line_items,
        )
        .with_placed_at(Utc::now(), self.settings().eta_days);

        self.transact(|| self.store_order(&order)).await?;

        tracing::info!(order_id = %order.id, items = order.line_items.len(), "order placed");
        let report = Report::from(vec![Message::success(format!(
            "Order {} placed. Estimated arrival on {}.",
            order.id,
            order.eta.format("%B %-d, %Y")
        ))]);
        Ok(PlaceOrderOutcome { order, report })
    }

    /// Insert the order and clear the matching cart entries.
    async fn store_order(&self, order: &Order) -> CommerceResult<()> {
        let mut session = self.store().start_session();
        session.insert(order)?;

        let ordered: Vec<_> = order.line_items.iter().map(|li| li.product_id.clone()).collect();
        let entries = session
            .find::<CartEntry, _>(|e| e.customer_id == order.customer_id && ordered.contains(&e.product_id))
            .await?;
        for entry in &entries {
            session.delete::<CartEntry>(entry.id.as_str());
        }
        session.commit().await?;
        Ok(())
    }
}
