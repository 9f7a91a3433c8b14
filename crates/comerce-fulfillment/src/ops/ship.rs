//! Seller shipping: allocates inventory and moves line items to `LOGISTICS`.

use comerce_domain::message::{Message, Report};
use comerce_domain::{BusinessId, CommerceError, CommerceResult, OrderStatus};
use tracing::Instrument;

use crate::allocation::allocate;
use crate::loader::{load_order, load_stock, require_business};
use crate::request::{validate_claims, OrderClaim};
use crate::service::{run_batch, FulfillmentService};

impl FulfillmentService {
    /// Ship the claimed line items of `business_id`.
    ///
    /// Each order is one unit: its lot and line item changes commit together
    /// or not at all. A line item whose lots fall short is skipped with a
    /// warning and its lots stay untouched; the rest of the order still ships.
    pub async fn ship(&self, business_id: &BusinessId, claims: &[OrderClaim]) -> CommerceResult<Report> {
        validate_claims(claims)?;
        require_business(self.store(), business_id).await?;

        let units = claims
            .iter()
            .map(|claim| {
                let span = tracing::info_span!("ship", order_id = %claim.order_id, business_id = %business_id);
                self.unit(
                    |e| format!("Unable to ship order {}: {}", claim.order_id, e),
                    || self.ship_order(business_id, claim),
                )
                .instrument(span)
            })
            .collect();
        Ok(run_batch("ship", units).await)
    }

    async fn ship_order(&self, business_id: &BusinessId, claim: &OrderClaim) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let mut order = load_order(&mut session, &claim.order_id).await?;
        if order.status == OrderStatus::FailedCancelled {
            return Err(CommerceError::transition(order.status, OrderStatus::Logistics));
        }
        let customer_name = order.shipment_details.full_name();
        let mut report = Report::new();
        let mut shipped = 0usize;

        for product_id in &claim.product_ids {
            let mut stock = load_stock(&mut session, product_id).await?;
            let item = stock.product.item.clone();
            if &stock.product.business_id != business_id {
                report.push(Message::warning(format!("{} is not sold by your business", item)));
                continue;
            }

            let line = order.require_line_item_mut(product_id)?;
            match line.status {
                OrderStatus::Placed => {}
                OrderStatus::FailedCancelled => {
                    return Err(CommerceError::transition(line.status, OrderStatus::Logistics));
                }
                _ => {
                    report.push(Message::info(format!("{} was already shipped", item)));
                    continue;
                }
            }

            let allocation = allocate(line.quantity, &mut stock.lots);
            if !allocation.is_complete() {
                tracing::warn!(
                    product_id = %product_id,
                    requested = line.quantity,
                    shortfall = allocation.shortfall,
                    "insufficient inventory"
                );
                report.push(Message::info(format!("Order for {} not shipped", customer_name)));
                report.push(Message::warning(format!("{} has insufficient quantity", item)));
                continue;
            }

            for lot in stock.lots.iter().filter(|l| allocation.touches(&l.id)) {
                session.save(lot)?;
            }
            line.advance(OrderStatus::Logistics)?;
            shipped += 1;
            tracing::debug!(product_id = %product_id, lots = allocation.consumed.len(), "line item allocated");
            report.push(Message::info(format!("Inventory of {} updated", item)));
        }

        if shipped == 0 {
            session.abort();
            return Ok(report);
        }

        let status = order.refresh_status()?;
        session.save(&order)?;
        session.commit().await?;

        tracing::info!(shipped, status = %status, "order shipped");
        report.push(Message::success(format!(
            "Your products for the order of {} is waiting to be packed",
            customer_name
        )));
        Ok(report)
    }
}
