//! Packing: `LOGISTICS` to `PACKED`, once the waybill is printed.

use comerce_domain::message::{Message, Report};
use comerce_domain::{BusinessId, CommerceError, CommerceResult, OrderStatus};
use tracing::Instrument;

use crate::loader::{load_order, load_product, require_business};
use crate::request::{validate_claims, OrderClaim};
use crate::service::{run_batch, FulfillmentService};

impl FulfillmentService {
    /// Mark the claimed line items of `business_id` as packed.
    ///
    /// Re-packing an already packed line item is a no-op, as long as the
    /// order has not been picked up yet.
    pub async fn pack(&self, business_id: &BusinessId, claims: &[OrderClaim]) -> CommerceResult<Report> {
        validate_claims(claims)?;
        require_business(self.store(), business_id).await?;

        let units = claims
            .iter()
            .map(|claim| {
                let span = tracing::info_span!("pack", order_id = %claim.order_id, business_id = %business_id);
                self.unit(
                    |e| format!("Unable to pack order {}: {}", claim.order_id, e),
                    || self.pack_order(business_id, claim),
                )
                .instrument(span)
            })
            .collect();
        Ok(run_batch("pack", units).await)
    }

    async fn pack_order(&self, business_id: &BusinessId, claim: &OrderClaim) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let mut order = load_order(&mut session, &claim.order_id).await?;
        if order.status == OrderStatus::FailedCancelled || order.status.at_least(OrderStatus::PickUp) {
            return Err(CommerceError::transition(order.status, OrderStatus::Packed));
        }

        let mut report = Report::new();
        let mut packed = 0usize;
        for product_id in &claim.product_ids {
            let product = load_product(&mut session, product_id).await?;
            if &product.business_id != business_id {
                report.push(Message::warning(format!("{} is not sold by your business", product.item)));
                continue;
            }
            let line = order.require_line_item_mut(product_id)?;
            match line.status {
                OrderStatus::Logistics => {
                    line.advance(OrderStatus::Packed)?;
                    packed += 1;
                }
                OrderStatus::Packed => {}
                other => return Err(CommerceError::transition(other, OrderStatus::Packed)),
            }
        }

        if packed > 0 {
            order.refresh_status()?;
            session.save(&order)?;
            session.commit().await?;
            tracing::info!(packed, "line items packed");
        } else {
            session.abort();
        }

        report.push(Message::success(format!(
            "Prepare packing ordered products of {}",
            order.shipment_details.full_name()
        )));
        Ok(report)
    }
}
