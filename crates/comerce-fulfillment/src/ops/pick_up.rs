//! Pick-up rounds: a deliverer collects packed line items from businesses.

use comerce_domain::catalog::Business;
use comerce_domain::logistics::{CoveredOrder, LogisticsRecord};
use comerce_domain::message::{Message, Report};
use comerce_domain::{BusinessId, CommerceError, CommerceResult, DelivererId, OrderStatus};
use tracing::Instrument;

use crate::loader::{load_order, load_product, require_deliverer};
use crate::request::{validate_claims, OrderClaim, PickUpRequest};
use crate::service::{run_batch, FulfillmentService};

impl FulfillmentService {
    /// Create one pick-up logistics record per business and move the
    /// claimed line items to `PICK_UP`.
    ///
    /// Each business group is its own unit. Line items outside the request
    /// are never touched, so an order only reaches `PICK_UP` once every one
    /// of its line items has been collected.
    pub async fn pick_up(&self, deliverer_id: &DelivererId, request: &PickUpRequest) -> CommerceResult<Report> {
        if request.is_empty() {
            return Err(CommerceError::incomplete("no businesses to pick up from"));
        }
        for claims in request.values() {
            validate_claims(claims)?;
        }
        require_deliverer(self.store(), deliverer_id).await?;

        let units = request
            .iter()
            .map(|(business_id, claims)| {
                let span = tracing::info_span!("pick_up", business_id = %business_id, deliverer_id = %deliverer_id);
                self.unit(
                    move |e| format!("Unable to pick up order(s) from {}: {}", business_id, e),
                    || self.pick_up_group(deliverer_id, business_id, claims),
                )
                .instrument(span)
            })
            .collect();
        Ok(run_batch("pick_up", units).await)
    }

    async fn pick_up_group(
        &self,
        deliverer_id: &DelivererId,
        business_id: &BusinessId,
        claims: &[OrderClaim],
    ) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let business = session
            .find_by_id::<Business>(business_id.as_str())
            .await?
            .ok_or_else(|| CommerceError::BusinessNotFound(business_id.to_string()))?;

        let mut report = Report::new();
        let mut covered = Vec::with_capacity(claims.len());
        for claim in claims {
            let mut order = load_order(&mut session, &claim.order_id).await?;
            if order.status == OrderStatus::FailedCancelled {
                return Err(CommerceError::transition(order.status, OrderStatus::PickUp));
            }
            let mut names = Vec::with_capacity(claim.product_ids.len());
            for product_id in &claim.product_ids {
                let product = load_product(&mut session, product_id).await?;
                if &product.business_id != business_id {
                    return Err(CommerceError::InvalidState(format!(
                        "{} is not sold by {}",
                        product.item, business.business_name
                    )));
                }
                order.require_line_item_mut(product_id)?.advance(OrderStatus::PickUp)?;
                names.push(product.item);
            }

            let status = order.refresh_status()?;
            session.save(&order)?;
            report.push(Message::info(format!(
                "Products '{}' of order {} set to {}",
                names.join(", "),
                order.id,
                OrderStatus::PickUp
            )));
            if status == OrderStatus::PickUp {
                report.push(Message::info(format!("Order {} set to {}", order.id, OrderStatus::PickUp)));
            }
            covered.push(CoveredOrder {
                order_id: claim.order_id.clone(),
                product_ids: claim.product_ids.clone(),
            });
        }

        let record = LogisticsRecord::pick_up(deliverer_id.clone(), business_id.clone(), covered);
        session.insert(&record)?;
        session.commit().await?;

        tracing::info!(logistics_id = %record.id, orders = claims.len(), "pick-up round created");
        report.push(Message::success(format!(
            "Logistics record for {} created.",
            business.business_name
        )));
        Ok(report)
    }
}
