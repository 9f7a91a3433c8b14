//! Logistics round outcomes: warehouse arrival, customer delivery, failed
//! attempts and cancellation.

use std::collections::BTreeMap;

use chrono::Utc;
use comerce_domain::logistics::{CoveredOrder, LogisticsRecord, LogisticsType};
use comerce_domain::message::{Message, Report};
use comerce_domain::{
    CommerceError, CommerceResult, DelivererId, LogisticsId, OrderId, OrderStatus,
};
use comerce_store::Session;
use tracing::Instrument;

use crate::loader::{load_logistics, load_order, require_deliverer};
use crate::service::{run_batch, FulfillmentService};

/// Move every line item covered by `record` to `target` and refresh the
/// affected orders. Returns how many line items moved.
async fn advance_covered(
    session: &mut Session,
    record: &LogisticsRecord,
    target: OrderStatus,
) -> CommerceResult<usize> {
    let mut orders = BTreeMap::new();
    let mut moved = 0;
    for (order_id, product_id) in record.covered_items() {
        if !orders.contains_key(order_id) {
            let order = load_order(session, order_id).await?;
            orders.insert(order_id.clone(), order);
        }
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
        order.require_line_item_mut(product_id)?.advance(target)?;
        moved += 1;
    }
    for order in orders.values_mut() {
        order.refresh_status()?;
    }
    for order in orders.values() {
        session.save(order)?;
    }
    Ok(moved)
}

/// Load a record the deliverer owns.
async fn load_owned(
    session: &mut Session,
    deliverer_id: &DelivererId,
    logistics_id: &LogisticsId,
) -> CommerceResult<LogisticsRecord> {
    let record = load_logistics(session, logistics_id).await?;
    if &record.deliverer_id != deliverer_id {
        return Err(CommerceError::Unauthorized(format!(
            "logistics {} belongs to another deliverer",
            logistics_id
        )));
    }
    Ok(record)
}

impl FulfillmentService {
    /// Close a pick-up round: the collected line items reach the warehouse.
    pub async fn record_pick_up_success(
        &self,
        deliverer_id: &DelivererId,
        logistics_id: &LogisticsId,
        proof: &str,
    ) -> CommerceResult<Report> {
        let span = tracing::info_span!("pick_up_success", logistics_id = %logistics_id);
        self.transact(|| {
            self.close_round(
                deliverer_id,
                logistics_id,
                proof,
                LogisticsType::SellerPickUp,
                OrderStatus::Warehouse,
            )
        })
        .instrument(span)
        .await
    }

    /// Close a delivery round: the customer received the order, which is
    /// now up for review.
    pub async fn record_delivery_success(
        &self,
        deliverer_id: &DelivererId,
        logistics_id: &LogisticsId,
        proof: &str,
    ) -> CommerceResult<Report> {
        let span = tracing::info_span!("delivery_success", logistics_id = %logistics_id);
        self.transact(|| {
            self.close_round(
                deliverer_id,
                logistics_id,
                proof,
                LogisticsType::CustomerDelivery,
                OrderStatus::Review,
            )
        })
        .instrument(span)
        .await
    }

    async fn close_round(
        &self,
        deliverer_id: &DelivererId,
        logistics_id: &LogisticsId,
        proof: &str,
        expected: LogisticsType,
        target: OrderStatus,
    ) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let mut record = load_owned(&mut session, deliverer_id, logistics_id).await?;
        if record.logistics_type != expected {
            return Err(CommerceError::InvalidState(format!(
                "logistics {} is a {} round",
                logistics_id, record.logistics_type
            )));
        }
        record.record_success(proof)?;
        let moved = advance_covered(&mut session, &record, target).await?;
        session.save(&record)?;
        session.commit().await?;

        tracing::info!(moved, status = %target, "logistics round succeeded");
        Ok(Report::from(vec![Message::success(format!(
            "Logistics {} completed. {} product(s) set to {}.",
            logistics_id, moved, target
        ))]))
    }

    /// Start delivery rounds for orders that are complete at the warehouse.
    /// One unit per order.
    pub async fn dispatch_deliveries(
        &self,
        deliverer_id: &DelivererId,
        order_ids: &[OrderId],
    ) -> CommerceResult<Report> {
        if order_ids.is_empty() {
            return Err(CommerceError::incomplete("no orders to deliver"));
        }
        require_deliverer(self.store(), deliverer_id).await?;

        let units = order_ids
            .iter()
            .map(|order_id| {
                let span = tracing::info_span!("dispatch", order_id = %order_id, deliverer_id = %deliverer_id);
                self.unit(
                    move |e| format!("Unable to deliver order {}: {}", order_id, e),
                    || self.dispatch_order(deliverer_id, order_id),
                )
                .instrument(span)
            })
            .collect();
        Ok(run_batch("dispatch", units).await)
    }

    async fn dispatch_order(&self, deliverer_id: &DelivererId, order_id: &OrderId) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let mut order = load_order(&mut session, order_id).await?;
        if order.line_items.iter().any(|li| li.status != OrderStatus::Warehouse) {
            return Err(CommerceError::InvalidState(format!(
                "order {} is not complete at the warehouse",
                order_id
            )));
        }

        for line in &mut order.line_items {
            line.advance(OrderStatus::Delivery)?;
        }
        order.refresh_status()?;

        let covered = CoveredOrder {
            order_id: order.id.clone(),
            product_ids: order.line_items.iter().map(|li| li.product_id.clone()).collect(),
        };
        let record = LogisticsRecord::delivery(deliverer_id.clone(), order.customer_id.clone(), vec![covered]);
        session.save(&order)?;
        session.insert(&record)?;
        session.commit().await?;

        tracing::info!(logistics_id = %record.id, "delivery round created");
        Ok(Report::from(vec![Message::success(format!(
            "Order {} is out for delivery to {}.",
            order_id,
            order.shipment_details.full_name()
        ))]))
    }

    /// Log a failed attempt on a round.
    ///
    /// Reaching the cap makes the round cancel-eligible. With
    /// `auto_cancel_on_cap` the cancellation cascade runs right away.
    pub async fn record_failed_attempt(
        &self,
        deliverer_id: &DelivererId,
        logistics_id: &LogisticsId,
        reason: &str,
    ) -> CommerceResult<Report> {
        let span = tracing::info_span!("failed_attempt", logistics_id = %logistics_id);
        self.transact(|| self.fail_attempt(deliverer_id, logistics_id, reason))
            .instrument(span)
            .await
    }

    async fn fail_attempt(
        &self,
        deliverer_id: &DelivererId,
        logistics_id: &LogisticsId,
        reason: &str,
    ) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let mut record = load_owned(&mut session, deliverer_id, logistics_id).await?;
        let attempts = record.record_failed_attempt(reason, Utc::now())?;
        let cap = self.settings().failed_attempt_cap;

        let mut report = Report::new();
        if record.is_cancel_eligible(cap) {
            if self.settings().auto_cancel_on_cap {
                record.cancelled = true;
                let moved = advance_covered(&mut session, &record, OrderStatus::FailedCancelled).await?;
                tracing::warn!(attempts, moved, "failed attempt cap reached, round cancelled");
                report.push(Message::warning(format!(
                    "{} reached final attempt. Logistics cancelled.",
                    logistics_id
                )));
            } else {
                tracing::warn!(attempts, "failed attempt cap reached");
                report.push(Message::warning(format!(
                    "{} reached final attempt. Logistics can be cancelled.",
                    logistics_id
                )));
            }
        } else {
            tracing::info!(attempts, "failed attempt recorded");
            report.push(Message::info(format!("Delivery attempt to {} recorded.", logistics_id)));
        }

        session.save(&record)?;
        session.commit().await?;
        Ok(report)
    }

    /// Cancel a round that reached the failed-attempt cap. Every covered
    /// line item, and therefore its order, becomes `FAILED_CANCELLED`.
    ///
    /// With a `deliverer_id` only that deliverer's own round can be cancelled;
    /// `None` is for administrators and may cancel any round.
    pub async fn cancel_logistics(
        &self,
        deliverer_id: Option<&DelivererId>,
        logistics_id: &LogisticsId,
    ) -> CommerceResult<Report> {
        let span = tracing::info_span!("cancel_logistics", logistics_id = %logistics_id);
        self.transact(|| self.cancel_round(deliverer_id, logistics_id))
            .instrument(span)
            .await
    }

    async fn cancel_round(
        &self,
        deliverer_id: Option<&DelivererId>,
        logistics_id: &LogisticsId,
    ) -> CommerceResult<Report> {
        let mut session = self.store().start_session();
        let mut record = match deliverer_id {
            Some(deliverer_id) => load_owned(&mut session, deliverer_id, logistics_id).await?,
            None => load_logistics(&mut session, logistics_id).await?,
        };
        record.ensure_open()?;
        let cap = self.settings().failed_attempt_cap;
        if !record.is_cancel_eligible(cap) {
            return Err(CommerceError::InvalidState(format!(
                "logistics {} has {} failed attempt(s), {} needed to cancel",
                logistics_id,
                record.failed_attempts.len(),
                cap
            )));
        }

        record.cancelled = true;
        let moved = advance_covered(&mut session, &record, OrderStatus::FailedCancelled).await?;
        session.save(&record)?;
        session.commit().await?;

        tracing::warn!(moved, "logistics round cancelled");
        Ok(Report::from(vec![Message::warning(format!(
            "Logistics {} cancelled. {} product(s) set to {}.",
            logistics_id,
            moved,
            OrderStatus::FailedCancelled
        ))]))
    }
}
