//! Reviews: rating a delivered line item fulfills it.

use comerce_domain::message::{Message, Report};
use comerce_domain::{CommerceError, CommerceResult, CustomerId, OrderStatus};
use tracing::Instrument;

use crate::loader::{load_order, load_product};
use crate::request::RateRequest;
use crate::service::FulfillmentService;

impl FulfillmentService {
    /// Rate one line item of an order under review.
    ///
    /// The line item becomes `FULFILLED` and the rating is appended to the
    /// product. The order is fulfilled once every line item is rated.
    pub async fn rate(&self, customer_id: &CustomerId, request: &RateRequest) -> CommerceResult<Report> {
        let span = tracing::info_span!(
            "rate",
            order_id = %request.order_id,
            product_id = %request.product_id
        );
        self.transact(|| self.rate_item(customer_id, request))
            .instrument(span)
            .await
    }

    async fn rate_item(&self, customer_id: &CustomerId, request: &RateRequest) -> CommerceResult<Report> {
        let max = self.settings().max_rating;
        if request.rating > max {
            return Err(CommerceError::InvalidState(format!(
                "rating must be between 0 and {}",
                max
            )));
        }

        let mut session = self.store().start_session();
        let mut order = load_order(&mut session, &request.order_id).await?;
        if &order.customer_id != customer_id {
            return Err(CommerceError::Unauthorized(format!(
                "order {} belongs to another customer",
                order.id
            )));
        }
        if order.status != OrderStatus::Review {
            return Err(CommerceError::InvalidState(format!(
                "order {} is {}, not up for review",
                order.id, order.status
            )));
        }

        let line = order.require_line_item_mut(&request.product_id)?;
        if line.rated {
            return Err(CommerceError::InvalidState(format!(
                "{} was already rated",
                request.product_id
            )));
        }
        line.rated = true;
        line.advance(OrderStatus::Fulfilled)?;

        let mut product = load_product(&mut session, &request.product_id).await?;
        product.add_rating(request.rating);
        let status = order.refresh_status()?;
        session.save(&product)?;
        session.save(&order)?;
        session.commit().await?;

        tracing::info!(rating = request.rating, status = %status, "line item rated");
        let mut report = Report::from(vec![Message::success(format!("Rated {}.", product.item))]);
        if status == OrderStatus::Fulfilled {
            report.push(Message::success(format!("Order {} fulfilled.", order.id)));
        }
        Ok(report)
    }
}
