//! HTTP surface for the Comerce fulfillment service.
//!
//! A thin layer: it reads the caller identity supplied by the authentication
//! middleware, decodes the JSON body, runs one fulfillment operation and wraps
//! its report in a `{ "messages": [...] }` envelope.
//!
//! ```rust,ignore
//! let api = ComerceApi::new(FulfillmentService::with_defaults(store));
//! let response: http::Response<Vec<u8>> = api.handle(request).await;
//! ```
//!
//! Status codes: 200/201 on success (batches with failed units included),
//! 406 for invalid input, 404 for unknown references, 401 for a missing or
//! wrong role, 500 for anything unexpected.

mod error;
mod request;
mod response;

use comerce_domain::catalog::Business;
use comerce_domain::message::Report;
use comerce_domain::people::UserType;
use comerce_domain::{BusinessId, CommerceError};
use comerce_fulfillment::{parse_waybill_ids, FulfillmentService, PlaceOrderRequest, RateRequest};
use tracing::Instrument;

pub use error::{status_for, ApiError};
pub use request::{
    parse_body, request_id, AttemptBody, Caller, CartBody, ClaimsBody, DispatchBody, LogisticsBody,
    PickUpBody, ProofBody, ReceiveLotBody, Route, REQUEST_ID_HEADER, USER_ID_HEADER,
    USER_TYPE_HEADER,
};
pub use response::ApiResponse;

/// Request dispatcher.
#[derive(Clone)]
pub struct ComerceApi {
    service: FulfillmentService,
}

impl ComerceApi {
    pub fn new(service: FulfillmentService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &FulfillmentService {
        &self.service
    }

    /// Handle one HTTP request.
    pub async fn handle(&self, request: http::Request<Vec<u8>>) -> http::Response<Vec<u8>> {
        let request_id = request_id(request.headers());
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = request.uri().path()
        );
        async {
            let response = match self.dispatch(&request).await {
                Ok(response) => response,
                Err(e) => ApiResponse::from(e),
            };
            tracing::info!(status = response.status.as_u16(), "request handled");
            let mut http = response.into_http();
            if let Ok(value) = http::HeaderValue::from_str(request_id.as_str()) {
                http.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            http
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request: &http::Request<Vec<u8>>) -> Result<ApiResponse, ApiError> {
        let path = request.uri().path();
        let route = Route::resolve(request.method(), path).ok_or_else(|| ApiError::RouteNotFound {
            method: request.method().to_string(),
            path: path.to_string(),
        })?;
        let caller = Caller::from_headers(request.headers())?;
        self.route(route, &caller, request.body()).await
    }

    /// Run `route` for an already identified caller.
    pub async fn route(&self, route: Route, caller: &Caller, body: &[u8]) -> Result<ApiResponse, ApiError> {
        let service = &self.service;
        let response = match route {
            Route::PlaceOrder => {
                let customer = caller.as_customer()?;
                let request: PlaceOrderRequest = parse_body(body)?;
                let outcome = service.place_order(&customer, &request).await?;
                ApiResponse::created(outcome.report).with_field("order", &outcome.order)
            }
            Route::AddToCart => {
                let customer = caller.as_customer()?;
                let body: CartBody = parse_body(body)?;
                let entry = service.add_to_cart(&customer, &body.product_id).await?;
                ApiResponse::ok(Report::new()).with_field("entry", &entry)
            }
            Route::CartCount => {
                let customer = caller.as_customer()?;
                let count = service.cart_item_count(&customer).await?;
                ApiResponse::ok(Report::new()).with_field("count", count)
            }
            Route::CartList => {
                let customer = caller.as_customer()?;
                let cart = service.cart_entries(&customer).await?;
                ApiResponse::ok(Report::new()).with_field("cart", &cart)
            }
            Route::Ship => {
                let business = self.seller_business(caller).await?;
                let body: ClaimsBody = parse_body(body)?;
                ApiResponse::ok(service.ship(&business, &body.orders).await?)
            }
            Route::Pack => {
                let business = self.seller_business(caller).await?;
                let body: ClaimsBody = parse_body(body)?;
                ApiResponse::ok(service.pack(&business, &body.orders).await?)
            }
            Route::Waybill { orders, products } => {
                let business = self.seller_business(caller).await?;
                let claims = parse_waybill_ids(&orders, &products);
                if claims.is_empty() {
                    return Err(CommerceError::incomplete("orders and products of the waybill").into());
                }
                let batch = service.waybill_data(&business, &claims).await?;
                ApiResponse::ok(batch.report).with_field("waybills", &batch.waybills)
            }
            Route::Inventory => {
                let business = self.seller_business(caller).await?;
                let summary = service.inventory_summary(&business).await?;
                ApiResponse::ok(Report::new()).with_field("inventory", &summary)
            }
            Route::ReceiveLot => {
                let business = self.seller_business(caller).await?;
                let body: ReceiveLotBody = parse_body(body)?;
                let lot = service.receive_lot(&business, &body.product_id, body.quantity).await?;
                ApiResponse::created(Report::new()).with_field("lot", &lot)
            }
            Route::ForPickUp => {
                caller.require(&[UserType::Logistics, UserType::Admin])?;
                let listings = service.for_pick_up().await?;
                ApiResponse::ok(Report::new()).with_field("businesses", &listings)
            }
            Route::PickUp => {
                let deliverer = caller.as_deliverer()?;
                let body: PickUpBody = parse_body(body)?;
                ApiResponse::created(service.pick_up(&deliverer, &body.businesses).await?)
            }
            Route::PickUpSuccess => {
                let deliverer = caller.as_deliverer()?;
                let body: ProofBody = parse_body(body)?;
                ApiResponse::ok(
                    service
                        .record_pick_up_success(&deliverer, &body.logistics_id, &body.proof)
                        .await?,
                )
            }
            Route::Dispatch => {
                let deliverer = caller.as_deliverer()?;
                let body: DispatchBody = parse_body(body)?;
                ApiResponse::created(service.dispatch_deliveries(&deliverer, &body.order_ids).await?)
            }
            Route::DeliverySuccess => {
                let deliverer = caller.as_deliverer()?;
                let body: ProofBody = parse_body(body)?;
                ApiResponse::ok(
                    service
                        .record_delivery_success(&deliverer, &body.logistics_id, &body.proof)
                        .await?,
                )
            }
            Route::DeliveryAttempt => {
                let deliverer = caller.as_deliverer()?;
                let body: AttemptBody = parse_body(body)?;
                ApiResponse::ok(
                    service
                        .record_failed_attempt(&deliverer, &body.logistics_id, &body.reason)
                        .await?,
                )
            }
            Route::CancelLogistics => {
                let body: LogisticsBody = parse_body(body)?;
                let deliverer = match caller.user_type {
                    UserType::Admin => None,
                    _ => Some(caller.as_deliverer()?),
                };
                ApiResponse::ok(
                    service
                        .cancel_logistics(deliverer.as_ref(), &body.logistics_id)
                        .await?,
                )
            }
            Route::WithMe(kind) => {
                let deliverer = caller.as_deliverer()?;
                let records = service.logistics_with_me(&deliverer, kind).await?;
                ApiResponse::ok(Report::new()).with_field("logistics", &records)
            }
            Route::RateSave => {
                let customer = caller.as_customer()?;
                let request: RateRequest = parse_body(body)?;
                ApiResponse::ok(service.rate(&customer, &request).await?)
            }
            Route::ToRate => {
                let customer = caller.as_customer()?;
                let products = service.products_to_rate(&customer).await?;
                ApiResponse::ok(Report::new()).with_field("products", &products)
            }
        };
        Ok(response)
    }

    /// The business owned by a seller caller. A seller runs exactly one
    /// business; owning several is refused rather than guessed at.
    async fn seller_business(&self, caller: &Caller) -> Result<BusinessId, ApiError> {
        caller.require(&[UserType::Seller])?;
        let owner = caller.user_id.as_str();
        let mut owned = self
            .service
            .store()
            .find::<Business, _>(|b| b.owner.as_ref().is_some_and(|o| o.as_str() == owner))
            .await
            .map_err(CommerceError::from)?;
        match owned.len() {
            0 => Err(CommerceError::BusinessNotFound(format!("owned by {}", owner)).into()),
            1 => Ok(owned.remove(0).id),
            n => {
                tracing::warn!(owner, businesses = n, "seller owns several businesses");
                Err(CommerceError::InvalidState(format!("{} owns {} businesses", owner, n)).into())
            }
        }
    }
}
