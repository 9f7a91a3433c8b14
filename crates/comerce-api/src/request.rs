//! Caller identity, routes and request bodies.

use comerce_domain::logistics::LogisticsType;
use comerce_domain::people::UserType;
use comerce_domain::{CustomerId, DelivererId, LogisticsId, OrderId, ProductId};
use comerce_fulfillment::{OrderClaim, PickUpRequest};
use comerce_observability::RequestId;
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user type.
pub const USER_TYPE_HEADER: &str = "x-user-type";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The verified identity the authentication layer attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub user_type: UserType,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, user_type: UserType) -> Self {
        Self {
            user_id: user_id.into(),
            user_type,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let user_id = header(USER_ID_HEADER).ok_or_else(|| ApiError::Unauthorized("no user".to_string()))?;
        let user_type = header(USER_TYPE_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("no user type".to_string()))?
            .parse::<UserType>()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
        Ok(Self::new(user_id, user_type))
    }

    /// Fail unless the caller has one of `allowed`.
    pub fn require(&self, allowed: &[UserType]) -> Result<(), ApiError> {
        if allowed.contains(&self.user_type) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(format!(
                "{} users cannot do this",
                self.user_type.as_str().to_lowercase()
            )))
        }
    }

    /// The caller as a buyer. Sellers buy too.
    pub fn as_customer(&self) -> Result<CustomerId, ApiError> {
        if !self.user_type.can_buy() {
            return Err(ApiError::Unauthorized("only customers can do this".to_string()));
        }
        Ok(CustomerId::new(self.user_id.clone()))
    }

    pub fn as_deliverer(&self) -> Result<DelivererId, ApiError> {
        self.require(&[UserType::Logistics])?;
        Ok(DelivererId::new(self.user_id.clone()))
    }
}

pub fn request_id(headers: &HeaderMap) -> RequestId {
    RequestId::from_header(headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()))
}

/// Every endpoint of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    PlaceOrder,
    AddToCart,
    CartCount,
    CartList,
    Ship,
    Pack,
    Waybill { orders: String, products: String },
    Inventory,
    ReceiveLot,
    ForPickUp,
    PickUp,
    PickUpSuccess,
    Dispatch,
    DeliverySuccess,
    DeliveryAttempt,
    CancelLogistics,
    WithMe(LogisticsType),
    RateSave,
    ToRate,
}

impl Route {
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .split('?')
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match (method.as_str(), segments.as_slice()) {
            ("POST", ["order", "place"]) => Route::PlaceOrder,
            ("POST", ["cart", "add"]) => Route::AddToCart,
            ("GET", ["cart", "count"]) => Route::CartCount,
            ("GET", ["cart", "user"]) => Route::CartList,
            ("PATCH", ["seller", "logistics", "ship"]) => Route::Ship,
            ("PATCH", ["logistics", "orders", "pack"]) => Route::Pack,
            ("GET", ["seller", "waybill", orders, products]) => Route::Waybill {
                orders: orders.to_string(),
                products: products.to_string(),
            },
            ("GET", ["seller", "inventory"]) => Route::Inventory,
            ("POST", ["seller", "inventory", "receive"]) => Route::ReceiveLot,
            ("GET", ["logistics", "orders", "for-pick-up"]) => Route::ForPickUp,
            ("POST", ["logistics", "orders", "pick-up"]) => Route::PickUp,
            ("PATCH", ["logistics", "pick-up", "success"]) => Route::PickUpSuccess,
            ("POST", ["logistics", "delivery", "dispatch"]) => Route::Dispatch,
            ("PATCH", ["logistics", "delivery", "success"]) => Route::DeliverySuccess,
            ("PATCH", ["logistics", "delivery", "attempt"]) => Route::DeliveryAttempt,
            ("PATCH", ["logistics", "cancel"]) => Route::CancelLogistics,
            ("GET", ["logistics", "with-me", kind]) => Route::WithMe(kind.parse().ok()?),
            ("PATCH", ["rate", "save"]) => Route::RateSave,
            ("GET", ["rate", "products"]) => Route::ToRate,
            _ => return None,
        };
        Some(route)
    }
}

/// Decode a JSON body.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidBody("empty body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Body of ship and pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsBody {
    pub orders: Vec<OrderClaim>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickUpBody {
    pub businesses: PickUpRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBody {
    pub logistics_id: LogisticsId,
    pub proof: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptBody {
    pub logistics_id: LogisticsId,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsBody {
    pub logistics_id: LogisticsId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchBody {
    pub order_ids: Vec<OrderId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartBody {
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveLotBody {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_resolve_routes() {
        assert_eq!(Route::resolve(&Method::POST, "/order/place"), Some(Route::PlaceOrder));
        assert_eq!(Route::resolve(&Method::PATCH, "/rate/save/"), Some(Route::RateSave));
        assert_eq!(Route::resolve(&Method::GET, "/cart/user"), Some(Route::CartList));
        assert_eq!(
            Route::resolve(&Method::GET, "/seller/waybill/o1+o2/p1-p2?x=1"),
            Some(Route::Waybill {
                orders: "o1+o2".into(),
                products: "p1-p2".into()
            })
        );
        assert_eq!(
            Route::resolve(&Method::GET, "/logistics/with-me/customer-delivery"),
            Some(Route::WithMe(LogisticsType::CustomerDelivery))
        );
        assert_eq!(Route::resolve(&Method::GET, "/order/place"), None);
        assert_eq!(Route::resolve(&Method::GET, "/logistics/with-me/boat"), None);
    }

    #[test]
    fn test_caller_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(Caller::from_headers(&headers).is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u1"));
        headers.insert(USER_TYPE_HEADER, HeaderValue::from_static("seller"));
        let caller = Caller::from_headers(&headers).unwrap();
        assert_eq!(caller, Caller::new("u1", UserType::Seller));
        assert!(caller.as_customer().is_ok());
        assert!(caller.as_deliverer().is_err());

        headers.insert(USER_TYPE_HEADER, HeaderValue::from_static("pirate"));
        assert!(matches!(Caller::from_headers(&headers), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_parse_body() {
        let body: CartBody = parse_body(br#"{"product_id": "p1"}"#).unwrap();
        assert_eq!(body.product_id, ProductId::new("p1"));
        assert!(parse_body::<CartBody>(b"").is_err());
        assert!(parse_body::<CartBody>(b"{").is_err());
    }
}
