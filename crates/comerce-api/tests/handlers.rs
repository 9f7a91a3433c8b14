use comerce_api::{ComerceApi, USER_ID_HEADER, USER_TYPE_HEADER};
use comerce_domain::prelude::*;
use comerce_fulfillment::{FulfillmentService, OrderClaim, PickUpRequest};
use comerce_store::Store;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};

async fn api() -> (ComerceApi, Store) {
    let store = Store::in_memory();
    store
        .save(&Customer::new(CustomerId::new("c1"), "ana@example.com"))
        .await
        .unwrap();
    store
        .save(&Business::new(BusinessId::new("b1"), "Aling Nena Store").with_owner(CustomerId::new("s1")))
        .await
        .unwrap();
    store.save(&Deliverer::new(DelivererId::new("d1"), "Ramon")).await.unwrap();

    let product = Product::new(
        ProductId::new("rice"),
        BusinessId::new("b1"),
        "Rice",
        Money::new(5000, Currency::PHP),
    )
    .with_lot(LotId::new("rice-1"));
    store.save(&product).await.unwrap();
    store
        .save(&InventoryLot::new(LotId::new("rice-1"), ProductId::new("rice"), 10))
        .await
        .unwrap();

    (ComerceApi::new(FulfillmentService::with_defaults(store.clone())), store)
}

async fn call(api: &ComerceApi, method: Method, path: &str, user: Option<(&str, &str)>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some((id, kind)) = user {
        builder = builder.header(USER_ID_HEADER, id).header(USER_TYPE_HEADER, kind);
    }
    let bytes = if body.is_null() { Vec::new() } else { serde_json::to_vec(&body).unwrap() };
    let response = api.handle(builder.body(bytes).unwrap()).await;
    let status = response.status();
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    (status, body)
}

fn place_body(quantity: u32) -> Value {
    json!({
        "items": [{ "product_id": "rice", "quantity": quantity }],
        "shipment_details": {
            "first_name": "Ana",
            "last_name": "Reyes",
            "cellphone_number": "9171234567",
            "street_address": "12 Mabini St",
            "barangay": "San Roque",
            "city_municipality": "Marikina",
            "province": "Metro Manila"
        },
        "payment_method": "COD",
        "shipping_fee": { "centavos": 5000, "currency": "PHP" }
    })
}

const CUSTOMER: Option<(&str, &str)> = Some(("c1", "CUSTOMER"));
const SELLER: Option<(&str, &str)> = Some(("s1", "SELLER"));

#[tokio::test]
async fn test_place_then_ship() {
    let (api, store) = api().await;

    let (status, body) = call(&api, Method::POST, "/order/place", CUSTOMER, place_body(4)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["messages"][0]["severity"], "success");
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let ship = json!({ "orders": [{ "order_id": order_id, "product_ids": ["rice"] }] });
    let (status, body) = call(&api, Method::PATCH, "/seller/logistics/ship", SELLER, ship).await;
    assert_eq!(status, StatusCode::OK);
    let severities: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["severity"].as_str())
        .collect();
    assert!(severities.contains(&"success"));

    let lot = store.get::<InventoryLot>("rice-1").await.unwrap();
    assert_eq!(lot.on_hand, 6);
}

#[tokio::test]
async fn test_shortfall_is_still_ok() {
    let (api, _) = api().await;
    let (_, body) = call(&api, Method::POST, "/order/place", CUSTOMER, place_body(12)).await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let ship = json!({ "orders": [{ "order_id": order_id, "product_ids": ["rice"] }] });
    let (status, body) = call(&api, Method::PATCH, "/seller/logistics/ship", SELLER, ship).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["severity"] == "warning" && m["message"] == "Rice has insufficient quantity"));
}

#[tokio::test]
async fn test_status_codes() {
    let (api, _) = api().await;

    let (status, _) = call(&api, Method::POST, "/order/place", None, place_body(1)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&api, Method::POST, "/order/place", Some(("d1", "LOGISTICS")), place_body(1)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&api, Method::POST, "/order/place", CUSTOMER, Value::Null).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["messages"][0]["severity"], "error");

    let mut incomplete = place_body(1);
    incomplete["shipment_details"]["province"] = json!("");
    let (status, _) = call(&api, Method::POST, "/order/place", CUSTOMER, incomplete).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);

    let mut unknown = place_body(1);
    unknown["items"][0]["product_id"] = json!("ghost");
    let (status, _) = call(&api, Method::POST, "/order/place", CUSTOMER, unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&api, Method::GET, "/nowhere", CUSTOMER, Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seller_without_business() {
    let (api, _) = api().await;
    let ship = json!({ "orders": [{ "order_id": "o1", "product_ids": ["rice"] }] });
    let (status, _) = call(&api, Method::PATCH, "/seller/logistics/ship", Some(("s2", "SELLER")), ship).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_attempt_endpoint() {
    let (api, store) = api().await;
    let record = LogisticsRecord::pick_up(
        DelivererId::new("d1"),
        BusinessId::new("b1"),
        vec![CoveredOrder {
            order_id: OrderId::new("o1"),
            product_ids: vec![ProductId::new("rice")],
        }],
    );
    store.save(&record).await.unwrap();
    let attempt = json!({ "logistics_id": record.id.as_str(), "reason": "store closed" });

    let (status, body) = call(&api, Method::PATCH, "/logistics/delivery/attempt", Some(("d1", "LOGISTICS")), attempt.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["severity"], "information");

    let (status, body) = call(&api, Method::PATCH, "/logistics/delivery/attempt", Some(("d1", "LOGISTICS")), attempt.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["severity"], "warning");

    let (status, _) = call(&api, Method::PATCH, "/logistics/delivery/attempt", Some(("d2", "LOGISTICS")), attempt).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seller_with_several_businesses_is_refused() {
    let (api, store) = api().await;
    store
        .save(&Business::new(BusinessId::new("b2"), "Mang Tomas Hardware").with_owner(CustomerId::new("s1")))
        .await
        .unwrap();
    let ship = json!({ "orders": [{ "order_id": "o1", "product_ids": ["rice"] }] });

    let (status, body) = call(&api, Method::PATCH, "/seller/logistics/ship", SELLER, ship).await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["messages"][0]["severity"], "error");
}

#[tokio::test]
async fn test_cancel_is_limited_to_the_round_owner() {
    let (api, store) = api().await;
    let (_, body) = call(&api, Method::POST, "/order/place", CUSTOMER, place_body(1)).await;
    let order_id = OrderId::new(body["order"]["id"].as_str().unwrap());
    let service = api.service();
    let b1 = BusinessId::new("b1");
    let d1 = DelivererId::new("d1");
    let claims = [OrderClaim::new(order_id.clone(), [ProductId::new("rice")])];
    service.ship(&b1, &claims).await.unwrap();
    service.pack(&b1, &claims).await.unwrap();
    service
        .pick_up(&d1, &PickUpRequest::from([(b1.clone(), claims.to_vec())]))
        .await
        .unwrap();
    let round = service
        .logistics_with_me(&d1, LogisticsType::SellerPickUp)
        .await
        .unwrap()
        .remove(0);
    for reason in ["store closed", "store closed again"] {
        service.record_failed_attempt(&d1, &round.id, reason).await.unwrap();
    }
    let cancel = json!({ "logistics_id": round.id.as_str() });

    let (status, _) = call(&api, Method::PATCH, "/logistics/cancel", Some(("d2", "LOGISTICS")), cancel.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&api, Method::PATCH, "/logistics/cancel", CUSTOMER, cancel.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!store.get::<LogisticsRecord>(round.id.as_str()).await.unwrap().cancelled);

    let (status, body) = call(&api, Method::PATCH, "/logistics/cancel", Some(("d1", "LOGISTICS")), cancel).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["severity"], "warning");
    let order = store.get::<Order>(order_id.as_str()).await.unwrap();
    assert_eq!(order.status, OrderStatus::FailedCancelled);
}

#[tokio::test]
async fn test_cart_listing() {
    let (api, _) = api().await;
    let add = json!({ "product_id": "rice" });
    call(&api, Method::POST, "/cart/add", CUSTOMER, add.clone()).await;
    call(&api, Method::POST, "/cart/add", CUSTOMER, add).await;

    let (status, body) = call(&api, Method::GET, "/cart/user", CUSTOMER, Value::Null).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"][0]["product_id"], "rice");
    assert_eq!(body["cart"][0]["quantity"], 2);
    assert_eq!(body["cart"][0]["retail_price"]["centavos"], 5000);
}
