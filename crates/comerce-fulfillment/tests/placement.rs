mod common;

use chrono::Duration;
use comerce_domain::prelude::*;
use comerce_fulfillment::{OrderItemRequest, PlaceOrderRequest};
use common::{php, shipment, Fixture};

fn request(items: &[(&str, u32)]) -> PlaceOrderRequest {
    PlaceOrderRequest {
        items: items
            .iter()
            .map(|(p, q)| OrderItemRequest {
                product_id: ProductId::new(*p),
                quantity: *q,
            })
            .collect(),
        shipment_details: shipment(),
        payment_method: PaymentMethod::CashOnDelivery,
        payment_details: PaymentDetails::default(),
        shipping_fee: php(5000),
    }
}

#[tokio::test]
async fn test_placement_never_reserves() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[2]).await;

    let outcome = fx.service.place_order(&fx.customer, &request(&[("rice", 5)])).await.unwrap();

    assert_eq!(fx.on_hand("rice", 0).await, 2);
    let order = fx.order(&outcome.order.id).await;
    assert_eq!(order.status, OrderStatus::Placed);
    assert!(order.line_items.iter().all(|li| li.status == OrderStatus::Placed));
    assert_eq!(order.line_items[0].quantity, 5);
    assert_eq!(order.line_items[0].price_at_point, php(2500));
    assert!(outcome.report.has(Severity::Success));
}

#[tokio::test]
async fn test_eta_is_five_days_out() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[2]).await;
    let order = fx.place(&[("rice", 1)]).await;
    assert_eq!(order.eta - order.placed_at, Duration::days(5));
}

#[tokio::test]
async fn test_placement_clears_ordered_cart_entries() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[5]).await;
    fx.product("soap", "b1", &[5]).await;
    fx.service.add_to_cart(&fx.customer, &ProductId::new("rice")).await.unwrap();
    fx.service.add_to_cart(&fx.customer, &ProductId::new("rice")).await.unwrap();
    fx.service.add_to_cart(&fx.customer, &ProductId::new("soap")).await.unwrap();
    assert_eq!(fx.service.cart_item_count(&fx.customer).await.unwrap(), 3);

    fx.place(&[("rice", 2)]).await;

    assert_eq!(fx.service.cart_item_count(&fx.customer).await.unwrap(), 1);
}

#[tokio::test]
async fn test_out_of_stock_product_rejected() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[0, 0]).await;
    let err = fx
        .service
        .place_order(&fx.customer, &request(&[("rice", 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(fx.store.find::<Order, _>(|_| true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_product_rejected() {
    let fx = Fixture::new().await;
    let err = fx
        .service
        .place_order(&fx.customer, &request(&[("ghost", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::ProductNotFound(_)));
}

#[tokio::test]
async fn test_incomplete_input_rejected() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[5]).await;

    let mut missing_address = request(&[("rice", 1)]);
    missing_address.shipment_details.address.barangay.clear();
    let err = fx.service.place_order(&fx.customer, &missing_address).await.unwrap_err();
    assert!(matches!(err, CommerceError::IncompleteData(_)));

    let mut card_without_details = request(&[("rice", 1)]);
    card_without_details.payment_method = PaymentMethod::CreditCard;
    let err = fx
        .service
        .place_order(&fx.customer, &card_without_details)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::IncompleteData(_)));

    let err = fx.service.place_order(&fx.customer, &request(&[])).await.unwrap_err();
    assert!(matches!(err, CommerceError::IncompleteData(_)));
}

#[tokio::test]
async fn test_unknown_customer_rejected() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[5]).await;
    let err = fx
        .service
        .place_order(&CustomerId::new("stranger"), &request(&[("rice", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::CustomerNotFound(_)));
}

#[tokio::test]
async fn test_duplicate_items_are_merged() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[5]).await;
    let order = fx.place(&[("rice", 1), ("rice", 2)]).await;
    assert_eq!(order.line_items.len(), 1);
    assert_eq!(order.line_items[0].quantity, 3);
}
