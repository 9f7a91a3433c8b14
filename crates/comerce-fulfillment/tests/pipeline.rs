mod common;

use std::collections::BTreeMap;

use comerce_domain::prelude::*;
use comerce_fulfillment::{FulfillmentService, FulfillmentSettings, PickUpRequest, RateRequest};
use common::{claim, texts, Fixture};

/// Ship and pack one product per seller.
async fn ship_and_pack(fx: &Fixture, order: &Order, sellers: &[(&str, &str)]) {
    for (business, product) in sellers {
        let business = BusinessId::new(*business);
        fx.service.ship(&business, &[claim(&order.id, &[*product])]).await.unwrap();
        fx.service.pack(&business, &[claim(&order.id, &[*product])]).await.unwrap();
    }
}

async fn open_round(fx: &Fixture, kind: LogisticsType) -> LogisticsRecord {
    let mut records = fx.service.logistics_with_me(&fx.deliverer, kind).await.unwrap();
    assert_eq!(records.len(), 1);
    records.remove(0)
}

fn pick_up_all(order: &Order, groups: &[(&str, &str)]) -> PickUpRequest {
    groups
        .iter()
        .map(|(business, product)| (BusinessId::new(*business), vec![claim(&order.id, &[*product])]))
        .collect::<BTreeMap<_, _>>()
}

#[tokio::test]
async fn test_order_reaches_fulfilled() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    fx.product("hammer", "b2", &[10]).await;
    let order = fx.place(&[("rice", 2), ("hammer", 1)]).await;
    let sellers = [("b1", "rice"), ("b2", "hammer")];

    ship_and_pack(&fx, &order, &sellers).await;
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Packed);

    let listings = fx.service.for_pick_up().await.unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].business.id, BusinessId::new("b1"));
    assert_eq!(listings[0].total_quantity, 2);

    let report = fx
        .service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &sellers))
        .await
        .unwrap();
    assert!(report.has(Severity::Success));
    assert!(texts(&report).iter().any(|m| m == &format!("Order {} set to PICK_UP", order.id)));
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::PickUp);
    assert!(fx.service.for_pick_up().await.unwrap().is_empty());

    let rounds = fx
        .service
        .logistics_with_me(&fx.deliverer, LogisticsType::SellerPickUp)
        .await
        .unwrap();
    assert_eq!(rounds.len(), 2);
    for round in &rounds {
        fx.service
            .record_pick_up_success(&fx.deliverer, &round.id, "signed receipt")
            .await
            .unwrap();
    }
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Warehouse);

    fx.service
        .dispatch_deliveries(&fx.deliverer, &[order.id.clone()])
        .await
        .unwrap();
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Delivery);

    let round = open_round(&fx, LogisticsType::CustomerDelivery).await;
    assert_eq!(round.customer_id(), Some(&fx.customer));
    fx.service
        .record_delivery_success(&fx.deliverer, &round.id, "photo")
        .await
        .unwrap();
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Review);

    let to_rate = fx.service.products_to_rate(&fx.customer).await.unwrap();
    assert_eq!(to_rate.len(), 2);

    let rate = |product: &str, rating| RateRequest {
        order_id: order.id.clone(),
        product_id: ProductId::new(product),
        rating,
    };
    fx.service.rate(&fx.customer, &rate("rice", 5)).await.unwrap();
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Review);
    let report = fx.service.rate(&fx.customer, &rate("hammer", 4)).await.unwrap();
    assert!(texts(&report).iter().any(|m| m.contains("fulfilled")));

    let order = fx.order(&order.id).await;
    assert_eq!(order.status, OrderStatus::Fulfilled);
    assert!(order.is_fully_rated());
    let rice = fx.store.get::<Product>("rice").await.unwrap();
    assert_eq!(rice.ratings, vec![5]);
    assert!(fx.service.products_to_rate(&fx.customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pack_is_idempotent() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;
    let b1 = BusinessId::new("b1");
    let claims = [claim(&order.id, &["rice"])];
    fx.service.ship(&b1, &claims).await.unwrap();

    fx.service.pack(&b1, &claims).await.unwrap();
    let before = fx.store.find_versioned::<Order>(order.id.as_str()).await.unwrap().unwrap();
    let report = fx.service.pack(&b1, &claims).await.unwrap();
    let after = fx.store.find_versioned::<Order>(order.id.as_str()).await.unwrap().unwrap();

    assert!(!report.has(Severity::Error));
    assert_eq!(before.version, after.version);
    assert_eq!(after.data.status, OrderStatus::Packed);
}

#[tokio::test]
async fn test_pack_before_ship_is_rejected() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;

    let report = fx
        .service
        .pack(&BusinessId::new("b1"), &[claim(&order.id, &["rice"])])
        .await
        .unwrap();

    assert!(report.has(Severity::Error));
    assert_eq!(fx.item_status(&order.id, "rice").await, OrderStatus::Placed);
}

#[tokio::test]
async fn test_pick_up_leaves_other_line_items_alone() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    fx.product("hammer", "b2", &[10]).await;
    let order = fx.place(&[("rice", 1), ("hammer", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice"), ("b2", "hammer")]).await;

    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();

    assert_eq!(fx.item_status(&order.id, "rice").await, OrderStatus::PickUp);
    assert_eq!(fx.item_status(&order.id, "hammer").await, OrderStatus::Packed);
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Packed);
}

#[tokio::test]
async fn test_duplicate_pick_up_rejects_the_group() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    let request = pick_up_all(&order, &[("b1", "rice")]);

    fx.service.pick_up(&fx.deliverer, &request).await.unwrap();
    let report = fx.service.pick_up(&fx.deliverer, &request).await.unwrap();

    assert!(report.has(Severity::Error));
    assert!(texts(&report)[0].starts_with("Unable to pick up order(s)"));
    let rounds = fx
        .service
        .logistics_with_me(&fx.deliverer, LogisticsType::SellerPickUp)
        .await
        .unwrap();
    assert_eq!(rounds.len(), 1);
}

#[tokio::test]
async fn test_failed_group_does_not_block_other_groups() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    fx.product("hammer", "b2", &[10]).await;
    let order = fx.place(&[("rice", 1), ("hammer", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    fx.service
        .ship(&BusinessId::new("b2"), &[claim(&order.id, &["hammer"])])
        .await
        .unwrap();

    let report = fx
        .service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice"), ("b2", "hammer")]))
        .await
        .unwrap();

    assert!(report.has(Severity::Error));
    assert!(texts(&report).iter().any(|m| m == "Logistics record for Aling Nena Store created."));
    assert!(texts(&report)
        .iter()
        .any(|m| m.starts_with("Unable to pick up order(s) from b2")));
    assert_eq!(fx.item_status(&order.id, "rice").await, OrderStatus::PickUp);
    assert_eq!(fx.item_status(&order.id, "hammer").await, OrderStatus::Logistics);
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;
    assert_eq!(round.business_id(), Some(&BusinessId::new("b1")));
}

#[tokio::test]
async fn test_cancelled_order_is_not_picked_up() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    fx.product("hammer", "b2", &[10]).await;
    let order = fx.place(&[("rice", 1), ("hammer", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice"), ("b2", "hammer")]).await;
    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;
    for reason in ["closed", "closed again"] {
        fx.service
            .record_failed_attempt(&fx.deliverer, &round.id, reason)
            .await
            .unwrap();
    }
    fx.service
        .cancel_logistics(Some(&fx.deliverer), &round.id)
        .await
        .unwrap();

    let report = fx
        .service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b2", "hammer")]))
        .await
        .unwrap();

    assert!(report.has(Severity::Error));
    assert_eq!(fx.item_status(&order.id, "hammer").await, OrderStatus::Packed);
    assert!(fx
        .service
        .logistics_with_me(&fx.deliverer, LogisticsType::SellerPickUp)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_cancel_requires_the_round_owner() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;
    for reason in ["closed", "closed again"] {
        fx.service
            .record_failed_attempt(&fx.deliverer, &round.id, reason)
            .await
            .unwrap();
    }

    let err = fx
        .service
        .cancel_logistics(Some(&DelivererId::new("d2")), &round.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(fx.item_status(&order.id, "rice").await, OrderStatus::PickUp);

    fx.service.cancel_logistics(None, &round.id).await.unwrap();
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::FailedCancelled);
}

#[tokio::test]
async fn test_cancel_threshold() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;

    let report = fx
        .service
        .record_failed_attempt(&fx.deliverer, &round.id, "store closed")
        .await
        .unwrap();
    assert!(!report.has(Severity::Warning));
    let err = fx.service.cancel_logistics(Some(&fx.deliverer), &round.id).await.unwrap_err();
    assert!(matches!(err, CommerceError::InvalidState(_)));

    let report = fx
        .service
        .record_failed_attempt(&fx.deliverer, &round.id, "nobody home")
        .await
        .unwrap();
    assert!(report.has(Severity::Warning));
    assert_eq!(fx.item_status(&order.id, "rice").await, OrderStatus::PickUp);

    fx.service.cancel_logistics(Some(&fx.deliverer), &round.id).await.unwrap();
    assert_eq!(fx.item_status(&order.id, "rice").await, OrderStatus::FailedCancelled);
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::FailedCancelled);

    let record = fx.store.get::<LogisticsRecord>(round.id.as_str()).await.unwrap();
    assert!(record.cancelled);
    assert_eq!(record.failed_attempts.len(), 2);
    let err = fx
        .service
        .record_failed_attempt(&fx.deliverer, &round.id, "again")
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidState(_)));
}

#[tokio::test]
async fn test_auto_cancel_on_cap() {
    let fx = Fixture::with_service(|store| {
        FulfillmentService::with_defaults(store).with_settings(FulfillmentSettings {
            auto_cancel_on_cap: true,
            ..FulfillmentSettings::default()
        })
    })
    .await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;

    for reason in ["closed", "closed again"] {
        fx.service
            .record_failed_attempt(&fx.deliverer, &round.id, reason)
            .await
            .unwrap();
    }

    assert_eq!(fx.order(&order.id).await.status, OrderStatus::FailedCancelled);
    assert!(fx
        .service
        .logistics_with_me(&fx.deliverer, LogisticsType::SellerPickUp)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_rating_rules() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    fx.store
        .save(&Customer::new(CustomerId::new("c2"), "ben@example.com"))
        .await
        .unwrap();
    let order = fx.place(&[("rice", 1)]).await;
    let rate = |rating| RateRequest {
        order_id: order.id.clone(),
        product_id: ProductId::new("rice"),
        rating,
    };

    let err = fx.service.rate(&fx.customer, &rate(5)).await.unwrap_err();
    assert!(matches!(err, CommerceError::InvalidState(_)));

    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;
    fx.service
        .record_pick_up_success(&fx.deliverer, &round.id, "receipt")
        .await
        .unwrap();
    fx.service
        .dispatch_deliveries(&fx.deliverer, &[order.id.clone()])
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::CustomerDelivery).await;
    fx.service
        .record_delivery_success(&fx.deliverer, &round.id, "photo")
        .await
        .unwrap();

    let err = fx.service.rate(&CustomerId::new("c2"), &rate(5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let err = fx.service.rate(&fx.customer, &rate(6)).await.unwrap_err();
    assert!(matches!(err, CommerceError::InvalidState(_)));

    fx.service.rate(&fx.customer, &rate(3)).await.unwrap();
    let err = fx.service.rate(&fx.customer, &rate(3)).await.unwrap_err();
    assert!(matches!(err, CommerceError::InvalidState(_)));
}

#[tokio::test]
async fn test_dispatch_requires_complete_order() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;

    let report = fx
        .service
        .dispatch_deliveries(&fx.deliverer, &[order.id.clone()])
        .await
        .unwrap();

    assert!(report.has(Severity::Error));
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Placed);
}

#[tokio::test]
async fn test_rounds_belong_to_their_deliverer() {
    let fx = Fixture::new().await;
    fx.product("rice", "b1", &[10]).await;
    let order = fx.place(&[("rice", 1)]).await;
    ship_and_pack(&fx, &order, &[("b1", "rice")]).await;
    fx.service
        .pick_up(&fx.deliverer, &pick_up_all(&order, &[("b1", "rice")]))
        .await
        .unwrap();
    let round = open_round(&fx, LogisticsType::SellerPickUp).await;

    let err = fx
        .service
        .record_pick_up_success(&DelivererId::new("d2"), &round.id, "receipt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = fx
        .service
        .record_delivery_success(&fx.deliverer, &round.id, "photo")
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidState(_)));
}
