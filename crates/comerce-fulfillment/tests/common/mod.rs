#![allow(dead_code)]

use comerce_domain::prelude::*;
use comerce_fulfillment::{FulfillmentService, OrderClaim, OrderItemRequest, PlaceOrderRequest};
use comerce_store::Store;

pub fn php(cents: i64) -> Money {
    Money::new(cents, Currency::PHP)
}

pub fn shipment() -> ShipmentDetails {
    ShipmentDetails {
        first_name: "Ana".into(),
        last_name: "Reyes".into(),
        cellphone_number: "9171234567".into(),
        address: Address::new("12 Mabini St", "San Roque", "Marikina", "Metro Manila"),
        additional_notes: None,
    }
}

pub fn claim(order: &OrderId, products: &[&str]) -> OrderClaim {
    OrderClaim::new(order.clone(), products.iter().map(|p| ProductId::new(*p)))
}

pub fn lot_id(product: &str, index: usize) -> LotId {
    LotId::new(format!("{}-lot-{}", product, index))
}

/// A store with one customer, one deliverer and two businesses.
pub struct Fixture {
    pub store: Store,
    pub service: FulfillmentService,
    pub customer: CustomerId,
    pub deliverer: DelivererId,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_service(|store| FulfillmentService::with_defaults(store)).await
    }

    pub async fn with_service(build: impl FnOnce(Store) -> FulfillmentService) -> Self {
        let store = Store::in_memory();
        let customer = CustomerId::new("c1");
        let deliverer = DelivererId::new("d1");
        store
            .save(&Customer::new(customer.clone(), "ana@example.com").with_name("Ana", "Reyes"))
            .await
            .unwrap();
        store
            .save(&Deliverer::new(deliverer.clone(), "Ramon").with_plate_number("ABC 1234"))
            .await
            .unwrap();
        for (id, name) in [("b1", "Aling Nena Store"), ("b2", "Mang Tomas Hardware")] {
            store.save(&Business::new(BusinessId::new(id), name)).await.unwrap();
        }
        let service = build(store.clone());
        Self {
            store,
            service,
            customer,
            deliverer,
        }
    }

    /// A product of `business` with one lot per entry of `on_hand`.
    pub async fn product(&self, id: &str, business: &str, on_hand: &[u32]) -> ProductId {
        let product_id = ProductId::new(id);
        let mut product = Product::new(product_id.clone(), BusinessId::new(business), id, php(2500));
        for (i, n) in on_hand.iter().enumerate() {
            let lot = InventoryLot::new(lot_id(id, i), product_id.clone(), 20).with_on_hand(*n);
            self.store.save(&lot).await.unwrap();
            product.add_lot(lot.id.clone());
        }
        self.store.save(&product).await.unwrap();
        product_id
    }

    pub async fn place(&self, items: &[(&str, u32)]) -> Order {
        let request = PlaceOrderRequest {
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
        };
        self.service
            .place_order(&self.customer, &request)
            .await
            .unwrap()
            .order
    }

    pub async fn order(&self, id: &OrderId) -> Order {
        self.store.get::<Order>(id.as_str()).await.unwrap()
    }

    pub async fn on_hand(&self, product: &str, index: usize) -> u32 {
        self.store
            .get::<InventoryLot>(lot_id(product, index).as_str())
            .await
            .unwrap()
            .on_hand
    }

    pub async fn item_status(&self, order: &OrderId, product: &str) -> OrderStatus {
        self.order(order)
            .await
            .line_item(&ProductId::new(product))
            .map(|li| li.status)
            .unwrap()
    }
}

pub fn texts(report: &Report) -> Vec<String> {
    report.messages.iter().map(|m| m.message.clone()).collect()
}
