//! Demo data.

use anyhow::Result;
use chrono::{Duration, Utc};
use comerce_domain::prelude::*;
use comerce_store::{Document, Store};

use super::SeedArgs;
use crate::context::Context;

/// (product, business, item, price in centavos, on-hand per lot)
const PRODUCTS: [(&str, &str, &str, i64, &[u32]); 4] = [
    ("rice", "b1", "Dinorado Rice 5kg", 32_500, &[10, 30]),
    ("oil", "b1", "Coconut Oil 1L", 9_850, &[12]),
    ("hammer", "b2", "Claw Hammer", 45_000, &[5]),
    ("nails", "b2", "Common Nails 1kg", 8_000, &[0, 40]),
];

/// Run the seed command.
pub async fn run(args: SeedArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let store = state.store();
    let currency = ctx.config.fulfillment.currency();
    let mut written = 0;

    let customers = [
        Customer::new(CustomerId::new("c1"), "ana.reyes@example.com").with_name("Ana", "Reyes"),
        Customer::new(CustomerId::new("s1"), "nena@example.com").with_name("Nena", "Santos"),
        Customer::new(CustomerId::new("s2"), "tomas@example.com").with_name("Tomas", "Cruz"),
    ];
    for customer in &customers {
        written += put(&store, customer, args.reset).await? as usize;
    }

    let pick_up = Address::new("3 Rizal Ave", "Concepcion Uno", "Marikina", "Metro Manila");
    let businesses = [
        Business::new(BusinessId::new("b1"), "Aling Nena Store")
            .with_owner(CustomerId::new("s1"))
            .with_contact_number("9171110000")
            .with_pick_up_address(pick_up.clone()),
        Business::new(BusinessId::new("b2"), "Mang Tomas Hardware")
            .with_owner(CustomerId::new("s2"))
            .with_pick_up_address(pick_up),
    ];
    for business in &businesses {
        written += put(&store, business, args.reset).await? as usize;
    }

    let deliverer = Deliverer::new(DelivererId::new("d1"), "Ramon Dela Cruz").with_plate_number("NBC 1234");
    written += put(&store, &deliverer, args.reset).await? as usize;

    let oldest = Utc::now() - Duration::days(30);
    for (id, business, item, price, on_hand) in PRODUCTS {
        let product_id = ProductId::new(id);
        let mut product = Product::new(
            product_id.clone(),
            BusinessId::new(business),
            item,
            Money::new(price, currency),
        );
        for (i, n) in on_hand.iter().enumerate() {
            let lot = InventoryLot::new(LotId::new(format!("{}-{}", id, i + 1)), product_id.clone(), 40)
                .with_on_hand(*n)
                .with_date_stored(oldest + Duration::days(i as i64));
            product.add_lot(lot.id.clone());
            written += put(&store, &lot, args.reset).await? as usize;
        }
        written += put(&store, &product, args.reset).await? as usize;
    }

    state.save().await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "written": written }));
        return Ok(());
    }
    ctx.output.success(&format!("Seeded {} document(s)", written));
    ctx.output.kv("customer", "c1 (Ana Reyes)");
    ctx.output.kv("sellers", "s1 owns b1, s2 owns b2");
    ctx.output.kv("deliverer", "d1");
    ctx.output.kv("products", "rice, oil (b1); hammer, nails (b2)");
    Ok(())
}

/// Save `doc` unless it exists and `reset` is off. Returns whether it was written.
async fn put<T: Document>(store: &Store, doc: &T, reset: bool) -> Result<bool> {
    if !reset && store.find_by_id::<T>(doc.id()).await?.is_some() {
        return Ok(false);
    }
    store.save(doc).await?;
    Ok(true)
}
