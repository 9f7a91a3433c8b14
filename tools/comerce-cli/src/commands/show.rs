//! Read-only views of the state file.

use anyhow::{bail, Result};
use comerce_domain::checkout::Order;
use comerce_domain::logistics::LogisticsType;
use comerce_fulfillment::parse_waybill_ids;

use super::{ShowArgs, ShowCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let service = ctx.service(&state);
    let out = &ctx.output;

    match args.command {
        ShowCommand::Orders { customer } => {
            let mut orders = state
                .store()
                .find::<Order, _>(|o| customer.as_ref().map_or(true, |c| c == &o.customer_id))
                .await?;
            orders.sort_by(|a, b| a.placed_at.cmp(&b.placed_at));

            if out.is_json() {
                out.json(&orders);
                return Ok(());
            }
            if orders.is_empty() {
                out.info("No orders found.");
                return Ok(());
            }
            for order in &orders {
                out.header(&format!("Order {} ({})", order.id, status_badge(order.status)));
                out.kv("customer", &format!("{} ({})", order.shipment_details.full_name(), order.customer_id));
                out.kv("placed", &order.placed_at.format("%Y-%m-%d %H:%M").to_string());
                out.kv("eta", &order.eta.format("%B %-d, %Y").to_string());
                out.kv("payment", order.payment_method.display_name());
                for li in &order.line_items {
                    out.table_row(
                        &[
                            li.product_id.as_str(),
                            &format!("x{}", li.quantity),
                            &li.price_at_point.to_string(),
                            &status_badge(li.status),
                            if li.rated { "rated" } else { "" },
                        ],
                        &[12, 5, 12, 18, 5],
                    );
                }
            }
        }

        ShowCommand::Inventory { business } => {
            let summary = service.inventory_summary(&business).await?;
            if out.is_json() {
                out.json(&summary);
                return Ok(());
            }
            out.header(&format!("Inventory of {}", business));
            out.table_row(&["PRODUCT", "ITEM", "LOTS", "ON HAND", "STORED"], &[12, 24, 5, 8, 8]);
            for s in &summary {
                out.table_row(
                    &[
                        s.product_id.as_str(),
                        &s.item,
                        &s.lots.to_string(),
                        &s.on_hand.to_string(),
                        &s.quantity.to_string(),
                    ],
                    &[12, 24, 5, 8, 8],
                );
            }
        }

        ShowCommand::PickUps => {
            let listings = service.for_pick_up().await?;
            if out.is_json() {
                out.json(&listings);
                return Ok(());
            }
            if listings.is_empty() {
                out.info("Nothing is waiting for pick-up.");
            }
            for listing in &listings {
                out.header(&format!(
                    "{} ({}), {} unit(s)",
                    listing.business.business_name, listing.business.id, listing.total_quantity
                ));
                if let Some(address) = &listing.business.pick_up_address {
                    out.kv("pick up at", &address.one_line());
                }
                for order in &listing.orders {
                    let items: Vec<String> = order
                        .items
                        .iter()
                        .map(|i| format!("{} x{}", i.item, i.quantity))
                        .collect();
                    out.list_item(&format!("{} for {}: {}", order.order_id, order.customer_name, items.join(", ")));
                }
            }
        }

        ShowCommand::Logistics { deliverer, kind } => {
            let kind = LogisticsType::from(kind);
            let records = service.logistics_with_me(&deliverer, kind).await?;
            if out.is_json() {
                out.json(&records);
                return Ok(());
            }
            out.header(&format!("Open {} rounds of {}", kind, deliverer));
            if records.is_empty() {
                out.info("None.");
            }
            for record in &records {
                let covered = record.covered_items().count();
                out.list_item(&format!(
                    "{} started {}: {} line item(s), {} failed attempt(s)",
                    record.id,
                    record.date_started.format("%Y-%m-%d %H:%M"),
                    covered,
                    record.failed_attempts.len()
                ));
            }
        }

        ShowCommand::Waybill {
            business,
            orders,
            products,
        } => {
            let claims = parse_waybill_ids(&orders, &products);
            if claims.is_empty() {
                bail!("No order has products to print");
            }
            let batch = service.waybill_data(&business, &claims).await?;
            if out.is_json() {
                out.json(&batch);
                return Ok(());
            }
            for waybill in &batch.waybills {
                let to = &waybill.shipment_details;
                out.header(&format!("Waybill for order {}", waybill.order_id));
                out.kv("to", &to.full_name());
                out.kv("phone", &to.cellphone_number);
                out.kv("address", &to.address.one_line());
                out.kv("payment", waybill.payment_method.display_name());
                for item in &waybill.items {
                    out.list_item(&format!("{} x{} @ {}", item.item, item.quantity, item.price_at_point));
                }
            }
            if !batch.report.is_empty() {
                out.report(&batch.report);
            }
        }

        ShowCommand::ToRate { customer } => {
            let candidates = service.products_to_rate(&customer).await?;
            if out.is_json() {
                out.json(&candidates);
                return Ok(());
            }
            if candidates.is_empty() {
                out.info("Nothing to rate.");
            }
            for c in &candidates {
                out.list_item(&format!("{} x{} (order {}, product {})", c.item, c.quantity, c.order_id, c.product_id));
            }
        }
    }

    Ok(())
}
