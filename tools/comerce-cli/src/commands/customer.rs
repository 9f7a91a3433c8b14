//! Customer commands: place, cart, rate.

use anyhow::{bail, Result};
use comerce_domain::checkout::{PaymentDetails, PaymentMethod, ShipmentDetails};
use comerce_domain::Money;
use comerce_fulfillment::{PlaceOrderRequest, RateRequest};

use super::{CartArgs, CartCommand, PlaceArgs, RateArgs};
use crate::context::Context;

/// Place an order.
pub async fn place(args: PlaceArgs, ctx: &Context) -> Result<()> {
    let payment_method: PaymentMethod = args.payment.parse()?;
    let payment_details = payment_details(&args)?;
    let request = PlaceOrderRequest {
        items: args.items,
        shipment_details: ShipmentDetails {
            first_name: args.first_name,
            last_name: args.last_name,
            cellphone_number: args.phone,
            address: args.address,
            additional_notes: args.notes,
        },
        payment_method,
        payment_details,
        shipping_fee: Money::new(args.shipping_fee, ctx.config.fulfillment.currency()),
    };

    let state = ctx.open_state()?;
    let outcome = ctx.service(&state).place_order(&args.customer, &request).await?;
    state.save().await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "order": outcome.order,
            "messages": outcome.report.messages,
        }));
        return Ok(());
    }
    ctx.output.report(&outcome.report);
    ctx.output.kv("order", outcome.order.id.as_str());
    if let Some(total) = outcome.order.total() {
        ctx.output.kv("total", &total.to_string());
    }
    Ok(())
}

fn payment_details(args: &PlaceArgs) -> Result<PaymentDetails> {
    if let Some(email) = &args.paypal_email {
        return Ok(PaymentDetails::pay_pal(email));
    }
    match args.card.as_deref().map(|c| c.split(';').collect::<Vec<_>>()) {
        None => Ok(PaymentDetails::default()),
        Some(parts) => match parts.as_slice() {
            [holder, number, expiration, code] => Ok(PaymentDetails::card(*holder, *number, *expiration, *code)),
            _ => bail!("--card expects holder;number;MM/YY;cvc"),
        },
    }
}

/// Add to or count the cart.
pub async fn cart(args: CartArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let service = ctx.service(&state);

    match args.command {
        CartCommand::Add { product } => {
            let entry = service.add_to_cart(&args.customer, &product).await?;
            state.save().await?;
            if ctx.output.is_json() {
                ctx.output.json(&entry);
            } else {
                ctx.output.success(&format!("{} in cart: {}", product, entry.quantity));
            }
        }
        CartCommand::Count => {
            let count = service.cart_item_count(&args.customer).await?;
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "count": count }));
            } else {
                ctx.output.info(&format!("{} item(s) in cart", count));
            }
        }
        CartCommand::List => {
            let items = service.cart_entries(&args.customer).await?;
            if ctx.output.is_json() {
                ctx.output.json(&items);
                return Ok(());
            }
            ctx.output.header(&format!("Cart of {}", args.customer));
            if items.is_empty() {
                ctx.output.info("Nothing in stock in your cart.");
            }
            for item in &items {
                ctx.output.table_row(
                    &[item.product_id.as_str(), &item.item, &item.quantity.to_string(), &item.retail_price.to_string()],
                    &[12, 24, 5, 12],
                );
            }
        }
    }
    Ok(())
}

/// Rate a delivered line item.
pub async fn rate(args: RateArgs, ctx: &Context) -> Result<()> {
    let request = RateRequest {
        order_id: args.order,
        product_id: args.product,
        rating: args.rating,
    };
    let state = ctx.open_state()?;
    let report = ctx.service(&state).rate(&args.customer, &request).await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}
