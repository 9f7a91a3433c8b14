//! Seller commands: ship, pack, receive.

use anyhow::Result;

use super::{ClaimsArgs, ReceiveArgs};
use crate::context::Context;

/// Allocate inventory for claimed line items.
pub async fn ship(args: ClaimsArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let report = ctx.service(&state).ship(&args.business, &args.claims).await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

pub async fn pack(args: ClaimsArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let report = ctx.service(&state).pack(&args.business, &args.claims).await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

/// Store a new lot of a product.
pub async fn receive(args: ReceiveArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let lot = ctx
        .service(&state)
        .receive_lot(&args.business, &args.product, args.quantity)
        .await?;
    state.save().await?;

    if ctx.output.is_json() {
        ctx.output.json(&lot);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Received {} unit(s) of {} as lot {}",
        lot.quantity, lot.product_id, lot.id
    ));
    Ok(())
}
