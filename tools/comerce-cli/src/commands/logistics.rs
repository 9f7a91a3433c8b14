//! Deliverer commands.

use anyhow::{bail, Result};
use comerce_fulfillment::PickUpRequest;

use super::{AttemptArgs, CancelArgs, DispatchArgs, PickUpArgs, ProofArgs};
use crate::context::Context;

/// Start pick-up rounds.
///
/// Without `--claim`, everything currently packed is collected, limited to
/// `--business` when given.
pub async fn pick_up(args: PickUpArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let service = ctx.service(&state);

    let request: PickUpRequest = if args.claims.is_empty() {
        service
            .for_pick_up()
            .await?
            .into_iter()
            .filter(|listing| args.business.as_ref().map_or(true, |b| b == &listing.business.id))
            .map(|listing| (listing.business.id.clone(), listing.claims()))
            .collect()
    } else {
        let Some(business) = args.business else {
            bail!("--business is required with --claim");
        };
        PickUpRequest::from([(business, args.claims)])
    };

    if request.is_empty() {
        ctx.output.info("Nothing is waiting for pick-up.");
        return Ok(());
    }

    let report = service.pick_up(&args.deliverer, &request).await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

/// Pick-up round reached the warehouse.
pub async fn arrive(args: ProofArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let report = ctx
        .service(&state)
        .record_pick_up_success(&args.deliverer, &args.logistics, &args.proof)
        .await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

pub async fn dispatch(args: DispatchArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let report = ctx
        .service(&state)
        .dispatch_deliveries(&args.deliverer, &args.orders)
        .await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

/// Delivery round handed over to the customer.
pub async fn deliver(args: ProofArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let report = ctx
        .service(&state)
        .record_delivery_success(&args.deliverer, &args.logistics, &args.proof)
        .await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

pub async fn attempt(args: AttemptArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let report = ctx
        .service(&state)
        .record_failed_attempt(&args.deliverer, &args.logistics, &args.reason)
        .await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}

pub async fn cancel(args: CancelArgs, ctx: &Context) -> Result<()> {
    let state = ctx.open_state()?;
    let deliverer = (!args.admin).then_some(&args.deliverer);
    let report = ctx.service(&state).cancel_logistics(deliverer, &args.logistics).await?;
    state.save().await?;
    ctx.output.report(&report);
    Ok(())
}
