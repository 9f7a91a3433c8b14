//! Comerce CLI - drive the fulfillment pipeline against a local state file.
//!
//! Commands:
//! - `comerce init` - Write a default `comerce.toml` and an empty state file
//! - `comerce seed` - Load demo businesses, products, a customer and a deliverer
//! - `comerce place` / `cart` / `rate` - Customer operations
//! - `comerce ship` / `pack` / `receive` - Seller operations
//! - `comerce pick-up` / `arrive` / `dispatch` / `deliver` / `attempt` / `cancel` - Logistics
//! - `comerce show` - Inspect orders, inventory, logistics and listings

mod commands;
mod context;
mod output;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    AttemptArgs, CancelArgs, CartArgs, ClaimsArgs, DispatchArgs, InitArgs, PickUpArgs, PlaceArgs,
    ProofArgs, RateArgs, ReceiveArgs, SeedArgs, ShowArgs,
};

/// Comerce CLI - Place and fulfill orders against a local state file
#[derive(Parser)]
#[command(name = "comerce")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// State file path (default: comerce-state.json next to the config)
    #[arg(short, long, global = true)]
    state: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and an empty state file
    Init(InitArgs),

    /// Load demo data
    Seed(SeedArgs),

    /// Place an order
    Place(PlaceArgs),

    /// Add to or count a customer's cart
    Cart(CartArgs),

    /// Ship claimed line items of a seller's orders
    Ship(ClaimsArgs),

    /// Pack shipped line items of a seller's orders
    Pack(ClaimsArgs),

    /// Receive a new inventory lot
    Receive(ReceiveArgs),

    /// Start pick-up rounds for packed line items
    PickUp(PickUpArgs),

    /// Record a pick-up round as arrived at the warehouse
    Arrive(ProofArgs),

    /// Start delivery rounds for orders complete at the warehouse
    Dispatch(DispatchArgs),

    /// Record a delivery round as handed over to the customer
    Deliver(ProofArgs),

    /// Record a failed pick-up or delivery attempt
    Attempt(AttemptArgs),

    /// Cancel a pick-up or delivery round
    Cancel(CancelArgs),

    /// Rate a delivered line item
    Rate(RateArgs),

    /// Inspect stored data
    Show(ShowArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), cli.state.as_deref(), output)?;
    ctx.init_tracing();

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Seed(args) => commands::seed::run(args, &ctx).await,
        Commands::Place(args) => commands::customer::place(args, &ctx).await,
        Commands::Cart(args) => commands::customer::cart(args, &ctx).await,
        Commands::Rate(args) => commands::customer::rate(args, &ctx).await,
        Commands::Ship(args) => commands::seller::ship(args, &ctx).await,
        Commands::Pack(args) => commands::seller::pack(args, &ctx).await,
        Commands::Receive(args) => commands::seller::receive(args, &ctx).await,
        Commands::PickUp(args) => commands::logistics::pick_up(args, &ctx).await,
        Commands::Arrive(args) => commands::logistics::arrive(args, &ctx).await,
        Commands::Dispatch(args) => commands::logistics::dispatch(args, &ctx).await,
        Commands::Deliver(args) => commands::logistics::deliver(args, &ctx).await,
        Commands::Attempt(args) => commands::logistics::attempt(args, &ctx).await,
        Commands::Cancel(args) => commands::logistics::cancel(args, &ctx).await,
        Commands::Show(args) => commands::show::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
