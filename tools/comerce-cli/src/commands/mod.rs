//! CLI command implementations.

pub mod customer;
pub mod init;
pub mod logistics;
pub mod seed;
pub mod seller;
pub mod show;

use clap::{Args, Subcommand, ValueEnum};
use comerce_domain::checkout::Address;
use comerce_domain::logistics::LogisticsType;
use comerce_domain::{BusinessId, CustomerId, DelivererId, LogisticsId, OrderId, ProductId};
use comerce_fulfillment::{OrderClaim, OrderItemRequest};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config and state file.
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the seed command.
#[derive(Args)]
pub struct SeedArgs {
    /// Replace documents that already exist.
    #[arg(long)]
    pub reset: bool,
}

/// Arguments for the place command.
#[derive(Args)]
pub struct PlaceArgs {
    /// Customer placing the order.
    #[arg(long, default_value = "c1")]
    pub customer: CustomerId,

    /// Item as `product=quantity` (repeatable).
    #[arg(short, long = "item", value_parser = parse_item, required = true)]
    pub items: Vec<OrderItemRequest>,

    /// Recipient first name.
    #[arg(long)]
    pub first_name: String,

    /// Recipient last name.
    #[arg(long)]
    pub last_name: String,

    /// Recipient cellphone number.
    #[arg(long)]
    pub phone: String,

    /// `street, barangay, city, province`.
    #[arg(long, value_parser = parse_address)]
    pub address: Address,

    /// Notes for the deliverer.
    #[arg(long)]
    pub notes: Option<String>,

    /// Payment method code: COD, CC or PP.
    #[arg(long, default_value = "COD")]
    pub payment: String,

    /// PayPal email, for `--payment PP`.
    #[arg(long)]
    pub paypal_email: Option<String>,

    /// Card as `holder;number;MM/YY;cvc`, for `--payment CC`.
    #[arg(long)]
    pub card: Option<String>,

    /// Shipping fee in centavos.
    #[arg(long, default_value_t = 0)]
    pub shipping_fee: i64,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,

    /// Cart owner.
    #[arg(long, global = true, default_value = "c1")]
    pub customer: CustomerId,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add one unit of a product.
    Add {
        /// Product id.
        product: ProductId,
    },
    /// Count items in the cart.
    Count,
    /// List the cart, skipping products that are out of stock.
    List,
}

/// Arguments for the rate command.
#[derive(Args)]
pub struct RateArgs {
    #[arg(long, default_value = "c1")]
    pub customer: CustomerId,

    /// Order id.
    pub order: OrderId,

    /// Product id.
    pub product: ProductId,

    /// Rating to give.
    pub rating: u8,
}

/// Arguments for ship and pack.
#[derive(Args)]
pub struct ClaimsArgs {
    /// Seller business.
    #[arg(short, long)]
    pub business: BusinessId,

    /// Claim as `order=product,product` (repeatable).
    #[arg(long = "claim", value_parser = parse_claim, required = true)]
    pub claims: Vec<OrderClaim>,
}

/// Arguments for the receive command.
#[derive(Args)]
pub struct ReceiveArgs {
    #[arg(short, long)]
    pub business: BusinessId,

    /// Product restocked.
    pub product: ProductId,

    /// Units received.
    pub quantity: u32,
}

/// Arguments for the pick-up command.
#[derive(Args)]
pub struct PickUpArgs {
    #[arg(short, long, default_value = "d1")]
    pub deliverer: DelivererId,

    /// Business to collect from; every listed business when omitted.
    #[arg(short, long)]
    pub business: Option<BusinessId>,

    /// Claim as `order=product,product`; everything packed when omitted.
    #[arg(long = "claim", value_parser = parse_claim)]
    pub claims: Vec<OrderClaim>,
}

/// Arguments for arrive and deliver.
#[derive(Args)]
pub struct ProofArgs {
    #[arg(short, long, default_value = "d1")]
    pub deliverer: DelivererId,

    /// Logistics record id.
    pub logistics: LogisticsId,

    /// Proof of hand-over, e.g. a photo reference.
    #[arg(long)]
    pub proof: String,
}

/// Arguments for the dispatch command.
#[derive(Args)]
pub struct DispatchArgs {
    #[arg(short, long, default_value = "d1")]
    pub deliverer: DelivererId,

    /// Orders to deliver.
    #[arg(required = true)]
    pub orders: Vec<OrderId>,
}

/// Arguments for the attempt command.
#[derive(Args)]
pub struct AttemptArgs {
    #[arg(short, long, default_value = "d1")]
    pub deliverer: DelivererId,

    pub logistics: LogisticsId,

    /// Why the hand-over failed.
    #[arg(long)]
    pub reason: String,
}

/// Arguments for the cancel command.
#[derive(Args)]
pub struct CancelArgs {
    /// Deliverer who owns the round.
    #[arg(short, long, default_value = "d1")]
    pub deliverer: DelivererId,

    /// Cancel as an administrator, whoever owns the round.
    #[arg(long)]
    pub admin: bool,

    pub logistics: LogisticsId,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    #[command(subcommand)]
    pub command: ShowCommand,
}

#[derive(Subcommand)]
pub enum ShowCommand {
    /// Orders and their line item statuses.
    Orders {
        /// Only orders of this customer.
        #[arg(long)]
        customer: Option<CustomerId>,
    },
    /// Stock per product of a business.
    Inventory {
        #[arg(short, long)]
        business: BusinessId,
    },
    /// Packed line items waiting for pick-up.
    PickUps,
    /// Open rounds of a deliverer.
    Logistics {
        #[arg(short, long, default_value = "d1")]
        deliverer: DelivererId,

        #[arg(long = "type", value_enum, default_value = "pick-up")]
        kind: RoundKind,
    },
    /// Waybill contents for a seller.
    Waybill {
        #[arg(short, long)]
        business: BusinessId,

        /// Orders joined by `+`.
        orders: String,

        /// Product groups joined by `-`, products within a group by `+`.
        products: String,
    },
    /// Line items a customer can rate.
    ToRate {
        #[arg(long, default_value = "c1")]
        customer: CustomerId,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoundKind {
    PickUp,
    Delivery,
}

impl From<RoundKind> for LogisticsType {
    fn from(kind: RoundKind) -> Self {
        match kind {
            RoundKind::PickUp => LogisticsType::SellerPickUp,
            RoundKind::Delivery => LogisticsType::CustomerDelivery,
        }
    }
}

/// Parse `product=quantity`.
fn parse_item(s: &str) -> Result<OrderItemRequest, String> {
    let (product, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected product=quantity, got '{}'", s))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity '{}': {}", quantity, e))?;
    Ok(OrderItemRequest {
        product_id: ProductId::new(product.trim()),
        quantity,
    })
}

/// Parse `order=product,product`.
fn parse_claim(s: &str) -> Result<OrderClaim, String> {
    let (order, products) = s
        .split_once('=')
        .ok_or_else(|| format!("expected order=product,product, got '{}'", s))?;
    let claim = OrderClaim::new(
        order.trim(),
        products
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ProductId::new),
    );
    claim.validate().map_err(|e| e.to_string())?;
    Ok(claim)
}

/// Parse `street, barangay, city, province`.
fn parse_address(s: &str) -> Result<Address, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [street, barangay, city, province] => Ok(Address::new(*street, *barangay, *city, *province)),
        _ => Err(format!(
            "expected 'street, barangay, city, province', got '{}'",
            s
        )),
    }
}
