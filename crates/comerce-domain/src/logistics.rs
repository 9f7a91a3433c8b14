//! Logistics records: pick-up and delivery rounds.

use chrono::{DateTime, Utc};
use comerce_store::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CommerceError, CommerceResult};
use crate::ids::{BusinessId, CustomerId, DelivererId, LogisticsId, OrderId, ProductId};

/// Failed attempts after which a round is cancel-eligible.
pub const DEFAULT_FAILED_ATTEMPT_CAP: usize = 2;

/// Kind of round a deliverer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsType {
    /// Collect packed line items from one business.
    SellerPickUp,
    /// Bring complete orders from the warehouse to one customer.
    CustomerDelivery,
}

impl LogisticsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogisticsType::SellerPickUp => "SELLER_PICK_UP",
            LogisticsType::CustomerDelivery => "CUSTOMER_DELIVERY",
        }
    }
}

impl fmt::Display for LogisticsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogisticsType {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "SELLER_PICK_UP" | "PICK_UP" => Ok(LogisticsType::SellerPickUp),
            "CUSTOMER_DELIVERY" | "DELIVERY" => Ok(LogisticsType::CustomerDelivery),
            _ => Err(CommerceError::Validation(format!("unknown logistics type: {}", s))),
        }
    }
}

/// The other party of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Counterparty {
    Business(BusinessId),
    Customer(CustomerId),
}

/// The line items of one order covered by a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredOrder {
    pub order_id: OrderId,
    pub product_ids: Vec<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedAttempt {
    pub reason: String,
    pub attempt_date: DateTime<Utc>,
}

/// A deliverer's committed pick-up or delivery batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsRecord {
    pub id: LogisticsId,
    pub deliverer_id: DelivererId,
    pub counterparty: Counterparty,
    pub logistics_type: LogisticsType,
    pub orders: Vec<CoveredOrder>,
    pub date_started: DateTime<Utc>,
    /// Proof recorded on a successful hand-over.
    #[serde(default)]
    pub success_proof: Option<String>,
    #[serde(default)]
    pub failed_attempts: Vec<FailedAttempt>,
    /// Set once the covered line items were moved to `FAILED_CANCELLED`.
    #[serde(default)]
    pub cancelled: bool,
}

impl LogisticsRecord {
    /// A pick-up round collecting from a business.
    pub fn pick_up(deliverer_id: DelivererId, business_id: BusinessId, orders: Vec<CoveredOrder>) -> Self {
        Self::new(
            deliverer_id,
            Counterparty::Business(business_id),
            LogisticsType::SellerPickUp,
            orders,
        )
    }

    /// A delivery round bringing orders to a customer.
    pub fn delivery(deliverer_id: DelivererId, customer_id: CustomerId, orders: Vec<CoveredOrder>) -> Self {
        Self::new(
            deliverer_id,
            Counterparty::Customer(customer_id),
            LogisticsType::CustomerDelivery,
            orders,
        )
    }

    fn new(
        deliverer_id: DelivererId,
        counterparty: Counterparty,
        logistics_type: LogisticsType,
        orders: Vec<CoveredOrder>,
    ) -> Self {
        Self {
            id: LogisticsId::generate(),
            deliverer_id,
            counterparty,
            logistics_type,
            orders,
            date_started: Utc::now(),
            success_proof: None,
            failed_attempts: Vec::new(),
            cancelled: false,
        }
    }

    pub fn business_id(&self) -> Option<&BusinessId> {
        match &self.counterparty {
            Counterparty::Business(id) => Some(id),
            Counterparty::Customer(_) => None,
        }
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        match &self.counterparty {
            Counterparty::Customer(id) => Some(id),
            Counterparty::Business(_) => None,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.success_proof.is_some()
    }

    /// Finished either by a recorded success or by cancellation.
    pub fn is_terminal(&self) -> bool {
        self.is_succeeded() || self.cancelled
    }

    /// Whether the failed-attempt cap has been reached.
    pub fn is_cancel_eligible(&self, cap: usize) -> bool {
        self.failed_attempts.len() >= cap
    }

    /// Append a failed attempt. Fails on a terminal record.
    pub fn record_failed_attempt(&mut self, reason: &str, at: DateTime<Utc>) -> CommerceResult<usize> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CommerceError::incomplete("reason of the failed attempt"));
        }
        self.ensure_open()?;
        self.failed_attempts.push(FailedAttempt {
            reason: reason.to_string(),
            attempt_date: at,
        });
        Ok(self.failed_attempts.len())
    }

    /// Store the hand-over proof. Fails on a terminal record.
    pub fn record_success(&mut self, proof: &str) -> CommerceResult<()> {
        let proof = proof.trim();
        if proof.is_empty() {
            return Err(CommerceError::incomplete("proof of the successful attempt"));
        }
        self.ensure_open()?;
        self.success_proof = Some(proof.to_string());
        Ok(())
    }

    pub fn ensure_open(&self) -> CommerceResult<()> {
        if self.cancelled {
            return Err(CommerceError::InvalidState(format!("logistics {} was cancelled", self.id)));
        }
        if self.is_succeeded() {
            return Err(CommerceError::InvalidState(format!("logistics {} already succeeded", self.id)));
        }
        Ok(())
    }

    /// Every (order, product) pair covered.
    pub fn covered_items(&self) -> impl Iterator<Item = (&OrderId, &ProductId)> {
        self.orders
            .iter()
            .flat_map(|o| o.product_ids.iter().map(move |p| (&o.order_id, p)))
    }
}

impl Document for LogisticsRecord {
    const COLLECTION: &'static str = "logistics";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        let matches_type = matches!(
            (&self.counterparty, self.logistics_type),
            (Counterparty::Business(_), LogisticsType::SellerPickUp)
                | (Counterparty::Customer(_), LogisticsType::CustomerDelivery)
        );
        if !matches_type {
            return Err(format!("{} round has the wrong counterparty", self.logistics_type));
        }
        if self.orders.is_empty() {
            return Err("a logistics record must cover at least one order".to_string());
        }
        Ok(())
    }
}
