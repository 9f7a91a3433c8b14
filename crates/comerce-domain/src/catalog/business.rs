//! Seller businesses.

use chrono::{DateTime, Utc};
use comerce_store::Document;
use serde::{Deserialize, Serialize};

use crate::checkout::Address;
use crate::ids::{BusinessId, CustomerId};

/// A seller's business. Products reference it; pick-up rounds collect from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Business {
    pub id: BusinessId,
    /// User account that owns the business.
    #[serde(default)]
    pub owner: Option<CustomerId>,
    pub business_name: String,
    #[serde(default)]
    pub business_email: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    /// Where deliverers collect packed orders.
    #[serde(default)]
    pub pick_up_address: Option<Address>,
    pub date_created: DateTime<Utc>,
}

impl Business {
    pub fn new(id: BusinessId, business_name: impl Into<String>) -> Self {
        Self {
            id,
            owner: None,
            business_name: business_name.into(),
            business_email: None,
            tagline: None,
            contact_number: None,
            pick_up_address: None,
            date_created: Utc::now(),
        }
    }

    pub fn with_owner(mut self, owner: CustomerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_contact_number(mut self, number: impl Into<String>) -> Self {
        self.contact_number = Some(number.into());
        self
    }

    pub fn with_pick_up_address(mut self, address: Address) -> Self {
        self.pick_up_address = Some(address);
        self
    }
}

impl Document for Business {
    const COLLECTION: &'static str = "businesses";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if self.business_name.trim().is_empty() {
            return Err("name of business is required".to_string());
        }
        Ok(())
    }
}
