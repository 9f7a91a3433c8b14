//! User roles, customers and deliverers.

use comerce_store::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checkout::Address;
use crate::error::CommerceError;
use crate::ids::{CustomerId, DelivererId};

/// Account role supplied by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Customer,
    Seller,
    Logistics,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Customer => "CUSTOMER",
            UserType::Seller => "SELLER",
            UserType::Logistics => "LOGISTICS",
            UserType::Admin => "ADMIN",
        }
    }

    /// Sellers are customers too, so they may place and rate orders.
    pub fn can_buy(&self) -> bool {
        matches!(self, UserType::Customer | UserType::Seller)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserType {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CUSTOMER" => Ok(UserType::Customer),
            "SELLER" => Ok(UserType::Seller),
            "LOGISTICS" => Ok(UserType::Logistics),
            "ADMIN" => Ok(UserType::Admin),
            _ => Err(CommerceError::Validation(format!("unknown user type: {}", s))),
        }
    }
}

/// A buying account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub shipping_address: Option<Address>,
}

impl Customer {
    pub fn new(id: CustomerId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            shipping_address: None,
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }
}

impl Document for Customer {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err(format!("invalid email: {}", self.email));
        }
        Ok(())
    }
}

/// A logistics account that picks up from sellers and delivers to customers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deliverer {
    pub id: DelivererId,
    pub name: String,
    #[serde(default)]
    pub primary_number: Option<String>,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Deliverer {
    pub fn new(id: DelivererId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            primary_number: None,
            plate_number: None,
            address: None,
        }
    }

    pub fn with_plate_number(mut self, plate: impl Into<String>) -> Self {
        self.plate_number = Some(plate.into());
        self
    }
}

impl Document for Deliverer {
    const COLLECTION: &'static str = "deliverers";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(number) = &self.primary_number {
            let valid = number.len() == 10
                && number.starts_with('9')
                && number.chars().all(|c| c.is_ascii_digit());
            if !valid {
                return Err(format!("invalid primary phone number: {}", number));
            }
        }
        Ok(())
    }
}
