//! Payment method placeholders.
//!
//! No gateway is involved; details are only checked for presence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CommerceError, CommerceResult};

/// Supported modes of payment, keyed by the codes clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
    #[serde(rename = "CC")]
    CreditCard,
    #[serde(rename = "PP")]
    PayPal,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "COD",
            PaymentMethod::CreditCard => "CC",
            PaymentMethod::PayPal => "PP",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash-On-Delivery",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::PayPal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COD" => Ok(PaymentMethod::CashOnDelivery),
            "CC" => Ok(PaymentMethod::CreditCard),
            "PP" => Ok(PaymentMethod::PayPal),
            _ => Err(CommerceError::Validation(format!("unsupported payment method: {}", s))),
        }
    }
}

/// Payment information as submitted with an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentDetails {
    #[serde(default)]
    pub card_holder_name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub card_expiration: Option<String>,
    #[serde(default)]
    pub security_code: Option<String>,
    #[serde(default)]
    pub pay_pal_email: Option<String>,
}

impl PaymentDetails {
    pub fn card(
        holder: impl Into<String>,
        number: impl Into<String>,
        expiration: impl Into<String>,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            card_holder_name: Some(holder.into()),
            card_number: Some(number.into()),
            card_expiration: Some(expiration.into()),
            security_code: Some(security_code.into()),
            pay_pal_email: None,
        }
    }

    pub fn pay_pal(email: impl Into<String>) -> Self {
        Self {
            pay_pal_email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Keep only the fields relevant to `method`, failing with
    /// `IncompleteData` if any of them is missing.
    pub fn for_method(&self, method: PaymentMethod) -> CommerceResult<PaymentDetails> {
        fn present(field: &Option<String>) -> bool {
            field.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        match method {
            PaymentMethod::CashOnDelivery => Ok(PaymentDetails::default()),
            PaymentMethod::CreditCard => {
                if present(&self.card_holder_name)
                    && present(&self.card_number)
                    && present(&self.card_expiration)
                    && present(&self.security_code)
                {
                    Ok(PaymentDetails {
                        pay_pal_email: None,
                        ..self.clone()
                    })
                } else {
                    Err(CommerceError::incomplete("credit card details"))
                }
            }
            PaymentMethod::PayPal => {
                if present(&self.pay_pal_email) {
                    Ok(PaymentDetails {
                        pay_pal_email: self.pay_pal_email.clone(),
                        ..PaymentDetails::default()
                    })
                } else {
                    Err(CommerceError::incomplete("PayPal email"))
                }
            }
        }
    }
}
