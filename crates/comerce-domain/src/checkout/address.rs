//! Address types.

use serde::{Deserialize, Serialize};

use crate::error::{CommerceError, CommerceResult};

/// A Philippine postal address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    pub street_address: String,
    pub barangay: String,
    pub city_municipality: String,
    pub province: String,
}

impl Address {
    pub fn new(
        street_address: impl Into<String>,
        barangay: impl Into<String>,
        city_municipality: impl Into<String>,
        province: impl Into<String>,
    ) -> Self {
        Self {
            street_address: street_address.into(),
            barangay: barangay.into(),
            city_municipality: city_municipality.into(),
            province: province.into(),
        }
    }

    /// Format as a single line.
    pub fn one_line(&self) -> String {
        [
            self.street_address.as_str(),
            self.barangay.as_str(),
            self.city_municipality.as_str(),
            self.province.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Recipient and destination of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShipmentDetails {
    pub first_name: String,
    pub last_name: String,
    pub cellphone_number: String,
    #[serde(flatten)]
    pub address: Address,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl ShipmentDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> CommerceResult<()> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("cellphone number", &self.cellphone_number),
            ("street address", &self.address.street_address),
            ("barangay", &self.address.barangay),
            ("city or municipality", &self.address.city_municipality),
            ("province", &self.address.province),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::incomplete(format!(
                "shipment details missing {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> ShipmentDetails {
        ShipmentDetails {
            first_name: "Juan".into(),
            last_name: "Dela Cruz".into(),
            cellphone_number: "9171234567".into(),
            address: Address::new("12 Mabini St", "San Roque", "Marikina", "Metro Manila"),
            additional_notes: None,
        }
    }

    #[test]
    fn test_valid_details() {
        assert!(details().validate().is_ok());
        assert_eq!(details().full_name(), "Juan Dela Cruz");
    }

    #[test]
    fn test_missing_fields_are_incomplete() {
        let mut d = details();
        d.cellphone_number.clear();
        d.address.barangay = "  ".into();
        let err = d.validate().unwrap_err();
        match err {
            CommerceError::IncompleteData(msg) => {
                assert!(msg.contains("cellphone number"));
                assert!(msg.contains("barangay"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_one_line_skips_empty_parts() {
        let a = Address::new("", "San Roque", "Marikina", "Metro Manila");
        assert_eq!(a.one_line(), "San Roque, Marikina, Metro Manila");
    }
}
