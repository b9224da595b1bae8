use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{validate_holes, validate_players};
use crate::utils::AppError;

/// Per-person rate a pro charges for a given (holes, party size).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProPricing {
    pub id: Uuid,
    pub pro_id: Uuid,
    pub holes: i32,
    pub players_count: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingEntry {
    pub holes: i32,
    pub players_count: i32,
    pub price: Decimal,
}

impl PricingEntry {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_holes(self.holes)?;
        validate_players(self.players_count)?;
        if self.price <= Decimal::ZERO {
            return Err(AppError::ValidationError("Price must be positive".to_string()));
        }
        if self.price.scale() > 2 {
            return Err(AppError::ValidationError(
                "Price cannot have more than two decimals".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertPricingRequest {
    pub entries: Vec<PricingEntry>,
}

impl UpsertPricingRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.entries.is_empty() {
            return Err(AppError::ValidationError("No pricing entries given".to_string()));
        }
        let mut seen = HashSet::new();
        for entry in &self.entries {
            entry.validate()?;
            if !seen.insert((entry.holes, entry.players_count)) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate price for {} holes and {} player(s)",
                    entry.holes, entry.players_count
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteQuery {
    pub holes: i32,
    pub players: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommissionRequest {
    pub rate: Decimal,
}

impl UpdateCommissionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.rate < Decimal::ZERO || self.rate >= Decimal::ONE {
            return Err(AppError::ValidationError(
                "Commission rate must be a fraction between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(holes: i32, players_count: i32, price: &str) -> PricingEntry {
        PricingEntry {
            holes,
            players_count,
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_entry_validation() {
        assert!(entry(18, 2, "65.00").validate().is_ok());
        assert!(entry(18, 2, "0").validate().is_err());
        assert!(entry(18, 2, "65.005").validate().is_err());
        assert!(entry(10, 2, "65").validate().is_err());
        assert!(entry(9, 5, "65").validate().is_err());
    }

    #[test]
    fn test_duplicate_combination_rejected() {
        let request = UpsertPricingRequest {
            entries: vec![entry(9, 1, "40"), entry(9, 1, "45")],
        };
        assert!(request.validate().is_err());

        let request = UpsertPricingRequest {
            entries: vec![entry(9, 1, "40"), entry(18, 1, "70")],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_commission_rate_bounds() {
        let ok = UpdateCommissionRequest {
            rate: "0.2".parse().unwrap(),
        };
        assert!(ok.validate().is_ok());
        let bad = UpdateCommissionRequest { rate: Decimal::ONE };
        assert!(bad.validate().is_err());
    }
}
