use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{validate_holes, validate_players};
use crate::repositories::settings::COMMISSION_RATE_KEY;
use crate::repositories::{PricingRepo, SettingsRepo};
use crate::utils::{AppError, AppResult};

/// Price breakdown of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub per_person_rate: Decimal,
    pub players: i32,
    pub commission_rate: Decimal,
    pub pro_fee: Decimal,
    pub platform_fee: Decimal,
    pub total_amount: Decimal,
}

impl Quote {
    /// `pro_fee = rate × players`, `platform_fee = pro_fee × commission`
    /// rounded to the cent, `total = pro_fee + platform_fee`.
    pub fn compute(
        per_person_rate: Decimal,
        players: i32,
        commission_rate: Decimal,
    ) -> AppResult<Self> {
        validate_players(players)?;
        if per_person_rate <= Decimal::ZERO {
            return Err(AppError::ValidationError("Rate must be positive".to_string()));
        }
        if commission_rate < Decimal::ZERO || commission_rate >= Decimal::ONE {
            return Err(AppError::InternalServerError(format!(
                "commission rate {} out of range",
                commission_rate
            )));
        }

        let pro_fee = to_cents(per_person_rate * Decimal::from(players));
        let platform_fee = to_cents(pro_fee * commission_rate);

        Ok(Self {
            per_person_rate,
            players,
            commission_rate,
            pro_fee,
            platform_fee,
            total_amount: pro_fee + platform_fee,
        })
    }
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a stored commission rate, falling back to `default` when the
/// stored value is unusable.
pub fn parse_commission_rate(stored: Option<&str>, default: Decimal) -> Decimal {
    let Some(raw) = stored else {
        return default;
    };
    match raw.trim().parse::<Decimal>() {
        Ok(rate) if rate >= Decimal::ZERO && rate < Decimal::ONE => rate,
        _ => {
            tracing::warn!(value = %raw, "Invalid commission_rate setting, using default");
            default
        }
    }
}

#[derive(Debug, Clone)]
pub struct PricingService {
    pricing: PricingRepo,
    settings: SettingsRepo,
    default_commission_rate: Decimal,
}

impl PricingService {
    pub fn new(pool: PgPool, default_commission_rate: Decimal) -> Self {
        Self {
            pricing: PricingRepo::new(pool.clone()),
            settings: SettingsRepo::new(pool),
            default_commission_rate,
        }
    }

    pub async fn commission_rate(&self) -> AppResult<Decimal> {
        let stored = self.settings.get(COMMISSION_RATE_KEY).await?;
        Ok(parse_commission_rate(stored.as_deref(), self.default_commission_rate))
    }

    pub async fn quote(&self, pro_id: Uuid, holes: i32, players: i32) -> AppResult<Quote> {
        validate_holes(holes)?;
        validate_players(players)?;

        let pricing = self
            .pricing
            .find(pro_id, holes, players)
            .await?
            .ok_or_else(|| {
                AppError::PriceNotConfigured(format!(
                    "This pro has no price for {} holes and {} player(s)",
                    holes, players
                ))
            })?;

        let commission_rate = self.commission_rate().await?;
        Quote::compute(pricing.price, players, commission_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_quote_for_two_players() {
        let quote = Quote::compute(dec("60.00"), 2, dec("0.15")).unwrap();
        assert_eq!(quote.pro_fee, dec("120.00"));
        assert_eq!(quote.platform_fee, dec("18.00"));
        assert_eq!(quote.total_amount, dec("138.00"));
    }

    #[test]
    fn test_total_is_sum_and_fee_tracks_rate() {
        let tolerance = dec("0.005");
        for rate in ["35", "42.50", "59.99", "75.35", "120.01"] {
            for players in 1..=4 {
                for commission in ["0.15", "0.1", "0.075"] {
                    let commission = dec(commission);
                    let quote = Quote::compute(dec(rate), players, commission).unwrap();
                    assert_eq!(quote.total_amount, quote.pro_fee + quote.platform_fee);
                    let exact = quote.pro_fee * commission;
                    assert!((quote.platform_fee - exact).abs() <= tolerance);
                }
            }
        }
    }

    #[test]
    fn test_fee_rounds_half_cent_up() {
        // 33.30 × 0.15 = 4.995
        let quote = Quote::compute(dec("33.30"), 1, dec("0.15")).unwrap();
        assert_eq!(quote.platform_fee, dec("5.00"));
    }

    #[test]
    fn test_zero_commission() {
        let quote = Quote::compute(dec("50"), 3, Decimal::ZERO).unwrap();
        assert_eq!(quote.platform_fee, Decimal::ZERO);
        assert_eq!(quote.total_amount, dec("150"));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Quote::compute(dec("50"), 0, dec("0.15")).is_err());
        assert!(Quote::compute(dec("50"), 5, dec("0.15")).is_err());
        assert!(Quote::compute(Decimal::ZERO, 1, dec("0.15")).is_err());
        assert!(Quote::compute(dec("50"), 1, Decimal::ONE).is_err());
    }

    #[test]
    fn test_parse_commission_rate() {
        let default = dec("0.15");
        assert_eq!(parse_commission_rate(None, default), default);
        assert_eq!(parse_commission_rate(Some("0.2"), default), dec("0.2"));
        assert_eq!(parse_commission_rate(Some(" 0.1 "), default), dec("0.1"));
        assert_eq!(parse_commission_rate(Some("abc"), default), default);
        assert_eq!(parse_commission_rate(Some("1.5"), default), default);
    }
}
