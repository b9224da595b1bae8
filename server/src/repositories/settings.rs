use rust_decimal::Decimal;
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

pub const COMMISSION_RATE_KEY: &str = "commission_rate";

#[derive(Debug, Clone)]
pub struct SettingsRepo {
    pool: PgPool,
}

impl SettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> SqlxResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM platform_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn set(&self, key: &str, value: &str, updated_by: Uuid) -> SqlxResult<()> {
        sqlx::query(
            "INSERT INTO platform_settings (key, value, updated_by)
             VALUES ($1, $2, $3)
             ON CONFLICT (key) DO UPDATE
             SET value = EXCLUDED.value, updated_by = EXCLUDED.updated_by, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_commission_rate(&self, rate: Decimal, updated_by: Uuid) -> SqlxResult<()> {
        let value = rate.normalize().to_string();
        self.set(COMMISSION_RATE_KEY, &value, updated_by).await
    }
}
