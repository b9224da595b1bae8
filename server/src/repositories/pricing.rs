use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::pricing::{PricingEntry, ProPricing};

const PRICING_COLUMNS: &str = "id, pro_id, holes, players_count, price, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PricingRepo {
    pool: PgPool,
}

impl PricingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_pro(&self, pro_id: Uuid) -> SqlxResult<Vec<ProPricing>> {
        let sql = format!(
            "SELECT {PRICING_COLUMNS} FROM pro_pricing
             WHERE pro_id = $1
             ORDER BY holes, players_count"
        );
        sqlx::query_as::<_, ProPricing>(&sql)
            .bind(pro_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find(
        &self,
        pro_id: Uuid,
        holes: i32,
        players: i32,
    ) -> SqlxResult<Option<ProPricing>> {
        let sql = format!(
            "SELECT {PRICING_COLUMNS} FROM pro_pricing
             WHERE pro_id = $1 AND holes = $2 AND players_count = $3"
        );
        sqlx::query_as::<_, ProPricing>(&sql)
            .bind(pro_id)
            .bind(holes)
            .bind(players)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts or replaces each (holes, players) price in one transaction.
    pub async fn upsert_many(
        &self,
        pro_id: Uuid,
        entries: &[PricingEntry],
    ) -> SqlxResult<Vec<ProPricing>> {
        let sql = format!(
            "INSERT INTO pro_pricing (pro_id, holes, players_count, price)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (pro_id, holes, players_count)
             DO UPDATE SET price = EXCLUDED.price, updated_at = NOW()
             RETURNING {PRICING_COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = sqlx::query_as::<_, ProPricing>(&sql)
                .bind(pro_id)
                .bind(entry.holes)
                .bind(entry.players_count)
                .bind(entry.price)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn delete(&self, pro_id: Uuid, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM pro_pricing WHERE id = $1 AND pro_id = $2")
            .bind(id)
            .bind(pro_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
