//! Visits repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{PgUnitOfWork, VisitStore};
use crate::{error::AppResult, models::Visit};

#[async_trait]
impl VisitStore for PgUnitOfWork {
    async fn last_visit_by_membership(&mut self, membership_id: Uuid) -> AppResult<Option<Visit>> {
        let row = sqlx::query_as::<_, Visit>(
            r#"
            SELECT * FROM visits
            WHERE membership_id = $1
            ORDER BY entry_time DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(membership_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn visits_by_membership(&mut self, membership_id: Uuid) -> AppResult<Vec<Visit>> {
        let rows = sqlx::query_as::<_, Visit>(
            "SELECT * FROM visits WHERE membership_id = $1 ORDER BY seq",
        )
        .bind(membership_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn count_visits_by_membership(&mut self, membership_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE membership_id = $1")
            .bind(membership_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn save_visit(&mut self, visit: &Visit) -> AppResult<Visit> {
        let row = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (id, membership_id, zone, entry_time, exit_time)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
               SET zone = EXCLUDED.zone,
                   entry_time = EXCLUDED.entry_time,
                   exit_time = EXCLUDED.exit_time
            RETURNING *
            "#,
        )
        .bind(visit.id)
        .bind(visit.membership_id)
        .bind(&visit.zone)
        .bind(visit.entry_time)
        .bind(visit.exit_time)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }
}
