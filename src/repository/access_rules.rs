//! Access rules repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{AccessRuleStore, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::AccessRule,
};

#[async_trait]
impl AccessRuleStore for PgUnitOfWork {
    async fn access_rules_by_membership(&mut self, membership_id: Uuid) -> AppResult<Vec<AccessRule>> {
        let rows = sqlx::query_as::<_, AccessRule>(
            "SELECT * FROM access_rules WHERE membership_id = $1 ORDER BY seq",
        )
        .bind(membership_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn save_access_rule(&mut self, rule: &AccessRule) -> AppResult<AccessRule> {
        let row = sqlx::query_as::<_, AccessRule>(
            r#"
            INSERT INTO access_rules
                (id, membership_id, zones, valid_from_time, valid_to_time, allowed_days, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
               SET zones = EXCLUDED.zones,
                   valid_from_time = EXCLUDED.valid_from_time,
                   valid_to_time = EXCLUDED.valid_to_time,
                   allowed_days = EXCLUDED.allowed_days,
                   priority = EXCLUDED.priority
            RETURNING *
            "#,
        )
        .bind(rule.id)
        .bind(rule.membership_id)
        .bind(&rule.zones)
        .bind(rule.valid_from_time)
        .bind(rule.valid_to_time)
        .bind(&rule.allowed_days)
        .bind(rule.priority)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn access_rule_exists(&mut self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM access_rules WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn delete_access_rule(&mut self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM access_rules WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::AccessRuleNotFound(id));
        }
        Ok(())
    }
}
