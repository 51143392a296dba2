//! Memberships repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{MembershipLookup, MembershipStore, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::Membership,
};

#[async_trait]
impl MembershipLookup for PgUnitOfWork {
    async fn membership_by_id(&mut self, id: Uuid) -> AppResult<Option<Membership>> {
        let row = sqlx::query_as::<_, Membership>("SELECT * FROM memberships WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl MembershipStore for PgUnitOfWork {
    async fn memberships_by_client(&mut self, client_id: Uuid) -> AppResult<Vec<Membership>> {
        let rows = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE client_id = $1 ORDER BY start_date DESC",
        )
        .bind(client_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn save_membership(&mut self, membership: &Membership) -> AppResult<Membership> {
        let row = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (id, client_id, kind, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
               SET kind = EXCLUDED.kind,
                   start_date = EXCLUDED.start_date,
                   end_date = EXCLUDED.end_date
            RETURNING *
            "#,
        )
        .bind(membership.id)
        .bind(membership.client_id)
        .bind(&membership.kind)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn membership_exists(&mut self, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM memberships WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn delete_membership(&mut self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM memberships WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::MembershipNotFound(id));
        }
        Ok(())
    }
}
