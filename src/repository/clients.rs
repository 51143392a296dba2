//! Clients repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{ClientStore, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::Client,
};

/// A concurrent insert can still hit the unique email index after the
/// existence check passed
fn save_error(error: sqlx::Error, client: &Client) -> AppError {
    if let (sqlx::Error::Database(db), Some(email)) = (&error, &client.email) {
        if db.is_unique_violation() {
            return AppError::ClientAlreadyExists(email.clone());
        }
    }
    AppError::Database(error)
}

#[async_trait]
impl ClientStore for PgUnitOfWork {
    async fn client_by_id(&mut self, id: Uuid) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY full_name")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn client_email_exists(&mut self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE email = $1)")
                .bind(email)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn save_client(&mut self, client: &Client) -> AppResult<Client> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, full_name, email, is_blocked)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
               SET full_name = EXCLUDED.full_name,
                   email = EXCLUDED.email,
                   is_blocked = EXCLUDED.is_blocked
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(client.is_blocked)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| save_error(e, client))?;
        Ok(row)
    }

    async fn delete_client(&mut self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ClientNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_errors_stay_database_errors() {
        let client = Client {
            id: Uuid::new_v4(),
            full_name: "Name".into(),
            email: Some("test@test.com".into()),
            is_blocked: false,
        };
        let err = save_error(sqlx::Error::RowNotFound, &client);
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
