//! Client management service

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::client::{Client, CreateClient, UpdateClient},
    repository::prelude::*,
};

#[derive(Clone)]
pub struct ClientsService {
    db: Arc<dyn Database>,
}

impl ClientsService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let mut uow = self.db.begin().await?;
        uow.list_clients().await
    }

    pub async fn get_client(&self, id: Uuid) -> AppResult<Client> {
        let mut uow = self.db.begin().await?;
        uow.client_by_id(id).await?.ok_or(AppError::ClientNotFound(id))
    }

    /// Create a client; emails are unique
    pub async fn create_client(&self, data: &CreateClient) -> AppResult<Client> {
        data.validate()?;
        let mut uow = self.db.begin().await?;

        if let Some(ref email) = data.email {
            if uow.client_email_exists(email).await? {
                return Err(AppError::ClientAlreadyExists(email.clone()));
            }
        }

        let saved = uow.save_client(&Client::new(data)).await?;
        uow.commit().await?;

        tracing::info!("Client {} created", saved.id);
        Ok(saved)
    }

    /// Partial update; absent fields keep their value
    pub async fn update_client(&self, id: Uuid, data: &UpdateClient) -> AppResult<Client> {
        data.validate()?;
        let mut uow = self.db.begin().await?;

        let mut client = uow.client_by_id(id).await?.ok_or(AppError::ClientNotFound(id))?;

        if let Some(ref email) = data.email {
            let changed = client.email.as_deref() != Some(email.as_str());
            if changed && uow.client_email_exists(email).await? {
                return Err(AppError::ClientAlreadyExists(email.clone()));
            }
        }

        client.apply(data);
        let saved = uow.save_client(&client).await?;
        uow.commit().await?;
        Ok(saved)
    }

    /// Block or unblock a client. Returns `None` without writing when the
    /// client does not exist.
    pub async fn set_block_status(&self, id: Uuid, blocked: bool) -> AppResult<Option<Client>> {
        let mut uow = self.db.begin().await?;

        let Some(mut client) = uow.client_by_id(id).await? else {
            return Ok(None);
        };

        client.is_blocked = blocked;
        let saved = uow.save_client(&client).await?;
        uow.commit().await?;

        tracing::info!("Client {} blocked={}", id, blocked);
        Ok(Some(saved))
    }

    /// False for unknown or blocked clients
    pub async fn is_active_client(&self, id: Uuid) -> AppResult<bool> {
        let mut uow = self.db.begin().await?;
        Ok(uow.client_by_id(id).await?.is_some_and(|c| !c.is_blocked))
    }

    pub async fn delete_client(&self, id: Uuid) -> AppResult<()> {
        let mut uow = self.db.begin().await?;
        uow.delete_client(id).await?;
        uow.commit().await?;

        tracing::info!("Client {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryDatabase;
    use tokio_test::{assert_err, assert_ok};

    fn create(name: &str, email: Option<&str>) -> CreateClient {
        CreateClient {
            full_name: name.into(),
            email: email.map(str::to_string),
            is_blocked: None,
        }
    }

    fn service(db: &MemoryDatabase) -> ClientsService {
        ClientsService::new(Arc::new(db.clone()))
    }

    #[tokio::test]
    async fn test_create_client() {
        let db = MemoryDatabase::new();
        let clients = service(&db);

        let client = assert_ok!(clients.create_client(&create("Ivan Ivanov", Some("test@test.com"))).await);

        assert_eq!(client.full_name, "Ivan Ivanov");
        assert_eq!(client.email.as_deref(), Some("test@test.com"));
        assert!(!client.is_blocked);
        assert_eq!(assert_ok!(clients.get_client(client.id).await), client);
    }

    #[tokio::test]
    async fn test_create_client_rejects_duplicate_email() {
        let db = MemoryDatabase::new();
        let clients = service(&db);
        assert_ok!(clients.create_client(&create("First", Some("test@test.com"))).await);
        let writes_before = db.write_count();

        let err = assert_err!(clients.create_client(&create("Second", Some("test@test.com"))).await);

        assert!(matches!(err, AppError::ClientAlreadyExists(_)));
        assert_eq!(db.write_count(), writes_before);
    }

    #[tokio::test]
    async fn test_create_client_validates_email() {
        let db = MemoryDatabase::new();
        let err = assert_err!(service(&db).create_client(&create("Name", Some("not-an-email"))).await);
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_client() {
        let db = MemoryDatabase::new();
        let clients = service(&db);
        let client = assert_ok!(clients.create_client(&create("Name", Some("test@test.com"))).await);

        let unchanged = assert_ok!(clients.update_client(client.id, &UpdateClient::default()).await);
        assert_eq!(unchanged, client);

        // Re-submitting the client's own email is not a conflict
        let same_email = UpdateClient {
            full_name: Some("Other Name".into()),
            email: Some("test@test.com".into()),
            is_blocked: None,
        };
        let updated = assert_ok!(clients.update_client(client.id, &same_email).await);
        assert_eq!(updated.full_name, "Other Name");
    }

    #[tokio::test]
    async fn test_update_client_rejects_taken_email() {
        let db = MemoryDatabase::new();
        let clients = service(&db);
        assert_ok!(clients.create_client(&create("Alex", Some("alex@club.test"))).await);
        let client = assert_ok!(clients.create_client(&create("Ivan", Some("ivan@club.test"))).await);
        let writes_before = db.write_count();

        let data = UpdateClient {
            email: Some("alex@club.test".into()),
            ..UpdateClient::default()
        };
        let err = assert_err!(clients.update_client(client.id, &data).await);

        assert!(matches!(err, AppError::ClientAlreadyExists(_)));
        assert_eq!(db.write_count(), writes_before);

        let err = assert_err!(clients.update_client(Uuid::new_v4(), &data).await);
        assert!(matches!(err, AppError::ClientNotFound(_)));
    }

    #[tokio::test]
    async fn test_block_status_and_activity() {
        let db = MemoryDatabase::new();
        let clients = service(&db);
        let client = assert_ok!(clients.create_client(&create("Name", None)).await);

        assert!(assert_ok!(clients.is_active_client(client.id).await));

        let blocked = assert_ok!(clients.set_block_status(client.id, true).await).expect("client exists");
        assert!(blocked.is_blocked);
        assert!(!assert_ok!(clients.is_active_client(client.id).await));
    }

    #[tokio::test]
    async fn test_block_unknown_client_is_a_no_op() {
        let db = MemoryDatabase::new();
        let clients = service(&db);

        assert!(assert_ok!(clients.set_block_status(Uuid::new_v4(), false).await).is_none());
        assert!(!assert_ok!(clients.is_active_client(Uuid::new_v4()).await));
        assert_eq!(db.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_client() {
        let db = MemoryDatabase::new();
        let clients = service(&db);
        let client = assert_ok!(clients.create_client(&create("Name", None)).await);

        assert_ok!(clients.delete_client(client.id).await);
        let err = assert_err!(clients.get_client(client.id).await);
        assert!(matches!(err, AppError::ClientNotFound(_)));
        assert!(matches!(
            assert_err!(clients.delete_client(client.id).await),
            AppError::ClientNotFound(_)
        ));
    }
}
