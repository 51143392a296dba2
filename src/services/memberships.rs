//! Membership management service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::membership::{CreateMembership, Membership},
    repository::prelude::*,
};

#[derive(Clone)]
pub struct MembershipsService {
    db: Arc<dyn Database>,
}

impl MembershipsService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Create a membership for an existing client
    pub async fn create_membership(&self, client_id: Uuid, data: &CreateMembership) -> AppResult<Membership> {
        let mut uow = self.db.begin().await?;

        if uow.client_by_id(client_id).await?.is_none() {
            return Err(AppError::ClientNotFound(client_id));
        }

        let membership = Membership::from_request(client_id, data)?;
        let saved = uow.save_membership(&membership).await?;
        uow.commit().await?;

        tracing::info!("Membership {} ({}) created for client {}", saved.id, saved.kind, client_id);
        Ok(saved)
    }

    pub async fn get_membership(&self, id: Uuid) -> AppResult<Membership> {
        let mut uow = self.db.begin().await?;
        uow.membership_by_id(id).await?.ok_or(AppError::MembershipNotFound(id))
    }

    pub async fn get_memberships_by_client(&self, client_id: Uuid) -> AppResult<Vec<Membership>> {
        let mut uow = self.db.begin().await?;
        if uow.client_by_id(client_id).await?.is_none() {
            return Err(AppError::ClientNotFound(client_id));
        }
        uow.memberships_by_client(client_id).await
    }

    /// Delete a membership with its access rules and visits
    pub async fn delete_membership(&self, id: Uuid) -> AppResult<()> {
        let mut uow = self.db.begin().await?;

        if !uow.membership_exists(id).await? {
            return Err(AppError::MembershipNotFound(id));
        }
        uow.delete_membership(id).await?;
        uow.commit().await?;

        tracing::info!("Membership {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::client::CreateClient,
        repository::MemoryDatabase,
        services::clients::ClientsService,
    };
    use tokio_test::{assert_err, assert_ok};

    fn monthly() -> CreateMembership {
        CreateMembership {
            kind: "monthly".into(),
            start_date: "2025-01-01".into(),
            end_date: "2025-01-31".into(),
        }
    }

    #[tokio::test]
    async fn test_membership_lifecycle() {
        let db = MemoryDatabase::new();
        let clients = ClientsService::new(Arc::new(db.clone()));
        let memberships = MembershipsService::new(Arc::new(db.clone()));

        let client = assert_ok!(
            clients
                .create_client(&CreateClient {
                    full_name: "Name".into(),
                    email: None,
                    is_blocked: None,
                })
                .await
        );

        let membership = assert_ok!(memberships.create_membership(client.id, &monthly()).await);
        assert_eq!(assert_ok!(memberships.get_membership(membership.id).await), membership);
        assert_eq!(
            assert_ok!(memberships.get_memberships_by_client(client.id).await),
            vec![membership.clone()]
        );

        assert_ok!(memberships.delete_membership(membership.id).await);
        assert!(matches!(
            assert_err!(memberships.get_membership(membership.id).await),
            AppError::MembershipNotFound(_)
        ));
        assert!(matches!(
            assert_err!(memberships.delete_membership(membership.id).await),
            AppError::MembershipNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_create_membership_requires_client() {
        let db = MemoryDatabase::new();
        let memberships = MembershipsService::new(Arc::new(db.clone()));

        let err = assert_err!(memberships.create_membership(Uuid::new_v4(), &monthly()).await);
        assert!(matches!(err, AppError::ClientNotFound(_)));
        assert_eq!(db.write_count(), 0);
    }
}
