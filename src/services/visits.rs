//! Visit check-in / check-out service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::Visit,
    repository::prelude::*,
};

#[derive(Clone)]
pub struct VisitsService {
    db: Arc<dyn Database>,
    clock: Arc<dyn Clock>,
}

impl VisitsService {
    pub fn new(db: Arc<dyn Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Check a membership in to `zone`.
    ///
    /// A previous open visit is left as it is: check-in never closes it.
    /// The nil id is treated as a missing membership.
    pub async fn create_visit(&self, membership_id: Uuid, zone: &str) -> AppResult<Visit> {
        if membership_id.is_nil() {
            return Err(AppError::MembershipNotFound(membership_id));
        }

        let mut uow = self.db.begin().await?;

        let membership = uow
            .membership_by_id(membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound(membership_id))?;

        if let Some(previous) = uow.last_visit_by_membership(membership.id).await? {
            if previous.is_open() {
                tracing::warn!(
                    "Membership {} checks in to {} while visit {} ({}) is still open",
                    membership.id,
                    zone,
                    previous.id,
                    previous.zone
                );
            }
        }

        let visit = Visit::check_in(membership.id, zone, self.clock.now());
        let saved = uow.save_visit(&visit).await?;
        uow.commit().await?;

        tracing::info!("Visit {} opened: membership {} zone {}", saved.id, membership.id, zone);
        Ok(saved)
    }

    /// Close the last visit of a membership.
    ///
    /// Returns `None`, writing nothing, when the membership has no visit. An
    /// exit time already set is overwritten.
    pub async fn record_exit(&self, membership_id: Uuid) -> AppResult<Option<Visit>> {
        let mut uow = self.db.begin().await?;

        let Some(mut visit) = uow.last_visit_by_membership(membership_id).await? else {
            return Ok(None);
        };

        visit.exit_time = Some(self.clock.now());
        let saved = uow.save_visit(&visit).await?;
        uow.commit().await?;

        tracing::info!("Visit {} closed: membership {}", saved.id, membership_id);
        Ok(Some(saved))
    }

    pub async fn get_visits_by_membership(&self, membership_id: Uuid) -> AppResult<Vec<Visit>> {
        let mut uow = self.db.begin().await?;
        uow.visits_by_membership(membership_id).await
    }

    /// Zero for unknown memberships
    pub async fn get_visit_count_by_membership(&self, membership_id: Uuid) -> AppResult<i64> {
        let mut uow = self.db.begin().await?;
        uow.count_visits_by_membership(membership_id).await
    }

    pub async fn get_last_visit_by_membership(&self, membership_id: Uuid) -> AppResult<Option<Visit>> {
        let mut uow = self.db.begin().await?;
        uow.last_visit_by_membership(membership_id).await
    }
}
