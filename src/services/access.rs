//! Access rule management and access evaluation

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clock::{Clock, Moment},
    error::{AppError, AppResult},
    models::access_rule::{AccessRule, CreateAccessRule},
    repository::prelude::*,
};

#[derive(Clone)]
pub struct AccessService {
    db: Arc<dyn Database>,
    clock: Arc<dyn Clock>,
}

/// Pick the rule that decides access at `now`.
///
/// Only rules valid at `now` compete; the highest priority wins and, among
/// equal priorities, the first one in `rules` order.
pub fn select_rule<'a>(rules: &'a [AccessRule], now: &Moment) -> Option<&'a AccessRule> {
    rules
        .iter()
        .filter(|rule| rule.is_valid_at(now))
        .fold(None::<&'a AccessRule>, |best, rule| match best {
            Some(current) if current.priority >= rule.priority => Some(current),
            _ => Some(rule),
        })
}

impl AccessService {
    pub fn new(db: Arc<dyn Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Create a rule for an existing membership
    pub async fn create_access_rule(
        &self,
        membership_id: Uuid,
        data: &CreateAccessRule,
    ) -> AppResult<AccessRule> {
        let mut uow = self.db.begin().await?;

        let membership = uow
            .membership_by_id(membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound(membership_id))?;

        let rule = AccessRule::from_request(membership.id, data)?;
        let saved = uow.save_access_rule(&rule).await?;
        uow.commit().await?;

        tracing::info!(
            "Access rule {} created for membership {} (priority {}, zones {:?})",
            saved.id,
            membership_id,
            saved.priority,
            saved.zones
        );
        Ok(saved)
    }

    /// Rules of a membership; empty when there are none
    pub async fn get_access_rules_by_membership(&self, membership_id: Uuid) -> AppResult<Vec<AccessRule>> {
        let mut uow = self.db.begin().await?;
        uow.access_rules_by_membership(membership_id).await
    }

    pub async fn delete_access_rule(&self, id: Uuid) -> AppResult<()> {
        let mut uow = self.db.begin().await?;

        if !uow.access_rule_exists(id).await? {
            return Err(AppError::AccessRuleNotFound(id));
        }
        uow.delete_access_rule(id).await?;
        uow.commit().await?;

        tracing::info!("Access rule {} deleted", id);
        Ok(())
    }

    /// Whether `membership_id` may enter `zone` right now.
    /// Unknown memberships and memberships without rules are denied.
    pub async fn check_access(&self, membership_id: Uuid, zone: &str) -> AppResult<bool> {
        let rules = self.get_access_rules_by_membership(membership_id).await?;
        let now = Moment::read(self.clock.as_ref());

        let decision = select_rule(&rules, &now);
        let granted = decision.is_some_and(|rule| rule.grants(zone));

        tracing::debug!(
            "Access check membership={} zone={} rule={:?} granted={}",
            membership_id,
            zone,
            decision.map(|rule| rule.id),
            granted
        );
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::{FixedClock, MockClock},
        repository::{prelude::*, MemoryDatabase},
        services::testing::{at, seed_membership},
    };
    use chrono::NaiveDateTime;
    use tokio_test::{assert_err, assert_ok};

    // 2024-01-03 is a Wednesday (ISO day 3)
    fn wednesday_noon() -> NaiveDateTime {
        at(2024, 1, 3, 12, 0, 0)
    }

    fn rule(zones: &[&str], from: &str, to: &str, days: &str, priority: i32) -> CreateAccessRule {
        CreateAccessRule {
            zones: zones.iter().map(|z| z.to_string()).collect(),
            valid_from_time: from.into(),
            valid_to_time: to.into(),
            allowed_days: days.into(),
            priority,
        }
    }

    fn service(db: &MemoryDatabase, now: NaiveDateTime) -> AccessService {
        AccessService::new(Arc::new(db.clone()), Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn test_no_rules_denies_every_zone() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        let access = service(&db, wednesday_noon());

        for zone in ["gym", "pool", ""] {
            assert!(!access.check_access(membership.id, zone).await.expect("check"));
        }
        assert!(!access.check_access(Uuid::new_v4(), "gym").await.expect("check"));
    }

    #[tokio::test]
    async fn test_higher_priority_wins_exclusively() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        let access = service(&db, wednesday_noon());

        assert_ok!(access.create_access_rule(membership.id, &rule(&["gym"], "00:00", "23:59", "", 1)).await);
        assert_ok!(access.create_access_rule(membership.id, &rule(&["pool"], "00:00", "23:59", "", 2)).await);

        assert!(!access.check_access(membership.id, "gym").await.expect("check"));
        assert!(access.check_access(membership.id, "pool").await.expect("check"));
    }

    #[tokio::test]
    async fn test_rule_outside_window_is_ignored() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        let access = service(&db, wednesday_noon());

        // Higher priority, but only valid in the morning
        assert_ok!(access.create_access_rule(membership.id, &rule(&["B"], "06:00", "11:59:59", "", 10)).await);
        assert_ok!(access.create_access_rule(membership.id, &rule(&["A"], "12:00", "20:00", "", 5)).await);

        assert!(access.check_access(membership.id, "A").await.expect("check"));
        assert!(!access.check_access(membership.id, "B").await.expect("check"));
    }

    #[tokio::test]
    async fn test_listed_day_excludes_rule() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        let access = service(&db, wednesday_noon());

        // Wednesday (3) is listed: the rule is NOT valid today
        assert_ok!(access.create_access_rule(membership.id, &rule(&["gym"], "00:00", "23:59", "3", 1)).await);
        assert!(!access.check_access(membership.id, "gym").await.expect("check"));

        // Days not including Wednesday: valid today
        assert_ok!(access.create_access_rule(membership.id, &rule(&["pool"], "00:00", "23:59", "1267", 1)).await);
        assert!(access.check_access(membership.id, "pool").await.expect("check"));
    }

    #[tokio::test]
    async fn test_equal_priority_first_inserted_wins() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        let access = service(&db, wednesday_noon());

        assert_ok!(access.create_access_rule(membership.id, &rule(&["first"], "00:00", "23:59", "", 7)).await);
        assert_ok!(access.create_access_rule(membership.id, &rule(&["second"], "00:00", "23:59", "", 7)).await);

        assert!(access.check_access(membership.id, "first").await.expect("check"));
        assert!(!access.check_access(membership.id, "second").await.expect("check"));
    }

    #[tokio::test]
    async fn test_clock_is_read_once_per_check() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        assert_ok!(
            service(&db, wednesday_noon())
                .create_access_rule(membership.id, &rule(&["gym"], "08:00", "22:00", "", 1))
                .await
        );

        let mut clock = MockClock::new();
        clock.expect_now().times(1).return_const(at(2024, 1, 3, 7, 59, 0));
        let access = AccessService::new(Arc::new(db.clone()), Arc::new(clock));

        assert!(!access.check_access(membership.id, "gym").await.expect("check"));
    }

    #[tokio::test]
    async fn test_create_rule_requires_membership() {
        let db = MemoryDatabase::new();
        let access = service(&db, wednesday_noon());
        let missing = Uuid::new_v4();

        let err = assert_err!(
            access.create_access_rule(missing, &rule(&["gym"], "08:00", "22:00", "", 1)).await
        );
        assert!(matches!(err, AppError::MembershipNotFound(id) if id == missing));
        assert_eq!(db.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_rule() {
        let db = MemoryDatabase::new();
        let membership = seed_membership(&db).await;
        let access = service(&db, wednesday_noon());

        let created = assert_ok!(
            access.create_access_rule(membership.id, &rule(&["gym"], "08:00", "22:00", "", 1)).await
        );
        assert_ok!(access.delete_access_rule(created.id).await);

        let mut uow = db.begin().await.expect("begin");
        assert!(!uow.access_rule_exists(created.id).await.expect("exists"));
        assert!(access
            .get_access_rules_by_membership(membership.id)
            .await
            .expect("list")
            .is_empty());

        let err = assert_err!(access.delete_access_rule(created.id).await);
        assert!(matches!(err, AppError::AccessRuleNotFound(id) if id == created.id));
    }

    #[test]
    fn test_select_rule_skips_invalid_rules() {
        let now = Moment { at: wednesday_noon() };
        let membership_id = Uuid::new_v4();
        let build = |zones: &[&str], days: &str, priority| {
            AccessRule::from_request(membership_id, &rule(zones, "00:00", "23:59", days, priority))
                .expect("valid rule")
        };

        let rules = vec![build(&["a"], "3", 100), build(&["b"], "", 1), build(&["c"], "", 2)];
        let chosen = select_rule(&rules, &now).expect("a valid rule");
        assert!(chosen.grants("c"));

        assert!(select_rule(&rules[..1], &now).is_none());
        assert!(select_rule(&[], &now).is_none());
    }
}
