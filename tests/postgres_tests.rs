//! Postgres adapter tests
//!
//! These need a running database. Run with:
//! DATABASE_URL=postgres://... cargo test --test postgres_tests -- --ignored
//! Every test works inside one unit of work that is never committed.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use club_attendance::{
    clock::Moment,
    models::{AccessRule, Client, Membership, Visit},
    repository::{prelude::*, Repository},
    services::access::select_rule,
    AppError,
};

async fn repository() -> Repository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect");
    let repository = Repository::new(pool);
    repository.migrate().await.expect("Failed to migrate");
    repository
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 3)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .expect("valid datetime")
}

fn client(email: Option<&str>) -> Client {
    Client {
        id: Uuid::new_v4(),
        full_name: "Ivan Ivanov".into(),
        email: email.map(str::to_string),
        is_blocked: false,
    }
}

/// Save a client and a membership inside `uow`
async fn seed(uow: &mut Box<dyn UnitOfWork>) -> Membership {
    let client = client(None);
    uow.save_client(&client).await.expect("save client");
    let membership = Membership {
        id: Uuid::new_v4(),
        client_id: client.id,
        kind: "monthly".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("date"),
    };
    uow.save_membership(&membership).await.expect("save membership")
}

fn rule(membership_id: Uuid, zone: &str, priority: i32) -> AccessRule {
    AccessRule {
        id: Uuid::new_v4(),
        membership_id,
        zones: vec![zone.to_string()],
        valid_from_time: NaiveTime::from_hms_opt(6, 0, 0).expect("time"),
        valid_to_time: NaiveTime::from_hms_opt(23, 0, 0).expect("time"),
        allowed_days: String::new(),
        priority,
    }
}

#[tokio::test]
#[ignore]
async fn test_rules_come_back_in_insertion_order() {
    let repository = repository().await;
    let mut uow = repository.begin().await.expect("begin");
    let membership = seed(&mut uow).await;

    // Random v4 ids make any id-based order differ from insertion order
    let rules: Vec<AccessRule> = ["sauna", "gym", "pool", "spa"]
        .iter()
        .map(|zone| rule(membership.id, zone, 5))
        .collect();
    for r in &rules {
        uow.save_access_rule(r).await.expect("save rule");
    }

    let stored = uow
        .access_rules_by_membership(membership.id)
        .await
        .expect("list rules");
    assert_eq!(stored, rules);

    let now = Moment { at: at(12, 0) };
    let chosen = select_rule(&stored, &now).expect("a valid rule");
    assert_eq!(chosen.zones, vec!["sauna".to_string()]);
}

#[tokio::test]
#[ignore]
async fn test_last_visit_orders_by_entry_then_insertion() {
    let repository = repository().await;
    let mut uow = repository.begin().await.expect("begin");
    let membership = seed(&mut uow).await;

    let late = Visit::check_in(membership.id, "gym", at(12, 0));
    let early = Visit::check_in(membership.id, "pool", at(9, 0));
    let late_again = Visit::check_in(membership.id, "sauna", at(12, 0));
    for v in [&late, &early, &late_again] {
        uow.save_visit(v).await.expect("save visit");
    }

    let last = uow
        .last_visit_by_membership(membership.id)
        .await
        .expect("last visit");
    assert_eq!(last, Some(late_again));
    assert_eq!(
        uow.count_visits_by_membership(membership.id).await.expect("count"),
        3
    );
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_on_save_is_a_conflict() {
    let repository = repository().await;
    let mut uow = repository.begin().await.expect("begin");
    let email = format!("{}@club.test", Uuid::new_v4());

    uow.save_client(&client(Some(&email))).await.expect("save client");
    let err = uow
        .save_client(&client(Some(&email)))
        .await
        .expect_err("email is unique");

    assert!(matches!(err, AppError::ClientAlreadyExists(e) if e == email));
}
