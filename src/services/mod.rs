//! Business logic services

pub mod access;
pub mod clients;
pub mod memberships;
pub mod visits;

use std::sync::Arc;

use crate::{clock::Clock, repository::Database};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub clients: clients::ClientsService,
    pub memberships: memberships::MembershipsService,
    pub access: access::AccessService,
    pub visits: visits::VisitsService,
    db: Arc<dyn Database>,
}

impl Services {
    /// Create all services over the given database and clock
    pub fn new(db: Arc<dyn Database>, clock: Arc<dyn Clock>) -> Self {
        Self {
            clients: clients::ClientsService::new(db.clone()),
            memberships: memberships::MembershipsService::new(db.clone()),
            access: access::AccessService::new(db.clone(), clock.clone()),
            visits: visits::VisitsService::new(db.clone(), clock),
            db,
        }
    }

    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    use crate::{
        models::{Client, Membership},
        repository::{prelude::*, MemoryDatabase},
    };

    pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid datetime")
    }

    /// Insert a client with one membership, bypassing the services
    pub async fn seed_membership(db: &MemoryDatabase) -> Membership {
        let client = Client {
            id: Uuid::new_v4(),
            full_name: "Test Client".into(),
            email: None,
            is_blocked: false,
        };
        let membership = Membership {
            id: Uuid::new_v4(),
            client_id: client.id,
            kind: "monthly".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("date"),
        };

        let mut uow = db.begin().await.expect("begin");
        uow.save_client(&client).await.expect("save client");
        uow.save_membership(&membership).await.expect("save membership");
        uow.commit().await.expect("commit");
        membership
    }
}
