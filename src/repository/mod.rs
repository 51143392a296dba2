//! Repository layer for database operations
//!
//! Each store is a small capability trait. A [`UnitOfWork`] bundles all of
//! them over a single transaction: it is committed explicitly, and dropping
//! it without calling [`UnitOfWork::commit`] rolls every change back.

pub mod access_rules;
pub mod clients;
pub mod memberships;
pub mod memory;
pub mod visits;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AccessRule, Client, Membership, Visit},
};

pub use memory::MemoryDatabase;

/// Store traits, for calling store methods on a `dyn UnitOfWork`
pub mod prelude {
    pub use super::{
        AccessRuleStore, ClientStore, Database, MembershipLookup, MembershipStore, UnitOfWork,
        VisitStore,
    };
}

/// Resolves memberships by id
#[async_trait]
pub trait MembershipLookup: Send {
    async fn membership_by_id(&mut self, id: Uuid) -> AppResult<Option<Membership>>;
}

#[async_trait]
pub trait MembershipStore: Send {
    async fn memberships_by_client(&mut self, client_id: Uuid) -> AppResult<Vec<Membership>>;
    async fn save_membership(&mut self, membership: &Membership) -> AppResult<Membership>;
    async fn membership_exists(&mut self, id: Uuid) -> AppResult<bool>;
    async fn delete_membership(&mut self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait ClientStore: Send {
    async fn client_by_id(&mut self, id: Uuid) -> AppResult<Option<Client>>;
    async fn list_clients(&mut self) -> AppResult<Vec<Client>>;
    async fn client_email_exists(&mut self, email: &str) -> AppResult<bool>;
    async fn save_client(&mut self, client: &Client) -> AppResult<Client>;
    async fn delete_client(&mut self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait AccessRuleStore: Send {
    /// Rules of a membership, in insertion order
    async fn access_rules_by_membership(&mut self, membership_id: Uuid) -> AppResult<Vec<AccessRule>>;
    async fn save_access_rule(&mut self, rule: &AccessRule) -> AppResult<AccessRule>;
    async fn access_rule_exists(&mut self, id: Uuid) -> AppResult<bool>;
    async fn delete_access_rule(&mut self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait VisitStore: Send {
    /// Visit with the latest entry time, open or closed
    async fn last_visit_by_membership(&mut self, membership_id: Uuid) -> AppResult<Option<Visit>>;
    async fn visits_by_membership(&mut self, membership_id: Uuid) -> AppResult<Vec<Visit>>;
    async fn count_visits_by_membership(&mut self, membership_id: Uuid) -> AppResult<i64>;
    async fn save_visit(&mut self, visit: &Visit) -> AppResult<Visit>;
}

/// All stores over one transaction
#[async_trait]
pub trait UnitOfWork:
    MembershipLookup + MembershipStore + ClientStore + AccessRuleStore + VisitStore + Send
{
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Source of units of work
#[async_trait]
pub trait Database: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> AppResult<()>;
}

/// Postgres-backed database
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Database for Repository {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Unit of work over one Postgres transaction
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}
