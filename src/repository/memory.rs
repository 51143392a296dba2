//! In-memory database
//!
//! A unit of work reads and writes a private snapshot of the store and keeps
//! a journal of its writes. Commit replays that journal onto the shared state,
//! so overlapping units only lose updates to the same record (last committer
//! wins). Every save or delete call is counted, committed or not, so callers
//! can assert that an operation wrote nothing.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    AccessRuleStore, ClientStore, Database, MembershipLookup, MembershipStore, UnitOfWork,
    VisitStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{AccessRule, Client, Membership, Visit},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    clients: Vec<Client>,
    memberships: Vec<Membership>,
    access_rules: Vec<AccessRule>,
    visits: Vec<Visit>,
}

/// A single write, replayable onto any state
#[derive(Debug, Clone)]
enum Write {
    SaveClient(Client),
    DeleteClient(Uuid),
    SaveMembership(Membership),
    DeleteMembership(Uuid),
    SaveAccessRule(AccessRule),
    DeleteAccessRule(Uuid),
    SaveVisit(Visit),
}

impl MemoryState {
    /// Apply one write; false when a delete found nothing to remove
    fn apply(&mut self, write: &Write) -> bool {
        match write {
            Write::SaveClient(client) => upsert(&mut self.clients, client, |c| c.id),
            Write::SaveMembership(membership) => upsert(&mut self.memberships, membership, |m| m.id),
            Write::SaveAccessRule(rule) => upsert(&mut self.access_rules, rule, |r| r.id),
            Write::SaveVisit(visit) => upsert(&mut self.visits, visit, |v| v.id),
            Write::DeleteAccessRule(id) => return remove(&mut self.access_rules, *id, |r| r.id),
            Write::DeleteMembership(id) => {
                if !remove(&mut self.memberships, *id, |m| m.id) {
                    return false;
                }
                // Mirrors ON DELETE CASCADE
                self.access_rules.retain(|r| r.membership_id != *id);
                self.visits.retain(|v| v.membership_id != *id);
            }
            Write::DeleteClient(id) => {
                if !remove(&mut self.clients, *id, |c| c.id) {
                    return false;
                }
                let memberships: Vec<Uuid> = self
                    .memberships
                    .iter()
                    .filter(|m| m.client_id == *id)
                    .map(|m| m.id)
                    .collect();
                self.memberships.retain(|m| m.client_id != *id);
                self.access_rules
                    .retain(|r| !memberships.contains(&r.membership_id));
                self.visits.retain(|v| !memberships.contains(&v.membership_id));
            }
        }
        true
    }
}

/// Process-local database
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of save/delete calls issued so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let working = self.state.lock().await.clone();
        Ok(Box::new(MemoryUnitOfWork {
            shared: Arc::clone(&self.state),
            working,
            journal: Vec::new(),
            writes: Arc::clone(&self.writes),
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    shared: Arc<Mutex<MemoryState>>,
    working: MemoryState,
    journal: Vec<Write>,
    writes: Arc<AtomicUsize>,
}

impl MemoryUnitOfWork {
    /// Apply to the private snapshot and journal it for commit
    fn write(&mut self, write: Write) -> bool {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let applied = self.working.apply(&write);
        if applied {
            self.journal.push(write);
        }
        applied
    }
}

/// Replace the element with the same id in place, or append
fn upsert<T: Clone>(items: &mut Vec<T>, item: &T, id: impl Fn(&T) -> Uuid) {
    let key = id(item);
    match items.iter_mut().find(|existing| id(existing) == key) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
}

/// Remove the element with `key`; false if it was not there
fn remove<T>(items: &mut Vec<T>, key: Uuid, id: impl Fn(&T) -> Uuid) -> bool {
    let before = items.len();
    items.retain(|item| id(item) != key);
    items.len() != before
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut shared = self.shared.lock().await;
        for write in &self.journal {
            // A delete already applied by another unit is not an error here
            shared.apply(write);
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipLookup for MemoryUnitOfWork {
    async fn membership_by_id(&mut self, id: Uuid) -> AppResult<Option<Membership>> {
        Ok(self.working.memberships.iter().find(|m| m.id == id).cloned())
    }
}

#[async_trait]
impl MembershipStore for MemoryUnitOfWork {
    async fn memberships_by_client(&mut self, client_id: Uuid) -> AppResult<Vec<Membership>> {
        let mut rows: Vec<Membership> = self
            .working
            .memberships
            .iter()
            .filter(|m| m.client_id == client_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn save_membership(&mut self, membership: &Membership) -> AppResult<Membership> {
        self.write(Write::SaveMembership(membership.clone()));
        Ok(membership.clone())
    }

    async fn membership_exists(&mut self, id: Uuid) -> AppResult<bool> {
        Ok(self.working.memberships.iter().any(|m| m.id == id))
    }

    async fn delete_membership(&mut self, id: Uuid) -> AppResult<()> {
        if !self.write(Write::DeleteMembership(id)) {
            return Err(AppError::MembershipNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl ClientStore for MemoryUnitOfWork {
    async fn client_by_id(&mut self, id: Uuid) -> AppResult<Option<Client>> {
        Ok(self.working.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        let mut rows = self.working.clients.clone();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(rows)
    }

    async fn client_email_exists(&mut self, email: &str) -> AppResult<bool> {
        Ok(self
            .working
            .clients
            .iter()
            .any(|c| c.email.as_deref() == Some(email)))
    }

    async fn save_client(&mut self, client: &Client) -> AppResult<Client> {
        self.write(Write::SaveClient(client.clone()));
        Ok(client.clone())
    }

    async fn delete_client(&mut self, id: Uuid) -> AppResult<()> {
        if !self.write(Write::DeleteClient(id)) {
            return Err(AppError::ClientNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AccessRuleStore for MemoryUnitOfWork {
    async fn access_rules_by_membership(&mut self, membership_id: Uuid) -> AppResult<Vec<AccessRule>> {
        Ok(self
            .working
            .access_rules
            .iter()
            .filter(|r| r.membership_id == membership_id)
            .cloned()
            .collect())
    }

    async fn save_access_rule(&mut self, rule: &AccessRule) -> AppResult<AccessRule> {
        self.write(Write::SaveAccessRule(rule.clone()));
        Ok(rule.clone())
    }

    async fn access_rule_exists(&mut self, id: Uuid) -> AppResult<bool> {
        Ok(self.working.access_rules.iter().any(|r| r.id == id))
    }

    async fn delete_access_rule(&mut self, id: Uuid) -> AppResult<()> {
        if !self.write(Write::DeleteAccessRule(id)) {
            return Err(AppError::AccessRuleNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl VisitStore for MemoryUnitOfWork {
    async fn last_visit_by_membership(&mut self, membership_id: Uuid) -> AppResult<Option<Visit>> {
        // max_by_key keeps the last of equal keys, i.e. the latest inserted
        Ok(self
            .working
            .visits
            .iter()
            .filter(|v| v.membership_id == membership_id)
            .max_by_key(|v| v.entry_time)
            .cloned())
    }

    async fn visits_by_membership(&mut self, membership_id: Uuid) -> AppResult<Vec<Visit>> {
        Ok(self
            .working
            .visits
            .iter()
            .filter(|v| v.membership_id == membership_id)
            .cloned()
            .collect())
    }

    async fn count_visits_by_membership(&mut self, membership_id: Uuid) -> AppResult<i64> {
        let count = self
            .working
            .visits
            .iter()
            .filter(|v| v.membership_id == membership_id)
            .count();
        i64::try_from(count).map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn save_visit(&mut self, visit: &Visit) -> AppResult<Visit> {
        self.write(Write::SaveVisit(visit.clone()));
        Ok(visit.clone())
    }
}
