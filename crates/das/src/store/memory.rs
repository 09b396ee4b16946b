//! Mutex-guarded in-memory stores backing the API binary, the demo, and tests.
//!
//! Ids are assigned sequentially from 1 in insertion order, and searches return rows in that
//! order.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::RepositoryError;
use crate::account::{Account, AccountDirectory, AccountId, SearchAccountCriteria};
use crate::partnership::blacklist::{
    BlacklistReason, BlacklistRegistry, PartnershipRequestBlacklistEntry, SearchBlacklistCriteria,
};
use crate::partnership::domain::{NewPartnership, Partnership, PartnershipId};
use crate::partnership::repository::{
    PartnershipRepository, PartnershipRequestRepository, SearchPartnershipCriteria,
    SearchPartnershipRequestCriteria,
};
use crate::partnership::request::{NewPartnershipRequest, PartnershipRequestRecord, RequestId};

fn lock<'a, T>(rows: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    rows.lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} mutex poisoned")))
}

fn next_id(len: usize) -> u64 {
    len as u64 + 1
}

#[derive(Default, Clone)]
pub struct InMemoryAccountDirectory {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl InMemoryAccountDirectory {
    /// Add an account; id, email, and uuid must all be unused.
    pub fn insert(&self, account: Account) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.accounts, "account directory")?;
        let taken = guard.iter().any(|existing| {
            existing.id == account.id
                || existing.uuid == account.uuid
                || existing.email.eq_ignore_ascii_case(&account.email)
        });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.push(account);
        Ok(())
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn search(&self, criteria: &SearchAccountCriteria) -> Result<Vec<Account>, RepositoryError> {
        let guard = lock(&self.accounts, "account directory")?;
        Ok(guard
            .iter()
            .filter(|account| criteria.matches(account))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryBlacklistRegistry {
    entries: Arc<Mutex<Vec<PartnershipRequestBlacklistEntry>>>,
}

impl InMemoryBlacklistRegistry {
    /// Record that `reporter_id` blocks partnership requests from `blocked_user_id`.
    pub fn block(
        &self,
        reporter_id: AccountId,
        blocked_user_id: AccountId,
        reason: BlacklistReason,
        detail: Option<String>,
    ) -> Result<PartnershipRequestBlacklistEntry, RepositoryError> {
        let mut guard = lock(&self.entries, "blacklist")?;
        let entry = PartnershipRequestBlacklistEntry {
            id: next_id(guard.len()),
            reporter_id,
            blocked_user_id,
            reason,
            detail,
            created_at: Utc::now(),
        };
        guard.push(entry.clone());
        Ok(entry)
    }
}

impl BlacklistRegistry for InMemoryBlacklistRegistry {
    fn search(
        &self,
        criteria: &SearchBlacklistCriteria,
    ) -> Result<Vec<PartnershipRequestBlacklistEntry>, RepositoryError> {
        let guard = lock(&self.entries, "blacklist")?;
        Ok(guard
            .iter()
            .filter(|entry| criteria.matches(entry))
            .cloned()
            .collect())
    }
}

/// Partnership store enforcing one partnership per (lead, follow) pair.
#[derive(Default, Clone)]
pub struct InMemoryPartnershipRepository {
    partnerships: Arc<Mutex<Vec<Partnership>>>,
}

impl PartnershipRepository for InMemoryPartnershipRepository {
    fn create(&self, partnership: NewPartnership) -> Result<Partnership, RepositoryError> {
        let mut guard = lock(&self.partnerships, "partnership store")?;
        let duplicate = guard.iter().any(|existing| {
            existing.lead_id == partnership.lead_id && existing.follow_id == partnership.follow_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }

        let stored = partnership.into_partnership(PartnershipId(next_id(guard.len())));
        guard.push(stored.clone());
        Ok(stored)
    }

    fn search(
        &self,
        criteria: &SearchPartnershipCriteria,
    ) -> Result<Vec<Partnership>, RepositoryError> {
        let guard = lock(&self.partnerships, "partnership store")?;
        Ok(guard
            .iter()
            .filter(|partnership| criteria.matches(partnership))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryPartnershipRequestRepository {
    requests: Arc<Mutex<Vec<PartnershipRequestRecord>>>,
}

impl PartnershipRequestRepository for InMemoryPartnershipRequestRepository {
    fn create(
        &self,
        request: NewPartnershipRequest,
    ) -> Result<PartnershipRequestRecord, RepositoryError> {
        let mut guard = lock(&self.requests, "request store")?;
        let record = request.into_record(RequestId(next_id(guard.len())));
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: &PartnershipRequestRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.requests, "request store")?;
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = record.clone();
        Ok(())
    }

    fn search(
        &self,
        criteria: &SearchPartnershipRequestCriteria,
    ) -> Result<Vec<PartnershipRequestRecord>, RepositoryError> {
        let guard = lock(&self.requests, "request store")?;
        Ok(guard
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect())
    }
}
