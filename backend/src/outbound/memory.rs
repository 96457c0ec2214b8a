//! In-process adapters for every driven port.
//!
//! [`InMemoryStore`] backs the server when no database URL is configured
//! and drives the HTTP integration tests. It keeps the same referential
//! rules as the PostgreSQL schema: unique emails and worker identifiers,
//! one role per account, and worker deletion cascading to visits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, TokenStore, TokenStoreError, VisitRepository,
    VisitRepositoryError, WorkerRepository, WorkerRepositoryError,
};
use crate::domain::{
    AccountId, AccountProfile, AuthoredVisit, Email, FullName, LoginCredentials, NewVisit,
    NewWorker, Password, Role, SearchTerm, TokenDigest, Visit, VisitScope, VisitWithWorker,
    Worker, WorkerBrief, WorkerIdentifier, WorkerSummary,
};

use super::password::PasswordHasher;

struct AccountRecord {
    email: Email,
    password_hash: String,
    created_at: DateTime<Utc>,
}

struct TokenRecord {
    account: AccountId,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, AccountRecord>,
    profiles: HashMap<AccountId, FullName>,
    roles: HashMap<AccountId, Role>,
    tokens: HashMap<TokenDigest, TokenRecord>,
    workers: Vec<Worker>,
    worker_sequence: u64,
    visits: Vec<Visit>,
}

impl State {
    fn profile(&self, id: &AccountId) -> Option<AccountProfile> {
        let account = self.accounts.get(id)?;
        let full_name = self.profiles.get(id)?;
        Some(AccountProfile {
            id: *id,
            email: account.email.clone(),
            full_name: full_name.clone(),
            role: self.roles.get(id).copied(),
            created_at: account.created_at,
        })
    }

    fn worker_by_uuid(&self, id: Uuid) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    fn with_worker(&self, visit: &Visit) -> Option<VisitWithWorker> {
        let worker = self.worker_by_uuid(visit.worker_id)?;
        Some(VisitWithWorker {
            visit: visit.clone(),
            worker: WorkerBrief {
                identifier: worker.identifier.clone(),
                full_name: worker.full_name.as_str().to_owned(),
                age: worker.age,
                gender: worker.gender,
            },
        })
    }
}

fn in_scope(visit: &Visit, scope: VisitScope) -> bool {
    match scope {
        VisitScope::All => true,
        VisitScope::AuthoredBy(doctor) => visit.doctor_id == doctor,
    }
}

fn newest_visit_first(a: &Visit, b: &Visit) -> std::cmp::Ordering {
    b.visit_date
        .cmp(&a.visit_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Shared in-memory implementation of the account, token, worker and visit
/// repositories.
pub struct InMemoryStore {
    state: Mutex<State>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store. `clock` stamps creation times.
    pub fn new(hasher: PasswordHasher, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            hasher,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create_identity(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<AccountId, AccountRepositoryError> {
        let password_hash = self
            .hasher
            .hash_blocking(password.clone())
            .await
            .map_err(|err| AccountRepositoryError::query(err.to_string()))?;
        let mut state = self.lock();
        if state.accounts.values().any(|a| &a.email == email) {
            return Err(AccountRepositoryError::duplicate_email(email.as_str()));
        }
        let id = AccountId::random();
        state.accounts.insert(
            id,
            AccountRecord {
                email: email.clone(),
                password_hash,
                created_at: self.clock.utc(),
            },
        );
        Ok(id)
    }

    async fn delete_identity(&self, id: &AccountId) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock();
        state.accounts.remove(id);
        state.profiles.remove(id);
        state.roles.remove(id);
        state.tokens.retain(|_, token| &token.account != id);
        Ok(())
    }

    async fn insert_profile(
        &self,
        id: &AccountId,
        full_name: &FullName,
    ) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock();
        if !state.accounts.contains_key(id) {
            return Err(AccountRepositoryError::query("account does not exist"));
        }
        if state.profiles.contains_key(id) {
            return Err(AccountRepositoryError::query("profile already exists"));
        }
        state.profiles.insert(*id, full_name.clone());
        Ok(())
    }

    async fn assign_role(&self, id: &AccountId, role: Role) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock();
        if !state.accounts.contains_key(id) {
            return Err(AccountRepositoryError::query("account does not exist"));
        }
        if state.roles.contains_key(id) {
            return Err(AccountRepositoryError::query("role already assigned"));
        }
        state.roles.insert(*id, role);
        Ok(())
    }

    async fn verify_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<AccountId>, AccountRepositoryError> {
        let candidate = {
            let state = self.lock();
            state
                .accounts
                .iter()
                .find(|(_, a)| &a.email == credentials.email())
                .map(|(id, a)| (*id, a.password_hash.clone()))
        };
        let Some((id, stored)) = candidate else {
            return Ok(None);
        };
        let verified = self
            .hasher
            .verify_blocking(credentials.password().clone(), stored)
            .await
            .map_err(|err| AccountRepositoryError::query(err.to_string()))?;
        Ok(verified.then_some(id))
    }

    async fn find_profile(
        &self,
        id: &AccountId,
    ) -> Result<Option<AccountProfile>, AccountRepositoryError> {
        Ok(self.lock().profile(id))
    }

    async fn role_of(&self, id: &AccountId) -> Result<Option<Role>, AccountRepositoryError> {
        Ok(self.lock().roles.get(id).copied())
    }

    async fn any_with_role(&self, role: Role) -> Result<bool, AccountRepositoryError> {
        Ok(self.lock().roles.values().any(|r| *r == role))
    }

    async fn list_with_role(
        &self,
        role: Role,
        search: Option<SearchTerm>,
    ) -> Result<Vec<AccountProfile>, AccountRepositoryError> {
        let state = self.lock();
        let mut profiles: Vec<_> = state
            .roles
            .iter()
            .filter(|(_, r)| **r == role)
            .filter_map(|(id, _)| state.profile(id))
            .filter(|p| {
                search.as_ref().is_none_or(|term| {
                    term.matches(p.full_name.as_str()) || term.matches(p.email.as_str())
                })
            })
            .collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn count_with_role(&self, role: Role) -> Result<u64, AccountRepositoryError> {
        let count = self.lock().roles.values().filter(|r| **r == role).count();
        Ok(count as u64)
    }

    async fn revoke_role(&self, id: &AccountId, role: Role) -> Result<bool, AccountRepositoryError> {
        let mut state = self.lock();
        if state.roles.get(id) != Some(&role) {
            return Ok(false);
        }
        state.roles.remove(id);
        state.profiles.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl TokenStore for InMemoryStore {
    async fn store(
        &self,
        digest: &TokenDigest,
        account: &AccountId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenStoreError> {
        self.lock().tokens.insert(
            *digest,
            TokenRecord {
                account: *account,
                expires_at,
            },
        );
        Ok(())
    }

    async fn resolve(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountId>, TokenStoreError> {
        let mut state = self.lock();
        state.tokens.retain(|_, token| token.expires_at > now);
        Ok(state.tokens.get(digest).map(|token| token.account))
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<(), TokenStoreError> {
        self.lock().tokens.remove(digest);
        Ok(())
    }

    async fn revoke_all(&self, account: &AccountId) -> Result<(), TokenStoreError> {
        self.lock()
            .tokens
            .retain(|_, token| &token.account != account);
        Ok(())
    }
}

#[async_trait]
impl WorkerRepository for InMemoryStore {
    async fn next_identifier(&self) -> Result<WorkerIdentifier, WorkerRepositoryError> {
        let mut state = self.lock();
        state.worker_sequence += 1;
        Ok(WorkerIdentifier::from_sequence(state.worker_sequence))
    }

    async fn insert(&self, worker: &NewWorker) -> Result<Worker, WorkerRepositoryError> {
        let mut state = self.lock();
        if state
            .workers
            .iter()
            .any(|w| w.identifier == worker.identifier)
        {
            return Err(WorkerRepositoryError::duplicate_identifier(
                worker.identifier.as_str(),
            ));
        }
        let stored = Worker {
            id: Uuid::new_v4(),
            identifier: worker.identifier.clone(),
            full_name: worker.registration.full_name.clone(),
            age: worker.registration.age,
            gender: worker.registration.gender,
            registered_by: Some(worker.registered_by),
            registered_at: self.clock.utc(),
        };
        state.workers.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_identifier(
        &self,
        identifier: &WorkerIdentifier,
    ) -> Result<Option<Worker>, WorkerRepositoryError> {
        Ok(self
            .lock()
            .workers
            .iter()
            .find(|w| &w.identifier == identifier)
            .cloned())
    }

    async fn list(
        &self,
        search: Option<SearchTerm>,
    ) -> Result<Vec<WorkerSummary>, WorkerRepositoryError> {
        let state = self.lock();
        let mut summaries: Vec<_> = state
            .workers
            .iter()
            .filter(|w| {
                search.as_ref().is_none_or(|term| {
                    term.matches(w.full_name.as_str()) || term.matches(w.identifier.as_str())
                })
            })
            .map(|w| WorkerSummary {
                worker: w.clone(),
                visit_count: state.visits.iter().filter(|v| v.worker_id == w.id).count() as u64,
            })
            .collect();
        summaries.sort_by(|a, b| b.worker.registered_at.cmp(&a.worker.registered_at));
        Ok(summaries)
    }

    async fn delete(&self, identifier: &WorkerIdentifier) -> Result<bool, WorkerRepositoryError> {
        let mut state = self.lock();
        let Some(position) = state
            .workers
            .iter()
            .position(|w| &w.identifier == identifier)
        else {
            return Ok(false);
        };
        let removed = state.workers.remove(position);
        state.visits.retain(|v| v.worker_id != removed.id);
        Ok(true)
    }

    async fn count(&self) -> Result<u64, WorkerRepositoryError> {
        Ok(self.lock().workers.len() as u64)
    }
}

#[async_trait]
impl VisitRepository for InMemoryStore {
    async fn insert(&self, visit: &NewVisit) -> Result<Visit, VisitRepositoryError> {
        let mut state = self.lock();
        if state.worker_by_uuid(visit.worker_id).is_none() {
            return Err(VisitRepositoryError::missing_worker(
                visit.worker_id.to_string(),
            ));
        }
        let stored = Visit {
            id: Uuid::new_v4(),
            worker_id: visit.worker_id,
            doctor_id: visit.doctor_id,
            visit_date: visit.draft.visit_date(),
            symptoms: visit.draft.symptoms().to_owned(),
            diagnosis: visit.draft.diagnosis().to_owned(),
            notes: visit.draft.notes().map(str::to_owned),
            created_at: self.clock.utc(),
        };
        state.visits.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<AuthoredVisit>, VisitRepositoryError> {
        let state = self.lock();
        let mut visits: Vec<_> = state
            .visits
            .iter()
            .filter(|v| v.worker_id == worker_id)
            .cloned()
            .collect();
        visits.sort_by(newest_visit_first);
        Ok(visits
            .into_iter()
            .map(|visit| AuthoredVisit {
                doctor_name: state
                    .profiles
                    .get(&visit.doctor_id)
                    .map(|name| name.as_str().to_owned()),
                visit,
            })
            .collect())
    }

    async fn list_authored(
        &self,
        doctor: &AccountId,
        search: Option<SearchTerm>,
    ) -> Result<Vec<VisitWithWorker>, VisitRepositoryError> {
        let state = self.lock();
        let mut visits: Vec<_> = state
            .visits
            .iter()
            .filter(|v| &v.doctor_id == doctor)
            .filter_map(|v| state.with_worker(v))
            .filter(|row| {
                search.as_ref().is_none_or(|term| {
                    term.matches(&row.worker.full_name)
                        || term.matches(row.worker.identifier.as_str())
                        || term.matches(&row.visit.diagnosis)
                })
            })
            .collect();
        visits.sort_by(|a, b| newest_visit_first(&a.visit, &b.visit));
        Ok(visits)
    }

    async fn recent(
        &self,
        scope: VisitScope,
        limit: u32,
    ) -> Result<Vec<VisitWithWorker>, VisitRepositoryError> {
        let state = self.lock();
        let mut visits: Vec<_> = state
            .visits
            .iter()
            .filter(|v| in_scope(v, scope))
            .collect();
        visits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visits
            .into_iter()
            .filter_map(|v| state.with_worker(v))
            .take(limit as usize)
            .collect())
    }

    async fn count(
        &self,
        scope: VisitScope,
        since: Option<NaiveDate>,
    ) -> Result<u64, VisitRepositoryError> {
        let count = self
            .lock()
            .visits
            .iter()
            .filter(|v| in_scope(v, scope))
            .filter(|v| since.is_none_or(|day| v.visit_date >= day))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
