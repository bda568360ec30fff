//! In-memory collaborators for exercising the cleanup core without a database.
//!
//! `InMemoryStore` implements every store trait and can inject failures per
//! workspace or member. `FixedClock` clones share one instant so tests can move
//! time forward between runs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::config::{CleanupPolicy, DEFAULT_CHUNK_SIZE};
use crate::database::models::{ActivationStatus, BillingRecord, Member, Workspace};
use crate::lifecycle::notifier::{Notifier, NotifyError};
use crate::lifecycle::orchestrator::Collaborators;
use crate::lifecycle::store::{
    BillingStore, Clock, MemberDirectory, StoreError, VariableStore, WorkspaceStore,
};

/// Policy with the given thresholds and cap, default chunk sizes, not a dry run
pub fn policy(days_before_warning: i64, days_before_deletion: i64, max_deletions_per_run: usize) -> CleanupPolicy {
    CleanupPolicy {
        days_before_warning,
        days_before_deletion,
        max_deletions_per_run,
        workspace_chunk_size: DEFAULT_CHUNK_SIZE,
        member_chunk_size: DEFAULT_CHUNK_SIZE,
        dry_run: false,
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn days_ago(&self, days: i64) -> DateTime<Utc> {
        Clock::now(self) - Duration::days(days)
    }

    pub fn advance_days(&self, days: i64) {
        *lock(&self.now) += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}

#[derive(Default)]
struct State {
    workspaces: Vec<Workspace>,
    force_in_fetch: HashSet<Uuid>,
    billing: Vec<BillingRecord>,
    members: Vec<Member>,
    variables: HashMap<(Uuid, Uuid, String), Value>,
    deleted: Vec<Uuid>,
    failing_deletes: HashSet<Uuid>,
    failing_variable_writes: HashSet<Uuid>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_fetch: AtomicBool,
    yield_on_io: AtomicBool,
    fetches: AtomicUsize,
    in_flight_deletes: AtomicUsize,
    peak_deletes: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every store call yields to the scheduler first, so concurrent
    /// workspace handlers actually interleave
    pub fn with_yielding(self) -> Self {
        self.yield_on_io.store(true, Ordering::SeqCst);
        self
    }

    pub fn collaborators(self: &Arc<Self>, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Collaborators {
        Collaborators {
            workspaces: self.clone(),
            billing: self.clone(),
            members: self.clone(),
            variables: self.clone(),
            notifier,
            clock,
        }
    }

    async fn io(&self) {
        if self.yield_on_io.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }

    pub fn add_workspace(&self, name: &str, status: ActivationStatus) -> Workspace {
        let workspace = Workspace {
            id: Uuid::new_v4(),
            display_name: name.to_string(),
            activation_status: status,
        };
        lock(&self.state).workspaces.push(workspace.clone());
        workspace
    }

    pub fn add_suspended_workspace(&self, name: &str) -> Workspace {
        self.add_workspace(name, ActivationStatus::Suspended)
    }

    /// Change the stored status but keep returning the workspace from `find_suspended`
    pub fn include_in_suspended_fetch(&self, workspace_id: Uuid, status: ActivationStatus) {
        let mut state = lock(&self.state);
        if let Some(workspace) = state.workspaces.iter_mut().find(|w| w.id == workspace_id) {
            workspace.activation_status = status;
        }
        state.force_in_fetch.insert(workspace_id);
    }

    pub fn add_billing_record(&self, workspace_id: Uuid, updated_at: DateTime<Utc>) {
        lock(&self.state).billing.push(BillingRecord {
            workspace_id,
            updated_at,
        });
    }

    pub fn add_members(&self, workspace_id: Uuid, count: usize) -> Vec<Member> {
        let members: Vec<Member> = (0..count)
            .map(|_| Member {
                id: Uuid::new_v4(),
                workspace_id,
            })
            .collect();
        lock(&self.state).members.extend(members.iter().cloned());
        members
    }

    pub fn members(&self, workspace_id: Uuid) -> Vec<Member> {
        lock(&self.state)
            .members
            .iter()
            .filter(|m| m.workspace_id == workspace_id)
            .cloned()
            .collect()
    }

    pub fn set_variable(&self, member_id: Uuid, workspace_id: Uuid, key: &str, value: Value) {
        lock(&self.state)
            .variables
            .insert((member_id, workspace_id, key.to_string()), value);
    }

    pub fn variable(&self, member_id: Uuid, workspace_id: Uuid, key: &str) -> Option<Value> {
        lock(&self.state)
            .variables
            .get(&(member_id, workspace_id, key.to_string()))
            .cloned()
    }

    pub fn variable_count(&self) -> usize {
        lock(&self.state).variables.len()
    }

    pub fn workspace_exists(&self, workspace_id: Uuid) -> bool {
        lock(&self.state).workspaces.iter().any(|w| w.id == workspace_id)
    }

    pub fn deleted_ids(&self) -> Vec<Uuid> {
        lock(&self.state).deleted.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Highest number of deletes observed in flight at once
    pub fn peak_concurrent_deletes(&self) -> usize {
        self.peak_deletes.load(Ordering::SeqCst)
    }

    pub fn fail_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete_for(&self, workspace_id: Uuid) {
        lock(&self.state).failing_deletes.insert(workspace_id);
    }

    /// Both `set` and `delete` fail for this member
    pub fn fail_variable_writes_for(&self, member_id: Uuid) {
        lock(&self.state).failing_variable_writes.insert(member_id);
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryStore {
    async fn find_suspended(&self) -> Result<Vec<Workspace>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.io().await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("workspace store offline".to_string()));
        }

        let state = lock(&self.state);
        Ok(state
            .workspaces
            .iter()
            .filter(|w| w.is_suspended() || state.force_in_fetch.contains(&w.id))
            .cloned()
            .collect())
    }

    async fn find(&self, workspace_id: Uuid) -> Result<Option<Workspace>, StoreError> {
        self.io().await;
        Ok(lock(&self.state)
            .workspaces
            .iter()
            .find(|w| w.id == workspace_id)
            .cloned())
    }

    async fn delete(&self, workspace_id: Uuid) -> Result<(), StoreError> {
        let now = self.in_flight_deletes.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_deletes.fetch_max(now, Ordering::SeqCst);
        self.io().await;
        self.in_flight_deletes.fetch_sub(1, Ordering::SeqCst);

        let mut state = lock(&self.state);
        if state.failing_deletes.contains(&workspace_id) {
            return Err(StoreError::Unavailable(format!("cannot delete {}", workspace_id)));
        }
        let before = state.workspaces.len();
        state.workspaces.retain(|w| w.id != workspace_id);
        if state.workspaces.len() == before {
            return Err(StoreError::NotFound(format!("workspace {}", workspace_id)));
        }
        state.deleted.push(workspace_id);
        Ok(())
    }
}

#[async_trait]
impl BillingStore for InMemoryStore {
    async fn most_recent_subscription(
        &self,
        workspace_id: Uuid,
    ) -> Result<Option<BillingRecord>, StoreError> {
        self.io().await;
        Ok(lock(&self.state)
            .billing
            .iter()
            .filter(|b| b.workspace_id == workspace_id)
            .max_by_key(|b| b.updated_at)
            .cloned())
    }
}

#[async_trait]
impl MemberDirectory for InMemoryStore {
    async fn members_of(&self, workspace: &Workspace) -> Result<Vec<Member>, StoreError> {
        self.io().await;
        Ok(self.members(workspace.id))
    }
}

#[async_trait]
impl VariableStore for InMemoryStore {
    async fn get(
        &self,
        member_id: Uuid,
        workspace_id: Uuid,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.io().await;
        Ok(self.variable(member_id, workspace_id, key))
    }

    async fn set(
        &self,
        member_id: Uuid,
        workspace_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.io().await;
        if lock(&self.state).failing_variable_writes.contains(&member_id) {
            return Err(StoreError::Unavailable(format!("write refused for {}", member_id)));
        }
        self.set_variable(member_id, workspace_id, key, value);
        Ok(())
    }

    async fn delete(&self, member_id: Uuid, workspace_id: Uuid, key: &str) -> Result<(), StoreError> {
        self.io().await;
        let mut state = lock(&self.state);
        if state.failing_variable_writes.contains(&member_id) {
            return Err(StoreError::Unavailable(format!("delete refused for {}", member_id)));
        }
        state.variables.remove(&(member_id, workspace_id, key.to_string()));
        Ok(())
    }
}

/// Notifier that records every call
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(Uuid, i64)>>,
    failing: Mutex<HashSet<Uuid>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// (workspace id, days until deletion) per call, in call order
    pub fn calls(&self) -> Vec<(Uuid, i64)> {
        lock(&self.calls).clone()
    }

    pub fn calls_for(&self, workspace_id: Uuid) -> usize {
        lock(&self.calls).iter().filter(|(id, _)| *id == workspace_id).count()
    }

    pub fn fail_for(&self, workspace_id: Uuid) {
        lock(&self.failing).insert(workspace_id);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_deletion_warning(
        &self,
        workspace: &Workspace,
        days_until_deletion: i64,
    ) -> Result<(), NotifyError> {
        if lock(&self.failing).contains(&workspace.id) {
            return Err(NotifyError(format!("mailer rejected {}", workspace.id)));
        }
        lock(&self.calls).push((workspace.id, days_until_deletion));
        Ok(())
    }
}
