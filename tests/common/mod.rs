use std::sync::{Arc, Once};

use workspace_lifecycle::database::models::Workspace;
use workspace_lifecycle::testing::{FixedClock, InMemoryStore, RecordingNotifier};
use workspace_lifecycle::{CleanupOrchestrator, CleanupPolicy};

static TRACING: Once = Once::new();

/// Log to the test writer; honours RUST_LOG
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: FixedClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    /// Store calls yield, so workspaces within a chunk really interleave
    pub fn interleaved() -> Self {
        Self::with_store(InMemoryStore::new().with_yielding())
    }

    fn with_store(store: InMemoryStore) -> Self {
        init_tracing();
        Self {
            store: Arc::new(store),
            notifier: Arc::new(RecordingNotifier::default()),
            clock: FixedClock::now(),
        }
    }

    pub fn orchestrator(&self, policy: CleanupPolicy) -> CleanupOrchestrator {
        let collaborators = self
            .store
            .collaborators(self.notifier.clone(), Arc::new(self.clock.clone()));
        CleanupOrchestrator::new(collaborators, policy)
    }

    /// Suspended workspace last billed `inactive_days` ago
    pub fn suspended(&self, name: &str, inactive_days: i64, members: usize) -> Workspace {
        let workspace = self.store.add_suspended_workspace(name);
        self.store
            .add_billing_record(workspace.id, self.clock.days_ago(inactive_days));
        self.store.add_members(workspace.id, members);
        workspace
    }

    /// Suspended workspace with no billing history at all
    pub fn unbilled(&self, name: &str, members: usize) -> Workspace {
        let workspace = self.store.add_suspended_workspace(name);
        self.store.add_members(workspace.id, members);
        workspace
    }
}
