// Suspended workspace lifecycle: inactivity, classification, warning ledger and cleanup runs

pub mod budget;
pub mod classifier;
pub mod inactivity;
pub mod ledger;
pub mod notifier;
pub mod orchestrator;
pub mod runner;
pub mod store;
pub mod worker;

pub use budget::{DeletionBudget, DeletionPermit};
pub use classifier::{classify, LifecycleAction};
pub use inactivity::{inactive_days, Inactivity, InactivityCalculator, ONE_DAY_MS};
pub use ledger::{LedgerReport, LifecycleState, WarningLedger, WARNING_FLAG_KEY};
pub use notifier::{LoggingNotifier, Notifier, NotifyError};
pub use orchestrator::{
    CleanupOrchestrator, CleanupRunResult, Collaborators, WorkspaceInspection, WorkspaceOutcome,
    WorkspaceReport,
};
pub use runner::run_chunked;
pub use store::{BillingStore, Clock, MemberDirectory, StoreError, SystemClock, VariableStore, WorkspaceStore};
pub use worker::start_cleanup_worker;
