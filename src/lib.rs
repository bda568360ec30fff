pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod lifecycle;
pub mod services;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{CleanupPolicy, LifecycleConfig};
pub use error::LifecycleError;
pub use lifecycle::{CleanupOrchestrator, CleanupRunResult, Collaborators};
