pub mod billing;
pub mod member;
pub mod workspace;

pub use billing::BillingRecord;
pub use member::Member;
pub use workspace::{ActivationStatus, Workspace, WorkspaceRow};
