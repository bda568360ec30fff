use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::lifecycle::store::{BillingStore, Clock, StoreError};

pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Elapsed billing inactivity for a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum Inactivity {
    /// No billing record exists; excluded from warn and delete decisions
    Unknown,
    Days(i64),
}

impl Inactivity {
    pub fn days(&self) -> Option<i64> {
        match self {
            Inactivity::Unknown => None,
            Inactivity::Days(days) => Some(*days),
        }
    }
}

impl fmt::Display for Inactivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inactivity::Unknown => f.write_str("unknown"),
            Inactivity::Days(days) => write!(f, "{} days", days),
        }
    }
}

/// Whole days between the last billing activity and `now`, floored.
pub fn inactive_days(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - updated_at).num_milliseconds().div_euclid(ONE_DAY_MS)
}

/// Computes inactivity from the most recent billing record. Read-only.
pub struct InactivityCalculator {
    billing: Arc<dyn BillingStore>,
    clock: Arc<dyn Clock>,
}

impl InactivityCalculator {
    pub fn new(billing: Arc<dyn BillingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { billing, clock }
    }

    pub async fn inactivity(&self, workspace_id: Uuid) -> Result<Inactivity, StoreError> {
        let record = self.billing.most_recent_subscription(workspace_id).await?;

        match record {
            Some(record) => Ok(Inactivity::Days(inactive_days(record.updated_at, self.clock.now()))),
            None => {
                tracing::warn!("No billing subscription found for workspace {}", workspace_id);
                Ok(Inactivity::Unknown)
            }
        }
    }
}
