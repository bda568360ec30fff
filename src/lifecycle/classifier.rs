use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lifecycle::inactivity::Inactivity;

/// Outcome of classifying a suspended workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleAction {
    None,
    Warn,
    Delete,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleAction::None => f.write_str("NONE"),
            LifecycleAction::Warn => f.write_str("WARN"),
            LifecycleAction::Delete => f.write_str("DELETE"),
        }
    }
}

/// Map inactivity to an action.
///
/// Exactly `delete_threshold` days is still WARN: deletion needs strictly more.
/// `warn_threshold < delete_threshold` is expected but not checked here.
pub fn classify(inactivity: Inactivity, warn_threshold: i64, delete_threshold: i64) -> LifecycleAction {
    let days = match inactivity {
        Inactivity::Unknown => return LifecycleAction::None,
        Inactivity::Days(days) => days,
    };

    if days > delete_threshold {
        LifecycleAction::Delete
    } else if days > warn_threshold {
        LifecycleAction::Warn
    } else {
        LifecycleAction::None
    }
}
