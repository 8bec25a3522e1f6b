//! Promise record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Outcome of a user promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromiseStatus {
    Pending,
    Kept,
    Broken,
}

impl fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromiseStatus::Pending => write!(f, "pending"),
            PromiseStatus::Kept => write!(f, "kept"),
            PromiseStatus::Broken => write!(f, "broken"),
        }
    }
}

impl FromStr for PromiseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PromiseStatus::Pending),
            "kept" => Ok(PromiseStatus::Kept),
            "broken" => Ok(PromiseStatus::Broken),
            other => Err(format!("invalid promise status: '{other}'")),
        }
    }
}

/// A commitment the user made during or between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromiseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: PromiseStatus,
    /// Free-form category, e.g. "fitness", "work". `None` maps to "general".
    pub category: Option<String>,
    /// The user's stated reason when a promise was broken.
    pub excuse_text: Option<String>,
    pub created_at: DateTime<Utc>,
}
