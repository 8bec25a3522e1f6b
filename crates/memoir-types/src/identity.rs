//! Identity (onboarding baseline) record types.
//!
//! The identity record holds the fixed set of psychological onboarding
//! answers. The identity projector maps each non-empty field onto a memory
//! record; the mapping table lives in `memoir-core::identity`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user's onboarding baseline: one row per user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Uuid,
    pub current_struggle: Option<String>,
    pub nightmare_self: Option<String>,
    pub last_broken_promise: Option<String>,
    pub most_common_slip_moment: Option<String>,
    pub empty_excuse: Option<String>,
    pub weak_excuse_counter: Option<String>,
    pub desired_outcome: Option<String>,
    pub daily_non_negotiable: Option<String>,
    pub regret_if_no_change: Option<String>,
    pub meaning_of_breaking_contract: Option<String>,
    pub external_judgment: Option<String>,
    pub final_oath: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_record_serde_roundtrip() {
        let record = IdentityRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            empty_excuse: Some("I'll start Monday".to_string()),
            final_oath: Some("I will not lie to myself".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: IdentityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.empty_excuse.as_deref(), Some("I'll start Monday"));
        assert!(parsed.current_struggle.is_none());
    }
}
