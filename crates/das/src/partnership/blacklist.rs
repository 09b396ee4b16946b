use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::store::RepositoryError;

/// Reason a reporter gave for blocking another athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistReason {
    Harassment,
    Spam,
    InappropriateContent,
    Other,
}

/// One-directional block: `reporter_id` no longer accepts requests from `blocked_user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRequestBlacklistEntry {
    pub id: u64,
    pub reporter_id: AccountId,
    pub blocked_user_id: AccountId,
    pub reason: BlacklistReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBlacklistCriteria {
    pub reporter_id: Option<AccountId>,
    pub blocked_user_id: Option<AccountId>,
}

impl SearchBlacklistCriteria {
    pub fn reported_by(reporter_id: AccountId) -> Self {
        Self {
            reporter_id: Some(reporter_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &PartnershipRequestBlacklistEntry) -> bool {
        self.reporter_id.map_or(true, |id| entry.reporter_id == id)
            && self
                .blocked_user_id
                .map_or(true, |id| entry.blocked_user_id == id)
    }
}

/// Read-only view of the blacklist consulted while validating requests.
pub trait BlacklistRegistry: Send + Sync {
    fn search(
        &self,
        criteria: &SearchBlacklistCriteria,
    ) -> Result<Vec<PartnershipRequestBlacklistEntry>, RepositoryError>;
}
