use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Identifier wrapper for confirmed partnerships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnershipId(pub u64);

impl fmt::Display for PartnershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two complementary roles of a dance partnership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipRole {
    Lead,
    Follow,
}

impl PartnershipRole {
    pub const ALL: [PartnershipRole; 2] = [PartnershipRole::Lead, PartnershipRole::Follow];

    pub const fn label(self) -> &'static str {
        match self {
            PartnershipRole::Lead => "lead",
            PartnershipRole::Follow => "follow",
        }
    }

    pub const fn counterpart(self) -> Self {
        match self {
            PartnershipRole::Lead => PartnershipRole::Follow,
            PartnershipRole::Follow => PartnershipRole::Lead,
        }
    }
}

/// Confirmed lead/follow pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub id: PartnershipId,
    pub lead_id: AccountId,
    pub follow_id: AccountId,
    pub same_sex: bool,
    pub favorite_by_lead: bool,
    pub favorite_by_follow: bool,
    pub competitions_attended: u32,
    pub events_attended: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partnership {
    pub fn has_athlete(&self, athlete_id: AccountId) -> bool {
        self.lead_id == athlete_id || self.follow_id == athlete_id
    }

    pub fn role_of(&self, athlete_id: AccountId) -> Option<PartnershipRole> {
        if self.lead_id == athlete_id {
            Some(PartnershipRole::Lead)
        } else if self.follow_id == athlete_id {
            Some(PartnershipRole::Follow)
        } else {
            None
        }
    }
}

/// Partnership awaiting an id from the partnership store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartnership {
    pub lead_id: AccountId,
    pub follow_id: AccountId,
    pub same_sex: bool,
    pub created_at: DateTime<Utc>,
}

impl NewPartnership {
    pub fn into_partnership(self, id: PartnershipId) -> Partnership {
        Partnership {
            id,
            lead_id: self.lead_id,
            follow_id: self.follow_id,
            same_sex: self.same_sex,
            favorite_by_lead: false,
            favorite_by_follow: false,
            competitions_attended: 0,
            events_attended: 0,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Reference entry describing a role, exposed to clients building request forms.
#[derive(Debug, Clone, Serialize)]
pub struct PartnershipRoleView {
    pub role: PartnershipRole,
    pub label: &'static str,
}

impl From<PartnershipRole> for PartnershipRoleView {
    fn from(role: PartnershipRole) -> Self {
        Self {
            role,
            label: role.label(),
        }
    }
}
