use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::RepositoryError;

/// Numeric identifier assigned to an account by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl AccountId {
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capabilities an account can hold. Only athletes may take part in partnerships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Athlete,
    Adjudicator,
    Scrutineer,
    Organizer,
    Administrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

/// Identity record owned by the account directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub uuid: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub roles: BTreeSet<AccountRole>,
}

impl Account {
    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_athlete(&self) -> bool {
        self.has_role(AccountRole::Athlete)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Parameters an [`AccountDirectory`] can search by. Unset fields do not constrain the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchAccountCriteria {
    pub id: Option<AccountId>,
    pub email: Option<String>,
    pub uuid: Option<Uuid>,
}

impl SearchAccountCriteria {
    pub fn by_id(id: AccountId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn by_uuid(uuid: Uuid) -> Self {
        Self {
            uuid: Some(uuid),
            ..Self::default()
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        self.id.map_or(true, |id| account.id == id)
            && self
                .email
                .as_deref()
                .map_or(true, |email| account.email.eq_ignore_ascii_case(email))
            && self.uuid.map_or(true, |uuid| account.uuid == uuid)
    }
}

/// Lookup surface of the account directory.
pub trait AccountDirectory: Send + Sync {
    fn search(&self, criteria: &SearchAccountCriteria) -> Result<Vec<Account>, RepositoryError>;
}

/// Resolve a single account. Zero or several matches both count as "not found".
pub fn find_account<D>(
    directory: &D,
    criteria: &SearchAccountCriteria,
) -> Result<Option<Account>, RepositoryError>
where
    D: AccountDirectory + ?Sized,
{
    let mut matches = directory.search(criteria)?;
    if matches.len() == 1 {
        Ok(matches.pop())
    } else {
        Ok(None)
    }
}
