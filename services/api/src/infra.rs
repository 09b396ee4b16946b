use chrono::NaiveDate;
use das::account::{Account, AccountId, AccountRole, Gender};
use das::store::memory::InMemoryAccountDirectory;
use das::store::RepositoryError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct FixtureAthlete {
    id: u64,
    first_name: &'static str,
    last_name: &'static str,
    gender: Gender,
    born: (i32, u32, u32),
    extra_role: Option<AccountRole>,
}

const FIXTURE_ATHLETES: [FixtureAthlete; 5] = [
    FixtureAthlete {
        id: 1,
        first_name: "Mikhail",
        last_name: "Volkov",
        gender: Gender::Male,
        born: (1996, 5, 4),
        extra_role: None,
    },
    FixtureAthlete {
        id: 2,
        first_name: "Elena",
        last_name: "Marchetti",
        gender: Gender::Female,
        born: (1998, 11, 17),
        extra_role: None,
    },
    FixtureAthlete {
        id: 3,
        first_name: "Tomasz",
        last_name: "Nowak",
        gender: Gender::Male,
        born: (1993, 2, 28),
        extra_role: Some(AccountRole::Adjudicator),
    },
    FixtureAthlete {
        id: 4,
        first_name: "Sofia",
        last_name: "Lindqvist",
        gender: Gender::Female,
        born: (2001, 8, 9),
        extra_role: None,
    },
    FixtureAthlete {
        id: 5,
        first_name: "Daniel",
        last_name: "Okafor",
        gender: Gender::Male,
        born: (1999, 1, 30),
        extra_role: None,
    },
];

/// Id of the fixture organizer, who holds no athlete role.
pub(crate) const FIXTURE_ORGANIZER: AccountId = AccountId(6);

/// Seed the directory with five athletes and one organizer. Returns how many accounts were added.
pub(crate) fn seed_fixture_accounts(
    directory: &InMemoryAccountDirectory,
) -> Result<usize, RepositoryError> {
    let mut seeded = 0;
    for athlete in &FIXTURE_ATHLETES {
        let (year, month, day) = athlete.born;
        let Some(date_of_birth) = NaiveDate::from_ymd_opt(year, month, day) else {
            warn!(account_id = athlete.id, "skipping fixture athlete with invalid birth date");
            continue;
        };

        let mut roles = BTreeSet::from([AccountRole::Athlete]);
        roles.extend(athlete.extra_role);
        directory.insert(Account {
            id: AccountId(athlete.id),
            uuid: Uuid::new_v4(),
            email: format!(
                "{}.{}@dancesport.test",
                athlete.first_name.to_ascii_lowercase(),
                athlete.last_name.to_ascii_lowercase()
            ),
            first_name: athlete.first_name.to_string(),
            last_name: athlete.last_name.to_string(),
            gender: athlete.gender,
            date_of_birth,
            roles,
        })?;
        seeded += 1;
    }

    if let Some(date_of_birth) = NaiveDate::from_ymd_opt(1978, 3, 12) {
        directory.insert(Account {
            id: FIXTURE_ORGANIZER,
            uuid: Uuid::new_v4(),
            email: "competitions@dancesport.test".to_string(),
            first_name: "Ruth".to_string(),
            last_name: "Callaghan".to_string(),
            gender: Gender::Female,
            date_of_birth,
            roles: BTreeSet::from([AccountRole::Organizer]),
        })?;
        seeded += 1;
    }

    Ok(seeded)
}
