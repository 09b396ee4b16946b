use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::account::{
    Account, AccountDirectory, AccountId, AccountRole, Gender, SearchAccountCriteria,
};
use crate::partnership::blacklist::{
    BlacklistRegistry, PartnershipRequestBlacklistEntry, SearchBlacklistCriteria,
};
use crate::partnership::domain::{NewPartnership, Partnership, PartnershipRole};
use crate::partnership::repository::{
    PartnershipRepository, PartnershipRequestRepository, SearchPartnershipCriteria,
    SearchPartnershipRequestCriteria,
};
use crate::partnership::request::{
    NewPartnershipRequest, PartnershipRequest, PartnershipRequestRecord,
    PartnershipRequestResponse, RequestId, RequestStatus, ResponseCode,
};
use crate::partnership::{partnership_router, PartnershipRequestService};
use crate::store::memory::{
    InMemoryAccountDirectory, InMemoryBlacklistRegistry, InMemoryPartnershipRepository,
    InMemoryPartnershipRequestRepository,
};
use crate::store::RepositoryError;

pub(super) const LEAD: AccountId = AccountId(1);
pub(super) const FOLLOW: AccountId = AccountId(2);
pub(super) const OTHER_LEAD: AccountId = AccountId(3);
pub(super) const ORGANIZER: AccountId = AccountId(4);
pub(super) const UNKNOWN: AccountId = AccountId(99);

pub(super) type MemoryService = PartnershipRequestService<
    InMemoryAccountDirectory,
    InMemoryBlacklistRegistry,
    InMemoryPartnershipRepository,
    InMemoryPartnershipRequestRepository,
>;

pub(super) fn account(id: AccountId, gender: Gender, roles: &[AccountRole]) -> Account {
    Account {
        id,
        uuid: Uuid::new_v4(),
        email: format!("athlete{}@das.test", id.0),
        first_name: "Test".to_string(),
        last_name: format!("Dancer {}", id.0),
        gender,
        date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 14).expect("valid date"),
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
    }
}

pub(super) fn responded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 4, 2, 19, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct Fixture {
    pub(super) service: Arc<MemoryService>,
    pub(super) accounts: Arc<InMemoryAccountDirectory>,
    pub(super) blacklist: Arc<InMemoryBlacklistRegistry>,
    pub(super) partnerships: Arc<InMemoryPartnershipRepository>,
    pub(super) requests: Arc<InMemoryPartnershipRequestRepository>,
}

/// Stores seeded with a male lead (1), a female follow (2), a second male (3), and an
/// organizer who is not an athlete (4).
pub(super) fn fixture() -> Fixture {
    let accounts = Arc::new(InMemoryAccountDirectory::default());
    for seeded in [
        account(LEAD, Gender::Male, &[AccountRole::Athlete]),
        account(FOLLOW, Gender::Female, &[AccountRole::Athlete]),
        account(
            OTHER_LEAD,
            Gender::Male,
            &[AccountRole::Athlete, AccountRole::Adjudicator],
        ),
        account(ORGANIZER, Gender::Female, &[AccountRole::Organizer]),
    ] {
        accounts.insert(seeded).expect("seed account");
    }

    let blacklist = Arc::new(InMemoryBlacklistRegistry::default());
    let partnerships = Arc::new(InMemoryPartnershipRepository::default());
    let requests = Arc::new(InMemoryPartnershipRequestRepository::default());
    let service = Arc::new(PartnershipRequestService::new(
        accounts.clone(),
        blacklist.clone(),
        partnerships.clone(),
        requests.clone(),
    ));

    Fixture {
        service,
        accounts,
        blacklist,
        partnerships,
        requests,
    }
}

pub(super) fn proposal(
    sender_id: AccountId,
    recipient_id: AccountId,
    sender_role: PartnershipRole,
) -> PartnershipRequest {
    PartnershipRequest {
        sender_id,
        recipient_id,
        sender_role,
        recipient_role: sender_role.counterpart(),
        message: "Looking for a standard partner for the spring season".to_string(),
    }
}

pub(super) fn response(
    request_id: RequestId,
    recipient_id: AccountId,
    code: ResponseCode,
) -> PartnershipRequestResponse {
    PartnershipRequestResponse {
        request_id,
        recipient_id,
        response: code,
        responded_at: responded_at(),
    }
}

/// Store the request directly, bypassing validation.
pub(super) fn stored_request(
    requests: &InMemoryPartnershipRequestRepository,
    request: PartnershipRequest,
) -> PartnershipRequestRecord {
    requests
        .create(NewPartnershipRequest {
            sender_id: request.sender_id,
            recipient_id: request.recipient_id,
            sender_role: request.sender_role,
            recipient_role: request.recipient_role,
            message: request.message,
            status: RequestStatus::Pending,
            create_user_id: request.sender_id,
            created_at: responded_at(),
        })
        .expect("request stored")
}

pub(super) fn existing_partnership(
    partnerships: &InMemoryPartnershipRepository,
    lead_id: AccountId,
    follow_id: AccountId,
) -> Partnership {
    partnerships
        .create(NewPartnership {
            lead_id,
            follow_id,
            same_sex: false,
            created_at: responded_at(),
        })
        .expect("partnership stored")
}

/// Store double whose every call fails, standing in for a dropped database connection.
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl AccountDirectory for UnavailableStore {
    fn search(&self, _criteria: &SearchAccountCriteria) -> Result<Vec<Account>, RepositoryError> {
        offline()
    }
}

impl BlacklistRegistry for UnavailableStore {
    fn search(
        &self,
        _criteria: &SearchBlacklistCriteria,
    ) -> Result<Vec<PartnershipRequestBlacklistEntry>, RepositoryError> {
        offline()
    }
}

impl PartnershipRepository for UnavailableStore {
    fn create(&self, _partnership: NewPartnership) -> Result<Partnership, RepositoryError> {
        offline()
    }

    fn search(
        &self,
        _criteria: &SearchPartnershipCriteria,
    ) -> Result<Vec<Partnership>, RepositoryError> {
        offline()
    }
}

impl PartnershipRequestRepository for UnavailableStore {
    fn create(
        &self,
        _request: NewPartnershipRequest,
    ) -> Result<PartnershipRequestRecord, RepositoryError> {
        offline()
    }

    fn update(&self, _record: &PartnershipRequestRecord) -> Result<(), RepositoryError> {
        offline()
    }

    fn search(
        &self,
        _criteria: &SearchPartnershipRequestCriteria,
    ) -> Result<Vec<PartnershipRequestRecord>, RepositoryError> {
        offline()
    }
}

pub(super) fn router_for(fixture: &Fixture) -> axum::Router {
    partnership_router(fixture.service.clone())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
